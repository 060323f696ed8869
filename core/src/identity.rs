//! Identities of escrow parties and the secret commitment.
//!
//! Every byte string crossing the escrow boundary uses the canonical
//! `0x`-prefixed hexadecimal encoding. Values without the prefix are
//! rejected before an escrow can come into existence.

use bincode::{Decode, Encode};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::IdentityError;

/// Length of a network address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Length of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// A 20-byte network address identifying an escrow party.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Encode,
    Decode,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

/// A 32-byte SHA-256 commitment to the escrow secret.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, SerializeDisplay, DeserializeFromStr,
)]
pub struct SecretHash([u8; DIGEST_LEN]);

impl SecretHash {
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

/// A candidate secret (hash preimage) supplied to `claim`.
#[derive(Clone, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Secrets are never written to logs.
impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([{} bytes])", self.0.len())
    }
}

/// Decodes a `0x`-prefixed hex string of any non-zero length.
///
/// # Errors
///
/// Returns [`IdentityError::MissingPrefix`] when the prefix is absent and
/// [`IdentityError::Hex`] when the payload is not valid hex.
pub fn decode_prefixed(s: &str) -> Result<Vec<u8>, IdentityError> {
    if s.is_empty() {
        return Err(IdentityError::EmptyIdentity);
    }
    let payload = s.strip_prefix("0x").ok_or(IdentityError::MissingPrefix)?;
    if payload.is_empty() {
        return Err(IdentityError::EmptyIdentity);
    }
    Ok(hex::decode(payload)?)
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], IdentityError> {
    let bytes = decode_prefixed(s)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| IdentityError::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

impl std::str::FromStr for Address {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self)
    }
}

impl std::str::FromStr for SecretHash {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self)
    }
}

impl std::str::FromStr for Secret {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_prefixed(s).map(Self)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Display for SecretHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl From<[u8; DIGEST_LEN]> for SecretHash {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr as _;

    use super::*;

    #[test]
    fn parse_address() {
        let addr = Address::from_str("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap();
        assert_eq!(addr.as_bytes()[0], 0xd8);
        assert_eq!(
            addr.to_string(),
            "0xd8da6bf26964af9d7eed9e03e53415d37aa96045"
        );
    }

    #[test]
    fn reject_unprefixed() {
        assert_eq!(
            Address::from_str("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
            Err(IdentityError::MissingPrefix)
        );
        assert_eq!(
            SecretHash::from_str(
                "192f358b9eb5c51b27dff7a7cc82c8ffe058e2c92fdc2474b88bf5c41a14567f"
            ),
            Err(IdentityError::MissingPrefix)
        );
    }

    #[test]
    fn reject_wrong_length() {
        assert_eq!(
            Address::from_str("0xdeadbeef"),
            Err(IdentityError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: 4
            })
        );
        let digest = format!("0x{}", "ab".repeat(33));
        assert_eq!(
            SecretHash::from_str(&digest),
            Err(IdentityError::InvalidLength {
                expected: DIGEST_LEN,
                actual: 33
            })
        );
    }

    #[test]
    fn reject_bad_hex_and_empty() {
        assert!(matches!(
            Address::from_str("0xzz"),
            Err(IdentityError::Hex(_))
        ));
        assert_eq!(Address::from_str(""), Err(IdentityError::EmptyIdentity));
        assert_eq!(Secret::from_str("0x"), Err(IdentityError::EmptyIdentity));
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::from_str("0x53").unwrap();
        assert_eq!(secret.as_bytes(), b"S");
        assert_eq!(format!("{:?}", secret), "Secret([1 bytes])");
    }

    #[test]
    fn serde_uses_prefixed_hex() {
        let hash = SecretHash::from_bytes([0x11; DIGEST_LEN]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "11".repeat(DIGEST_LEN)));
        assert_eq!(serde_json::from_str::<SecretHash>(&json).unwrap(), hash);

        let unprefixed = format!("\"{}\"", "11".repeat(DIGEST_LEN));
        assert!(serde_json::from_str::<SecretHash>(&unprefixed).is_err());
    }
}
