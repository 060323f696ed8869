//! Escrow construction parameters and JSON (de)serialization helpers.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use bincode::config::standard;
use bincode::{Decode, Encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::identity::{Address, SecretHash, ADDRESS_LEN};
use crate::{EscrowError, Result};

/// Default path to escrow params template.
pub const ESCROW_PARAMS_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../templates/escrow_params.json"
);

/// Reads a JSON-encoded file from the given `path` and deserializes into type `T`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be opened, read, or parsed.
/// Unprefixed or malformed byte strings fail here, before any escrow exists.
pub fn load_escrow_data<P, T>(path: P) -> anyhow::Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("loading escrow data: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parsing JSON from {:?}", path))
}

/// Writes `data` (serializable) as pretty-printed JSON to the given `path`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be created or data cannot be serialized.
pub fn save_escrow_data<P, T>(path: P, data: &T) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating file {:?}", path))?;
    serde_json::to_writer_pretty(file, data)
        .with_context(|| format!("serializing to JSON to {:?}", path))
}

/// Parameters required to **create** an escrow. Immutable afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Encode, Decode)]
pub struct EscrowParams {
    /// Who may reclaim the funds once the escrow has expired.
    pub refund_party: Address,

    /// Who may claim the funds by revealing the secret.
    pub redeem_party: Address,

    /// Last block height at which funding and claiming are allowed.
    pub expiration_height: u64,

    /// SHA-256 digest of the secret.
    pub secret_commitment: SecretHash,
}

impl EscrowParams {
    /// Builds parameters from `0x`-prefixed hex strings.
    ///
    /// # Errors
    ///
    /// Returns an [`EscrowError::Identity`] if any byte string is unprefixed,
    /// not hex, or of the wrong length.
    pub fn parse(
        refund_party: &str,
        redeem_party: &str,
        expiration_height: u64,
        secret_commitment: &str,
    ) -> Result<Self> {
        Ok(Self {
            refund_party: refund_party.parse()?,
            redeem_party: redeem_party.parse()?,
            expiration_height,
            secret_commitment: secret_commitment.parse()?,
        })
    }

    /// Deterministic address of the escrow created from these parameters:
    /// the first 20 bytes of `SHA-256(bincode(params))`.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::Encoding`] if the parameters cannot be encoded.
    pub fn contract_address(&self) -> Result<Address> {
        let encoded = bincode::encode_to_vec(self, standard())
            .map_err(|e| EscrowError::Encoding(e.to_string()))?;
        let digest = Sha256::digest(&encoded);

        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&digest[..ADDRESS_LEN]);
        Ok(Address::from_bytes(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentityError;

    const REFUND: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const REDEEM: &str = "0xEA674fdDe714fd979de3EdF0F56AA9716B898ec8";
    const HASH: &str = "0x192f358b9eb5c51b27dff7a7cc82c8ffe058e2c92fdc2474b88bf5c41a14567f";

    #[test]
    fn parse_params() {
        let params = EscrowParams::parse(REFUND, REDEEM, 90_000, HASH).unwrap();
        assert_eq!(params.expiration_height, 90_000);
        assert_eq!(params.secret_commitment.to_string(), HASH);

        assert_eq!(
            EscrowParams::parse(REFUND, REDEEM, 90_000, &HASH[2..]),
            Err(EscrowError::Identity(IdentityError::MissingPrefix))
        );
    }

    #[test]
    fn load_template() {
        let params: EscrowParams = load_escrow_data(ESCROW_PARAMS_PATH).unwrap();
        assert_eq!(
            params,
            EscrowParams::parse(REFUND, REDEEM, 90_000, HASH).unwrap()
        );
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let params = EscrowParams::parse(REFUND, REDEEM, 5, HASH).unwrap();

        save_escrow_data(&path, &params).unwrap();
        let loaded: EscrowParams = load_escrow_data(&path).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn reject_unprefixed_json() {
        let json = format!(
            r#"{{"refund_party":"{}","redeem_party":"{}","expiration_height":1,"secret_commitment":"{}"}}"#,
            &REFUND[2..],
            REDEEM,
            HASH
        );
        assert!(serde_json::from_str::<EscrowParams>(&json).is_err());
    }

    #[test]
    fn contract_address_is_deterministic() {
        let params = EscrowParams::parse(REFUND, REDEEM, 90_000, HASH).unwrap();
        let other = EscrowParams {
            expiration_height: 90_001,
            ..params
        };

        assert_eq!(
            params.contract_address().unwrap(),
            params.contract_address().unwrap()
        );
        assert_ne!(
            params.contract_address().unwrap(),
            other.contract_address().unwrap()
        );
    }
}
