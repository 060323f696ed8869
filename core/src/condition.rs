//! Hashlock condition and deterministic verification logic.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::ConditionError;
use crate::identity::SecretHash;
use crate::Result;

/// A hashlock requiring SHA-256 preimage verification.
///
/// The condition is satisfied when `SHA-256(preimage) == hash`. The
/// commitment is fixed at construction and never changes afterwards.
///
/// # Example
///
/// ```
/// use htlc_core::Hashlock;
///
/// let lock = Hashlock::from_preimage(b"my-secret-preimage");
/// assert!(lock.verify(b"my-secret-preimage").is_ok());
/// assert!(lock.verify(b"another-guess").is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hashlock {
    hash: SecretHash,
}

impl Hashlock {
    pub fn new(hash: SecretHash) -> Self {
        Self { hash }
    }

    /// Builds the commitment for a known secret.
    pub fn from_preimage(preimage: &[u8]) -> Self {
        Self::new(digest(preimage))
    }

    pub fn hash(&self) -> &SecretHash {
        &self.hash
    }

    /// Verifies that `SHA-256(preimage) == hash` using constant-time comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::PreimageMismatch`] if the computed hash does not match.
    pub fn verify(&self, preimage: &[u8]) -> Result<()> {
        let computed = Sha256::digest(preimage);
        computed
            .as_slice()
            .ct_eq(self.hash.as_bytes())
            .unwrap_u8()
            .eq(&1)
            .then_some(())
            .ok_or_else(|| ConditionError::PreimageMismatch.into())
    }

    pub fn is_satisfied_by(&self, preimage: &[u8]) -> bool {
        self.verify(preimage).is_ok()
    }
}

/// SHA-256 digest of `preimage` as a [`SecretHash`].
pub fn digest(preimage: &[u8]) -> SecretHash {
    let hash: [u8; 32] = Sha256::digest(preimage).into();
    SecretHash::from(hash)
}
