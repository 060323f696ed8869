use thiserror::Error;

use crate::identity::Address;

/// Escrow-related errors.
///
/// A failed guard is not an error: `fund`, `claim` and `expire` report
/// rejections through events. Errors are reserved for malformed
/// construction input and for failures of the host ledger.
#[derive(Debug, Error, PartialEq)]
pub enum EscrowError {
    #[error("identity error: {0}")]
    Identity(IdentityError),

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("condition error: {0}")]
    Condition(ConditionError),

    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Errors that might occur while parsing a prefixed-hex byte string.
#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("cannot parse identity from empty string")]
    EmptyIdentity,

    #[error("byte strings must be prefixed with 0x")]
    MissingPrefix,

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Failures reported by the host ledger while applying a transition.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("recipient {0} is unreachable")]
    RecipientUnreachable(Address),

    #[error("insufficient balance: requested={requested}, available={available}")]
    InsufficientBalance { requested: u128, available: u128 },

    #[error("balance overflow")]
    BalanceOverflow,

    #[error("block height cannot decrease (current={current}, requested={requested})")]
    HeightRegression { current: u64, requested: u64 },
}

/// Hashlock verification errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConditionError {
    #[error("SHA256(preimage) != hash")]
    PreimageMismatch,
}

impl From<IdentityError> for EscrowError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<LedgerError> for EscrowError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<ConditionError> for EscrowError {
    fn from(value: ConditionError) -> Self {
        Self::Condition(value)
    }
}
