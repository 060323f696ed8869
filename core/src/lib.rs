//! Hashed time-locked escrow.
//!
//! An [`Escrow`] custodies a balance held on a host [`Ledger`] and releases
//! it to exactly one of two parties: the redeem party, by revealing a secret
//! matching the stored SHA-256 commitment before the expiration block, or
//! the refund party, once that block has passed.

/// Hashlock data structure and deterministic verification logic
pub mod condition;
/// Escrow state machine and guards
pub mod escrow;
/// Events and payment messages emitted by transitions
pub mod event;
/// Parties and prefixed-hex byte strings
pub mod identity;
/// Escrow parameters and JSON file helpers
pub mod interface;
/// Host ledger capability interface and in-memory implementation
pub mod ledger;
/// Atomic transition submission
pub mod transaction;

pub mod error;

pub use condition::Hashlock;
pub use error::{ConditionError, EscrowError, IdentityError, LedgerError};
pub use escrow::{Branch, Escrow, EscrowState, Settlement};
pub use event::{Event, Payment, Receipt};
pub use identity::{Address, Secret, SecretHash};
pub use interface::EscrowParams;
pub use ledger::{Ledger, MemoryLedger};
pub use transaction::{submit, Call};

pub type Result<T> = std::result::Result<T, EscrowError>;
