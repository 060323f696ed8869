//! Events and outgoing payment messages produced by escrow transitions.
//!
//! Event names and codes are part of the wire contract observed by
//! off-ledger watchers. Code `2` is shared by a fund acknowledgment and a
//! redeem payout; watchers tell a refund apart by code `4`.

use serde::{Deserialize, Serialize};

use crate::identity::Address;

/// `fund` or `claim` guard failed.
pub const NOT_CLAIMABLE_CODE: i32 = 1;
/// Funding accepted, claim paid out, and the tag on every payment message.
pub const CLAIMABLE_CODE: i32 = 2;
/// `expire` guard failed.
pub const NOT_REFUNDABLE_CODE: i32 = 3;
/// `expire` paid out to the refund party.
pub const REFUNDABLE_CODE: i32 = 4;

/// Notification emitted exactly once per transition call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// `fund` after the deadline, or `claim` with a wrong secret or too late.
    NotClaimable,
    /// Incoming funds were accepted.
    Funded,
    /// Held balance paid out to the redeem party.
    Redeemed,
    /// `expire` before the deadline passed, or nothing left to refund.
    NotRefundable,
    /// Held balance paid out to the refund party.
    Refunded,
}

impl Event {
    /// Wire-level event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotClaimable => "notClaimable",
            Self::Funded | Self::Redeemed | Self::Refunded => "Claimed",
            Self::NotRefundable => "notRefundable",
        }
    }

    /// Wire-level event code.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotClaimable => NOT_CLAIMABLE_CODE,
            Self::Funded | Self::Redeemed => CLAIMABLE_CODE,
            Self::NotRefundable => NOT_REFUNDABLE_CODE,
            Self::Refunded => REFUNDABLE_CODE,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::NotClaimable | Self::NotRefundable)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name(), self.code())
    }
}

/// Outgoing payment message handed to the host ledger.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub recipient: Address,
    /// Amount in the smallest network unit.
    pub amount: u128,
    pub code: i32,
}

impl Payment {
    /// Transfer of the full held balance.
    pub fn payout(recipient: Address, amount: u128) -> Self {
        Self {
            recipient,
            amount,
            code: CLAIMABLE_CODE,
        }
    }

    /// Zero-value receipt sent back to a funder.
    pub fn acknowledgment(recipient: Address) -> Self {
        Self::payout(recipient, 0)
    }
}

/// Result of one transition: the event emitted and the payment dispatched, if any.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub event: Event,
    pub payment: Option<Payment>,
}

impl Receipt {
    pub fn rejected(event: Event) -> Self {
        Self {
            event,
            payment: None,
        }
    }

    pub fn accepted(event: Event, payment: Payment) -> Self {
        Self {
            event,
            payment: Some(payment),
        }
    }
}
