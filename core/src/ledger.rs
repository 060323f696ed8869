//! Ledger context: the facts and actions an escrow needs from its host.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::event::{Event, Payment};
use crate::identity::Address;

/// Capability interface the escrow state machine runs against.
///
/// Implementors must not re-enter the escrow from `dispatch_payment`:
/// a payment is recorded for the host to deliver, never executed inline.
pub trait Ledger {
    /// Current block height. Only ever increases.
    fn current_height(&self) -> u64;

    /// Balance currently custodied by the escrow.
    fn current_balance(&self) -> u128;

    /// Absorb an incoming payment into the held balance.
    fn accept_incoming(&mut self, amount: u128) -> Result<(), LedgerError>;

    /// Transfer `payment.amount` out of the held balance to `payment.recipient`.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] when the payment cannot be delivered.
    fn dispatch_payment(&mut self, payment: Payment) -> Result<(), LedgerError>;

    /// Record a structured notification.
    fn emit_event(&mut self, event: Event);
}

/// In-memory ledger holding one escrow's balance plus the accounts it pays.
///
/// Serves as the deterministic test double and as the store behind the
/// local CLI. Payments are credited to `accounts` immediately; recipients
/// marked unreachable make delivery fail.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    height: u64,
    balance: u128,
    #[serde(default)]
    accounts: BTreeMap<Address, u128>,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    outbox: Vec<Payment>,
    #[serde(default)]
    unreachable: BTreeSet<Address>,
}

impl MemoryLedger {
    /// Fresh ledger at `height` with nothing custodied.
    pub fn at_height(height: u64) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    /// Moves the chain forward to `height`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::HeightRegression`] if `height` is below the current height.
    pub fn advance_to(&mut self, height: u64) -> Result<(), LedgerError> {
        if height < self.height {
            return Err(LedgerError::HeightRegression {
                current: self.height,
                requested: height,
            });
        }
        self.height = height;
        Ok(())
    }

    /// Makes every future payment to `address` fail delivery.
    pub fn mark_unreachable(&mut self, address: Address) {
        self.unreachable.insert(address);
    }

    pub fn mark_reachable(&mut self, address: &Address) {
        self.unreachable.remove(address);
    }

    /// Total amount delivered to `address` so far.
    pub fn account_balance(&self, address: &Address) -> u128 {
        self.accounts.get(address).copied().unwrap_or_default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn outbox(&self) -> &[Payment] {
        &self.outbox
    }
}

impl Ledger for MemoryLedger {
    fn current_height(&self) -> u64 {
        self.height
    }

    fn current_balance(&self) -> u128 {
        self.balance
    }

    fn accept_incoming(&mut self, amount: u128) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        Ok(())
    }

    fn dispatch_payment(&mut self, payment: Payment) -> Result<(), LedgerError> {
        if self.unreachable.contains(&payment.recipient) {
            return Err(LedgerError::RecipientUnreachable(payment.recipient));
        }
        let remaining = self.balance.checked_sub(payment.amount).ok_or(
            LedgerError::InsufficientBalance {
                requested: payment.amount,
                available: self.balance,
            },
        )?;
        let credited = self
            .account_balance(&payment.recipient)
            .checked_add(payment.amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.balance = remaining;
        self.accounts.insert(payment.recipient, credited);
        self.outbox.push(payment);
        Ok(())
    }

    fn emit_event(&mut self, event: Event) {
        self.events.push(event);
    }
}
