//! Hashed time-locked escrow state machine.
//!
//! Three transitions decide who receives the custodied balance:
//!
//! - `fund` accepts deposits while `height <= expiration_height`.
//! - `claim` pays the redeem party when the secret matches and
//!   `height <= expiration_height`.
//! - `expire` pays the refund party once `height > expiration_height`.
//!
//! At the expiration block itself `claim` is still allowed and `expire`
//! is not, so the two payout branches are never legal at the same height.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::condition::Hashlock;
use crate::event::{Event, Payment, Receipt};
use crate::identity::Address;
use crate::interface::EscrowParams;
use crate::ledger::Ledger;
use crate::Result;

/// Lifecycle of an escrow, derived from balance, height and settlement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EscrowState {
    /// Nothing deposited yet; deadline not reached.
    Funding,
    /// Holding funds; the secret can still be revealed.
    Active,
    /// Deadline passed without a payout; only `expire` can settle.
    ExpiredUnpaid,
    /// A payout happened. Terminal.
    Settled,
}

/// Which party a settlement paid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Redeemed,
    Refunded,
}

/// Record of the single payout an escrow ever makes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settlement {
    pub branch: Branch,
    pub recipient: Address,
    pub amount: u128,
    pub height: u64,
}

/// One escrow instance.
///
/// Construction parameters are immutable. The held balance lives in the
/// [`Ledger`]; the escrow only remembers whether it has settled.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Escrow {
    refund_party: Address,
    redeem_party: Address,
    expiration_height: u64,
    hashlock: Hashlock,
    settlement: Option<Settlement>,
}

impl Escrow {
    pub fn new(params: EscrowParams) -> Self {
        Self {
            refund_party: params.refund_party,
            redeem_party: params.redeem_party,
            expiration_height: params.expiration_height,
            hashlock: Hashlock::new(params.secret_commitment),
            settlement: None,
        }
    }

    pub fn refund_party(&self) -> &Address {
        &self.refund_party
    }

    pub fn redeem_party(&self) -> &Address {
        &self.redeem_party
    }

    pub fn expiration_height(&self) -> u64 {
        self.expiration_height
    }

    pub fn hashlock(&self) -> &Hashlock {
        &self.hashlock
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Construction parameters this escrow was created with.
    pub fn params(&self) -> EscrowParams {
        EscrowParams {
            refund_party: self.refund_party,
            redeem_party: self.redeem_party,
            expiration_height: self.expiration_height,
            secret_commitment: *self.hashlock.hash(),
        }
    }

    pub fn state<L: Ledger + ?Sized>(&self, ledger: &L) -> EscrowState {
        if self.is_settled() {
            return EscrowState::Settled;
        }
        match (
            ledger.current_balance() > 0,
            self.in_time(ledger.current_height()),
        ) {
            (false, true) => EscrowState::Funding,
            (true, true) => EscrowState::Active,
            (_, false) => EscrowState::ExpiredUnpaid,
        }
    }

    fn in_time(&self, height: u64) -> bool {
        height <= self.expiration_height
    }

    /// Deposits `amount` from `sender`.
    ///
    /// Accepted while the deadline has not passed: the amount is absorbed
    /// into the held balance, a zero-value acknowledgment goes back to the
    /// sender and `Claimed/2` is emitted. Otherwise `notClaimable/1` is
    /// emitted and nothing moves.
    ///
    /// A settled escrow rejects deposits with `notClaimable/1` even before
    /// the deadline.
    ///
    /// # Errors
    ///
    /// Returns a ledger error if the deposit or the acknowledgment cannot
    /// be applied. [`crate::submit`] rolls such partial effects back.
    pub(crate) fn fund<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        sender: Address,
        amount: u128,
    ) -> Result<Receipt> {
        let height = ledger.current_height();
        if !self.in_time(height) || self.is_settled() {
            debug!(height, expiration = self.expiration_height, "fund rejected");
            return Ok(self.reject(ledger, Event::NotClaimable));
        }

        ledger.accept_incoming(amount)?;
        let ack = Payment::acknowledgment(sender);
        ledger.dispatch_payment(ack)?;
        ledger.emit_event(Event::Funded);

        info!(height, amount, %sender, "escrow funded");
        Ok(Receipt::accepted(Event::Funded, ack))
    }

    /// Pays the whole held balance, possibly zero, to the redeem party if
    /// `secret` opens the hashlock before the deadline.
    ///
    /// # Errors
    ///
    /// Returns a ledger error if the payout cannot be delivered.
    pub(crate) fn claim<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        secret: &[u8],
    ) -> Result<Receipt> {
        let height = ledger.current_height();
        let balance = ledger.current_balance();
        // Both guards are evaluated before branching.
        let is_correct_secret = self.hashlock.is_satisfied_by(secret);
        let in_time = self.in_time(height);

        if !(is_correct_secret && in_time) || self.is_settled() {
            debug!(height, in_time, balance, "claim rejected");
            return Ok(self.reject(ledger, Event::NotClaimable));
        }

        self.pay_out(ledger, Branch::Redeemed, height, balance)
    }

    /// Pays the whole held balance, possibly zero, to the refund party once
    /// the deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns a ledger error if the payout cannot be delivered.
    pub(crate) fn expire<L: Ledger + ?Sized>(&mut self, ledger: &mut L) -> Result<Receipt> {
        let height = ledger.current_height();
        let balance = ledger.current_balance();

        if self.in_time(height) || self.is_settled() {
            debug!(height, expiration = self.expiration_height, balance, "expire rejected");
            return Ok(self.reject(ledger, Event::NotRefundable));
        }

        self.pay_out(ledger, Branch::Refunded, height, balance)
    }

    fn is_settled(&self) -> bool {
        self.settlement.is_some()
    }

    fn reject<L: Ledger + ?Sized>(&self, ledger: &mut L, event: Event) -> Receipt {
        ledger.emit_event(event);
        Receipt::rejected(event)
    }

    fn pay_out<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        branch: Branch,
        height: u64,
        amount: u128,
    ) -> Result<Receipt> {
        let (recipient, event) = match branch {
            Branch::Redeemed => (self.redeem_party, Event::Redeemed),
            Branch::Refunded => (self.refund_party, Event::Refunded),
        };
        let payment = Payment::payout(recipient, amount);
        ledger.dispatch_payment(payment)?;

        self.settlement = Some(Settlement {
            branch,
            recipient,
            amount,
            height,
        });
        ledger.emit_event(event);

        info!(height, amount, %recipient, ?branch, "escrow settled");
        Ok(Receipt::accepted(event, payment))
    }
}

impl From<EscrowParams> for Escrow {
    fn from(params: EscrowParams) -> Self {
        Self::new(params)
    }
}
