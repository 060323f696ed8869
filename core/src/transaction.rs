//! All-or-nothing submission of escrow transitions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::escrow::Escrow;
use crate::event::Receipt;
use crate::identity::{Address, Secret};
use crate::ledger::Ledger;
use crate::Result;

/// A transition request as submitted to the host ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    Fund { sender: Address, amount: u128 },
    Claim { secret: Secret },
    Expire,
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fund { .. } => "fund",
            Self::Claim { .. } => "claim",
            Self::Expire => "expire",
        }
    }
}

/// Applies `call` to `escrow` as a single ledger transaction.
///
/// On success every effect of the transition is kept. If the ledger fails
/// (for example the payout recipient is unreachable), the escrow and the
/// ledger are restored to their state before the call and the error is
/// returned. Nothing is retried.
///
/// This is the only way to drive an [`Escrow`] from outside the crate:
///
/// ```compile_fail
/// # use htlc_core::{Address, Escrow, MemoryLedger};
/// fn raw(escrow: &mut Escrow, ledger: &mut MemoryLedger) {
///     escrow.fund(ledger, Address::from_bytes([3; 20]), 10);
/// }
/// ```
///
/// # Errors
///
/// Returns the [`crate::LedgerError`] raised by the host, wrapped in
/// [`crate::EscrowError::Ledger`].
pub fn submit<L>(escrow: &mut Escrow, ledger: &mut L, call: &Call) -> Result<Receipt>
where
    L: Ledger + Clone,
{
    let escrow_snapshot = escrow.clone();
    let ledger_snapshot = ledger.clone();

    let outcome = match call {
        Call::Fund { sender, amount } => escrow.fund(ledger, *sender, *amount),
        Call::Claim { secret } => escrow.claim(ledger, secret.as_bytes()),
        Call::Expire => escrow.expire(ledger),
    };

    if let Err(e) = &outcome {
        warn!(transition = call.name(), error = %e, "transaction reverted");
        *escrow = escrow_snapshot;
        *ledger = ledger_snapshot;
    }
    outcome
}
