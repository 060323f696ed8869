use std::path::{Path, PathBuf};

pub use error::{ClientError, Result};
use htlc_core::interface::{load_escrow_data, save_escrow_data};
use htlc_core::{
    submit, Address, Call, Escrow, EscrowParams, EscrowState, Ledger, MemoryLedger, Receipt,
    Secret, SecretHash, Settlement,
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod error;

/// Everything persisted in the ledger state file: one escrow and the
/// ledger it lives on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deployment {
    /// Address derived from the escrow's construction parameters.
    pub address: Address,
    pub escrow: Escrow,
    pub ledger: MemoryLedger,
}

/// Snapshot of an escrow as reported by `status`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Status {
    pub address: Address,
    pub state: EscrowState,
    pub height: u64,
    pub expiration_height: u64,
    pub held_balance: u128,
    pub refund_party: Address,
    pub redeem_party: Address,
    pub secret_commitment: SecretHash,
    pub settlement: Option<Settlement>,
    /// Event log as `name/code`.
    pub events: Vec<String>,
}

/// Drives a single escrow stored in a JSON state file.
///
/// Every transition is submitted atomically and the state file is only
/// rewritten after the transaction commits.
pub struct HtlcClient {
    path: PathBuf,
    deployment: Deployment,
}

impl HtlcClient {
    /// Creates a new escrow at `height` and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyDeployed`] if `path` exists and
    /// `overwrite` is not set.
    pub fn deploy<P: AsRef<Path>>(
        path: P,
        params: EscrowParams,
        height: u64,
        overwrite: bool,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() && !overwrite {
            return Err(ClientError::AlreadyDeployed(path));
        }

        let deployment = Deployment {
            address: params.contract_address()?,
            escrow: Escrow::new(params),
            ledger: MemoryLedger::at_height(height),
        };
        let client = Self { path, deployment };
        client.save()?;

        info!(
            address = %client.deployment.address,
            expiration = params.expiration_height,
            "Escrow deployed"
        );
        Ok(client)
    }

    /// Loads an escrow previously written by [`HtlcClient::deploy`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AddressMismatch`] if the stored address was
    /// not derived from the stored escrow's parameters.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let deployment: Deployment = load_escrow_data(&path)?;

        let derived = deployment.escrow.params().contract_address()?;
        if derived != deployment.address {
            return Err(ClientError::AddressMismatch {
                stored: deployment.address,
                derived,
            });
        }
        Ok(Self { path, deployment })
    }

    pub fn fund(&mut self, sender: Address, amount: u128) -> Result<Receipt> {
        self.submit(Call::Fund { sender, amount })
    }

    pub fn claim(&mut self, secret: Secret) -> Result<Receipt> {
        self.submit(Call::Claim { secret })
    }

    pub fn expire(&mut self) -> Result<Receipt> {
        self.submit(Call::Expire)
    }

    /// Moves the local chain to `height`.
    pub fn advance(&mut self, height: u64) -> Result<()> {
        self.deployment
            .ledger
            .advance_to(height)
            .map_err(htlc_core::EscrowError::from)?;
        self.save()
    }

    pub fn status(&self) -> Status {
        let Deployment {
            address,
            escrow,
            ledger,
        } = &self.deployment;

        Status {
            address: *address,
            state: escrow.state(ledger),
            height: ledger.current_height(),
            expiration_height: escrow.expiration_height(),
            held_balance: ledger.current_balance(),
            refund_party: *escrow.refund_party(),
            redeem_party: *escrow.redeem_party(),
            secret_commitment: *escrow.hashlock().hash(),
            settlement: escrow.settlement().copied(),
            events: ledger.events().iter().map(ToString::to_string).collect(),
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    fn submit(&mut self, call: Call) -> Result<Receipt> {
        let Deployment { escrow, ledger, .. } = &mut self.deployment;
        let receipt = submit(escrow, ledger, &call)?;
        self.save()?;
        Ok(receipt)
    }

    fn save(&self) -> Result<()> {
        save_escrow_data(&self.path, &self.deployment)?;
        Ok(())
    }
}
