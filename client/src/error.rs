use std::path::PathBuf;

use htlc_core::{Address, EscrowError};

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Escrow error: {0}")]
    Escrow(#[from] EscrowError),
    #[error("State file error: {0:#}")]
    StateFile(#[from] anyhow::Error),
    #[error("Escrow state already exists at {0:?}; pass --force to replace it")]
    AlreadyDeployed(PathBuf),
    #[error("State file records address {stored} but its escrow derives {derived}")]
    AddressMismatch { stored: Address, derived: Address },
}
