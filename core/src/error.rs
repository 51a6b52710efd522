//! Core ledger error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Invalid fee basis points: {0}")]
    InvalidFeeBasisPoints(u64),
}

pub type Result<T> = std::result::Result<T, CoreError>;
