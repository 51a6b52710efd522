//! Staking error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StakingError {
    #[error("Insufficient stake: requested {requested}, staked {staked}")]
    InsufficientStake { requested: u64, staked: u64 },

    #[error("Staking is disabled")]
    StakingDisabled,

    #[error("Stale pool epoch: account at cycle {account_cycle}, pool at {pool_cycle}")]
    StalePoolEpoch { account_cycle: u64, pool_cycle: u64 },

    #[error("Cycle index out of range: {0}")]
    CycleOutOfRange(i64),
}

pub type Result<T> = std::result::Result<T, StakingError>;
