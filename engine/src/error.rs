//! Engine error umbrella

use thiserror::Error;
use vertigo_core::CoreError;
use vertigo_profile::ProfileError;
use vertigo_property::PropertyError;
use vertigo_staking::StakingError;
use vertigo_storage::StorageError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Ledger error: {0}")]
    Core(#[from] CoreError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Staking error: {0}")]
    Staking(#[from] StakingError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Epoch {epoch} already settled for profile {profile_id}")]
    EpochAlreadySettled { profile_id: u64, epoch: u64 },

    #[error("Unauthorized caller: {0}")]
    Unauthorized(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
