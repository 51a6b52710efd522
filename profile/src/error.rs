//! Profile error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Account not whitelisted: {0}")]
    NotWhitelisted(String),

    #[error("Profile already minted for account: {0}")]
    ProfileAlreadyMinted(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(u64),

    #[error("No profile minted for account: {0}")]
    NoProfile(String),

    #[error("Caller does not own profile {0}")]
    NotProfileOwner(u64),

    #[error("Tier {tier} does not qualify for this purchase")]
    TierMismatch { tier: u8 },

    #[error("Tier can only increase: {from} -> {to}")]
    TierDowngrade { from: u8, to: u8 },

    #[error("Invalid tier: {0}")]
    InvalidTier(u8),

    #[error("Insufficient vCash: requested {requested}, available {available}")]
    InsufficientVCash { requested: u64, available: u64 },
}

pub type Result<T> = std::result::Result<T, ProfileError>;
