//! Vertigo Profile Module
//!
//! Game identities: one profile per owning account, gated by an admin
//! whitelist. A profile's tier controls which default properties it may
//! purchase and scales its default income.

pub mod error;
pub mod registry;

pub use error::{ProfileError, Result};
pub use registry::{Profile, ProfileRegistry};

/// Lowest and highest valid profile tiers.
pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 3;
