//! Vertigo Core Module
//!
//! Implements the token ledger and shared economic machinery:
//! - Account balances with mint/burn/transfer
//! - Fee-skimming transfers for team payouts
//! - Logical epoch clock
//! - Supply tracking for conservation checks

pub mod clock;
pub mod error;
pub mod ledger;
pub mod payout;

pub use clock::EpochClock;
pub use error::{CoreError, Result};
pub use ledger::{Account, Ledger};
pub use payout::{PayoutRecipient, TeamPayout};

/// Account identity key (string address).
pub type AccountId = String;

/// Economic constants
pub mod constants {
    /// VERT token unit (8 decimal places)
    pub const VERT_UNIT: u64 = 100_000_000;

    /// Supply minted to the admin account at engine construction
    pub const GENESIS_SUPPLY: u64 = 1_000_000 * VERT_UNIT;

    /// Seconds in one settlement epoch (one week)
    pub const EPOCH_SECONDS: u64 = 604_800;

    /// Property yield per epoch, in basis points of base price
    pub const PROPERTY_YIELD_BPS: u64 = 500;

    /// Base default vCash income per epoch; scaled by profile tier
    pub const DEFAULT_INCOME_BASE: u64 = 100;

    /// Gross staking reward pot distributed per completed pool cycle
    pub const CYCLE_REWARD: u64 = 1_000 * VERT_UNIT;

    /// vCash cost of the tier-3 default-access upgrade
    pub const TIER3_UPGRADE_COST: u64 = 50;

    /// Basis points denominator
    pub const BPS_DENOM: u64 = 10_000;
}
