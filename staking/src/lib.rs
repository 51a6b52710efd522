//! Vertigo Staking Module
//!
//! The shared reward pool: per-account stake positions, a monotone cycle
//! counter with per-cycle snapshots, a declining tax schedule, and pro-rata
//! dividend payout. Two pool instances run at engine level (vCash and Vert)
//! on this machinery.

pub mod error;
pub mod pool;
pub mod tax;

pub use error::{Result, StakingError};
pub use pool::{StakeCycle, StakePosition, StakingPool};
pub use tax::{schedule_tax_bps, seed_schedule, TaxContract};
pub use tax::{TAX_BASE_BPS, TAX_FLOOR_BPS, TAX_SCHEDULE_SPAN, TAX_STEP_BPS};
