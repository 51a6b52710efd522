//! Vertigo Engine Module
//!
//! The public operation surface of the game: profile minting, property
//! purchases and rentals, staking, the weekly settlement reset, and the
//! storage backend rotation. Every operation takes an explicit caller and
//! runs to completion transactionally: all failure conditions are checked
//! before any state is mutated, so a failed call leaves the world unchanged.

pub mod engine;
pub mod error;
pub mod snapshot;

pub use engine::{StorageDomain, VertigoEngine, REWARD_POOL, STAKE_VAULT};
pub use error::{EngineError, Result};
pub use snapshot::WorldSnapshot;
