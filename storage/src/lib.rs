//! Vertigo Storage Module
//!
//! One `StorageSystem` exists per logical domain (token staking, profile
//! data, property data). Row data lives in the system itself; reads and
//! derived queries are routed through a swappable `StorageContract`
//! accessor. `cycle()` re-targets the accessor pointer without touching the
//! rows, so rotation never migrates or loses historical data.

pub mod error;
pub mod store;
pub mod system;

pub use error::{Result, StorageError};
pub use store::DomainStore;
pub use system::{FlatContract, StorageContract, StorageSystem};
