//! World state snapshot

use crate::engine::VertigoEngine;
use crate::error::{EngineError, Result};
use serde::Serialize;
use vertigo_core::{Ledger, TeamPayout};
use vertigo_profile::ProfileRegistry;
use vertigo_property::{PropertyRegistry, RentalMarket};
use vertigo_staking::StakingPool;

/// Serializable view over the full engine state, for inspection and audit.
#[derive(Serialize)]
pub struct WorldSnapshot<'a> {
    pub epoch: u64,
    pub ledger: &'a Ledger,
    pub payouts: &'a TeamPayout,
    pub profiles: &'a ProfileRegistry,
    pub properties: &'a PropertyRegistry,
    pub rentals: &'a RentalMarket,
    pub vcash_pool: &'a StakingPool,
    pub vert_pool: &'a StakingPool,
}

impl VertigoEngine {
    pub fn snapshot(&self) -> WorldSnapshot<'_> {
        WorldSnapshot {
            epoch: self.current_epoch(),
            ledger: self.ledger(),
            payouts: self.payouts(),
            profiles: self.profiles(),
            properties: self.properties(),
            rentals: self.rentals(),
            vcash_pool: self.vcash_pool(),
            vert_pool: self.vert_pool(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|err| EngineError::Serialization(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = VertigoEngine::new("owner").unwrap();
        engine.whitelist_user("owner", "owner", 1).unwrap();
        engine.mint_profile("owner").unwrap();

        let json = engine.snapshot_json().unwrap();
        assert!(json.contains("\"epoch\": 1"));
        assert!(json.contains("profiles"));
    }
}
