//! Cycling tax schedule
//!
//! Tax declines linearly from a base rate and flattens at a floor, giving 15
//! distinct values over cycles 0..=14 and a cap beyond. The schedule
//! parameters live as a row in the staking storage domain; the `TaxContract`
//! accessor derives the rate for any non-negative cycle from them, so the
//! lookup is total and reproducible for cycles already passed.

use vertigo_storage::{DomainStore, StorageContract, StorageError, StorageSystem};

/// Tax at cycle 0, in basis points.
pub const TAX_BASE_BPS: u64 = 3_000;
/// Per-cycle decline.
pub const TAX_STEP_BPS: u64 = 200;
/// Floor reached at cycle 14.
pub const TAX_FLOOR_BPS: u64 = 200;
/// Distinct schedule entries before flattening.
pub const TAX_SCHEDULE_SPAN: u64 = 15;

/// Row of the staking storage domain holding `[base, step, floor]`.
pub const SCHEDULE_ROW: u64 = 0;

pub fn schedule_tax_bps(base: u64, step: u64, floor: u64, cycle: u64) -> u64 {
    base.saturating_sub(step.saturating_mul(cycle)).max(floor)
}

/// Write the default schedule parameters into the staking domain store.
pub fn seed_schedule(system: &mut StorageSystem) {
    system.set_row(
        SCHEDULE_ROW,
        vec![TAX_BASE_BPS, TAX_STEP_BPS, TAX_FLOOR_BPS],
    );
}

/// Storage accessor resolving `query(cycle)` to the tax rate for that cycle.
#[derive(Debug, Default)]
pub struct TaxContract;

impl StorageContract for TaxContract {
    fn get(&self, store: &DomainStore, index: u64, field: usize) -> Option<u64> {
        store.field(index, field)
    }

    fn query(&self, store: &DomainStore, index: i64) -> vertigo_storage::Result<u64> {
        if index < 0 {
            return Err(StorageError::IndexOutOfRange(index));
        }
        let base = store.field(SCHEDULE_ROW, 0).unwrap_or(TAX_BASE_BPS);
        let step = store.field(SCHEDULE_ROW, 1).unwrap_or(TAX_STEP_BPS);
        let floor = store.field(SCHEDULE_ROW, 2).unwrap_or(TAX_FLOOR_BPS);
        Ok(schedule_tax_bps(base, step, floor, index as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tax_system() -> StorageSystem {
        let mut system = StorageSystem::new("staking", Box::new(TaxContract));
        seed_schedule(&mut system);
        system
    }

    #[test]
    fn test_schedule_declines_and_caps() {
        let system = tax_system();
        let mut previous = u64::MAX;
        for cycle in 0..TAX_SCHEDULE_SPAN as i64 {
            let tax = system.query(cycle).unwrap();
            assert!(tax < previous, "tax must strictly decline over the span");
            previous = tax;
        }
        assert_eq!(system.query(14).unwrap(), TAX_FLOOR_BPS);
        assert_eq!(system.query(15).unwrap(), TAX_FLOOR_BPS);
        assert_eq!(system.query(1_000).unwrap(), TAX_FLOOR_BPS);
    }

    #[test]
    fn test_lookup_is_stable() {
        let system = tax_system();
        let first = system.query(7).unwrap();
        assert_eq!(system.query(7).unwrap(), first);
    }

    #[test]
    fn test_negative_cycle_rejected() {
        let system = tax_system();
        assert!(matches!(
            system.query(-3),
            Err(StorageError::IndexOutOfRange(-3))
        ));
    }
}
