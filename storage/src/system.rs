//! Storage system with a rotating accessor pointer

use crate::error::{Result, StorageError};
use crate::store::DomainStore;

/// Accessor logic layered over a domain's rows. Implementations may read
/// rows verbatim or derive values from them (e.g. the staking tax curve).
pub trait StorageContract: std::fmt::Debug {
    /// Raw field read.
    fn get(&self, store: &DomainStore, index: u64, field: usize) -> Option<u64>;

    /// Domain-defined derived query over a signed index.
    fn query(&self, store: &DomainStore, index: i64) -> Result<u64>;
}

/// Pass-through accessor: `query(i)` reads field 0 of row `i`.
#[derive(Debug, Default)]
pub struct FlatContract;

impl StorageContract for FlatContract {
    fn get(&self, store: &DomainStore, index: u64, field: usize) -> Option<u64> {
        store.field(index, field)
    }

    fn query(&self, store: &DomainStore, index: i64) -> Result<u64> {
        if index < 0 {
            return Err(StorageError::IndexOutOfRange(index));
        }
        store
            .field(index as u64, 0)
            .ok_or(StorageError::UnknownRow(index as u64))
    }
}

/// One per logical domain. Owns the row data for its lifetime; the active
/// contract pointer can be swapped via [`StorageSystem::cycle`] while the
/// rows stay in place.
#[derive(Debug)]
pub struct StorageSystem {
    domain: &'static str,
    store: DomainStore,
    contract: Box<dyn StorageContract>,
    generation: u32,
}

impl StorageSystem {
    pub fn new(domain: &'static str, contract: Box<dyn StorageContract>) -> Self {
        Self {
            domain,
            store: DomainStore::new(),
            contract,
            generation: 0,
        }
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn get(&self, index: u64, field: usize) -> Option<u64> {
        self.contract.get(&self.store, index, field)
    }

    /// Resolves against the contract active at call time.
    pub fn query(&self, index: i64) -> Result<u64> {
        self.contract.query(&self.store, index)
    }

    pub fn set_row(&mut self, index: u64, row: Vec<u64>) {
        self.store.set_row(index, row);
    }

    pub fn set_field(&mut self, index: u64, field: usize, value: u64) {
        self.store.set_field(index, field, value);
    }

    /// Rotate the accessor pointer. Row data is untouched.
    pub fn cycle(&mut self, contract: Box<dyn StorageContract>) -> u32 {
        self.contract = contract;
        self.generation += 1;
        log::info!(
            "storage domain {} cycled to generation {}",
            self.domain,
            self.generation
        );
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DoublingContract;

    impl StorageContract for DoublingContract {
        fn get(&self, store: &DomainStore, index: u64, field: usize) -> Option<u64> {
            store.field(index, field)
        }

        fn query(&self, store: &DomainStore, index: i64) -> Result<u64> {
            FlatContract.query(store, index).map(|v| v * 2)
        }
    }

    #[test]
    fn test_cycle_retargets_accessor_and_keeps_rows() {
        let mut system = StorageSystem::new("test", Box::new(FlatContract));
        system.set_row(0, vec![21]);

        assert_eq!(system.query(0).unwrap(), 21);
        assert_eq!(system.generation(), 0);

        system.cycle(Box::new(DoublingContract));
        assert_eq!(system.generation(), 1);
        // same rows, new accessor
        assert_eq!(system.query(0).unwrap(), 42);
        assert_eq!(system.get(0, 0), Some(21));
    }

    #[test]
    fn test_negative_index_rejected() {
        let system = StorageSystem::new("test", Box::new(FlatContract));
        assert!(matches!(
            system.query(-1),
            Err(StorageError::IndexOutOfRange(-1))
        ));
    }
}
