//! Array-style indexed row store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persistent rows of one logical domain, keyed by index. Each row is a flat
/// array of unsigned words; field meaning is defined by the owning domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainStore {
    rows: BTreeMap<u64, Vec<u64>>,
}

impl DomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, index: u64) -> Option<&[u64]> {
        self.rows.get(&index).map(|r| r.as_slice())
    }

    pub fn set_row(&mut self, index: u64, row: Vec<u64>) {
        self.rows.insert(index, row);
    }

    pub fn field(&self, index: u64, field: usize) -> Option<u64> {
        self.rows.get(&index).and_then(|r| r.get(field)).copied()
    }

    pub fn set_field(&mut self, index: u64, field: usize, value: u64) {
        let row = self.rows.entry(index).or_default();
        if row.len() <= field {
            row.resize(field + 1, 0);
        }
        row[field] = value;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_grows_row() {
        let mut store = DomainStore::new();
        store.set_field(3, 2, 77);

        assert_eq!(store.row(3), Some(&[0, 0, 77][..]));
        assert_eq!(store.field(3, 2), Some(77));
        assert_eq!(store.field(3, 5), None);
    }
}
