//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Index out of range: {0}")]
    IndexOutOfRange(i64),

    #[error("Unknown row: {0}")]
    UnknownRow(u64),
}

pub type Result<T> = std::result::Result<T, StorageError>;
