//! Error types for the storage layer.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB error.
    #[error("Database error: {0}")]
    Database(#[from] rocksdb::Error),

    /// Column family not found.
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// A row of one of the ledger relations failed to encode.
    #[error("Failed to encode {relation} row: {reason}")]
    EncodeRow {
        relation: &'static str,
        reason: String,
    },

    /// A stored row does not decode as its relation's record shape.
    #[error("Malformed {relation} row: {reason}")]
    MalformedRow {
        relation: &'static str,
        reason: String,
    },

    /// A fixed-width height or balance cell has the wrong size.
    #[error("Malformed {cell} cell: expected {expected} bytes, got {got}")]
    CellWidth {
        cell: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
