//! Error types for the chain state engine.

use ledger_consensus::ValidationError;
use ledger_storage::StorageError;
use thiserror::Error;

/// Chain state errors.
#[derive(Error, Debug)]
pub enum StateError {
    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Block rejected by validation. Displays as the validation message
    /// itself; the kind prefix is the wire contract.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Rollback target is not an integer >= 1.
    #[error("InvalidHeightParam: height must be an integer >= 1")]
    InvalidHeightParam,

    /// Rollback target is above the current tip.
    #[error("TargetAboveHead: target {target} is above current height {current}")]
    TargetAboveHead { target: u64, current: u32 },

    /// The persistent store contradicts the journal.
    #[error("Corrupted store: {0}")]
    Corruption(String),
}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;
