//! Error types for block validation.

use thiserror::Error;

/// Reasons a candidate block is rejected. The variants render as the
/// wire-level error messages, kind first, so clients can match on the
/// prefix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Block height does not extend the chain tip.
    #[error("InvalidHeight: expected {expected}, received {received}")]
    InvalidHeight {
        /// The only height the chain accepts next.
        expected: u32,
        /// Height carried by the candidate block.
        received: u32,
    },

    /// An input references a UTXO absent from the pre-block snapshot.
    #[error("InputNotFound: {key}")]
    InputNotFound {
        /// The missing `"{tx_id}:{index}"` key.
        key: String,
    },

    /// A non-coinbase transaction does not conserve value.
    #[error("ValueMismatch: transaction {tx_id} spends {in_sum} but creates {out_sum}")]
    ValueMismatch {
        tx_id: String,
        in_sum: i64,
        out_sum: i64,
    },

    /// The submitted block id differs from the computed digest.
    #[error("InvalidBlockId: expected {expected}, received {received}")]
    InvalidBlockId {
        /// Digest computed over the hash input.
        expected: String,
        /// Id carried by the candidate block.
        received: String,
        /// The digest preimage, reported for debugging.
        hash_input: String,
    },

    /// An output carries a negative value (only under the opt-in policy).
    #[error("NegativeValue: transaction {tx_id} output {index} has value {value}")]
    NegativeValue {
        tx_id: String,
        index: u32,
        value: i64,
    },
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
