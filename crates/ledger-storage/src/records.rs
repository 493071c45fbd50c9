//! Row records for the ledger relations.
//!
//! Each record is stored as a small JSON document. The ids involved are
//! opaque strings supplied by the block producer, so a self-describing
//! encoding keeps the rows debuggable with plain `ldb` tooling.

use crate::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};

/// Row in the `transactions` relation: membership of a transaction in a
/// block. Removed together with its block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    /// Id of the block that carries this transaction.
    pub block_id: String,
}

/// Row in the `inputs` relation: one spend of a prior output. Append-only;
/// removed together with its transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Producing transaction of the spent output.
    pub spent_tx_id: String,
    /// Index of the spent output within its producing transaction.
    pub spent_index: u32,
}

/// Row in the `outputs` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Credited address.
    pub address: String,
    /// Credited amount. Stored signed; validation policy decides whether
    /// negative values are ever admitted.
    pub value: i64,
    /// Whether a later accepted input has spent this output.
    pub is_spent: bool,
}

macro_rules! json_record {
    ($ty:ty, $relation:literal) => {
        impl $ty {
            /// Serialize the record for storage.
            pub fn encode(&self) -> StorageResult<Vec<u8>> {
                serde_json::to_vec(self).map_err(|e| StorageError::EncodeRow {
                    relation: $relation,
                    reason: e.to_string(),
                })
            }

            /// Deserialize a record from storage.
            pub fn decode(bytes: &[u8]) -> StorageResult<Self> {
                serde_json::from_slice(bytes).map_err(|e| StorageError::MalformedRow {
                    relation: $relation,
                    reason: e.to_string(),
                })
            }
        }
    };
}

json_record!(TxRecord, "transactions");
json_record!(InputRecord, "inputs");
json_record!(OutputRecord, "outputs");
