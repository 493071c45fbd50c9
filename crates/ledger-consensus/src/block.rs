//! Wire-level block model and identity digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An amount credited to an address. Identified by the pair of its
/// producing transaction id and its position in that transaction's
/// output list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Opaque address identifier.
    pub address: String,
    /// Credited amount.
    pub value: i64,
}

/// A reference that spends a prior output. Carries no value of its own;
/// the value is looked up from the referenced output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    /// Producing transaction of the referenced output.
    pub tx_id: String,
    /// Position of the referenced output in its producing transaction.
    pub index: u32,
}

impl TxInput {
    /// The UTXO key this input spends.
    pub fn utxo_key(&self) -> String {
        utxo_key(&self.tx_id, self.index)
    }
}

/// A transaction: an id unique across the chain plus ordered input and
/// output lists. A transaction with no inputs is a coinbase and mints
/// its outputs from nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque transaction id.
    pub id: String,
    /// Outputs spent by this transaction.
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    /// Outputs produced by this transaction.
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    /// Whether this transaction mints value (has no inputs).
    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Sum of the produced output values.
    pub fn output_sum(&self) -> i64 {
        self.outputs.iter().map(|o| o.value).sum()
    }
}

/// A block: an id (hex SHA-256 digest, see [`block_digest`]), a height,
/// and an ordered transaction list. Heights are contiguous from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Lowercase hex SHA-256 digest of the hash input.
    pub id: String,
    /// 1-based position in the chain.
    pub height: u32,
    /// Transactions in submission order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The digest preimage: decimal height followed by the transaction
    /// ids in submission order, with no separators.
    pub fn hash_input(&self) -> String {
        let mut input = self.height.to_string();
        for tx in &self.transactions {
            input.push_str(&tx.id);
        }
        input
    }

    /// The id this block must carry to be accepted.
    pub fn expected_id(&self) -> String {
        block_digest(&self.hash_input())
    }
}

/// Canonical UTXO key for an output: `"{tx_id}:{index}"`.
pub fn utxo_key(tx_id: &str, index: u32) -> String {
    format!("{tx_id}:{index}")
}

/// Lowercase hex SHA-256 of the given preimage.
pub fn block_digest(hash_input: &str) -> String {
    hex::encode(Sha256::digest(hash_input.as_bytes()))
}
