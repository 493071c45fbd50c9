//! # ledger-storage
//!
//! Persistent store for the UTXO ledger indexer.
//!
//! This crate provides a RocksDB-based storage abstraction with support for:
//! - One column family per ledger relation (blocks, transactions, inputs,
//!   outputs, balances) plus a height index and node metadata
//! - Atomic batch writes, fsynced at commit
//! - Efficient key-value operations
//!
//! ## Column Families
//!
//! - `Blocks`: full block payloads indexed by block id (the journal)
//! - `HeightIndex`: height -> block id (the unique height index)
//! - `Transactions`: tx id -> owning block id
//! - `Inputs`: append-only spend records, keyed by (tx id, position)
//! - `Outputs`: (tx id, output index) -> address, value, spent flag
//! - `Balances`: address -> materialized balance
//! - `Metadata`: tip height and other service metadata

mod batch;
mod database;
mod error;
mod records;

pub use batch::{input_row_key, WriteBatch};
pub use database::{ColumnFamily, Database};
pub use error::{StorageError, StorageResult};
pub use records::{InputRecord, OutputRecord, TxRecord};

/// Metadata key holding the current tip height.
pub const TIP_HEIGHT_KEY: &[u8] = b"tip_height";

/// Storage trait for abstracting database operations.
///
/// This allows for easy testing with mock implementations.
pub trait Storage: Send + Sync {
    /// Get a value by key from a column family.
    fn get(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Put a key-value pair into a column family.
    fn put(&self, cf: ColumnFamily, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Delete a key from a column family.
    fn delete(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<()>;

    /// Check if a key exists in a column family.
    fn contains(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<bool> {
        Ok(self.get(cf, key)?.is_some())
    }

    /// Execute a batch of writes atomically. The batch is durable (synced
    /// to disk) when this returns.
    fn write_batch(&self, batch: WriteBatch) -> StorageResult<()>;

    /// Create an iterator over a column family.
    fn iter(&self, cf: ColumnFamily)
        -> StorageResult<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>>;

    /// Get multiple values by keys from a column family.
    fn multi_get(&self, cf: ColumnFamily, keys: &[&[u8]]) -> StorageResult<Vec<Option<Vec<u8>>>> {
        keys.iter().map(|k| self.get(cf, k)).collect()
    }
}

/// Encode a block height as a big-endian storage key, so that the height
/// index iterates in ascending chain order.
pub fn height_key(height: u32) -> [u8; 4] {
    height.to_be_bytes()
}

/// Decode a height index key written by [`height_key`].
pub fn decode_height_key(key: &[u8]) -> StorageResult<u32> {
    let bytes: [u8; 4] = key.try_into().map_err(|_| StorageError::CellWidth {
        cell: "height",
        expected: 4,
        got: key.len(),
    })?;
    Ok(u32::from_be_bytes(bytes))
}

/// Encode a balance for the balances column family.
pub fn encode_balance(balance: i64) -> [u8; 8] {
    balance.to_be_bytes()
}

/// Decode a balance row written by [`encode_balance`].
pub fn decode_balance(bytes: &[u8]) -> StorageResult<i64> {
    let cell: [u8; 8] = bytes.try_into().map_err(|_| StorageError::CellWidth {
        cell: "balance",
        expected: 8,
        got: bytes.len(),
    })?;
    Ok(i64::from_be_bytes(cell))
}
