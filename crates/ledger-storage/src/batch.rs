//! Atomic change sets over the ledger relations.
//!
//! A [`WriteBatch`] collects one state transition's row operations in
//! relation-aware form: journaling a block together with its
//! height-index entry, recording spends, flipping spent flags, and
//! upserting balances. The store applies the collected operations as a
//! single durable unit.

use crate::{
    encode_balance, height_key, ColumnFamily, InputRecord, OutputRecord, StorageResult, TxRecord,
    TIP_HEIGHT_KEY,
};

/// One row operation inside a batch.
#[derive(Debug)]
pub(crate) enum RowOp {
    Put {
        cf: ColumnFamily,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Delete {
        cf: ColumnFamily,
        key: Vec<u8>,
    },
}

/// Storage key of an input row: the spending transaction id plus the
/// position of the input within that transaction.
pub fn input_row_key(tx_id: &str, seq: u32) -> String {
    format!("{tx_id}:{seq}")
}

/// One atomic state transition over the ledger relations.
///
/// Operations apply in insertion order, so a later write to a key wins
/// over an earlier one. The rewind path relies on this when it clears a
/// relation's rows before writing replacements.
#[derive(Debug, Default)]
pub struct WriteBatch {
    pub(crate) operations: Vec<RowOp>,
}

impl WriteBatch {
    /// Create a new empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, cf: ColumnFamily, key: Vec<u8>, value: Vec<u8>) {
        self.operations.push(RowOp::Put { cf, key, value });
    }

    fn delete(&mut self, cf: ColumnFamily, key: Vec<u8>) {
        self.operations.push(RowOp::Delete { cf, key });
    }

    /// Journal a block: its payload row plus its height-index entry.
    pub fn insert_block(&mut self, block_id: &str, height: u32, payload: Vec<u8>) {
        self.put(ColumnFamily::Blocks, block_id.as_bytes().to_vec(), payload);
        self.put(
            ColumnFamily::HeightIndex,
            height_key(height).to_vec(),
            block_id.as_bytes().to_vec(),
        );
    }

    /// Drop a block from the journal together with its height entry.
    pub fn remove_block(&mut self, block_id: &str, height: u32) {
        self.delete(ColumnFamily::Blocks, block_id.as_bytes().to_vec());
        self.delete(ColumnFamily::HeightIndex, height_key(height).to_vec());
    }

    /// Record a transaction's membership in a block.
    pub fn insert_transaction(&mut self, tx_id: &str, record: &TxRecord) -> StorageResult<()> {
        self.put(
            ColumnFamily::Transactions,
            tx_id.as_bytes().to_vec(),
            record.encode()?,
        );
        Ok(())
    }

    /// Remove a transaction row.
    pub fn remove_transaction(&mut self, tx_id: &str) {
        self.delete(ColumnFamily::Transactions, tx_id.as_bytes().to_vec());
    }

    /// Record one spend of a prior output.
    pub fn insert_input(
        &mut self,
        tx_id: &str,
        seq: u32,
        record: &InputRecord,
    ) -> StorageResult<()> {
        self.put(
            ColumnFamily::Inputs,
            input_row_key(tx_id, seq).into_bytes(),
            record.encode()?,
        );
        Ok(())
    }

    /// Remove a spend record.
    pub fn remove_input(&mut self, tx_id: &str, seq: u32) {
        self.delete(ColumnFamily::Inputs, input_row_key(tx_id, seq).into_bytes());
    }

    /// Write an output row under its `"{tx_id}:{index}"` key. Used for
    /// newly produced outputs and for spent-flag flips alike.
    pub fn put_output(&mut self, key: &str, record: &OutputRecord) -> StorageResult<()> {
        self.put(ColumnFamily::Outputs, key.as_bytes().to_vec(), record.encode()?);
        Ok(())
    }

    /// Remove an output row.
    pub fn remove_output(&mut self, key: &str) {
        self.delete(ColumnFamily::Outputs, key.as_bytes().to_vec());
    }

    /// Upsert an address's materialized balance.
    pub fn put_balance(&mut self, address: &str, balance: i64) {
        self.put(
            ColumnFamily::Balances,
            address.as_bytes().to_vec(),
            encode_balance(balance).to_vec(),
        );
    }

    /// Set the tip height.
    pub fn set_tip_height(&mut self, height: u32) {
        self.put(
            ColumnFamily::Metadata,
            TIP_HEIGHT_KEY.to_vec(),
            height_key(height).to_vec(),
        );
    }

    /// Remove a row by the raw key an iterator produced. Used when a
    /// whole relation is cleared: the rewind's balance rebuild and reset.
    pub fn remove_raw(&mut self, cf: ColumnFamily, key: Vec<u8>) {
        self.delete(cf, key);
    }

    /// Number of row operations collected so far.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
