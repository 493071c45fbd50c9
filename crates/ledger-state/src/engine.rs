//! Chain engine: the single mutation point of the ledger.
//!
//! The engine owns the storage handle and the in-memory index and
//! exposes the four mutating operations (submit, rollback, reset, and
//! the startup replay) plus the query surface. Handlers receive the
//! engine explicitly; there is no global state.

use crate::{columns, ChainIndex, StateError, StateResult};
use ledger_consensus::{utxo_key, validate_block, Block, ValidationPolicy};
use ledger_storage::{
    decode_height_key, height_key, InputRecord, OutputRecord, Storage, TxRecord, WriteBatch,
    TIP_HEIGHT_KEY,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One row of the block listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub id: String,
    pub height: u32,
}

/// The block listing: ids and heights in ascending height order.
#[derive(Debug, Clone)]
pub struct ChainListing {
    pub blocks: Vec<BlockSummary>,
    pub count: usize,
    pub current_height: u32,
}

/// Counters describing the current state, used by the reset report.
#[derive(Debug, Clone, Copy)]
pub struct ChainSummary {
    pub current_height: u32,
    pub block_count: usize,
    pub utxo_count: usize,
    pub balance_count: usize,
}

/// The chain state engine.
///
/// Mutating operations take the index write lock for their full
/// duration, including the storage commit, so they are totally ordered
/// and readers never see disk and memory disagree.
pub struct ChainEngine {
    storage: Arc<dyn Storage>,
    index: RwLock<ChainIndex>,
    policy: ValidationPolicy,
}

impl ChainEngine {
    /// Create an engine over an empty store.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            index: RwLock::new(ChainIndex::new()),
            policy: ValidationPolicy::default(),
        }
    }

    /// Open an engine over an existing store, replaying the persisted
    /// journal to rebuild the in-memory index.
    pub fn open(storage: Arc<dyn Storage>) -> StateResult<Self> {
        let tip = match storage.get(columns::METADATA, TIP_HEIGHT_KEY)? {
            Some(bytes) => decode_height_key(&bytes)?,
            None => 0,
        };

        let mut blocks = Vec::with_capacity(tip as usize);
        for height in 1..=tip {
            let block_id = storage
                .get(columns::HEIGHT_INDEX, &height_key(height))?
                .ok_or_else(|| {
                    StateError::Corruption(format!("no block id at height {height}"))
                })?;
            let payload = storage.get(columns::BLOCKS, &block_id)?.ok_or_else(|| {
                StateError::Corruption(format!(
                    "missing block payload for height {height}"
                ))
            })?;
            let block: Block = serde_json::from_slice(&payload)
                .map_err(|e| StateError::Corruption(format!("block payload: {e}")))?;
            blocks.push(block);
        }

        let index = ChainIndex::rebuild(blocks);
        info!(height = index.current_height(), "Chain state loaded from store");

        Ok(Self {
            storage,
            index: RwLock::new(index),
            policy: ValidationPolicy::default(),
        })
    }

    /// Set the validation policy.
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate and apply a submitted block.
    ///
    /// Returns the new tip height on acceptance. A rejected block
    /// mutates nothing; a storage failure rolls the whole submission
    /// back (memory is only touched after the commit).
    #[instrument(skip(self, block), fields(height = block.height, id = %block.id))]
    pub fn submit_block(&self, block: Block) -> StateResult<u32> {
        let mut index = self.index.write();

        validate_block(&block, index.utxos(), index.current_height(), self.policy)?;

        let batch = self.build_apply_batch(&index, &block)?;
        self.storage.write_batch(batch)?;

        index.apply_block(&block);
        info!(height = index.current_height(), "Block applied");

        Ok(index.current_height())
    }

    /// Build the atomic batch for one accepted block: the block row and
    /// its height-index entry, the per-transaction rows, the spend
    /// records with their referenced outputs flipped to spent, the new
    /// output rows, the changed balances, and the tip height.
    fn build_apply_batch(&self, index: &ChainIndex, block: &Block) -> StateResult<WriteBatch> {
        let mut batch = WriteBatch::new();

        let payload = serde_json::to_vec(block)
            .map_err(|e| StateError::Corruption(format!("block payload: {e}")))?;
        batch.insert_block(&block.id, block.height, payload);

        let mut deltas: HashMap<&str, i64> = HashMap::new();
        let mut spent_keys: HashSet<String> = HashSet::new();

        for tx in &block.transactions {
            batch.insert_transaction(
                &tx.id,
                &TxRecord {
                    block_id: block.id.clone(),
                },
            )?;

            for (seq, input) in tx.inputs.iter().enumerate() {
                batch.insert_input(
                    &tx.id,
                    seq as u32,
                    &InputRecord {
                        spent_tx_id: input.tx_id.clone(),
                        spent_index: input.index,
                    },
                )?;

                // A key can only leave the UTXO set once, even if a
                // degenerate block lists it in several inputs.
                let key = input.utxo_key();
                if !spent_keys.insert(key.clone()) {
                    continue;
                }

                // Flip the referenced output to spent. Validation has
                // already pinned it in the UTXO snapshot, so a missing
                // row means disk and memory diverged.
                let row = self
                    .storage
                    .get(columns::OUTPUTS, key.as_bytes())?
                    .ok_or_else(|| {
                        StateError::Corruption(format!("unspent output row missing: {key}"))
                    })?;
                let mut output_row = OutputRecord::decode(&row)?;
                output_row.is_spent = true;
                batch.put_output(&key, &output_row)?;

                let spent = &index.utxos()[&key];
                *deltas.entry(spent.address.as_str()).or_insert(0) -= spent.value;
            }

            for (idx, output) in tx.outputs.iter().enumerate() {
                batch.put_output(
                    &utxo_key(&tx.id, idx as u32),
                    &OutputRecord {
                        address: output.address.clone(),
                        value: output.value,
                        is_spent: false,
                    },
                )?;
                *deltas.entry(output.address.as_str()).or_insert(0) += output.value;
            }
        }

        for (address, delta) in deltas {
            batch.put_balance(address, index.balance(address) + delta);
        }

        batch.set_tip_height(block.height);

        Ok(batch)
    }

    /// Roll the chain back to `target`, undoing every block above it.
    ///
    /// The whole rewind is one atomic batch; afterwards the in-memory
    /// index is rebuilt by replaying the surviving journal, so the
    /// post-rewind state is a pure function of the blocks that remain.
    #[instrument(skip(self))]
    pub fn rollback_to(&self, target: u64) -> StateResult<u32> {
        let mut index = self.index.write();
        let current = index.current_height();

        if target < 1 {
            return Err(StateError::InvalidHeightParam);
        }
        if target > current as u64 {
            return Err(StateError::TargetAboveHead { target, current });
        }
        let target = target as u32;
        if target == current {
            debug!(height = current, "Rollback target is the tip; nothing to undo");
            return Ok(current);
        }

        info!(from = current, to = target, blocks = current - target, "Rolling back chain");

        let surviving = index.blocks()[..target as usize].to_vec();
        let doomed = index.blocks()[target as usize..].to_vec();

        let doomed_txs: HashSet<&str> = doomed
            .iter()
            .flat_map(|b| b.transactions.iter().map(|tx| tx.id.as_str()))
            .collect();

        let mut batch = WriteBatch::new();

        // Outputs produced by a surviving block and spent by a doomed
        // one come back to life.
        let mut resurrected: HashSet<String> = HashSet::new();
        for block in &doomed {
            for tx in &block.transactions {
                for input in &tx.inputs {
                    if doomed_txs.contains(input.tx_id.as_str()) {
                        continue;
                    }
                    let key = input.utxo_key();
                    let row = self
                        .storage
                        .get(columns::OUTPUTS, key.as_bytes())?
                        .ok_or_else(|| {
                            StateError::Corruption(format!("spent output row missing: {key}"))
                        })?;
                    let mut output_row = OutputRecord::decode(&row)?;
                    output_row.is_spent = false;
                    batch.put_output(&key, &output_row)?;
                    resurrected.insert(key);
                }
            }
        }

        // Outputs produced by doomed blocks disappear, and the doomed
        // block, transaction, and input rows go with them.
        let mut doomed_keys: HashSet<String> = HashSet::new();
        for block in &doomed {
            batch.remove_block(&block.id, block.height);
            for tx in &block.transactions {
                batch.remove_transaction(&tx.id);
                for seq in 0..tx.inputs.len() {
                    batch.remove_input(&tx.id, seq as u32);
                }
                for idx in 0..tx.outputs.len() {
                    let key = utxo_key(&tx.id, idx as u32);
                    batch.remove_output(&key);
                    doomed_keys.insert(key);
                }
            }
        }

        // Recompute the balances relation from the outputs that remain
        // unspent after the rewind, and replace it wholesale.
        let mut balances: HashMap<String, i64> = HashMap::new();
        for (key_bytes, row) in self.storage.iter(columns::OUTPUTS)? {
            let key = String::from_utf8(key_bytes)
                .map_err(|_| StateError::Corruption("non-utf8 output key".to_string()))?;
            if doomed_keys.contains(&key) {
                continue;
            }
            let output_row = OutputRecord::decode(&row)?;
            if output_row.is_spent && !resurrected.contains(&key) {
                continue;
            }
            *balances.entry(output_row.address).or_insert(0) += output_row.value;
        }
        for (address, _) in self.storage.iter(columns::BALANCES)? {
            batch.remove_raw(columns::BALANCES, address);
        }
        for (address, balance) in balances {
            batch.put_balance(&address, balance);
        }

        batch.set_tip_height(target);

        self.storage.write_batch(batch)?;

        *index = ChainIndex::rebuild(surviving);
        info!(height = target, "Rollback complete");

        Ok(target)
    }

    /// Delete every row of every relation and clear the index.
    #[instrument(skip(self))]
    pub fn reset(&self) -> StateResult<()> {
        let mut index = self.index.write();

        let mut batch = WriteBatch::new();
        // Deletion order follows the referential chain: dependents first.
        for cf in [
            columns::OUTPUTS,
            columns::INPUTS,
            columns::TRANSACTIONS,
            columns::HEIGHT_INDEX,
            columns::BLOCKS,
            columns::BALANCES,
            columns::METADATA,
        ] {
            for (key, _) in self.storage.iter(cf)? {
                batch.remove_raw(cf, key);
            }
        }
        self.storage.write_batch(batch)?;

        index.reset();
        info!("Chain state reset to genesis");

        Ok(())
    }

    /// Balance for an address; unknown addresses read as 0.
    pub fn balance(&self, address: &str) -> i64 {
        self.index.read().balance(address)
    }

    /// Current tip height.
    pub fn current_height(&self) -> u32 {
        self.index.read().current_height()
    }

    /// The block listing in ascending height order.
    pub fn block_listing(&self) -> ChainListing {
        let index = self.index.read();
        let blocks: Vec<BlockSummary> = index
            .blocks()
            .iter()
            .map(|b| BlockSummary {
                id: b.id.clone(),
                height: b.height,
            })
            .collect();
        ChainListing {
            count: blocks.len(),
            current_height: index.current_height(),
            blocks,
        }
    }

    /// Counters for the reset report and diagnostics.
    pub fn summary(&self) -> ChainSummary {
        let index = self.index.read();
        ChainSummary {
            current_height: index.current_height(),
            block_count: index.block_count(),
            utxo_count: index.utxo_count(),
            balance_count: index.balance_count(),
        }
    }

    /// Run a closure against the in-memory index, for agreement checks
    /// in tests and diagnostics.
    pub fn with_index<R>(&self, f: impl FnOnce(&ChainIndex) -> R) -> R {
        f(&self.index.read())
    }
}
