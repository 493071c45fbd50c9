//! In-memory chain index.
//!
//! Mirrors the semantic content of the persistent relations: the UTXO
//! map, the balance map, the block journal in height order, and the tip
//! height. The index is the fast path for validation and queries; it is
//! rebuilt from scratch on rewind and on startup, and cleared on reset.

use ledger_consensus::{utxo_key, Block, TxOutput};
use std::collections::HashMap;

/// In-memory mirror of the chain state.
#[derive(Debug, Default)]
pub struct ChainIndex {
    /// `"{tx_id}:{index}"` -> output, for every unspent output.
    utxos: HashMap<String, TxOutput>,
    /// Address -> balance. An absent address is semantically balance 0.
    balances: HashMap<String, i64>,
    /// Accepted blocks, full payloads, in height order.
    blocks: Vec<Block>,
    /// Height of the last journal entry, or 0 when empty.
    current_height: u32,
}

impl ChainIndex {
    /// Create an empty index (genesis state).
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index by replaying blocks in ascending height order.
    ///
    /// The result is a pure function of the journal, which is what makes
    /// rewind-then-replay equivalent to never having applied the undone
    /// blocks.
    pub fn rebuild(blocks: Vec<Block>) -> Self {
        let mut index = Self::new();
        for block in blocks {
            index.apply_block(&block);
        }
        index
    }

    /// Apply an accepted block to the in-memory structures.
    ///
    /// The caller must have validated the block against this index; the
    /// spent keys are assumed present.
    pub fn apply_block(&mut self, block: &Block) {
        for tx in &block.transactions {
            for input in &tx.inputs {
                if let Some(spent) = self.utxos.remove(&input.utxo_key()) {
                    *self.balances.entry(spent.address).or_insert(0) -= spent.value;
                }
            }
            for (idx, output) in tx.outputs.iter().enumerate() {
                *self.balances.entry(output.address.clone()).or_insert(0) += output.value;
                self.utxos
                    .insert(utxo_key(&tx.id, idx as u32), output.clone());
            }
        }
        self.current_height = block.height;
        self.blocks.push(block.clone());
    }

    /// Empty every structure, returning to the genesis state.
    pub fn reset(&mut self) {
        self.utxos.clear();
        self.balances.clear();
        self.blocks.clear();
        self.current_height = 0;
    }

    /// Current tip height (0 when the journal is empty).
    pub fn current_height(&self) -> u32 {
        self.current_height
    }

    /// The UTXO set, for validation snapshots.
    pub fn utxos(&self) -> &HashMap<String, TxOutput> {
        &self.utxos
    }

    /// Balance for an address; unknown addresses read as 0 and no entry
    /// is created by the lookup.
    pub fn balance(&self, address: &str) -> i64 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// The balance map, for store/memory agreement checks.
    pub fn balances(&self) -> &HashMap<String, i64> {
        &self.balances
    }

    /// The block journal in height order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of journal entries.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of unspent outputs.
    pub fn utxo_count(&self) -> usize {
        self.utxos.len()
    }

    /// Number of tracked balance entries.
    pub fn balance_count(&self) -> usize {
        self.balances.len()
    }
}
