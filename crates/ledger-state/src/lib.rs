//! # ledger-state
//!
//! Chain state engine for the UTXO ledger indexer.
//!
//! This crate provides:
//! - `ChainIndex`: the in-memory mirror of the persistent relations
//!   (UTXO map, balance map, block journal, tip height)
//! - `ChainEngine`: the single mutation point that validates and applies
//!   blocks, rewinds the chain, resets to genesis, and serves queries
//!
//! ## Consistency
//!
//! Every mutating operation writes one atomic storage batch first and
//! touches the in-memory index only after the batch has committed, under
//! a write lock held across both steps. A failed commit therefore leaves
//! memory and disk in their pre-operation state, and readers never
//! observe a mid-mutation state.

mod engine;
mod error;
mod index;

pub use engine::{BlockSummary, ChainEngine, ChainListing, ChainSummary};
pub use error::{StateError, StateResult};
pub use index::ChainIndex;

use ledger_storage::ColumnFamily;

/// Column families used by the chain state engine.
pub mod columns {
    use super::ColumnFamily;

    /// Full block payloads (the journal).
    pub const BLOCKS: ColumnFamily = ColumnFamily::Blocks;
    /// Height -> block id.
    pub const HEIGHT_INDEX: ColumnFamily = ColumnFamily::HeightIndex;
    /// Transaction membership rows.
    pub const TRANSACTIONS: ColumnFamily = ColumnFamily::Transactions;
    /// Spend records.
    pub const INPUTS: ColumnFamily = ColumnFamily::Inputs;
    /// Output rows with spent flags.
    pub const OUTPUTS: ColumnFamily = ColumnFamily::Outputs;
    /// Materialized address balances.
    pub const BALANCES: ColumnFamily = ColumnFamily::Balances;
    /// Tip height and service metadata.
    pub const METADATA: ColumnFamily = ColumnFamily::Metadata;
}
