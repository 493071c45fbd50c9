//! # ledger-consensus
//!
//! Block model and validation rules for the UTXO ledger indexer.
//!
//! This crate provides:
//! - The wire-level block model (`Block`, `Transaction`, `TxInput`,
//!   `TxOutput`) and the UTXO key format
//! - Block identity digests (SHA-256 over height and transaction ids)
//! - Pure block validation against a UTXO snapshot, with typed
//!   rejection reasons
//!
//! Validation is read-only: it never mutates state, and a rejected block
//! leaves every observable value untouched.

mod block;
mod error;
mod validation;

pub use block::{block_digest, utxo_key, Block, Transaction, TxInput, TxOutput};
pub use error::{ValidationError, ValidationResult};
pub use validation::{validate_block, ValidationPolicy};
