//! Builders for test blocks and transactions.
//!
//! Blocks built here carry the correct SHA-256 identity digest unless a
//! test explicitly breaks it.

use ledger_consensus::{Block, Transaction, TxInput, TxOutput};

/// Build an output.
pub fn output(address: &str, value: i64) -> TxOutput {
    TxOutput {
        address: address.to_string(),
        value,
    }
}

/// Build an input reference.
pub fn input(tx_id: &str, index: u32) -> TxInput {
    TxInput {
        tx_id: tx_id.to_string(),
        index,
    }
}

/// Build a transaction.
pub fn transaction(id: &str, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Transaction {
    Transaction {
        id: id.to_string(),
        inputs,
        outputs,
    }
}

/// Build a coinbase transaction (no inputs).
pub fn coinbase(id: &str, outputs: Vec<TxOutput>) -> Transaction {
    transaction(id, Vec::new(), outputs)
}

/// Build a block at the given height with its correct identity digest.
pub fn block(height: u32, transactions: Vec<Transaction>) -> Block {
    let mut block = Block {
        id: String::new(),
        height,
        transactions,
    };
    block.id = block.expected_id();
    block
}

/// The three-block scenario chain from the service contract:
/// a 10-coin mint to addr1, a 4/6 split to addr2/addr3, then a
/// three-way split of addr3's coin.
pub fn three_block_chain() -> Vec<Block> {
    vec![
        block(1, vec![coinbase("tx1", vec![output("addr1", 10)])]),
        block(
            2,
            vec![transaction(
                "tx2",
                vec![input("tx1", 0)],
                vec![output("addr2", 4), output("addr3", 6)],
            )],
        ),
        block(
            3,
            vec![transaction(
                "tx3",
                vec![input("tx2", 1)],
                vec![output("addr4", 2), output("addr5", 2), output("addr6", 2)],
            )],
        ),
    ]
}
