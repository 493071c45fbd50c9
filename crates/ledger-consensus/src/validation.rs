//! Pure block validation against a UTXO snapshot.

use crate::{Block, TxOutput, ValidationError, ValidationResult};
use std::collections::HashMap;
use tracing::debug;

/// Tunable validation behavior beyond the core acceptance rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPolicy {
    /// Reject outputs with a negative value. Off by default: the schema
    /// stores values signed and the producer is trusted to send
    /// non-negative amounts.
    pub reject_negative_values: bool,
}

/// Decide whether a candidate block extends the current state.
///
/// `utxos` is the UTXO set as of the moment validation starts; outputs
/// produced by earlier transactions *within the same block* are not
/// visible to later ones, so a block spending its own outputs fails with
/// `InputNotFound`.
///
/// Checks run in a fixed order and the first failure wins:
/// height, input existence, value conservation, block identity. All
/// checks are read-only.
pub fn validate_block(
    block: &Block,
    utxos: &HashMap<String, TxOutput>,
    current_height: u32,
    policy: ValidationPolicy,
) -> ValidationResult<()> {
    // 1. The block must sit exactly on top of the tip.
    let expected_height = current_height + 1;
    if block.height != expected_height {
        return Err(ValidationError::InvalidHeight {
            expected: expected_height,
            received: block.height,
        });
    }

    // 2. Every input must reference a UTXO from the pre-block snapshot.
    for tx in &block.transactions {
        for input in &tx.inputs {
            let key = input.utxo_key();
            if !utxos.contains_key(&key) {
                return Err(ValidationError::InputNotFound { key });
            }
        }
    }

    // 3. Non-coinbase transactions must conserve value exactly.
    for tx in &block.transactions {
        if tx.is_coinbase() {
            continue;
        }
        let in_sum: i64 = tx
            .inputs
            .iter()
            .map(|input| utxos[&input.utxo_key()].value)
            .sum();
        let out_sum = tx.output_sum();
        if in_sum != out_sum {
            return Err(ValidationError::ValueMismatch {
                tx_id: tx.id.clone(),
                in_sum,
                out_sum,
            });
        }
    }

    // 4. The submitted id must match the digest over height and tx ids.
    let expected_id = block.expected_id();
    if block.id != expected_id {
        return Err(ValidationError::InvalidBlockId {
            expected: expected_id,
            received: block.id.clone(),
            hash_input: block.hash_input(),
        });
    }

    if policy.reject_negative_values {
        for tx in &block.transactions {
            for (index, output) in tx.outputs.iter().enumerate() {
                if output.value < 0 {
                    return Err(ValidationError::NegativeValue {
                        tx_id: tx.id.clone(),
                        index: index as u32,
                        value: output.value,
                    });
                }
            }
        }
    }

    debug!(height = block.height, id = %block.id, "Block validated");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{utxo_key, Transaction, TxInput};

    fn out(address: &str, value: i64) -> TxOutput {
        TxOutput {
            address: address.to_string(),
            value,
        }
    }

    fn input(tx_id: &str, index: u32) -> TxInput {
        TxInput {
            tx_id: tx_id.to_string(),
            index,
        }
    }

    fn tx(id: &str, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Transaction {
        Transaction {
            id: id.to_string(),
            inputs,
            outputs,
        }
    }

    /// Build a block with the correct digest already filled in.
    fn block(height: u32, transactions: Vec<Transaction>) -> Block {
        let mut block = Block {
            id: String::new(),
            height,
            transactions,
        };
        block.id = block.expected_id();
        block
    }

    fn utxos(entries: &[(&str, u32, &str, i64)]) -> HashMap<String, TxOutput> {
        entries
            .iter()
            .map(|&(tx_id, index, address, value)| (utxo_key(tx_id, index), out(address, value)))
            .collect()
    }

    #[test]
    fn accepts_genesis_coinbase() {
        let b = block(1, vec![tx("tx1", vec![], vec![out("addr1", 10)])]);
        assert_eq!(validate_block(&b, &HashMap::new(), 0, ValidationPolicy::default()), Ok(()));
    }

    #[test]
    fn first_block_must_be_height_one() {
        let b = block(2, vec![tx("tx1", vec![], vec![out("addr1", 10)])]);
        assert_eq!(
            validate_block(&b, &HashMap::new(), 0, ValidationPolicy::default()),
            Err(ValidationError::InvalidHeight {
                expected: 1,
                received: 2
            })
        );
    }

    #[test]
    fn height_must_extend_tip_exactly() {
        let set = utxos(&[("tx1", 0, "addr1", 10)]);
        let skip = block(5, vec![]);
        assert_eq!(
            validate_block(&skip, &set, 3, ValidationPolicy::default()),
            Err(ValidationError::InvalidHeight {
                expected: 4,
                received: 5
            })
        );
        let repeat = block(3, vec![]);
        assert!(matches!(
            validate_block(&repeat, &set, 3, ValidationPolicy::default()),
            Err(ValidationError::InvalidHeight { .. })
        ));
    }

    #[test]
    fn rejects_unknown_input() {
        let b = block(1, vec![tx("tx1", vec![input("ghost", 0)], vec![])]);
        assert_eq!(
            validate_block(&b, &HashMap::new(), 0, ValidationPolicy::default()),
            Err(ValidationError::InputNotFound {
                key: "ghost:0".to_string()
            })
        );
    }

    #[test]
    fn rejects_spend_of_output_created_in_same_block() {
        // tx_b spends an output tx_a produces in this very block; the
        // snapshot predates the block, so the key is not visible.
        let b = block(
            1,
            vec![
                tx("tx_a", vec![], vec![out("addr1", 10)]),
                tx("tx_b", vec![input("tx_a", 0)], vec![out("addr2", 10)]),
            ],
        );
        assert_eq!(
            validate_block(&b, &HashMap::new(), 0, ValidationPolicy::default()),
            Err(ValidationError::InputNotFound {
                key: "tx_a:0".to_string()
            })
        );
    }

    #[test]
    fn rejects_value_mismatch() {
        let set = utxos(&[("tx1", 0, "addr1", 10)]);
        let b = block(2, vec![tx("tx2", vec![input("tx1", 0)], vec![out("bob", 50)])]);
        assert_eq!(
            validate_block(&b, &set, 1, ValidationPolicy::default()),
            Err(ValidationError::ValueMismatch {
                tx_id: "tx2".to_string(),
                in_sum: 10,
                out_sum: 50
            })
        );
    }

    #[test]
    fn conservation_allows_splitting_across_outputs() {
        let set = utxos(&[("tx1", 0, "addr1", 10)]);
        let b = block(
            2,
            vec![tx(
                "tx2",
                vec![input("tx1", 0)],
                vec![out("addr2", 4), out("addr3", 6)],
            )],
        );
        assert_eq!(validate_block(&b, &set, 1, ValidationPolicy::default()), Ok(()));
    }

    #[test]
    fn coinbase_may_mint_any_amount() {
        let b = block(1, vec![tx("mint", vec![], vec![out("addr1", 1_000_000)])]);
        assert_eq!(validate_block(&b, &HashMap::new(), 0, ValidationPolicy::default()), Ok(()));
    }

    #[test]
    fn rejects_wrong_block_id() {
        let mut b = block(1, vec![tx("tx1", vec![], vec![out("addr1", 10)])]);
        let expected = b.id.clone();
        b.id = "invalid_id".to_string();
        assert_eq!(
            validate_block(&b, &HashMap::new(), 0, ValidationPolicy::default()),
            Err(ValidationError::InvalidBlockId {
                expected,
                received: "invalid_id".to_string(),
                hash_input: "1tx1".to_string()
            })
        );
    }

    #[test]
    fn input_lookup_failure_wins_over_value_mismatch() {
        // tx_a has a bad sum, tx_b has a missing input; the input
        // existence pass runs over the whole block first.
        let set = utxos(&[("tx1", 0, "addr1", 10)]);
        let b = block(
            2,
            vec![
                tx("tx_a", vec![input("tx1", 0)], vec![out("addr2", 99)]),
                tx("tx_b", vec![input("ghost", 7)], vec![]),
            ],
        );
        assert_eq!(
            validate_block(&b, &set, 1, ValidationPolicy::default()),
            Err(ValidationError::InputNotFound {
                key: "ghost:7".to_string()
            })
        );
    }

    #[test]
    fn value_mismatch_wins_over_bad_id() {
        let set = utxos(&[("tx1", 0, "addr1", 10)]);
        let mut b = block(2, vec![tx("tx2", vec![input("tx1", 0)], vec![out("bob", 50)])]);
        b.id = "garbage".to_string();
        assert!(matches!(
            validate_block(&b, &set, 1, ValidationPolicy::default()),
            Err(ValidationError::ValueMismatch { .. })
        ));
    }

    #[test]
    fn negative_values_pass_by_default() {
        let b = block(1, vec![tx("tx1", vec![], vec![out("addr1", -5)])]);
        assert_eq!(validate_block(&b, &HashMap::new(), 0, ValidationPolicy::default()), Ok(()));
    }

    #[test]
    fn negative_values_rejected_under_policy() {
        let policy = ValidationPolicy {
            reject_negative_values: true,
        };
        let b = block(1, vec![tx("tx1", vec![], vec![out("addr1", -5)])]);
        assert_eq!(
            validate_block(&b, &HashMap::new(), 0, policy),
            Err(ValidationError::NegativeValue {
                tx_id: "tx1".to_string(),
                index: 0,
                value: -5
            })
        );
    }

    #[test]
    fn error_messages_lead_with_the_kind() {
        let err = ValidationError::InputNotFound {
            key: "ghost:0".to_string(),
        };
        assert_eq!(err.to_string(), "InputNotFound: ghost:0");
    }
}
