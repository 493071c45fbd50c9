//! Storage contract tests.
//!
//! These tests pin the behavior the chain engine relies on: column
//! family isolation, atomic batch application in insertion order, and
//! row record round-trips.

use crate::harness::TestDatabase;
use ledger_storage::{
    decode_balance, decode_height_key, encode_balance, height_key, input_row_key, ColumnFamily,
    InputRecord, OutputRecord, Storage, TxRecord, WriteBatch,
};

#[test]
fn column_families_are_isolated() {
    let db = TestDatabase::new();

    db.put(ColumnFamily::Outputs, b"tx1:0", b"output").unwrap();
    db.put(ColumnFamily::Inputs, b"tx1:0", b"input").unwrap();

    assert_eq!(
        db.get(ColumnFamily::Outputs, b"tx1:0").unwrap(),
        Some(b"output".to_vec())
    );
    assert_eq!(
        db.get(ColumnFamily::Inputs, b"tx1:0").unwrap(),
        Some(b"input".to_vec())
    );
    assert_eq!(db.get(ColumnFamily::Balances, b"tx1:0").unwrap(), None);
}

#[test]
fn batch_applies_all_operations() {
    let db = TestDatabase::new();
    db.put(ColumnFamily::Balances, b"alice", &encode_balance(10))
        .unwrap();

    let mut batch = WriteBatch::new();
    batch.insert_block("b1", 1, b"payload".to_vec());
    batch.remove_raw(ColumnFamily::Balances, b"alice".to_vec());
    batch.put_balance("bob", 4);
    db.write_batch(batch).unwrap();

    assert_eq!(
        db.get(ColumnFamily::Blocks, b"b1").unwrap(),
        Some(b"payload".to_vec())
    );
    assert_eq!(
        db.get(ColumnFamily::HeightIndex, &height_key(1)).unwrap(),
        Some(b"b1".to_vec())
    );
    assert_eq!(db.get(ColumnFamily::Balances, b"alice").unwrap(), None);
    assert_eq!(
        decode_balance(&db.get(ColumnFamily::Balances, b"bob").unwrap().unwrap()).unwrap(),
        4
    );
}

#[test]
fn later_batch_operations_win() {
    let db = TestDatabase::new();

    // Delete-then-put leaves the row live; put-then-delete removes it.
    let mut batch = WriteBatch::new();
    batch.remove_raw(ColumnFamily::Balances, b"alice".to_vec());
    batch.put_balance("alice", 7);
    batch.put_balance("bob", 1);
    batch.remove_raw(ColumnFamily::Balances, b"bob".to_vec());
    db.write_batch(batch).unwrap();

    assert_eq!(
        decode_balance(&db.get(ColumnFamily::Balances, b"alice").unwrap().unwrap()).unwrap(),
        7
    );
    assert_eq!(db.get(ColumnFamily::Balances, b"bob").unwrap(), None);
}

#[test]
fn input_rows_live_under_their_row_key() {
    let db = TestDatabase::new();

    let mut batch = WriteBatch::new();
    batch
        .insert_input(
            "tx2",
            0,
            &InputRecord {
                spent_tx_id: "tx1".to_string(),
                spent_index: 0,
            },
        )
        .unwrap();
    db.write_batch(batch).unwrap();

    let row = InputRecord::decode(
        &db.get(ColumnFamily::Inputs, input_row_key("tx2", 0).as_bytes())
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(row.spent_tx_id, "tx1");
    assert_eq!(row.spent_index, 0);
}

#[test]
fn multi_get_preserves_order_and_gaps() {
    let db = TestDatabase::new();
    db.put(ColumnFamily::Outputs, b"tx1:0", b"a").unwrap();
    db.put(ColumnFamily::Outputs, b"tx1:2", b"c").unwrap();

    let values = db
        .multi_get(ColumnFamily::Outputs, &[b"tx1:0", b"tx1:1", b"tx1:2"])
        .unwrap();

    assert_eq!(
        values,
        vec![Some(b"a".to_vec()), None, Some(b"c".to_vec())]
    );
}

#[test]
fn height_index_iterates_in_chain_order() {
    let db = TestDatabase::new();
    for height in [3u32, 1, 256, 2, 10] {
        db.put(
            ColumnFamily::HeightIndex,
            &height_key(height),
            format!("block{height}").as_bytes(),
        )
        .unwrap();
    }

    let heights: Vec<u32> = db
        .iter(ColumnFamily::HeightIndex)
        .unwrap()
        .map(|(key, _)| decode_height_key(&key).unwrap())
        .collect();

    assert_eq!(heights, vec![1, 2, 3, 10, 256]);
}

#[test]
fn records_round_trip_through_storage() {
    let db = TestDatabase::new();

    let output = OutputRecord {
        address: "addr1".to_string(),
        value: 10,
        is_spent: false,
    };
    let input = InputRecord {
        spent_tx_id: "tx1".to_string(),
        spent_index: 0,
    };
    let tx = TxRecord {
        block_id: "b1".to_string(),
    };

    db.put(ColumnFamily::Outputs, b"tx1:0", &output.encode().unwrap())
        .unwrap();
    db.put(ColumnFamily::Inputs, b"tx2:0", &input.encode().unwrap())
        .unwrap();
    db.put(ColumnFamily::Transactions, b"tx1", &tx.encode().unwrap())
        .unwrap();

    assert_eq!(
        OutputRecord::decode(&db.get(ColumnFamily::Outputs, b"tx1:0").unwrap().unwrap()).unwrap(),
        output
    );
    assert_eq!(
        InputRecord::decode(&db.get(ColumnFamily::Inputs, b"tx2:0").unwrap().unwrap()).unwrap(),
        input
    );
    assert_eq!(
        TxRecord::decode(&db.get(ColumnFamily::Transactions, b"tx1").unwrap().unwrap()).unwrap(),
        tx
    );
}

#[test]
fn spent_flag_update_in_place() {
    let db = TestDatabase::new();

    let mut record = OutputRecord {
        address: "addr1".to_string(),
        value: 10,
        is_spent: false,
    };
    db.put(ColumnFamily::Outputs, b"tx1:0", &record.encode().unwrap())
        .unwrap();

    record.is_spent = true;
    let mut batch = WriteBatch::new();
    batch.put_output("tx1:0", &record).unwrap();
    db.write_batch(batch).unwrap();

    let reread =
        OutputRecord::decode(&db.get(ColumnFamily::Outputs, b"tx1:0").unwrap().unwrap()).unwrap();
    assert!(reread.is_spent);
    assert_eq!(reread.address, "addr1");
    assert_eq!(reread.value, 10);
}
