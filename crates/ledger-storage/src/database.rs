//! RocksDB database implementation.

use crate::batch::RowOp;
use crate::{Storage, StorageError, StorageResult, WriteBatch};
use rocksdb::{ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Column families for the ledger relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnFamily {
    /// Full block payloads indexed by block id.
    Blocks,
    /// Height -> block id (unique index over blocks).
    HeightIndex,
    /// Transaction id -> owning block id.
    Transactions,
    /// Spend records, keyed by (tx id, input position).
    Inputs,
    /// (tx id, output index) -> address, value, spent flag.
    Outputs,
    /// Address -> materialized balance.
    Balances,
    /// Service metadata (tip height).
    Metadata,
    /// Default column family (required by RocksDB).
    Default,
}

impl ColumnFamily {
    /// Get the string name of the column family.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnFamily::Blocks => "blocks",
            ColumnFamily::HeightIndex => "height_index",
            ColumnFamily::Transactions => "transactions",
            ColumnFamily::Inputs => "inputs",
            ColumnFamily::Outputs => "outputs",
            ColumnFamily::Balances => "balances",
            ColumnFamily::Metadata => "metadata",
            ColumnFamily::Default => "default",
        }
    }

    /// Get all column families.
    pub fn all() -> &'static [ColumnFamily] {
        &[
            ColumnFamily::Blocks,
            ColumnFamily::HeightIndex,
            ColumnFamily::Transactions,
            ColumnFamily::Inputs,
            ColumnFamily::Outputs,
            ColumnFamily::Balances,
            ColumnFamily::Metadata,
            ColumnFamily::Default,
        ]
    }
}

/// RocksDB database wrapper.
pub struct Database {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(256);
        opts.set_keep_log_file_num(1);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ColumnFamily::all()
            .iter()
            .map(|cf| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
                ColumnFamilyDescriptor::new(cf.name(), cf_opts)
            })
            .collect();

        let db =
            DBWithThreadMode::<MultiThreaded>::open_cf_descriptors(&opts, path, cf_descriptors)?;

        debug!("Database opened successfully");

        Ok(Self { db: Arc::new(db) })
    }
}

impl Storage for Database {
    fn get(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        Ok(self.db.get_cf(&handle, key)?)
    }

    fn put(&self, cf: ColumnFamily, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        self.db.put_cf(&handle, key, value)?;
        Ok(())
    }

    fn delete(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<()> {
        let handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        self.db.delete_cf(&handle, key)?;
        Ok(())
    }

    fn write_batch(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut rocks_batch = rocksdb::WriteBatch::default();

        for op in batch.operations {
            match op {
                RowOp::Put { cf, key, value } => {
                    let handle = self.db.cf_handle(cf.name()).ok_or_else(|| {
                        StorageError::ColumnFamilyNotFound(cf.name().to_string())
                    })?;
                    rocks_batch.put_cf(&handle, key, value);
                }
                RowOp::Delete { cf, key } => {
                    let handle = self.db.cf_handle(cf.name()).ok_or_else(|| {
                        StorageError::ColumnFamilyNotFound(cf.name().to_string())
                    })?;
                    rocks_batch.delete_cf(&handle, key);
                }
            }
        }

        // Every batch is one ledger state transition; it must be on disk
        // before the caller reports success.
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(true);

        self.db.write_opt(rocks_batch, &write_opts)?;
        Ok(())
    }

    fn iter(
        &self,
        cf: ColumnFamily,
    ) -> StorageResult<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>> {
        let handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        let iter = self.db.iterator_cf(&handle, rocksdb::IteratorMode::Start);

        let collected: Vec<_> = iter
            .filter_map(|r| r.ok())
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect();

        Ok(Box::new(collected.into_iter()))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_balance, height_key, OutputRecord, TIP_HEIGHT_KEY};
    use tempfile::TempDir;

    fn output(address: &str, value: i64) -> OutputRecord {
        OutputRecord {
            address: address.to_string(),
            value,
            is_spent: false,
        }
    }

    #[test]
    fn test_database_open_and_write() {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(tmp.path()).unwrap();

        db.put(ColumnFamily::Metadata, b"key1", b"value1").unwrap();
        let value = db.get(ColumnFamily::Metadata, b"key1").unwrap();
        assert_eq!(value, Some(b"value1".to_vec()));

        db.delete(ColumnFamily::Metadata, b"key1").unwrap();
        let value = db.get(ColumnFamily::Metadata, b"key1").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_write_batch() {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(tmp.path()).unwrap();

        let mut batch = WriteBatch::new();
        batch.insert_block("b1", 1, b"block1".to_vec());
        batch.put_output("tx1:0", &output("addr1", 10)).unwrap();
        batch.put_balance("addr1", 10);
        batch.set_tip_height(1);

        db.write_batch(batch).unwrap();

        assert_eq!(
            db.get(ColumnFamily::Blocks, b"b1").unwrap(),
            Some(b"block1".to_vec())
        );
        assert_eq!(
            db.get(ColumnFamily::HeightIndex, &height_key(1)).unwrap(),
            Some(b"b1".to_vec())
        );
        let row =
            OutputRecord::decode(&db.get(ColumnFamily::Outputs, b"tx1:0").unwrap().unwrap())
                .unwrap();
        assert_eq!(row, output("addr1", 10));
        assert_eq!(
            decode_balance(&db.get(ColumnFamily::Balances, b"addr1").unwrap().unwrap()).unwrap(),
            10
        );
        assert_eq!(
            db.get(ColumnFamily::Metadata, TIP_HEIGHT_KEY).unwrap(),
            Some(height_key(1).to_vec())
        );
    }

    #[test]
    fn test_batch_delete_overrides_earlier_put() {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(tmp.path()).unwrap();

        let mut batch = WriteBatch::new();
        batch.put_output("tx1:0", &output("addr1", 5)).unwrap();
        batch.remove_output("tx1:0");
        db.write_batch(batch).unwrap();

        assert_eq!(db.get(ColumnFamily::Outputs, b"tx1:0").unwrap(), None);
    }

    #[test]
    fn test_iter_returns_all_rows() {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(tmp.path()).unwrap();

        db.put(ColumnFamily::Balances, b"alice", b"1").unwrap();
        db.put(ColumnFamily::Balances, b"bob", b"2").unwrap();

        let rows: Vec<_> = db.iter(ColumnFamily::Balances).unwrap().collect();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_data_survives_reopen() {
        let tmp = TempDir::new().unwrap();

        {
            let db = Database::open(tmp.path()).unwrap();
            let mut batch = WriteBatch::new();
            batch.set_tip_height(42);
            db.write_batch(batch).unwrap();
        }

        let db = Database::open(tmp.path()).unwrap();
        assert_eq!(
            db.get(ColumnFamily::Metadata, TIP_HEIGHT_KEY).unwrap(),
            Some(height_key(42).to_vec())
        );
    }
}
