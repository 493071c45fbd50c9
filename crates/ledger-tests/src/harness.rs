//! Test harness for integration tests.
//!
//! Provides utilities for creating throwaway databases and engines.

use ledger_state::ChainEngine;
use ledger_storage::Database;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop.
pub struct TestDatabase {
    db: Database,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new test database in a temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open(temp_dir.path()).expect("Failed to open database");
        Self {
            db,
            _temp_dir: temp_dir,
        }
    }

    /// Get the path to the database.
    pub fn path(&self) -> PathBuf {
        self._temp_dir.path().to_path_buf()
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get a clone of the database (shares the underlying handle).
    pub fn db_clone(&self) -> Database {
        self.db.clone()
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Create an engine over a fresh throwaway database.
pub fn test_engine() -> (Arc<ChainEngine>, TestDatabase) {
    let test_db = TestDatabase::new();
    let engine = Arc::new(ChainEngine::new(Arc::new(test_db.db_clone())));
    (engine, test_db)
}
