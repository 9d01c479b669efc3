//! redb-based storage layer for the order lifecycle
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `dining_tables` | `table_number` | `DiningTable` | Occupancy + contact |
//! | `orders` | `order_id` | `Order` | Open orders (deleted when billed/released) |
//! | `orders_by_table` | `(table_number, order_id)` | `()` | Table → orders index |
//! | `bills` | `bill_id` | `Bill` | Billing ledger (never deleted) |
//! | `users` | `username` | `UserRecord` | Staff accounts |
//!
//! # Transactions
//!
//! Mutating methods take a `&WriteTransaction` so that a workflow step
//! made of several writes (e.g. bill insert + table release + order
//! deletion) commits or rolls back as one unit. redb admits a single
//! writer at a time, so a read-check-write inside one write transaction
//! is serialized against every other writer.
//!
//! # Malformed records
//!
//! List reads skip values that fail to decode (logged at `warn`), so one
//! damaged record never hides the rest of a list. Point reads and the
//! in-transaction order aggregation surface the decode error.

mod bills;
mod orders;
mod tables;
mod users;

pub use users::UserRecord;

use redb::{Database, ReadableDatabase, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Tables: key = table_number, value = JSON-serialized DiningTable
const TABLES_TABLE: TableDefinition<u32, &[u8]> = TableDefinition::new("dining_tables");

/// Orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Index: key = (table_number, order_id), value = empty (existence check)
const ORDERS_BY_TABLE: TableDefinition<(u32, i64), ()> = TableDefinition::new("orders_by_table");

/// Bills: key = bill_id, value = JSON-serialized Bill
const BILLS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("bills");

/// Users: key = username, value = JSON-serialized UserRecord
const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// POS storage backed by redb
#[derive(Clone)]
pub struct PosStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for PosStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosStorage").finish_non_exhaustive()
    }
}

impl PosStorage {
    /// Open or create the database at the given path
    ///
    /// Parent directories are created if missing. redb commits with
    /// `Durability::Immediate`: once `commit()` returns the write is on disk.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and throwaway instances)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_TABLE)?;
            let _ = write_txn.open_table(BILLS_TABLE)?;
            let _ = write_txn.open_table(USERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> StorageResult<redb::ReadTransaction> {
        Ok(self.db.begin_read()?)
    }
}

/// Decode a value read during a list scan; malformed values are skipped
fn decode_lenient<T: DeserializeOwned>(kind: &str, key: impl Display, bytes: &[u8]) -> Option<T> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(kind, key = %key, error = %e, "Skipping malformed stored record");
            None
        }
    }
}
