//! SQLite store handle
//!
//! One shared connection behind a mutex. The pipeline is batch and
//! single-threaded (no concurrent writers), so a single handle cloned
//! into each accessor is enough.

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::shared::models::Result;

/// Shared handle to the evaluation database.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the store at the given path.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        debug!(path = %db_path.display(), "opened store");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Cross-cutting schema. Per-combination points-to and virtual-call
    /// tables are created lazily at ingest time.
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();

        // Class inventory for exclusive-class set differences
        conn.execute(
            "CREATE TABLE IF NOT EXISTS class_info (
                benchmark TEXT NOT NULL,
                framework TEXT NOT NULL,
                class_name TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_class_info_bf
             ON class_info(benchmark, framework)",
            [],
        )?;

        // Externally sourced virtual-call-site totals
        conn.execute(
            "CREATE TABLE IF NOT EXISTS virtual_call_stats (
                benchmark TEXT NOT NULL,
                analysis TEXT NOT NULL,
                ir TEXT NOT NULL,
                nb_sites INTEGER NOT NULL,
                PRIMARY KEY (benchmark, analysis, ir)
            )",
            [],
        )?;

        Ok(())
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Does a table with this exact name exist?
    pub fn table_exists(&self, name: &str) -> bool {
        let conn = self.conn();
        conn.query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
        .unwrap_or(false)
    }
}
