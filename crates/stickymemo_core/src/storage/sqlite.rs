//! SQLite-backed key-value storage.
//!
//! # Responsibility
//! - Open file or in-memory databases and bring `kv_entries` up to date.
//! - Persist string values in the `kv_entries` table.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - A constructed store always sits on a connection at `KV_SCHEMA_VERSION`.
//! - `set` is an upsert; each key holds exactly one row.

use super::schema::ensure_kv_schema;
use super::{KeyValueStore, StorageError, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Key-value store owning one SQLite connection.
#[derive(Debug)]
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (creating when missing) a database file.
    ///
    /// # Side effects
    /// - Emits `kv_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=kv_open module=storage status=start mode=file");
        Self::finish_open(Connection::open(path), "file", started_at)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=kv_open module=storage status=start mode=memory");
        Self::finish_open(Connection::open_in_memory(), "memory", started_at)
    }

    /// Wraps an already open connection, creating `kv_entries` if needed.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the file was stamped by a newer build.
    pub fn from_connection(mut conn: Connection) -> StorageResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        ensure_kv_schema(&mut conn)?;
        Ok(Self { conn })
    }

    fn finish_open(
        opened: rusqlite::Result<Connection>,
        mode: &str,
        started_at: Instant,
    ) -> StorageResult<Self> {
        let result = opened
            .map_err(StorageError::from)
            .and_then(Self::from_connection);
        match &result {
            Ok(_) => info!(
                "event=kv_open module=storage status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=kv_open module=storage status=error mode={} duration_ms={} error_code=kv_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
