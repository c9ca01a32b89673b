//! `kv_entries` schema versioning.
//!
//! `PRAGMA user_version` is 0 on a fresh database and `KV_SCHEMA_VERSION`
//! once the table exists. Any other value means the file was written by a
//! newer build and is left untouched.

use super::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

/// Schema version stamped on databases holding `kv_entries`.
pub const KV_SCHEMA_VERSION: u32 = 1;

const CREATE_KV_ENTRIES: &str = include_str!("kv_entries.sql");

/// Reads the schema version stamped on the connection.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Creates `kv_entries` on a fresh database, accepts a current one and
/// rejects one stamped by a newer build.
pub(crate) fn ensure_kv_schema(conn: &mut Connection) -> StorageResult<()> {
    let found = schema_version(conn)?;
    if found > KV_SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchemaVersion {
            found,
            supported: KV_SCHEMA_VERSION,
        });
    }
    if found == KV_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_KV_ENTRIES)?;
    tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
    tx.commit()?;
    info!(
        "event=kv_schema_create module=storage status=ok from_version={} to_version={}",
        found, KV_SCHEMA_VERSION
    );
    Ok(())
}
