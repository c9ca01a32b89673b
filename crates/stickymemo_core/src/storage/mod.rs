//! Key-value storage port and its implementations.
//!
//! # Responsibility
//! - Define the `get`/`set`/`remove` contract every store persists through.
//! - Provide an in-memory backend and a SQLite-backed durable backend.
//! - Own the storage key layout shared by all stores.
//!
//! # Invariants
//! - Values are opaque UTF-8 strings; callers own serialization.
//! - `set` overwrites the whole value for a key; there are no partial writes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::InMemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying SQLite error.
    Sqlite(rusqlite::Error),
    /// The database was stamped by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// The write would exceed the backend capacity.
    QuotaExceeded { key: String, limit_bytes: usize },
    /// Backend cannot be reached at all.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "kv schema version {found} is newer than supported {supported}"
            ),
            Self::QuotaExceeded { key, limit_bytes } => {
                write!(f, "storage quota of {limit_bytes} bytes exceeded writing `{key}`")
            }
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

pub const DEFAULT_KEY_PREFIX: &str = "sticker-memo-app";

/// Storage keys used by the memo, theme and guideline stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub memos: String,
    pub theme: String,
    pub guideline_checks: String,
    pub guideline_hidden: String,
}

impl StorageKeys {
    /// Builds the key set under a custom namespace prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim().trim_end_matches('-');
        Self {
            memos: format!("{prefix}-memos"),
            theme: format!("{prefix}-theme"),
            guideline_checks: format!("{prefix}-guideline-checks"),
            guideline_hidden: format!("{prefix}-guideline-hidden"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}
