//! In-memory key-value backend.
//!
//! # Responsibility
//! - Back ephemeral sessions and deterministic tests.
//! - Simulate capacity limits and an unreachable backend.
//!
//! # Invariants
//! - With a quota set, the sum of key and value byte lengths never exceeds it.
//! - A rejected write leaves previous contents untouched.

use super::{KeyValueStore, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// `BTreeMap`-backed storage with optional byte quota.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    unavailable: Cell<bool>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes growing past `limit_bytes`.
    pub fn with_quota(limit_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(limit_bytes),
            ..Self::default()
        }
    }

    /// Toggles whether every operation fails with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.unavailable.get() {
            return Err(StorageError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn used_bytes_without(entries: &BTreeMap<String, String>, skip_key: &str) -> usize {
        entries
            .iter()
            .filter(|(key, _)| key.as_str() != skip_key)
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_available()?;
        let mut entries = self.entries.borrow_mut();
        if let Some(limit_bytes) = self.quota_bytes {
            let projected = Self::used_bytes_without(&entries, key) + key.len() + value.len();
            if projected > limit_bytes {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit_bytes,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
