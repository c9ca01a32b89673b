//! Guideline checklist store.
//!
//! # Responsibility
//! - Persist which onboarding checklist items are checked.
//! - Persist whether the guideline card was dismissed.
//!
//! # Invariants
//! - Checked indices are always within `TODO_ITEMS`.
//! - No storage write happens before `load()`.

use crate::service::memo_store::StoreLifecycle;
use crate::storage::{KeyValueStore, StorageKeys};
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeSet;

/// Checkable onboarding steps, in display order.
pub const TODO_ITEMS: [&str; 6] = [
    "Use \"New memo\" to enter a title, content and category, then save",
    "Hover a card and use the pin to keep it on top",
    "Type in the search box to filter titles and content live",
    "Use the dropdown to view one category",
    "Drag cards to change their order (saved automatically)",
    "Switch to dark mode with the top-right button",
];

/// Non-checkable reference notes shown under the checklist.
pub const REFERENCE_NOTES: [&str; 3] = [
    "Each memo gets a random post-it color",
    "Edit and delete buttons appear when hovering a card",
    "Data is kept in this browser profile",
];

const DISMISSED_FLAG: &str = "true";

/// Checklist state persisted under two independent keys.
pub struct GuidelineStore<S: KeyValueStore> {
    storage: S,
    checks_key: String,
    hidden_key: String,
    checked: BTreeSet<usize>,
    dismissed: bool,
    lifecycle: StoreLifecycle,
}

impl<S: KeyValueStore> GuidelineStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, &StorageKeys::default())
    }

    pub fn with_keys(storage: S, keys: &StorageKeys) -> Self {
        Self {
            storage,
            checks_key: keys.guideline_checks.clone(),
            hidden_key: keys.guideline_hidden.clone(),
            checked: BTreeSet::new(),
            dismissed: false,
            lifecycle: StoreLifecycle::Cold,
        }
    }

    pub fn lifecycle(&self) -> StoreLifecycle {
        self.lifecycle
    }

    /// Reads both keys, degrading missing or corrupt values to defaults.
    pub fn load(&mut self) {
        if self.lifecycle == StoreLifecycle::Hydrated {
            return;
        }
        self.checked = self.read_checked();
        self.dismissed = self.read_dismissed();
        self.lifecycle = StoreLifecycle::Hydrated;
        debug!(
            "event=guideline_load module=store status=ok checked={} dismissed={}",
            self.checked.len(),
            self.dismissed
        );
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    /// Checked indices in ascending order.
    pub fn checked(&self) -> impl Iterator<Item = usize> + '_ {
        self.checked.iter().copied()
    }

    /// Flips one item. Out-of-range indices are ignored and return `false`.
    pub fn toggle_check(&mut self, index: usize) -> bool {
        if index >= TODO_ITEMS.len() {
            return false;
        }
        if !self.checked.remove(&index) {
            self.checked.insert(index);
        }
        self.persist_checked();
        true
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Hides the guideline card.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
        if !self.can_write() {
            return;
        }
        if let Err(err) = self.storage.set(&self.hidden_key, DISMISSED_FLAG) {
            warn!(
                "event=guideline_save module=store status=error error_code=storage_write_failed error={}",
                err
            );
        }
    }

    /// Shows the guideline card again.
    pub fn restore(&mut self) {
        self.dismissed = false;
        if !self.can_write() {
            return;
        }
        if let Err(err) = self.storage.remove(&self.hidden_key) {
            warn!(
                "event=guideline_save module=store status=error error_code=storage_write_failed error={}",
                err
            );
        }
    }

    fn can_write(&self) -> bool {
        if self.lifecycle == StoreLifecycle::Cold {
            debug!("event=guideline_save module=store status=skipped reason=cold");
            return false;
        }
        true
    }

    fn read_checked(&self) -> BTreeSet<usize> {
        let raw = match self.storage.get(&self.checks_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(err) => {
                warn!(
                    "event=guideline_load module=store status=error error_code=storage_read_failed error={}",
                    err
                );
                return BTreeSet::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|index| usize::try_from(index).ok())
                .filter(|index| *index < TODO_ITEMS.len())
                .collect(),
            _ => {
                warn!("event=guideline_load module=store status=error error_code=decode_failed");
                BTreeSet::new()
            }
        }
    }

    fn read_dismissed(&self) -> bool {
        match self.storage.get(&self.hidden_key) {
            Ok(Some(value)) => value.trim() != "false",
            Ok(None) => false,
            Err(err) => {
                warn!(
                    "event=guideline_load module=store status=error error_code=storage_read_failed error={}",
                    err
                );
                false
            }
        }
    }

    fn persist_checked(&self) {
        if !self.can_write() {
            return;
        }
        let indices: Vec<usize> = self.checked.iter().copied().collect();
        let payload = match serde_json::to_string(&indices) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=guideline_save module=store status=error error_code=encode_failed error={}",
                    err
                );
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.checks_key, &payload) {
            warn!(
                "event=guideline_save module=store status=error error_code=storage_write_failed error={}",
                err
            );
        }
    }
}
