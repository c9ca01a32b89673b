//! Memo store: canonical ordered collection plus persistence.
//!
//! # Responsibility
//! - Own the session's ordered memo collection.
//! - Apply create/update/delete/reorder/pin mutations.
//! - Mirror the whole collection to storage after every mutation.
//!
//! # Invariants
//! - No storage write happens while the store is `Cold`.
//! - Ids are unique across the collection at all times.
//! - `updated_at` never decreases and never drops below `created_at`.
//! - Storage failures never surface to callers; memory stays authoritative.
//!
//! # See also
//! - `model::migrate` for per-record repair on load.
//! - `service::memo_view` for the filtered, pinned-first display order.

use crate::clock::{Clock, SystemClock};
use crate::model::memo::{generate_memo_id, Memo, MemoCategory, MemoId};
use crate::model::migrate::decode_memo_record;
use crate::service::memo_view::{visible_memos, MemoQuery};
use crate::storage::{KeyValueStore, StorageKeys};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Persistence lifecycle shared by every store in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLifecycle {
    /// Storage has not been read yet; writes are suppressed.
    Cold,
    /// Storage has been read; every mutation is written back.
    Hydrated,
}

/// Partial update applied by `MemoStore::update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoUpdate {
    /// Trimmed; a whitespace-only value keeps the previous title.
    pub title: Option<String>,
    /// Trimmed; always replaces when provided, empty allowed.
    pub content: Option<String>,
    pub category: Option<MemoCategory>,
}

impl MemoUpdate {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn category(value: MemoCategory) -> Self {
        Self {
            category: Some(value),
            ..Self::default()
        }
    }
}

/// Canonical memo collection for one session.
pub struct MemoStore<S: KeyValueStore, C: Clock = SystemClock> {
    storage: S,
    clock: C,
    key: String,
    memos: Vec<Memo>,
    lifecycle: StoreLifecycle,
}

impl<S: KeyValueStore> MemoStore<S> {
    /// Creates a cold store over `storage` using the system clock.
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> MemoStore<S, C> {
    /// Creates a cold store with an explicit clock.
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            key: StorageKeys::default().memos,
            memos: Vec::new(),
            lifecycle: StoreLifecycle::Cold,
        }
    }

    /// Overrides the storage key the collection is persisted under.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn lifecycle(&self) -> StoreLifecycle {
        self.lifecycle
    }

    pub fn is_hydrated(&self) -> bool {
        self.lifecycle == StoreLifecycle::Hydrated
    }

    /// Current collection in canonical (user-controlled) order.
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    /// Position of `id` in the full, unfiltered collection.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.memos.iter().position(|memo| memo.id == id)
    }

    /// Reads and repairs the persisted collection, then hydrates the store.
    ///
    /// Missing, unreadable or non-array payloads yield an empty collection.
    /// Non-object elements are skipped; object elements are repaired. A
    /// second call is a no-op.
    pub fn load(&mut self) -> &[Memo] {
        if self.is_hydrated() {
            return &self.memos;
        }

        self.memos = self.read_persisted();
        self.lifecycle = StoreLifecycle::Hydrated;
        info!(
            "event=memo_store_load module=store status=ok count={}",
            self.memos.len()
        );
        &self.memos
    }

    /// Creates a memo at the front of the collection and returns its id.
    ///
    /// On a `Cold` store the memo lives in memory only and the next `load()`
    /// replaces it.
    pub fn add(&mut self, title: &str, content: &str, category: Option<MemoCategory>) -> MemoId {
        let mut memo = Memo::new(
            title,
            content,
            category.unwrap_or_default(),
            self.clock.now_ms(),
        );
        while self.get(&memo.id).is_some() {
            memo.id = generate_memo_id();
        }

        let id = memo.id.clone();
        self.memos.insert(0, memo);
        debug!(
            "event=memo_add module=store status=ok count={}",
            self.memos.len()
        );
        self.persist();
        id
    }

    /// Applies a partial update. Unknown ids are a no-op returning `false`.
    pub fn update(&mut self, id: &str, update: MemoUpdate) -> bool {
        let now = self.clock.now_ms();
        let Some(memo) = self.memos.iter_mut().find(|memo| memo.id == id) else {
            debug!("event=memo_update module=store status=not_found");
            return false;
        };

        if let Some(title) = update.title.as_deref() {
            let trimmed = title.trim();
            if !trimmed.is_empty() {
                memo.title = trimmed.to_string();
            }
        }
        if let Some(content) = update.content.as_deref() {
            memo.content = content.trim().to_string();
        }
        if let Some(category) = update.category {
            memo.category = category;
        }
        touch(memo, now);

        self.persist();
        true
    }

    /// Removes a memo. Unknown ids are a no-op returning `false`.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!("event=memo_delete module=store status=not_found");
            return false;
        };

        self.memos.remove(index);
        self.persist();
        true
    }

    /// Moves the element at `from` to `to` in the full collection.
    ///
    /// Elements between the two positions shift by one. Out-of-range indices
    /// are a no-op returning `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.memos.len();
        if from >= len || to >= len {
            debug!(
                "event=memo_reorder module=store status=out_of_range from={} to={} len={}",
                from, to, len
            );
            return false;
        }
        if from == to {
            return true;
        }

        let memo = self.memos.remove(from);
        self.memos.insert(to, memo);
        self.persist();
        true
    }

    /// Moves `active_id` to the current position of `over_id`.
    ///
    /// Both ids are resolved against the full collection, so callers working
    /// on a filtered or pinned-first view never reorder by view positions.
    pub fn move_by_id(&mut self, active_id: &str, over_id: &str) -> bool {
        match (self.index_of(active_id), self.index_of(over_id)) {
            (Some(from), Some(to)) => self.reorder(from, to),
            _ => false,
        }
    }

    /// Reorders using positions of the display view produced by `query`.
    pub fn reorder_in_view(&mut self, query: &MemoQuery, from_view: usize, to_view: usize) -> bool {
        let (active_id, over_id) = {
            let view = visible_memos(&self.memos, query);
            match (view.get(from_view), view.get(to_view)) {
                (Some(active), Some(over)) => (active.id.clone(), over.id.clone()),
                _ => return false,
            }
        };
        self.move_by_id(&active_id, &over_id)
    }

    /// Flips the pinned flag. Unknown ids are a no-op returning `false`.
    pub fn toggle_pin(&mut self, id: &str) -> bool {
        match self.get(id).map(|memo| memo.pinned) {
            Some(pinned) => self.set_pinned(id, !pinned),
            None => false,
        }
    }

    /// Sets the pinned flag. Unknown ids are a no-op returning `false`.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> bool {
        let now = self.clock.now_ms();
        let Some(memo) = self.memos.iter_mut().find(|memo| memo.id == id) else {
            return false;
        };

        memo.pinned = pinned;
        touch(memo, now);
        self.persist();
        true
    }

    fn read_persisted(&self) -> Vec<Memo> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=memo_store_load module=store status=error error_code=storage_read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!("event=memo_store_load module=store status=error error_code=not_an_array");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=memo_store_load module=store status=error error_code=decode_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        let now = self.clock.now_ms();
        let mut seen = HashSet::with_capacity(items.len());
        let mut memos = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for item in &items {
            match decode_memo_record(item, now) {
                Ok(mut memo) => {
                    // Duplicate ids in a damaged record get fresh identities.
                    while !seen.insert(memo.id.clone()) {
                        memo.id = generate_memo_id();
                    }
                    memos.push(memo);
                }
                Err(rejection) => {
                    skipped += 1;
                    debug!(
                        "event=memo_record_skip module=store status=rejected reason={}",
                        rejection
                    );
                }
            }
        }
        if skipped > 0 {
            warn!(
                "event=memo_store_load module=store status=partial skipped={}",
                skipped
            );
        }
        memos
    }

    fn persist(&self) {
        if !self.is_hydrated() {
            warn!(
                "event=memo_store_save module=store status=skipped reason=cold count={}",
                self.memos.len()
            );
            return;
        }

        let payload = match serde_json::to_string(&self.memos) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=memo_store_save module=store status=error error_code=encode_failed error={}",
                    err
                );
                return;
            }
        };

        if let Err(err) = self.storage.set(&self.key, &payload) {
            warn!(
                "event=memo_store_save module=store status=error error_code=storage_write_failed error={}",
                err
            );
        }
    }
}

fn touch(memo: &mut Memo, now: i64) {
    memo.updated_at = now.max(memo.updated_at).max(memo.created_at);
}
