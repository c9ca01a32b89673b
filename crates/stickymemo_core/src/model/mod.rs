//! Memo domain model and persisted-record repair.
//!
//! # Responsibility
//! - Define canonical data structures used by the memo store.
//! - Turn untrusted persisted values into valid memos.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId`.
//! - Deletion is a hard remove; there are no tombstones.

pub mod memo;
pub mod migrate;
