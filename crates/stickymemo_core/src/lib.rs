//! Core domain logic for the sticky memo board.
//! This crate is the single source of truth for memo invariants and the
//! persisted record layout.

pub mod clock;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod style;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LoggingError,
};
pub use model::memo::{CategoryFilter, Memo, MemoCategory, MemoId, UNTITLED_PLACEHOLDER};
pub use model::migrate::{decode_memo_record, migrate_memo, RecordRejection};
pub use service::flash::{FlashToken, FlashTracker};
pub use service::guideline_store::{GuidelineStore, REFERENCE_NOTES, TODO_ITEMS};
pub use service::memo_store::{MemoStore, MemoUpdate, StoreLifecycle};
pub use service::memo_view::{display_cards, pinned_first, visible_memos, MemoCard, MemoQuery};
pub use service::theme_store::{StaticThemeEnvironment, Theme, ThemeEnvironment, ThemeStore};
pub use storage::{
    InMemoryKvStore, KeyValueStore, SqliteKvStore, StorageError, StorageKeys, StorageResult,
};
pub use style::postit::{guideline_style, postit_style, PostitStyle, PALETTE_SIZE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
