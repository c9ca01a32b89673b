//! Core use-case stores.
//!
//! # Responsibility
//! - Hold session state for memos, the guideline card and the theme.
//! - Persist through the `storage::KeyValueStore` port only.
//! - Keep UI layers decoupled from storage details.

pub mod flash;
pub mod guideline_store;
pub mod memo_store;
pub mod memo_view;
pub mod theme_store;
