//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record persisted by the memo store.
//! - Define the closed category enumeration and the category filter values.
//!
//! # Invariants
//! - `id` is stable and never reassigned for the memo lifetime.
//! - `updated_at >= created_at`.
//! - `color_index`, when set, is within `0..PALETTE_SIZE` and never changes.
//!
//! # See also
//! - `model::migrate` for repairing persisted records.

use crate::style::postit::PALETTE_SIZE;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Title substituted when a memo title trims to empty.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled";

/// Opaque memo identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemoId = String;

/// Fixed category set used for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoCategory {
    /// Default bucket for memos without an explicit category.
    Uncategorized,
    Work,
    Personal,
    Other,
}

impl MemoCategory {
    /// Categories in display order.
    pub const ALL: [MemoCategory; 4] = [
        MemoCategory::Uncategorized,
        MemoCategory::Work,
        MemoCategory::Personal,
        MemoCategory::Other,
    ];

    /// Display label, identical to the persisted value.
    pub fn label(self) -> &'static str {
        match self {
            Self::Uncategorized => "Uncategorized",
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Other => "Other",
        }
    }

    /// Resolves an exact label. Unknown labels return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == label)
    }

    /// Resolves a label, falling back to the default category.
    pub fn from_label_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }
}

impl Default for MemoCategory {
    fn default() -> Self {
        Self::Uncategorized
    }
}

impl Display for MemoCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category filter value: everything, or one real category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MemoCategory),
}

impl CategoryFilter {
    /// Label of the synthetic "match everything" filter.
    pub const ALL_LABEL: &'static str = "All";

    /// Filter options in display order: `All` first, then each category.
    pub fn options() -> Vec<CategoryFilter> {
        let mut options = vec![CategoryFilter::All];
        options.extend(MemoCategory::ALL.into_iter().map(CategoryFilter::Only));
        options
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(category) => category.label(),
        }
    }

    /// Returns whether a memo with `category` passes this filter.
    pub fn matches(self, category: MemoCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == category,
        }
    }
}

/// Canonical persisted memo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: MemoId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds, set once.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
    /// Explicit palette slot. `None` means the color derives from `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_index: Option<usize>,
    #[serde(default)]
    pub category: MemoCategory,
    #[serde(default, skip_serializing_if = "is_false")]
    pub pinned: bool,
}

impl Memo {
    /// Creates a memo with a fresh id and a random palette slot.
    ///
    /// # Invariants
    /// - `title` is trimmed and replaced by the placeholder when empty.
    /// - `content` is trimmed.
    /// - `created_at == updated_at == now_ms`.
    pub fn new(title: &str, content: &str, category: MemoCategory, now_ms: i64) -> Self {
        let color_index = rand::thread_rng().gen_range(0..PALETTE_SIZE);
        Self {
            id: generate_memo_id(),
            title: normalize_title(title),
            content: content.trim().to_string(),
            created_at: now_ms,
            updated_at: now_ms,
            color_index: Some(color_index),
            category,
            pinned: false,
        }
    }

    /// Returns whether title or content contains `needle` (case-insensitive).
    ///
    /// `needle` is expected to be lowercased and trimmed already.
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Generates a globally-unique memo id.
pub fn generate_memo_id() -> MemoId {
    Uuid::new_v4().to_string()
}

/// Trims a title, substituting the placeholder when nothing is left.
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
