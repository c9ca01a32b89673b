//! Display view over the canonical memo collection.
//!
//! # Responsibility
//! - Filter memos by category and free-text search.
//! - Partition pinned memos first without touching persisted order.
//! - Attach per-card style for the resulting display positions.
//!
//! # Invariants
//! - Relative order inside the pinned and unpinned partitions follows the
//!   canonical collection order.
//! - Views borrow the collection; they never reorder it.

use crate::model::memo::{CategoryFilter, Memo};
use crate::style::postit::{postit_style, PostitStyle};

/// Filter inputs driven by the category dropdown and search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoQuery {
    pub category: CategoryFilter,
    /// Matched case-insensitively against title and content after trimming.
    pub search: String,
}

impl MemoQuery {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    /// Returns whether the query filters nothing out.
    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All && self.search.trim().is_empty()
    }

    fn needle(&self) -> String {
        self.search.trim().to_lowercase()
    }
}

/// One rendered card: memo, display position and resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoCard<'a> {
    pub memo: &'a Memo,
    pub position: usize,
    pub style: PostitStyle,
}

/// Stable partition: pinned memos first, then the rest.
pub fn pinned_first<'a, I>(memos: I) -> Vec<&'a Memo>
where
    I: IntoIterator<Item = &'a Memo>,
{
    let (mut pinned, unpinned): (Vec<&Memo>, Vec<&Memo>) =
        memos.into_iter().partition(|memo| memo.pinned);
    pinned.extend(unpinned);
    pinned
}

/// Memos that pass `query`, in display order.
pub fn visible_memos<'a>(memos: &'a [Memo], query: &MemoQuery) -> Vec<&'a Memo> {
    let needle = query.needle();
    pinned_first(
        memos
            .iter()
            .filter(|memo| query.category.matches(memo.category))
            .filter(|memo| memo.matches_text(&needle)),
    )
}

/// Display cards for `query`, styled by their view position.
pub fn display_cards<'a>(memos: &'a [Memo], query: &MemoQuery) -> Vec<MemoCard<'a>> {
    visible_memos(memos, query)
        .into_iter()
        .enumerate()
        .map(|(position, memo)| MemoCard {
            memo,
            position,
            style: postit_style(memo, position),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{display_cards, pinned_first, visible_memos, MemoQuery};
    use crate::model::memo::{CategoryFilter, Memo, MemoCategory};

    fn memo(id: &str, title: &str, category: MemoCategory, pinned: bool) -> Memo {
        let mut memo = Memo::new(title, "", category, 0);
        memo.id = id.to_string();
        memo.pinned = pinned;
        memo
    }

    fn ids(memos: &[&Memo]) -> Vec<String> {
        memos.iter().map(|memo| memo.id.clone()).collect()
    }

    #[test]
    fn pinned_partition_preserves_relative_order() {
        let memos = vec![
            memo("A", "a", MemoCategory::Work, false),
            memo("B", "b", MemoCategory::Work, true),
            memo("C", "c", MemoCategory::Work, true),
            memo("D", "d", MemoCategory::Work, false),
        ];
        assert_eq!(ids(&pinned_first(&memos)), vec!["B", "C", "A", "D"]);
        assert_eq!(memos[0].id, "A");
    }

    #[test]
    fn search_matches_title_or_content_case_insensitive() {
        let mut with_body = memo("B", "other", MemoCategory::Work, false);
        with_body.content = "Buy MILK".to_string();
        let memos = vec![memo("A", "Milk run", MemoCategory::Personal, false), with_body];

        let query = MemoQuery::new(CategoryFilter::All, "  milk ");
        assert_eq!(ids(&visible_memos(&memos, &query)), vec!["A", "B"]);

        let query = MemoQuery::new(CategoryFilter::Only(MemoCategory::Work), "milk");
        assert_eq!(ids(&visible_memos(&memos, &query)), vec!["B"]);
    }

    #[test]
    fn cards_are_styled_by_view_position() {
        let memos = vec![
            memo("A", "a", MemoCategory::Work, false),
            memo("B", "b", MemoCategory::Work, true),
        ];
        let cards = display_cards(&memos, &MemoQuery::default());
        assert_eq!(cards[0].memo.id, "B");
        assert_eq!(cards[0].position, 0);
        assert_eq!(cards[1].position, 1);
        assert_ne!(cards[0].style.rotation_deg, cards[1].style.rotation_deg);
    }

    #[test]
    fn default_query_is_unfiltered() {
        assert!(MemoQuery::default().is_unfiltered());
        assert!(!MemoQuery::new(CategoryFilter::All, "x").is_unfiltered());
    }
}
