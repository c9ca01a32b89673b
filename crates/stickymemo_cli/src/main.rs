//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stickymemo_core` linkage.
//! - Run one hydrate/add/view round-trip on throwaway storage.

use stickymemo_core::{display_cards, InMemoryKvStore, MemoCategory, MemoQuery, MemoStore};

fn main() {
    println!("stickymemo_core ping={}", stickymemo_core::ping());
    println!("stickymemo_core version={}", stickymemo_core::core_version());

    let storage = InMemoryKvStore::new();
    let mut store = MemoStore::new(&storage);
    store.load();
    store.add("smoke", "", Some(MemoCategory::Other));
    let cards = display_cards(store.memos(), &MemoQuery::default());
    println!(
        "stickymemo_core memos={} first_transform={}",
        cards.len(),
        cards
            .first()
            .map(|card| card.style.transform())
            .unwrap_or_default()
    );
}
