use serde_json::json;
use stickymemo_core::{
    CategoryFilter, InMemoryKvStore, KeyValueStore, ManualClock, Memo, MemoCategory, MemoQuery,
    MemoStore, MemoUpdate, StorageKeys, PALETTE_SIZE, UNTITLED_PLACEHOLDER,
};
use std::collections::HashSet;

fn memos_key() -> String {
    StorageKeys::default().memos
}

fn titles(store: &MemoStore<&InMemoryKvStore, &ManualClock>) -> Vec<String> {
    store.memos().iter().map(|memo| memo.title.clone()).collect()
}

fn seeded_store<'a>(
    storage: &'a InMemoryKvStore,
    clock: &'a ManualClock,
    names: &[&str],
) -> MemoStore<&'a InMemoryKvStore, &'a ManualClock> {
    let mut store = MemoStore::with_clock(storage, clock);
    store.load();
    // `add` inserts at the front, so add in reverse to get `names` order.
    for name in names.iter().rev() {
        store.add(name, "", None);
        clock.advance(1);
    }
    store
}

#[test]
fn end_to_end_add_update_delete() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(1_700_000_000_000);
    let mut store = MemoStore::with_clock(&storage, &clock);
    assert!(store.load().is_empty());

    let id = store.add("Groceries", "milk, eggs", Some(MemoCategory::Personal));
    assert_eq!(store.len(), 1);
    let created = store.get(&id).unwrap().clone();
    assert_eq!(created.title, "Groceries");
    assert_eq!(created.category, MemoCategory::Personal);
    assert!(created.color_index.unwrap() < PALETTE_SIZE);
    assert_eq!(created.created_at, created.updated_at);

    clock.advance(5);
    assert!(store.update(&id, MemoUpdate::content("milk, eggs, bread")));
    let updated = store.get(&id).unwrap();
    assert_eq!(updated.content, "milk, eggs, bread");
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, "Groceries");
    assert_eq!(updated.category, MemoCategory::Personal);

    assert!(store.delete(&id));
    assert!(store.is_empty());
    assert_eq!(storage.get(&memos_key()).unwrap().as_deref(), Some("[]"));
}

#[test]
fn save_then_load_round_trips_collection() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(10);
    let original: Vec<Memo> = {
        let mut store = seeded_store(&storage, &clock, &["a", "b", "c"]);
        let second = store.memos()[1].id.clone();
        store.toggle_pin(&second);
        store.update(&second, MemoUpdate::category(MemoCategory::Work));
        let snapshot = store.memos().to_vec();
        snapshot
    };

    let mut reloaded = MemoStore::with_clock(&storage, &clock);
    assert_eq!(reloaded.load(), original.as_slice());
}

#[test]
fn add_generates_unique_ids_newest_first() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(0);
    let mut store = MemoStore::with_clock(&storage, &clock);
    store.load();

    let mut ids = HashSet::new();
    for idx in 0..50 {
        ids.insert(store.add(&format!("memo {idx}"), "", None));
    }
    assert_eq!(ids.len(), 50);
    assert_eq!(store.memos()[0].title, "memo 49");
}

#[test]
fn blank_title_keeps_previous_and_blank_content_clears() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(0);
    let mut store = MemoStore::with_clock(&storage, &clock);
    store.load();
    let id = store.add("Keep me", "body", None);

    store.update(&id, MemoUpdate::title("   "));
    assert_eq!(store.get(&id).unwrap().title, "Keep me");

    store.update(&id, MemoUpdate::content("   "));
    assert_eq!(store.get(&id).unwrap().content, "");

    store.update(&id, MemoUpdate::title("  Renamed "));
    assert_eq!(store.get(&id).unwrap().title, "Renamed");
}

#[test]
fn add_with_blank_title_uses_placeholder() {
    let storage = InMemoryKvStore::new();
    let mut store = MemoStore::new(&storage);
    store.load();
    let id = store.add("  ", "  text  ", None);
    let memo = store.get(&id).unwrap();
    assert_eq!(memo.title, UNTITLED_PLACEHOLDER);
    assert_eq!(memo.content, "text");
    assert_eq!(memo.category, MemoCategory::Uncategorized);
}

#[test]
fn updates_keep_timestamps_monotonic() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(100);
    let mut store = MemoStore::with_clock(&storage, &clock);
    store.load();
    let id = store.add("t", "c", None);

    let mut previous = store.get(&id).unwrap().updated_at;
    for step in [3, 0, 7, 1] {
        clock.advance(step);
        store.update(&id, MemoUpdate::content(format!("step {step}")));
        let memo = store.get(&id).unwrap();
        assert!(memo.updated_at >= previous);
        assert_eq!(memo.created_at, 100);
        previous = memo.updated_at;
    }
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(0);
    let mut store = seeded_store(&storage, &clock, &["a"]);
    let before = storage.get(&memos_key()).unwrap();

    assert!(!store.update("missing", MemoUpdate::title("x")));
    assert!(!store.delete("missing"));
    assert!(!store.toggle_pin("missing"));
    assert_eq!(storage.get(&memos_key()).unwrap(), before);
}

#[test]
fn reorder_moves_single_element() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(0);

    let mut store = seeded_store(&storage, &clock, &["A", "B", "C", "D"]);
    assert!(store.reorder(0, 2));
    assert_eq!(titles(&store), vec!["B", "C", "A", "D"]);

    let other_storage = InMemoryKvStore::new();
    let mut store = seeded_store(&other_storage, &clock, &["A", "B", "C", "D"]);
    assert!(store.reorder(3, 0));
    assert_eq!(titles(&store), vec!["D", "A", "B", "C"]);
    assert!(!store.reorder(4, 0));
    assert_eq!(titles(&store), vec!["D", "A", "B", "C"]);

    let persisted: Vec<Memo> =
        serde_json::from_str(&other_storage.get(&memos_key()).unwrap().unwrap()).unwrap();
    let persisted_titles: Vec<&str> = persisted.iter().map(|memo| memo.title.as_str()).collect();
    assert_eq!(persisted_titles, vec!["D", "A", "B", "C"]);
}

#[test]
fn reorder_in_filtered_view_uses_full_collection_positions() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(0);
    let mut store = seeded_store(&storage, &clock, &["A", "B", "C", "D"]);
    let ids: Vec<String> = store.memos().iter().map(|memo| memo.id.clone()).collect();
    store.update(&ids[1], MemoUpdate::category(MemoCategory::Work));
    store.update(&ids[3], MemoUpdate::category(MemoCategory::Work));

    // Work view is [B, D]; dragging D onto B moves D to B's full position.
    let query = MemoQuery::new(CategoryFilter::Only(MemoCategory::Work), "");
    assert!(store.reorder_in_view(&query, 1, 0));
    assert_eq!(titles(&store), vec!["A", "D", "B", "C"]);

    assert!(store.move_by_id(&ids[0], &ids[2]));
    assert_eq!(titles(&store), vec!["D", "B", "C", "A"]);
    assert!(!store.move_by_id("missing", &ids[0]));
}

#[test]
fn reorder_in_pinned_first_view_uses_full_collection_positions() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(0);
    let mut store = seeded_store(&storage, &clock, &["A", "B", "C", "D"]);
    let pinned = store.memos()[3].id.clone();
    store.toggle_pin(&pinned);

    // Pinned-first view is [D, A, B, C]; dropping D onto B (view 2) lands it
    // at B's full position 1, not at full position 2.
    let query = MemoQuery::default();
    let view: Vec<&str> = stickymemo_core::visible_memos(store.memos(), &query)
        .into_iter()
        .map(|memo| memo.title.as_str())
        .collect();
    assert_eq!(view, vec!["D", "A", "B", "C"]);

    assert!(store.reorder_in_view(&query, 0, 2));
    assert_eq!(titles(&store), vec!["A", "D", "B", "C"]);
    assert_eq!(store.index_of(&pinned), Some(1));

    let persisted: Vec<Memo> =
        serde_json::from_str(&storage.get(&memos_key()).unwrap().unwrap()).unwrap();
    let persisted_titles: Vec<&str> = persisted.iter().map(|memo| memo.title.as_str()).collect();
    assert_eq!(persisted_titles, vec!["A", "D", "B", "C"]);
    assert!(persisted[1].pinned);
}

#[test]
fn pinning_is_a_view_not_a_persisted_reorder() {
    let storage = InMemoryKvStore::new();
    let clock = ManualClock::new(0);
    let mut store = seeded_store(&storage, &clock, &["A", "B", "C", "D"]);
    let ids: Vec<String> = store.memos().iter().map(|memo| memo.id.clone()).collect();
    store.toggle_pin(&ids[1]);
    store.set_pinned(&ids[2], true);

    assert_eq!(titles(&store), vec!["A", "B", "C", "D"]);
    let view: Vec<&str> = stickymemo_core::visible_memos(store.memos(), &MemoQuery::default())
        .into_iter()
        .map(|memo| memo.title.as_str())
        .collect();
    assert_eq!(view, vec!["B", "C", "A", "D"]);

    store.toggle_pin(&ids[1]);
    assert!(!store.get(&ids[1]).unwrap().pinned);
}

#[test]
fn load_degrades_unreadable_payloads_to_empty() {
    for payload in ["not json", "{\"id\":\"x\"}", "42", "null"] {
        let storage = InMemoryKvStore::new();
        storage.set(&memos_key(), payload).unwrap();
        let mut store = MemoStore::new(&storage);
        assert!(store.load().is_empty(), "payload {payload} should load empty");
    }
}

#[test]
fn load_skips_non_objects_and_repairs_objects() {
    let storage = InMemoryKvStore::new();
    let raw = json!([
        "garbage",
        7,
        null,
        { "id": "ok", "title": "Fine", "content": "x", "createdAt": 1, "updatedAt": 2,
          "colorIndex": 2, "category": "Work", "pinned": true },
        { "id": "bad", "title": 123, "colorIndex": "x", "category": "nonexistent" }
    ]);
    storage.set(&memos_key(), &raw.to_string()).unwrap();

    let clock = ManualClock::new(99);
    let mut store = MemoStore::with_clock(&storage, &clock);
    let memos = store.load();
    assert_eq!(memos.len(), 2);

    assert_eq!(memos[0].id, "ok");
    assert_eq!(memos[0].color_index, Some(2));
    assert_eq!(memos[0].category, MemoCategory::Work);
    assert!(memos[0].pinned);

    assert_eq!(memos[1].title, UNTITLED_PLACEHOLDER);
    assert_eq!(memos[1].color_index, None);
    assert_eq!(memos[1].category, MemoCategory::Uncategorized);
    assert_eq!(memos[1].created_at, 99);
}

#[test]
fn duplicate_ids_in_storage_are_made_unique() {
    let storage = InMemoryKvStore::new();
    let raw = json!([{ "id": "same", "title": "one" }, { "id": "same", "title": "two" }]);
    storage.set(&memos_key(), &raw.to_string()).unwrap();

    let mut store = MemoStore::new(&storage);
    let memos = store.load();
    assert_eq!(memos[0].id, "same");
    assert_ne!(memos[1].id, "same");
}

#[test]
fn write_failures_keep_in_memory_state() {
    let storage = InMemoryKvStore::with_quota(64);
    let mut store = MemoStore::new(&storage);
    store.load();

    let id = store.add("quota", &"x".repeat(200), None);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&id).unwrap().content.len(), 200);
    assert_eq!(storage.get(&memos_key()).unwrap(), None);

    storage.set_unavailable(true);
    assert!(store.update(&id, MemoUpdate::title("still works")));
    assert_eq!(store.get(&id).unwrap().title, "still works");
}

#[test]
fn unavailable_storage_loads_empty() {
    let storage = InMemoryKvStore::new();
    storage.set_unavailable(true);
    let mut store = MemoStore::new(&storage);
    assert!(store.load().is_empty());
    assert!(store.is_hydrated());
}

#[test]
fn custom_storage_key_is_isolated() {
    let storage = InMemoryKvStore::new();
    let keys = StorageKeys::with_prefix("profile-b");
    let mut store = MemoStore::new(&storage).with_storage_key(keys.memos.clone());
    store.load();
    store.add("isolated", "", None);

    assert_eq!(storage.get(&memos_key()).unwrap(), None);
    assert!(storage.get(&keys.memos).unwrap().is_some());
}
