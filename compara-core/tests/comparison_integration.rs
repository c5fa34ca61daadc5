//! End-to-end tests: catalog -> session -> saved comparisons on disk.

use compara_core::catalog::{InMemoryCatalog, JsonFileCatalog};
use compara_core::{
    ComparableItem, ComparisonSession, FileStore, ItemId, KeyValueStore, MemoryStore,
    NotificationKind, RecordingNotifier, SessionOptions, SnapshotStore, VisibilityMap,
    extract_keys,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

fn catalog_items() -> Vec<ComparableItem> {
    vec![
        ComparableItem::new(10, "Stick Vac 3000")
            .with_price(249.99)
            .with_rating(4.5)
            .with_review_count(1280)
            .with_spec("Brand", "Vaxo")
            .with_spec("Weight", "2.6 kg")
            .with_spec("Battery Life", "60 min")
            .with_slug("stick-vac-3000"),
        ComparableItem::new(11, "Canister Pro")
            .with_price(199.0)
            .with_rating(4.5)
            .with_review_count(640)
            .with_spec("Brand", "Dustr")
            .with_spec("Power", "1200 W")
            .with_spec("Cord Length", "8 m")
            .with_slug("canister-pro"),
        ComparableItem::new(12, "Robo Clean")
            .with_price(399.0)
            .with_rating(4.9)
            .with_spec("Brand", "Robo")
            .with_spec("Noise Level", "58 dB"),
    ]
}

#[tokio::test]
async fn compare_save_and_reopen_from_file_store() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("storage.json");
    let catalog = InMemoryCatalog::new(catalog_items());
    let notifier = Arc::new(RecordingNotifier::new());

    let mut session = ComparisonSession::new(
        SnapshotStore::new(Arc::new(FileStore::new(&store_path))),
        notifier.clone(),
        SessionOptions::default(),
    );
    session
        .load(&catalog, &[ItemId::Number(10), ItemId::Number(11)])
        .await
        .unwrap();
    assert_eq!(
        session.spec_keys(),
        vec!["Brand", "Weight", "Power", "Battery Life", "Cord Length"]
    );
    // equal ratings: the first listed item wins
    assert_eq!(session.best(), Some(ItemId::Number(10)));

    session.toggle("Weight");
    session.toggle("Cord Length");
    let saved = session.save("Vacuums under 250").unwrap();

    // A second process opening the same file sees the record.
    let reopened = SnapshotStore::new(Arc::new(FileStore::new(&store_path)));
    let all = reopened.list_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, saved.id);
    assert_eq!(
        all[0].product_ids,
        vec![ItemId::Number(10), ItemId::Number(11)]
    );
    let mut visible = all[0].visible_specs.clone();
    visible.sort();
    assert_eq!(visible, vec!["Battery Life", "Brand", "Power"]);

    let mut restored = ComparisonSession::new(
        reopened,
        Arc::new(RecordingNotifier::new()),
        SessionOptions::default(),
    );
    restored.restore(&all[0], &catalog).await.unwrap();
    assert_eq!(restored.visible_keys(), session.visible_keys());
    assert_eq!(
        notifier.notifications()[0].kind,
        NotificationKind::Success
    );
}

#[tokio::test]
async fn json_file_catalog_feeds_session() {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        serde_json::to_string_pretty(&catalog_items()).unwrap(),
    )
    .unwrap();
    let catalog = JsonFileCatalog::new(&catalog_path);

    let mut session = ComparisonSession::new(
        SnapshotStore::new(Arc::new(MemoryStore::new())),
        Arc::new(RecordingNotifier::new()),
        SessionOptions::default(),
    );
    session
        .load(
            &catalog,
            &[ItemId::Number(12), ItemId::Number(10), ItemId::Number(11)],
        )
        .await
        .unwrap();
    assert_eq!(session.best(), Some(ItemId::Number(12)));

    let table = session.table();
    assert_eq!(table.best, Some(0));
    assert_eq!(table.columns[1].detail_path, "/product/stick-vac-3000");
    assert_eq!(table.columns[0].detail_path, "/product/12");
}

#[test]
fn saves_accumulate_in_order_and_clear_removes_all() {
    let store = Arc::new(MemoryStore::new());
    let snapshots = SnapshotStore::new(store.clone());
    let items = catalog_items();
    let visibility = VisibilityMap::new(&extract_keys(&items));

    snapshots.save("First", &items[..1], &visibility).unwrap();
    snapshots.save("Second", &items[1..], &visibility).unwrap();
    let names: Vec<String> = snapshots.list_all().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["First", "Second"]);

    snapshots.clear_all().unwrap();
    assert!(snapshots.list_all().is_empty());
    assert_eq!(store.get(snapshots.key()).unwrap(), None);
}

#[test]
fn last_writer_wins_between_two_handles() {
    let store = Arc::new(MemoryStore::new());
    let items = catalog_items();
    let visibility = VisibilityMap::new(&extract_keys(&items));
    let tab_a = SnapshotStore::new(store.clone());
    let tab_b = SnapshotStore::new(store.clone());

    // Each handle re-reads before writing, so sequential saves both survive.
    tab_a.save("From A", &items, &visibility).unwrap();
    tab_b.save("From B", &items, &visibility).unwrap();
    assert_eq!(tab_a.list_all().len(), 2);

    // A stale full-list write from elsewhere replaces everything.
    store.set(tab_a.key(), "[]").unwrap();
    assert!(tab_b.list_all().is_empty());
}
