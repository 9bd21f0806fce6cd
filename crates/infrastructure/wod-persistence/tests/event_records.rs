use camino::Utf8PathBuf;
use wod_core::{EventIdentity, EventPatch};
use wod_persistence::{CatalogDataStore, RedbCatalogStore};

fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, root)
}

#[test]
fn upserted_event_loads_back_unchanged() {
    let (_dir, root) = temp_root();
    let catalog = wod_core::seed::catalog().unwrap();
    let team4 = catalog
        .iter()
        .find(|e| e.identity().as_str() == "EVENT 4TEAM")
        .unwrap();

    RedbCatalogStore.upsert_event(&root, team4).unwrap();

    let stored = RedbCatalogStore.load_events(&root).unwrap();
    assert_eq!(stored, vec![team4.clone()]);
}

#[test]
fn seed_missing_skips_existing_records() {
    let (_dir, root) = temp_root();
    let catalog = wod_core::seed::catalog().unwrap();
    let store = RedbCatalogStore;

    let edited = EventPatch::new().with_title("Kept").apply_to(&catalog[0]);
    store.upsert_event(&root, &edited).unwrap();

    assert_eq!(store.seed_missing(&root, &catalog).unwrap(), catalog.len() - 1);
    assert_eq!(store.seed_missing(&root, &catalog).unwrap(), 0);

    let stored = store.load_events(&root).unwrap();
    let first = stored
        .iter()
        .find(|e| e.identity() == catalog[0].identity())
        .unwrap();
    assert_eq!(first.title, "Kept");
}

#[test]
fn merge_patch_only_touches_named_fields() {
    let (_dir, root) = temp_root();
    let catalog = wod_core::seed::catalog().unwrap();
    let store = RedbCatalogStore;
    let event = &catalog[0];
    let identity = event.identity();

    let remote = EventPatch::new().with_time_cap("99 min").apply_to(event);
    store.upsert_event(&root, &remote).unwrap();

    // The snapshot disagrees on time cap; the stored value must win.
    let patch = EventPatch::new().with_title("Renamed");
    let snapshot = patch.apply_to(event);
    let merged = store.merge_patch(&root, &identity, &patch, &snapshot).unwrap();

    assert_eq!(merged.title, "Renamed");
    assert_eq!(merged.time_cap, "99 min");
    assert_eq!(store.load_events(&root).unwrap(), vec![merged]);
}

#[test]
fn merge_patch_without_record_stores_snapshot() {
    let (_dir, root) = temp_root();
    let catalog = wod_core::seed::catalog().unwrap();
    let event = &catalog[1];
    let identity: EventIdentity = event.identity();

    let patch = EventPatch::new().with_flow("New flow");
    let snapshot = patch.apply_to(event);
    let merged = RedbCatalogStore
        .merge_patch(&root, &identity, &patch, &snapshot)
        .unwrap();

    assert_eq!(merged, snapshot);
    assert_eq!(merged.flow.as_deref(), Some("New flow"));
}
