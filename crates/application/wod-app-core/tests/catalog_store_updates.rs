use serde_json::json;
use wod_app_core::CatalogStore;
use wod_core::{CatalogError, EventIdentity, EventPatch};

fn store() -> CatalogStore {
    CatalogStore::from_seed().unwrap()
}

#[test]
fn title_update_changes_only_title() {
    let mut store = store();
    let identity = EventIdentity::from("EVENT 2INDIV");
    let before = store.get(&identity).unwrap().clone();

    let updated = store
        .apply_update(&identity, &EventPatch::new().with_title("New Title"))
        .unwrap();

    assert_eq!(updated.title, "New Title");
    assert_eq!(updated.body, before.body);
    assert_eq!(updated.visual_map, before.visual_map);
    assert_eq!(updated.flow, before.flow);
    assert_eq!(updated.time_cap, before.time_cap);
    assert_eq!(updated.identity(), identity);
    assert_eq!(store.get(&identity), Some(&updated));
}

#[test]
fn update_keeps_catalog_position() {
    let mut store = store();
    let order: Vec<_> = store.events().iter().map(|e| e.identity()).collect();
    let identity = order[7].clone();

    store
        .apply_update(&identity, &EventPatch::new().with_time_cap("1 min"))
        .unwrap();

    let after: Vec<_> = store.events().iter().map(|e| e.identity()).collect();
    assert_eq!(after, order);
    assert_eq!(store.events()[7].time_cap, "1 min");
}

#[test]
fn missing_identity_is_not_found_and_catalog_unchanged() {
    let mut store = store();
    let before = store.events().to_vec();
    let epoch = store.epoch();

    let err = store
        .apply_update(
            &EventIdentity::from("missing-identity"),
            &EventPatch::new().with_title("x"),
        )
        .unwrap_err();

    assert_eq!(err, CatalogError::NotFound("missing-identity".into()));
    assert_eq!(store.events(), before.as_slice());
    assert_eq!(store.epoch(), epoch);
}

#[test]
fn repeated_update_is_idempotent() {
    let mut store = store();
    let identity = EventIdentity::from("EVENT 4TEAM");
    let patch = EventPatch::new()
        .with_title("Gym Relay")
        .with_flow("Same flow");

    let first = store.apply_update(&identity, &patch).unwrap();
    let second = store.apply_update(&identity, &patch).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.events().len(), 12);
}

#[test]
fn empty_patch_is_a_no_op() {
    let mut store = store();
    let identity = EventIdentity::from("EVENT 1INDIV");
    let before = store.get(&identity).unwrap().clone();

    let returned = store.apply_update(&identity, &EventPatch::new()).unwrap();

    assert_eq!(returned, before);
    assert_eq!(store.epoch(), 0);
}

#[test]
fn field_map_with_unsupported_key_is_rejected_before_mutation() {
    let mut store = store();
    let identity = EventIdentity::from("EVENT 1INDIV");
    let before = store.events().to_vec();

    let fields = json!({ "title": "Changed", "movements": ["1 Burpee"] });
    let err = store
        .apply_fields(&identity, fields.as_object().unwrap())
        .unwrap_err();

    assert_eq!(err, CatalogError::UnsupportedField("movements".into()));
    assert_eq!(store.events(), before.as_slice());
}

#[test]
fn field_map_sets_flow_on_event_level() {
    let mut store = store();
    let identity = EventIdentity::from("EVENT 4TEAM");
    assert_eq!(store.get(&identity).unwrap().flow, None);

    let fields = json!({ "flow": "Event-level flow" });
    let updated = store
        .apply_fields(&identity, fields.as_object().unwrap())
        .unwrap();

    assert_eq!(updated.flow.as_deref(), Some("Event-level flow"));
    // Variant flows still take precedence.
    let fields = wod_core::resolve(&updated, "Inter").unwrap();
    assert!(fields.flow.unwrap().contains("100 DU"));
}

#[test]
fn duplicate_seed_is_rejected() {
    let mut seed = wod_core::seed::catalog().unwrap();
    seed.push(seed[0].clone());
    assert!(CatalogStore::new(seed).is_err());
}
