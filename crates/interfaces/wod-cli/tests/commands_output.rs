use std::time::Duration;

use wod_app_core::CatalogStore;
use wod_cli::{commands, error_hint, CliCategory};
use wod_core::{CatalogError, EventPatch};

fn store() -> CatalogStore {
    CatalogStore::from_seed().unwrap()
}

#[test]
fn list_reports_empty_search() {
    let out = commands::cmd_list(store(), CliCategory::All, Some("kayak".into())).unwrap();
    assert_eq!(out.trim(), "Aucun WOD trouvé pour \"kayak\"");
}

#[test]
fn list_team_only() {
    let out = commands::cmd_list(store(), CliCategory::Team, None).unwrap();
    assert_eq!(out.lines().count(), 6);
    assert!(out.lines().all(|l| l.contains("TEAM")));
}

#[test]
fn show_uses_selected_variant() {
    let out = commands::cmd_show(&store(), "EVENT 4TEAM", Some("Inter")).unwrap();
    assert!(out.contains("Variant:  Inter (of Elite, Inter)"), "{out}");
    assert!(out.contains("DU remplacent le HSW."));
}

#[test]
fn show_rejects_unknown_variant_and_identity() {
    assert!(commands::cmd_show(&store(), "EVENT 4TEAM", Some("Scaled")).is_err());
    assert!(commands::cmd_show(&store(), "EVENT 4", None).is_err());
}

#[test]
fn map_omits_connector_after_last_step() {
    let out = commands::cmd_map(&store(), "EVENT 1INDIV", None).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].contains("Départ (Sur le Rameur)"));
    assert_eq!(lines[1], "  |");
    assert!(lines[6].contains("Arrivée"));
}

#[tokio::test]
async fn edit_without_remote_reports_no_mirror() {
    let mut store = store();
    let out = commands::cmd_edit(
        &mut store,
        "EVENT 1INDIV",
        EventPatch::new().with_title("Row Hard"),
        Duration::from_millis(10),
    )
    .await
    .unwrap();
    assert!(out.starts_with(":: Updated EVENT 1INDIV (title)"));
    assert!(!out.contains("Remote"));
}

#[tokio::test]
async fn empty_edit_is_refused() {
    let mut store = store();
    let err = commands::cmd_edit(
        &mut store,
        "EVENT 1INDIV",
        EventPatch::new(),
        Duration::from_millis(10),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Nothing to edit"));
}

#[test]
fn export_round_trips_through_seed_format() {
    let json = commands::cmd_export(&store()).unwrap();
    let events: Vec<wod_core::Event> = serde_json::from_str(&json).unwrap();
    assert_eq!(events, store().events());
}

#[test]
fn catalog_errors_carry_a_hint() {
    let err = commands::cmd_show(&store(), "EVENT 4", None).unwrap_err();
    assert!(error_hint(&err).unwrap().contains("wod list"));

    let err = commands::cmd_map(&store(), "EVENT 4TEAM", Some("Scaled")).unwrap_err();
    assert!(error_hint(&err).unwrap().contains("wod show"));

    let err = anyhow::Error::from(CatalogError::UnsupportedField("movements".into()));
    assert!(error_hint(&err)
        .unwrap()
        .contains("title, timeCap, flow"));
}

#[tokio::test]
async fn usage_errors_have_no_hint() {
    let mut store = store();
    let err = commands::cmd_edit(
        &mut store,
        "EVENT 1INDIV",
        EventPatch::new(),
        Duration::from_millis(10),
    )
    .await
    .unwrap_err();
    assert_eq!(error_hint(&err), None);
}

#[test]
fn map_without_steps_renders_placeholder() {
    let out = commands::render_map(&wod_core::RenderableMap::Empty).unwrap();
    assert_eq!(out, "(no floor plan)\n");
}
