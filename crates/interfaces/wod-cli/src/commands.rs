use std::fmt::Write as _;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use wod_app_core::{
    BoardCommand, CatalogStore, HttpGateway, MirrorOutcome, RedbGateway, RemoteConfig, WodBoard,
};
use wod_core::step_map::build;
use wod_core::{resolve, CatalogError, Category, Event, EventIdentity, EventPatch, RenderableMap};
use wod_infra::{default_http_client, CatalogHttpClient};

use crate::{CliCategory, RemoteTarget};

/// Seed store, wired to `target` and hydrated from it.
pub async fn open_store(target: &RemoteTarget) -> Result<CatalogStore> {
    let store = CatalogStore::from_seed().context("Built-in catalog is invalid")?;

    let remote = match target {
        RemoteTarget::None => RemoteConfig::Disabled,
        RemoteTarget::Http { url, timeout_secs } => {
            let client =
                default_http_client(*timeout_secs).context("Failed to build HTTP client")?;
            let client = CatalogHttpClient::new(client, url)?;
            RemoteConfig::enabled(HttpGateway::new(client))
        }
        RemoteTarget::Redb { root } => {
            let gateway = RedbGateway::new(root.clone());
            let added = gateway.seed_missing(store.events())?;
            if added > 0 {
                tracing::info!("seeded {added} event(s) into {}", root);
            }
            RemoteConfig::enabled(gateway)
        }
    };

    let mut store = store.with_remote(remote);
    store.hydrate_from_remote().await;
    Ok(store)
}

pub fn cmd_list(
    store: CatalogStore,
    category: CliCategory,
    query: Option<String>,
) -> Result<String> {
    let mut board = WodBoard::new(store);
    board.dispatch(BoardCommand::SelectCategory(category.into()))?;
    if let Some(query) = query {
        board.dispatch(BoardCommand::SetQuery(query))?;
    }
    let vm = board.view()?;

    let mut out = String::new();
    if let Some(message) = &vm.empty_message {
        writeln!(out, "{message}")?;
        return Ok(out);
    }
    for card in &vm.cards {
        write!(
            out,
            "{:<8} {:<5} {} ({})",
            card.id,
            card.category.as_str(),
            card.title,
            card.time_cap
        )?;
        if card.has_variants() {
            write!(out, "  [{}]", card.variant_keys.join(" | "))?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

fn lookup<'a>(store: &'a CatalogStore, identity: &str) -> Result<&'a Event> {
    let identity = EventIdentity::from(identity);
    store
        .get(&identity)
        .ok_or_else(|| CatalogError::NotFound(identity).into())
}

pub fn cmd_show(store: &CatalogStore, identity: &str, variant: Option<&str>) -> Result<String> {
    let event = lookup(store, identity)?;
    let key = variant.or(event.default_variant_key()).unwrap_or_default();
    let fields = resolve(event, key)?;

    let mut out = String::new();
    writeln!(out, ":: {} / {}: {}", event.id, event.category, event.title)?;
    writeln!(out, "   Time cap: {}", event.time_cap)?;
    if let Some(set) = event.variants() {
        let keys: Vec<_> = set.keys().collect();
        writeln!(
            out,
            "   Variant:  {} (of {})",
            fields.variant.unwrap_or_default(),
            keys.join(", ")
        )?;
    }
    if let Some(load) = fields.load {
        writeln!(out, "   Load:     {load}")?;
    }
    writeln!(out, "   Movements:")?;
    for movement in fields.movements {
        writeln!(out, "     - {movement}")?;
    }
    if let Some(notes) = fields.notes {
        writeln!(out, "   Notes:    {notes}")?;
    }
    if let Some(flow) = fields.flow {
        writeln!(out, "   Flow:")?;
        for line in flow.lines() {
            writeln!(out, "     {line}")?;
        }
    }
    Ok(out)
}

pub fn render_map(map: &RenderableMap) -> Result<String> {
    let mut out = String::new();
    if map.is_empty() {
        writeln!(out, "(no floor plan)")?;
        return Ok(out);
    }
    for node in map.nodes() {
        write!(out, "{} {}", node.icon.glyph(), node.label)?;
        if let Some(sub) = &node.sub {
            write!(out, " ({sub})")?;
        }
        writeln!(out)?;
        if node.position.has_connector() {
            writeln!(out, "  |")?;
        }
    }
    Ok(out)
}

pub fn cmd_map(store: &CatalogStore, identity: &str, variant: Option<&str>) -> Result<String> {
    let event = lookup(store, identity)?;
    let key = variant.or(event.default_variant_key()).unwrap_or_default();
    let fields = resolve(event, key)?;
    render_map(&build(fields.visual_map))
}

/// Drain mirror outcomes until `expected` arrived or `timeout` elapsed.
pub async fn wait_for_mirror(
    store: &mut CatalogStore,
    expected: usize,
    timeout: Duration,
) -> Vec<MirrorOutcome> {
    let deadline = Instant::now() + timeout;
    let mut outcomes = Vec::new();
    while outcomes.len() < expected && Instant::now() < deadline {
        outcomes.extend(store.drain_outcomes());
        if outcomes.len() < expected {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
    outcomes
}

pub async fn cmd_edit(
    store: &mut CatalogStore,
    identity: &str,
    patch: EventPatch,
    timeout: Duration,
) -> Result<String> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to edit: pass --title, --time-cap or --flow");
    }
    let identity = EventIdentity::from(identity);
    let updated = store.apply_update(&identity, &patch)?;

    let mut out = String::new();
    writeln!(
        out,
        ":: Updated {} ({})",
        identity,
        patch.field_names().join(", ")
    )?;
    writeln!(out, "   Title:    {}", updated.title)?;
    writeln!(out, "   Time cap: {}", updated.time_cap)?;

    if store.is_remote_enabled() {
        let outcomes = wait_for_mirror(store, 1, timeout).await;
        match outcomes.first() {
            Some(MirrorOutcome { result: Ok(()), .. }) => {
                writeln!(out, ":: Remote copy updated")?;
            }
            Some(MirrorOutcome {
                result: Err(message),
                ..
            }) => {
                writeln!(out, ":: Remote write failed (local change kept): {message}")?;
            }
            None => {
                writeln!(out, ":: Remote write still pending after {timeout:?}")?;
            }
        }
    }
    Ok(out)
}

pub fn cmd_validate(store: &CatalogStore) -> Result<String> {
    wod_core::validate::validate_catalog(store.events())?;
    let indiv = store
        .events()
        .iter()
        .filter(|e| e.category == Category::Indiv)
        .count();
    let team = store.events().len() - indiv;
    let variants: usize = store
        .events()
        .iter()
        .filter_map(|e| e.variants())
        .map(|set| set.len())
        .sum();
    Ok(format!(
        ":: Catalog OK: {} events ({indiv} INDIV, {team} TEAM), {variants} variants\n",
        store.events().len()
    ))
}

pub fn cmd_export(store: &CatalogStore) -> Result<String> {
    let mut json = serde_json::to_string_pretty(store.events())?;
    json.push('\n');
    Ok(json)
}
