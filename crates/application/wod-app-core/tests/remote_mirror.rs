use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use wod_app_core::{
    CatalogStore, MirrorOutcome, MirrorWrite, RemoteConfig, RemotePersistenceGateway,
};
use wod_core::{Event, EventIdentity, EventPatch};

#[derive(Clone, Default)]
struct RecordingGateway {
    fail_writes: bool,
    /// Writes setting this title take a while to land.
    slow_title: Option<&'static str>,
    listed: Option<Vec<Event>>,
    writes: Arc<Mutex<Vec<MirrorWrite>>>,
}

#[async_trait::async_trait]
impl RemotePersistenceGateway for RecordingGateway {
    async fn list_all(&self) -> anyhow::Result<Vec<Event>> {
        self.listed
            .clone()
            .ok_or_else(|| anyhow!("remote catalog offline"))
    }

    async fn write(&self, write: &MirrorWrite) -> anyhow::Result<()> {
        if self.slow_title.is_some() && write.patch.title.as_deref() == self.slow_title {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        self.writes.lock().unwrap().push(write.clone());
        if self.fail_writes {
            return Err(anyhow!("permission denied"));
        }
        Ok(())
    }
}

async fn wait_for_outcomes(store: &mut CatalogStore, n: usize) -> Vec<MirrorOutcome> {
    let mut out = Vec::new();
    for _ in 0..300 {
        out.extend(store.drain_outcomes());
        if out.len() >= n {
            return out;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {n} mirror outcome(s), got {}", out.len());
}

fn store_with(gateway: &RecordingGateway) -> CatalogStore {
    CatalogStore::from_seed()
        .unwrap()
        .with_remote(RemoteConfig::enabled(gateway.clone()))
}

#[tokio::test]
async fn write_is_mirrored_with_only_supplied_fields() {
    let gateway = RecordingGateway::default();
    let mut store = store_with(&gateway);
    let identity = EventIdentity::from("EVENT 3TEAM");

    store
        .apply_update(&identity, &EventPatch::new().with_time_cap("15 min"))
        .unwrap();

    let outcomes = wait_for_outcomes(&mut store, 1).await;
    assert!(outcomes[0].is_success());
    assert_eq!(outcomes[0].identity, identity);
    assert_eq!(outcomes[0].fields, vec!["timeCap"]);

    let writes = gateway.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].patch, EventPatch::new().with_time_cap("15 min"));
    assert_eq!(writes[0].snapshot.time_cap, "15 min");
    assert_eq!(writes[0].write_id, outcomes[0].write_id);
}

#[tokio::test]
async fn slow_write_does_not_overtake_later_edit() {
    let gateway = RecordingGateway {
        slow_title: Some("first"),
        ..Default::default()
    };
    let mut store = store_with(&gateway);
    let identity = EventIdentity::from("EVENT 1INDIV");

    store
        .apply_update(&identity, &EventPatch::new().with_title("first"))
        .unwrap();
    store
        .apply_update(&identity, &EventPatch::new().with_title("second"))
        .unwrap();

    let outcomes = wait_for_outcomes(&mut store, 2).await;
    assert!(outcomes.iter().all(MirrorOutcome::is_success));

    let writes = gateway.writes.lock().unwrap();
    let titles: Vec<_> = writes
        .iter()
        .map(|w| w.patch.title.as_deref().unwrap())
        .collect();
    assert_eq!(titles, ["first", "second"]);
    assert_eq!(outcomes[0].write_id, writes[0].write_id);
    assert_eq!(outcomes[1].write_id, writes[1].write_id);
    assert_eq!(
        writes.last().map(|w| w.snapshot.title.as_str()),
        Some(store.get(&identity).unwrap().title.as_str())
    );
}

#[tokio::test]
async fn failed_write_keeps_local_state() {
    let gateway = RecordingGateway {
        fail_writes: true,
        ..Default::default()
    };
    let mut store = store_with(&gateway);
    let identity = EventIdentity::from("EVENT 1INDIV");

    let updated = store
        .apply_update(&identity, &EventPatch::new().with_title("Offline edit"))
        .unwrap();

    let outcomes = wait_for_outcomes(&mut store, 1).await;
    assert!(!outcomes[0].is_success());
    assert!(outcomes[0]
        .result
        .as_ref()
        .unwrap_err()
        .contains("permission denied"));

    assert_eq!(store.get(&identity), Some(&updated));
    assert_eq!(store.get(&identity).unwrap().title, "Offline edit");
}

#[tokio::test]
async fn empty_patch_and_unknown_identity_write_nothing() {
    let gateway = RecordingGateway::default();
    let mut store = store_with(&gateway);

    store
        .apply_update(&"EVENT 1INDIV".into(), &EventPatch::new())
        .unwrap();
    assert!(store
        .apply_update(&"nope".into(), &EventPatch::new().with_title("x"))
        .is_err());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.drain_outcomes().is_empty());
    assert!(gateway.writes.lock().unwrap().is_empty());
}

#[test]
fn write_without_tokio_runtime_does_not_panic() {
    let gateway = RecordingGateway::default();
    let mut store = store_with(&gateway);

    store
        .apply_update(&"EVENT 2TEAM".into(), &EventPatch::new().with_flow("Relay"))
        .unwrap();

    for _ in 0..300 {
        let outcomes = store.drain_outcomes();
        if let Some(outcome) = outcomes.first() {
            assert!(outcome.is_success());
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("background write never reported");
}

#[tokio::test]
async fn hydration_overlays_known_identities_only() {
    let seed = wod_core::seed::catalog().unwrap();
    let mut remote_first = EventPatch::new()
        .with_title("Remote Row")
        .apply_to(&seed[0]);
    remote_first.time_cap = "30 min".into();

    let mut stranger = seed[1].clone();
    stranger.id = "EVENT 99".into();

    let gateway = RecordingGateway {
        listed: Some(vec![stranger, remote_first.clone(), seed[2].clone()]),
        ..Default::default()
    };
    let mut store = store_with(&gateway);

    assert_eq!(store.hydrate_from_remote().await, 1);
    assert_eq!(store.events().len(), 12);
    assert_eq!(store.events()[0], remote_first);
    assert_eq!(store.epoch(), 1);
    assert!(store.get(&"EVENT 99INDIV".into()).is_none());
}

#[tokio::test]
async fn hydration_failure_keeps_seed() {
    let gateway = RecordingGateway::default();
    let mut store = store_with(&gateway);
    let seed = store.events().to_vec();

    assert_eq!(store.hydrate_from_remote().await, 0);
    assert_eq!(store.events(), seed.as_slice());
    assert_eq!(store.epoch(), 0);
}

#[tokio::test]
async fn disabled_remote_never_hydrates() {
    let mut store = CatalogStore::from_seed().unwrap();
    assert!(!store.is_remote_enabled());
    assert_eq!(store.hydrate_from_remote().await, 0);
    store
        .apply_update(&"EVENT 1INDIV".into(), &EventPatch::new().with_title("t"))
        .unwrap();
    assert!(store.drain_outcomes().is_empty());
}
