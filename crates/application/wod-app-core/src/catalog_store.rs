use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use wod_core::validate::validate_catalog;
use wod_core::{CatalogError, Event, EventIdentity, EventPatch, ModelError};

use crate::mirror::{MirrorOutcome, RemoteMirror};
use crate::ports::{MirrorWrite, RemoteConfig};

/// Runtime copy of the catalog. Single owner, mutated through `&mut self`.
///
/// Events keep their seed positions for the whole session: edits replace a
/// record in place and hydration overlays by identity, nothing is ever
/// inserted or removed.
pub struct CatalogStore {
    events: Vec<Event>,
    index: HashMap<EventIdentity, usize>,
    epoch: u64,
    remote: RemoteConfig,
    mirror: Option<RemoteMirror>,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("events", &self.events.len())
            .field("epoch", &self.epoch)
            .field("remote", &self.remote)
            .finish()
    }
}

impl CatalogStore {
    pub fn new(seed: Vec<Event>) -> Result<Self, ModelError> {
        validate_catalog(&seed)?;
        let index = seed
            .iter()
            .enumerate()
            .map(|(ix, event)| (event.identity(), ix))
            .collect();
        Ok(Self {
            events: seed,
            index,
            epoch: 0,
            remote: RemoteConfig::Disabled,
            mirror: None,
        })
    }

    /// Store over the built-in board.
    pub fn from_seed() -> Result<Self, ModelError> {
        Self::new(wod_core::seed::catalog()?)
    }

    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.mirror = remote.gateway().cloned().map(RemoteMirror::new);
        self.remote = remote;
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, identity: &EventIdentity) -> Option<&Event> {
        self.index.get(identity).map(|&ix| &self.events[ix])
    }

    /// Bumped on every change to the event list.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_enabled()
    }

    /// Shallow-merge `patch` into the event named by `identity`.
    ///
    /// An unknown identity leaves the catalog untouched. With remote
    /// persistence enabled the write is mirrored in the background; its
    /// failure never rolls the local change back.
    pub fn apply_update(
        &mut self,
        identity: &EventIdentity,
        patch: &EventPatch,
    ) -> Result<Event, CatalogError> {
        let ix = *self
            .index
            .get(identity)
            .ok_or_else(|| CatalogError::NotFound(identity.clone()))?;

        if patch.is_empty() {
            return Ok(self.events[ix].clone());
        }

        let updated = patch.apply_to(&self.events[ix]);
        self.events[ix] = updated.clone();
        self.epoch += 1;
        debug!("updated {} ({:?})", identity, patch.field_names());

        if let Some(mirror) = &mut self.mirror {
            mirror.dispatch(MirrorWrite::new(
                identity.clone(),
                patch.clone(),
                updated.clone(),
            ));
        }
        Ok(updated)
    }

    /// [`Self::apply_update`] from a loose field map. Rejected keys leave the
    /// catalog untouched.
    pub fn apply_fields(
        &mut self,
        identity: &EventIdentity,
        fields: &Map<String, Value>,
    ) -> Result<Event, CatalogError> {
        let patch = EventPatch::from_fields(fields)?;
        self.apply_update(identity, &patch)
    }

    /// Overlay the remote records on the seed by identity; returns how many
    /// events changed. Unknown identities are skipped and a failing gateway
    /// keeps the seed.
    pub async fn hydrate_from_remote(&mut self) -> usize {
        let Some(gateway) = self.remote.gateway().cloned() else {
            return 0;
        };
        let remote = match gateway.list_all().await {
            Ok(events) => events,
            Err(e) => {
                warn!("remote catalog unavailable, keeping seed: {e:#}");
                return 0;
            }
        };

        let mut changed = 0;
        for event in remote {
            let identity = event.identity();
            let Some(&ix) = self.index.get(&identity) else {
                debug!("ignoring remote record {identity}: not in catalog");
                continue;
            };
            if self.events[ix] != event {
                self.events[ix] = event;
                changed += 1;
            }
        }
        if changed > 0 {
            self.epoch += 1;
        }
        info!("hydrated {changed} event(s) from remote");
        changed
    }

    /// Outcomes of finished background writes since the last call.
    pub fn drain_outcomes(&mut self) -> Vec<MirrorOutcome> {
        match &mut self.mirror {
            Some(mirror) => mirror.drain(),
            None => Vec::new(),
        }
    }
}
