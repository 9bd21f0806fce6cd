use std::fmt;
use std::sync::Arc;

use uuid::Uuid;
use wod_core::{Event, EventIdentity, EventPatch};

/// One best-effort write handed to the remote gateway.
#[derive(Debug, Clone)]
pub struct MirrorWrite {
    pub write_id: Uuid,
    pub identity: EventIdentity,
    /// Only the fields the edit supplied.
    pub patch: EventPatch,
    /// Local event after the edit, for stores that need a full record.
    pub snapshot: Event,
}

impl MirrorWrite {
    pub fn new(identity: EventIdentity, patch: EventPatch, snapshot: Event) -> Self {
        Self {
            write_id: Uuid::new_v4(),
            identity,
            patch,
            snapshot,
        }
    }
}

#[async_trait::async_trait]
pub trait RemotePersistenceGateway: Send + Sync + 'static {
    /// Every stored record. Called once at startup.
    async fn list_all(&self) -> anyhow::Result<Vec<Event>>;

    /// Persist the fields of `write.patch` for `write.identity`.
    async fn write(&self, write: &MirrorWrite) -> anyhow::Result<()>;
}

/// Remote persistence is either fully on or absent.
#[derive(Clone, Default)]
pub enum RemoteConfig {
    #[default]
    Disabled,
    Enabled(Arc<dyn RemotePersistenceGateway>),
}

impl RemoteConfig {
    pub fn enabled(gateway: impl RemotePersistenceGateway) -> Self {
        RemoteConfig::Enabled(Arc::new(gateway))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, RemoteConfig::Enabled(_))
    }

    pub fn gateway(&self) -> Option<&Arc<dyn RemotePersistenceGateway>> {
        match self {
            RemoteConfig::Disabled => None,
            RemoteConfig::Enabled(gateway) => Some(gateway),
        }
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteConfig::Disabled => f.write_str("Disabled"),
            RemoteConfig::Enabled(_) => f.write_str("Enabled(..)"),
        }
    }
}
