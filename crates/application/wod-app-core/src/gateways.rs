//! Adapters from the infrastructure crates to [`RemotePersistenceGateway`].

use anyhow::Context;
use camino::Utf8PathBuf;
use wod_core::Event;
use wod_infra::CatalogHttpClient;
use wod_persistence::{CatalogDataStore, RedbCatalogStore};

use crate::ports::{MirrorWrite, RemotePersistenceGateway};

/// Durable local store in a redb file under `root`.
#[derive(Debug, Clone)]
pub struct RedbGateway {
    store: RedbCatalogStore,
    root: Utf8PathBuf,
}

impl RedbGateway {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            store: RedbCatalogStore::new(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Utf8PathBuf {
        &self.root
    }

    /// Write every event not stored yet; returns how many were added.
    pub fn seed_missing(&self, events: &[Event]) -> anyhow::Result<usize> {
        self.store
            .seed_missing(&self.root, events)
            .with_context(|| format!("seeding catalog store under {}", self.root))
    }
}

#[async_trait::async_trait]
impl RemotePersistenceGateway for RedbGateway {
    async fn list_all(&self) -> anyhow::Result<Vec<Event>> {
        let gateway = self.clone();
        tokio::task::spawn_blocking(move || gateway.store.load_events(&gateway.root))
            .await
            .context("catalog store worker panicked")?
            .with_context(|| format!("loading events from {}", self.root))
    }

    async fn write(&self, write: &MirrorWrite) -> anyhow::Result<()> {
        let gateway = self.clone();
        let write = write.clone();
        tokio::task::spawn_blocking(move || {
            gateway
                .store
                .merge_patch(&gateway.root, &write.identity, &write.patch, &write.snapshot)
                .map(|_| ())
        })
        .await
        .context("catalog store worker panicked")?
        .with_context(|| format!("writing to {}", self.root))
    }
}

/// HTTP JSON document store.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: CatalogHttpClient,
}

impl HttpGateway {
    pub fn new(client: CatalogHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RemotePersistenceGateway for HttpGateway {
    async fn list_all(&self) -> anyhow::Result<Vec<Event>> {
        Ok(self.client.list_events().await?)
    }

    async fn write(&self, write: &MirrorWrite) -> anyhow::Result<()> {
        Ok(self.client.patch_event(&write.identity, &write.patch).await?)
    }
}
