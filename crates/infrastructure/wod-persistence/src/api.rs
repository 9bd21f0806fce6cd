use camino::Utf8Path;
use wod_core::{Event, EventIdentity, EventPatch};

pub const CATALOG_REDB_FILENAME: &str = "wod-catalog.redb";
pub const CURRENT_SCHEMA: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbState {
    Missing,
    Valid,
    Busy,
    Corrupt,
    NewerSchema { found: u32, supported: u32 },
}

pub trait CatalogDataStore: Send + Sync {
    fn validate(&self, root: &Utf8Path) -> Result<DbState, crate::StorageError>;

    /// All stored events, ordered by identity. A missing database is empty.
    fn load_events(&self, root: &Utf8Path) -> Result<Vec<Event>, crate::StorageError>;

    fn upsert_event(&self, root: &Utf8Path, event: &Event) -> Result<(), crate::StorageError>;

    /// Merge `patch` over the stored record for `identity`, or store
    /// `snapshot` when no record exists yet. Returns the stored event.
    fn merge_patch(
        &self,
        root: &Utf8Path,
        identity: &EventIdentity,
        patch: &EventPatch,
        snapshot: &Event,
    ) -> Result<Event, crate::StorageError>;

    /// Insert the events whose identity is not stored yet; returns how many
    /// were written.
    fn seed_missing(&self, root: &Utf8Path, events: &[Event])
        -> Result<usize, crate::StorageError>;
}
