use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use wod_core::{Event, EventIdentity, EventPatch};

use crate::api::{DbState, CATALOG_REDB_FILENAME, CURRENT_SCHEMA};
use crate::codec::{decode_event, encode_event};
use crate::maintenance::quarantine_corrupt_file;
use crate::{CatalogDataStore, StorageError};

const META: TableDefinition<&str, &str> = TableDefinition::new("meta");
const EVENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("events");

const META_FORMAT_KEY: &str = "format";
const META_FORMAT_VALUE: &str = "wod-redb";
const META_SCHEMA_VERSION: &str = "schema_version";
const META_CREATED_AT: &str = "created_at";
const META_LAST_WRITE_AT: &str = "last_write_at";

type DbCache = Mutex<HashMap<Utf8PathBuf, Arc<Database>>>;

#[derive(Debug, Default, Clone)]
pub struct RedbCatalogStore;

impl RedbCatalogStore {
    fn is_corrupt_open_error(err: &redb::DatabaseError) -> bool {
        match err {
            redb::DatabaseError::Storage(storage) => match storage {
                redb::StorageError::Corrupted(_) => true,
                redb::StorageError::Io(ioe) => matches!(
                    ioe.kind(),
                    std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof
                ),
                _ => false,
            },
            _ => false,
        }
    }

    fn db_cache() -> MutexGuard<'static, HashMap<Utf8PathBuf, Arc<Database>>> {
        static CACHE: OnceLock<DbCache> = OnceLock::new();
        CACHE
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn new() -> Self {
        Self
    }

    pub fn path_for_root(root: &Utf8Path) -> Utf8PathBuf {
        root.join(CATALOG_REDB_FILENAME)
    }

    fn open(&self, root: &Utf8Path, create: bool) -> Result<Arc<Database>, StorageError> {
        let path = Self::path_for_root(root);
        if !create && !path.exists() {
            return Err(StorageError::Missing);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut cache = Self::db_cache();
        if let Some(existing) = cache.get(&path) {
            if path.exists() {
                return Ok(existing.clone());
            }
            cache.remove(&path);
        }

        let db = if path.exists() {
            match Database::open(path.as_std_path()) {
                Ok(db) => db,
                Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                    return Err(StorageError::DatabaseAlreadyOpen);
                }
                Err(e) if Self::is_corrupt_open_error(&e) => {
                    let _ = quarantine_corrupt_file(&path);
                    return Err(StorageError::Corrupt);
                }
                Err(e) => return Err(e.into()),
            }
        } else if create {
            tracing::debug!("creating catalog store at {}", path);
            Database::create(path.as_std_path())?
        } else {
            return Err(StorageError::Missing);
        };

        if let Err(e) = self.ensure_schema(&db) {
            drop(db);
            if matches!(e, StorageError::Corrupt) {
                let _ = quarantine_corrupt_file(&path);
            }
            return Err(e);
        }
        let db = Arc::new(db);
        cache.insert(path, db.clone());
        Ok(db)
    }

    fn ensure_schema(&self, db: &Database) -> Result<(), StorageError> {
        // Create tables and required meta keys on first open.
        let write_tx = db.begin_write()?;
        {
            let mut meta = write_tx.open_table(META)?;
            let format: Option<String> = meta.get(META_FORMAT_KEY)?.map(|g| g.value().to_string());
            if format.is_none() {
                let schema_version = CURRENT_SCHEMA.to_string();
                let created_at = Utc::now().to_rfc3339();
                meta.insert(META_FORMAT_KEY, META_FORMAT_VALUE)?;
                meta.insert(META_SCHEMA_VERSION, schema_version.as_str())?;
                meta.insert(META_CREATED_AT, created_at.as_str())?;
            } else if format.as_deref() != Some(META_FORMAT_VALUE) {
                return Err(StorageError::Corrupt);
            }
        }
        let _ = write_tx.open_table(EVENTS)?;
        write_tx.commit()?;

        let read_tx = db.begin_read()?;
        let meta = read_tx.open_table(META)?;
        let schema_version = meta
            .get(META_SCHEMA_VERSION)?
            .and_then(|g| g.value().parse::<u32>().ok())
            .unwrap_or(0);
        if schema_version == 0 {
            return Err(StorageError::Corrupt);
        }
        if schema_version > CURRENT_SCHEMA {
            return Err(StorageError::NewerSchema {
                found: schema_version,
                supported: CURRENT_SCHEMA,
            });
        }
        if schema_version != CURRENT_SCHEMA {
            return Err(StorageError::Corrupt);
        }
        Ok(())
    }

    fn decode_row(key: &str, bytes: &[u8]) -> Result<Event, StorageError> {
        let event = decode_event(bytes)?;
        let stored = event.identity();
        if stored.as_str() != key {
            return Err(StorageError::KeyMismatch {
                key: key.to_string(),
                stored: stored.to_string(),
            });
        }
        Ok(event)
    }
}

impl CatalogDataStore for RedbCatalogStore {
    fn validate(&self, root: &Utf8Path) -> Result<DbState, StorageError> {
        let path = Self::path_for_root(root);
        if !path.exists() {
            return Ok(DbState::Missing);
        }
        {
            let mut cache = Self::db_cache();
            if cache.contains_key(&path) {
                if !path.exists() {
                    cache.remove(&path);
                    return Ok(DbState::Missing);
                }
                return Ok(DbState::Valid);
            }
        }

        match Database::open(path.as_std_path()) {
            Ok(db) => match self.ensure_schema(&db) {
                Ok(()) => Ok(DbState::Valid),
                Err(StorageError::NewerSchema { found, supported }) => {
                    Ok(DbState::NewerSchema { found, supported })
                }
                Err(StorageError::DatabaseAlreadyOpen) => Ok(DbState::Busy),
                Err(StorageError::Corrupt) => {
                    drop(db);
                    let _ = quarantine_corrupt_file(&path);
                    Ok(DbState::Corrupt)
                }
                Err(e) => Err(e),
            },
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => Ok(DbState::Busy),
            Err(e) if Self::is_corrupt_open_error(&e) => {
                let _ = quarantine_corrupt_file(&path);
                Ok(DbState::Corrupt)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn load_events(&self, root: &Utf8Path) -> Result<Vec<Event>, StorageError> {
        let db = match self.open(root, false) {
            Ok(db) => db,
            Err(StorageError::Missing) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let read_tx = db.begin_read()?;
        let table = read_tx.open_table(EVENTS)?;

        let mut out = Vec::new();
        for row in table.iter()? {
            let (k, v) = row?;
            out.push(Self::decode_row(k.value(), v.value())?);
        }
        Ok(out)
    }

    fn upsert_event(&self, root: &Utf8Path, event: &Event) -> Result<(), StorageError> {
        let db = self.open(root, true)?;
        let identity = event.identity();
        let bytes = encode_event(event)?;

        let write_tx = db.begin_write()?;
        {
            let mut table = write_tx.open_table(EVENTS)?;
            table.insert(identity.as_str(), bytes.as_slice())?;
            let ts = Utc::now().to_rfc3339();
            let mut meta = write_tx.open_table(META)?;
            meta.insert(META_LAST_WRITE_AT, ts.as_str())?;
        }
        write_tx.commit()?;
        Ok(())
    }

    fn merge_patch(
        &self,
        root: &Utf8Path,
        identity: &EventIdentity,
        patch: &EventPatch,
        snapshot: &Event,
    ) -> Result<Event, StorageError> {
        let db = self.open(root, true)?;

        // Read-modify-write in a single transaction.
        let write_tx = db.begin_write()?;
        let merged = {
            let mut table = write_tx.open_table(EVENTS)?;
            let stored: Option<Vec<u8>> = table
                .get(identity.as_str())?
                .map(|guard| guard.value().to_vec());
            let merged = match stored {
                Some(bytes) => patch.apply_to(&Self::decode_row(identity.as_str(), &bytes)?),
                None => snapshot.clone(),
            };
            let bytes = encode_event(&merged)?;
            table.insert(identity.as_str(), bytes.as_slice())?;

            let ts = Utc::now().to_rfc3339();
            let mut meta = write_tx.open_table(META)?;
            meta.insert(META_LAST_WRITE_AT, ts.as_str())?;
            merged
        };
        write_tx.commit()?;
        tracing::debug!("merged {:?} into {}", patch.field_names(), identity);
        Ok(merged)
    }

    fn seed_missing(&self, root: &Utf8Path, events: &[Event]) -> Result<usize, StorageError> {
        let db = self.open(root, true)?;
        let mut written = 0;

        let write_tx = db.begin_write()?;
        {
            let mut table = write_tx.open_table(EVENTS)?;
            for event in events {
                let identity = event.identity();
                if table.get(identity.as_str())?.is_some() {
                    continue;
                }
                let bytes = encode_event(event)?;
                table.insert(identity.as_str(), bytes.as_slice())?;
                written += 1;
            }
            if written > 0 {
                let ts = Utc::now().to_rfc3339();
                let mut meta = write_tx.open_table(META)?;
                meta.insert(META_LAST_WRITE_AT, ts.as_str())?;
            }
        }
        write_tx.commit()?;
        Ok(written)
    }
}
