//! Sled-backed durable range store.
//!
//! Generated ranges cost an inference call each, so they must survive
//! process restarts. Entries are JSON-encoded under the key's
//! `storage_key()` and flushed on every write; sled handles concurrent
//! access without exclusive locking on our side.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use agronomy::{PlantStageKey, RangeRecord};

use super::{CacheEntry, RangeStore, StoreError};

/// Sled-backed range store.
pub struct SledRangeStore {
    db: ::sled::Db,
}

impl SledRangeStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = ::sled::open(path.as_ref()).map_err(|e| StoreError::Io(e.to_string()))?;
        debug!(path = %path.as_ref().display(), "opened range cache");
        Ok(Self { db })
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }
}

#[async_trait]
impl RangeStore for SledRangeStore {
    async fn get(&self, key: &PlantStageKey) -> Result<Option<CacheEntry>, StoreError> {
        let bytes = self
            .db
            .get(key.storage_key().as_bytes())
            .map_err(|e| StoreError::Io(e.to_string()))?;

        match bytes {
            None => Ok(None),
            Some(bytes) => {
                let entry = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                Ok(Some(entry))
            }
        }
    }

    async fn put(&self, key: &PlantStageKey, record: &RangeRecord) -> Result<(), StoreError> {
        let entry = CacheEntry::new(record.clone());
        let bytes = serde_json::to_vec(&entry).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        self.db
            .insert(key.storage_key().as_bytes(), bytes)
            .map_err(|e| StoreError::Io(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }
}
