//! In-memory range store over a concurrent map.
//!
//! Used in tests and in deployments that accept regenerating ranges after
//! a restart. Concurrent reads and writes need no external locking; a
//! racing double-write resolves to whichever insert lands last.

use async_trait::async_trait;
use dashmap::DashMap;

use agronomy::{PlantStageKey, RangeRecord};

use super::{CacheEntry, RangeStore, StoreError};

/// DashMap-backed range store.
#[derive(Debug, Default)]
pub struct MemoryRangeStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryRangeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RangeStore for MemoryRangeStore {
    async fn get(&self, key: &PlantStageKey) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self
            .entries
            .get(&key.storage_key())
            .map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &PlantStageKey, record: &RangeRecord) -> Result<(), StoreError> {
        self.entries
            .insert(key.storage_key(), CacheEntry::new(record.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agronomy::{GrowthStage, ParameterKey};

    fn sample_record() -> RangeRecord {
        RangeRecord::new().with(ParameterKey::Ph, 6.0, 7.5)
    }

    #[tokio::test]
    async fn test_get_put_round_trip() {
        let store = MemoryRangeStore::new();
        let key = PlantStageKey::new("okra", GrowthStage::Harvest);

        assert!(store.get(&key).await.unwrap().is_none());

        store.put(&key, &sample_record()).await.unwrap();
        let entry = store.get(&key).await.unwrap().unwrap();
        assert_eq!(entry.record, sample_record());
    }

    #[tokio::test]
    async fn test_put_is_an_upsert() {
        let store = MemoryRangeStore::new();
        let key = PlantStageKey::new("okra", GrowthStage::Harvest);

        store.put(&key, &sample_record()).await.unwrap();
        let updated = RangeRecord::new().with(ParameterKey::Ph, 5.5, 7.0);
        store.put(&key, &updated).await.unwrap();

        let entry = store.get(&key).await.unwrap().unwrap();
        assert_eq!(entry.record, updated);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_stage_scoped() {
        let store = MemoryRangeStore::new();
        store
            .put(&PlantStageKey::new("okra", GrowthStage::Harvest), &sample_record())
            .await
            .unwrap();

        let other_stage = PlantStageKey::new("okra", GrowthStage::Flowering);
        assert!(store.get(&other_stage).await.unwrap().is_none());
    }
}
