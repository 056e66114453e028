//! Three-tier ideal-range resolution.
//!
//! Tier order is fixed: static table, durable cache, live generation.
//! The first tier that answers wins and its provenance is reported to the
//! caller. A resolve call is strictly linear, with no retries; concurrent
//! resolves for the same key may both reach generation, which is accepted
//! (the duplicate cost is bounded and the cache is last-write-wins).

use std::sync::Arc;
use tracing::{debug, warn};

use agronomy::{normalize, table, GrowthStage, PlantStageKey, Provenance, RangeRecord, Reading};

use crate::error::EngineError;
use crate::generator::RangeGenerator;
use crate::store::RangeStore;

/// A resolved range record with its provenance.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Normalized plant key the record is filed under
    pub plant_key: String,
    /// The target ranges
    pub record: RangeRecord,
    /// Which tier answered
    pub provenance: Provenance,
}

/// Resolves target ranges for a plant and growth stage.
pub struct RangeResolver {
    store: Arc<dyn RangeStore>,
    generator: RangeGenerator,
}

impl RangeResolver {
    /// Create a resolver over a cache store and a generator.
    pub fn new(store: Arc<dyn RangeStore>, generator: RangeGenerator) -> Self {
        Self { store, generator }
    }

    /// Resolve the target ranges for a raw plant name at a growth stage.
    ///
    /// A failed cache read is treated as a miss and a failed cache write is
    /// logged and swallowed; the only terminal failures are an unusable
    /// plant name and generation failure. A record that cannot be
    /// determined is surfaced as an error, never as an empty record, since
    /// an empty record would misclassify every reading downstream.
    pub async fn resolve(
        &self,
        raw_plant: &str,
        stage: GrowthStage,
        snapshot: Option<&Reading>,
    ) -> Result<Resolution, EngineError> {
        let plant_key =
            normalize(raw_plant).map_err(|e| EngineError::InvalidArgument(e.to_string()))?;

        // Tier 1: static table
        if let Some(record) = table::lookup(&plant_key, stage) {
            debug!(plant_key = %plant_key, %stage, "static table hit");
            return Ok(Resolution {
                plant_key,
                record,
                provenance: Provenance::Static,
            });
        }

        let key = PlantStageKey::new(plant_key.clone(), stage);

        // Tier 2: durable cache; a read failure is only a miss
        match self.store.get(&key).await {
            Ok(Some(entry)) => {
                debug!(%key, "range cache hit");
                return Ok(Resolution {
                    plant_key,
                    record: entry.record,
                    provenance: Provenance::Cached,
                });
            }
            Ok(None) => {}
            Err(error) => {
                warn!(%key, %error, "cache read failed, treating as miss");
            }
        }

        // Tier 3: generate, then persist best-effort. A cancelled generate
        // never reaches the put below.
        let record = self.generator.generate(raw_plant, stage, snapshot).await?;

        if let Err(error) = self.store.put(&key, &record).await {
            warn!(%key, %error, "cache write failed, returning generated record anyway");
        }

        Ok(Resolution {
            plant_key,
            record,
            provenance: Provenance::Generated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CacheEntry, MemoryRangeStore, StoreError};
    use agronomy::ParameterKey;
    use async_trait::async_trait;
    use nasgh_agent::{FallbackRouter, InferenceBackend, MockBackend};

    const GENERATED_REPLY: &str = r#"{"ph": {"min": 5.5, "max": 6.8}, "k": {"min": 200, "max": 300}}"#;

    fn resolver_with(store: Arc<dyn RangeStore>, backend: MockBackend) -> RangeResolver {
        let backends: Vec<Arc<dyn InferenceBackend>> = vec![Arc::new(backend)];
        RangeResolver::new(store, RangeGenerator::new(FallbackRouter::new(backends)))
    }

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl RangeStore for BrokenStore {
        async fn get(&self, _key: &PlantStageKey) -> Result<Option<CacheEntry>, StoreError> {
            Err(StoreError::Io("disk on fire".to_string()))
        }

        async fn put(&self, _key: &PlantStageKey, _record: &RangeRecord) -> Result<(), StoreError> {
            Err(StoreError::Io("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn test_static_hit_for_arabic_alias() {
        let backend = MockBackend::default();
        let store = Arc::new(MemoryRangeStore::new());
        let resolver = resolver_with(store, backend);

        let resolution = resolver
            .resolve("طماطم", GrowthStage::Vegetative, None)
            .await
            .unwrap();

        assert_eq!(resolution.plant_key, "tomato");
        assert_eq!(resolution.provenance, Provenance::Static);
        assert_eq!(
            resolution.record,
            table::lookup("tomato", GrowthStage::Vegetative).unwrap()
        );
    }

    #[tokio::test]
    async fn test_static_wins_over_cache() {
        // Seed a cache entry for a plant that also has static coverage;
        // the static tier must still answer first.
        let store = Arc::new(MemoryRangeStore::new());
        let planted = RangeRecord::new().with(ParameterKey::Ph, 1.0, 2.0);
        store
            .put(&PlantStageKey::new("tomato", GrowthStage::Harvest), &planted)
            .await
            .unwrap();

        let resolver = resolver_with(store, MockBackend::default());
        let resolution = resolver
            .resolve("tomato", GrowthStage::Harvest, None)
            .await
            .unwrap();

        assert_eq!(resolution.provenance, Provenance::Static);
        assert_ne!(resolution.record, planted);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_generation() {
        let store = Arc::new(MemoryRangeStore::new());
        let cached = RangeRecord::new().with(ParameterKey::Ph, 5.0, 6.5);
        store
            .put(&PlantStageKey::new("dragonfruit", GrowthStage::Flowering), &cached)
            .await
            .unwrap();

        let backend = MockBackend::default();
        let resolver = resolver_with(store, backend);

        let resolution = resolver
            .resolve("Dragonfruit", GrowthStage::Flowering, None)
            .await
            .unwrap();

        assert_eq!(resolution.provenance, Provenance::Cached);
        assert_eq!(resolution.record, cached);
    }

    #[tokio::test]
    async fn test_generation_persists_for_next_resolve() {
        let store = Arc::new(MemoryRangeStore::new());
        let backend = MockBackend::default().with_reply(GENERATED_REPLY);
        let resolver = resolver_with(store.clone(), backend);

        let first = resolver
            .resolve("dragonfruit", GrowthStage::Flowering, None)
            .await
            .unwrap();
        assert_eq!(first.provenance, Provenance::Generated);
        assert!(first.record.is_well_formed());

        // Second resolve must come from the cache, not regenerate
        let second = resolver
            .resolve("dragonfruit", GrowthStage::Flowering, None)
            .await
            .unwrap();
        assert_eq!(second.provenance, Provenance::Cached);
        assert_eq!(second.record, first.record);
    }

    #[tokio::test]
    async fn test_generation_failure_is_terminal() {
        let store = Arc::new(MemoryRangeStore::new());
        // max < min on the only generated parameter
        let backend = MockBackend::default().with_reply(r#"{"n": {"min": 50, "max": 10}}"#);
        let resolver = resolver_with(store, backend);

        let err = resolver
            .resolve("Dragonfruit", GrowthStage::Flowering, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Generation(_)));
    }

    #[tokio::test]
    async fn test_broken_store_degrades_to_generation() {
        let backend = MockBackend::default().with_reply(GENERATED_REPLY);
        let resolver = resolver_with(Arc::new(BrokenStore), backend);

        // Read failure is a miss, write failure is swallowed
        let resolution = resolver
            .resolve("dragonfruit", GrowthStage::Flowering, None)
            .await
            .unwrap();
        assert_eq!(resolution.provenance, Provenance::Generated);
        assert!(resolution.record.is_well_formed());
    }

    #[tokio::test]
    async fn test_empty_plant_name_is_invalid_argument() {
        let resolver = resolver_with(Arc::new(MemoryRangeStore::new()), MockBackend::default());
        let err = resolver
            .resolve("   ", GrowthStage::Harvest, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_concurrent_resolves_both_generate_cleanly() {
        let store = Arc::new(MemoryRangeStore::new());
        let backend = MockBackend::default().with_reply(GENERATED_REPLY);
        let resolver = Arc::new(resolver_with(store.clone(), backend));

        let (a, b) = tokio::join!(
            resolver.resolve("okra", GrowthStage::Harvest, None),
            resolver.resolve("okra", GrowthStage::Harvest, None),
        );
        let a = a.unwrap();
        let b = b.unwrap();

        // Both calls may generate; whatever won the cache race must be a
        // complete record, never a merge of the two
        let entry = store
            .get(&PlantStageKey::new("okra", GrowthStage::Harvest))
            .await
            .unwrap()
            .unwrap();
        assert!(entry.record.is_well_formed());
        assert!(entry.record == a.record || entry.record == b.record);
    }
}
