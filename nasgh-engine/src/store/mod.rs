//! Durable key/value cache for generated range records.
//!
//! One entry per `(plant, stage)` key, written once per key in the common
//! case; concurrent writers for the same key are last-write-wins, which is
//! acceptable because two generations for the same key come out
//! near-identical. The medium is pluggable: sled on disk for deployments,
//! a DashMap for tests and ephemeral runs.

pub mod memory;
pub mod sled;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agronomy::{PlantStageKey, RangeRecord};

pub use self::memory::MemoryRangeStore;
pub use self::sled::SledRangeStore;

/// Error from a store operation.
///
/// Store errors never abort a request: the resolver treats a failed read
/// as a miss and a failed write as a logged event.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying medium failed
    #[error("store I/O error: {0}")]
    Io(String),

    /// A persisted entry could not be decoded
    #[error("stored entry is corrupt: {0}")]
    Corrupt(String),
}

/// A persisted range record with its write timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The generated targets
    pub record: RangeRecord,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(record: RangeRecord) -> Self {
        Self {
            record,
            created_at: Utc::now(),
        }
    }
}

/// Persistent range cache.
///
/// `put` is an upsert; readers may briefly miss an entry another process
/// just wrote when the medium is remote, and the resolver tolerates that
/// by regenerating.
#[async_trait]
pub trait RangeStore: Send + Sync {
    /// Fetch the entry for a key, `None` on miss.
    async fn get(&self, key: &PlantStageKey) -> Result<Option<CacheEntry>, StoreError>;

    /// Upsert the record for a key.
    async fn put(&self, key: &PlantStageKey, record: &RangeRecord) -> Result<(), StoreError>;
}
