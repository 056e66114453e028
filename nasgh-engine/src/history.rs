//! Bounded reading and session history.
//!
//! Latest-first ring stores with a fixed capacity, replacing unbounded
//! in-process arrays. Both logs are injected into the engine rather than
//! living as globals, so tests and multi-tenant embeddings can hold their
//! own instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;

use agronomy::{GrowthStage, RangeRecord, Reading, StatusEntry};

/// Default capacity for both logs.
pub const DEFAULT_CAPACITY: usize = 100;

/// One ingested probe reading with its context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReading {
    /// When the reading arrived
    pub received_at: DateTime<Utc>,
    /// The measured values
    pub reading: Reading,
    /// Plant name as submitted, if any
    pub plant_name: Option<String>,
    /// Growth stage as submitted, if any
    pub stage: Option<GrowthStage>,
}

/// A completed advisory session: reading, targets, statuses, and advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilSession {
    /// Session id
    pub id: String,
    /// When the session completed
    pub created_at: DateTime<Utc>,
    /// The reading that was evaluated
    pub soil: Reading,
    /// Plant name as submitted
    pub plant_name: Option<String>,
    /// Growth stage
    pub stage: Option<GrowthStage>,
    /// Resolved target ranges
    pub targets: Option<RangeRecord>,
    /// Per-parameter classification
    pub status_summary: Vec<StatusEntry>,
    /// The advisory text shown to the farmer
    pub advice: String,
}

impl SoilSession {
    /// Create a session with a fresh id and timestamp.
    pub fn new(soil: Reading) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            soil,
            plant_name: None,
            stage: None,
            targets: None,
            status_summary: Vec::new(),
            advice: String::new(),
        }
    }
}

/// Latest-first bounded log of probe readings.
pub struct ReadingLog {
    capacity: usize,
    entries: RwLock<VecDeque<StoredReading>>,
}

impl ReadingLog {
    /// Create a log with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Record a reading, evicting the oldest entry when full.
    pub async fn push(&self, entry: StoredReading) {
        let mut entries = self.entries.write().await;
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// The most recent reading, if any.
    pub async fn latest(&self) -> Option<StoredReading> {
        self.entries.read().await.front().cloned()
    }

    /// Up to `limit` most recent readings, latest first.
    pub async fn recent(&self, limit: usize) -> Vec<StoredReading> {
        self.entries
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of stored readings.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for ReadingLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Latest-first bounded log of advisory sessions.
pub struct SessionLog {
    capacity: usize,
    entries: RwLock<VecDeque<SoilSession>>,
}

impl SessionLog {
    /// Create a log with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Record a session, evicting the oldest entry when full.
    pub async fn push(&self, session: SoilSession) {
        let mut entries = self.entries.write().await;
        entries.push_front(session);
        entries.truncate(self.capacity);
    }

    /// The most recent session, if any.
    pub async fn latest(&self) -> Option<SoilSession> {
        self.entries.read().await.front().cloned()
    }

    /// Up to `limit` most recent sessions, latest first.
    pub async fn recent(&self, limit: usize) -> Vec<SoilSession> {
        self.entries
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
