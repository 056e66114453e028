//! Nasgh Engine - ideal-range resolution and advisory orchestration.
//!
//! Ties the domain layer (`agronomy`) and the backend plumbing
//! (`nasgh-agent`) into the full advisory flow:
//!
//! - **Resolver**: static table, then durable cache, then live generation
//! - **Generator**: strict-schema range generation through the fallback router
//! - **Store**: durable key/value cache of generated range records
//! - **Advisor**: farmer-facing advisory and chat replies
//! - **History**: bounded reading and session logs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      NasghEngine                        │
//! │                                                         │
//! │  reading ──► RangeResolver ──► classify ──► Advisor ──► advice
//! │                   │                                     │
//! │      ┌────────────┼────────────┐                        │
//! │      ▼            ▼            ▼                        │
//! │  static table  RangeStore  RangeGenerator               │
//! │                (sled/mem)  (FallbackRouter)             │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod advisor;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod history;
pub mod resolver;
pub mod store;

// Re-export main types
pub use advisor::{AdvisoryContext, AdvisoryService};
pub use config::EngineConfig;
pub use engine::{Evaluation, NasghEngine};
pub use error::EngineError;
pub use generator::{GenerationError, RangeGenerator};
pub use history::{ReadingLog, SessionLog, SoilSession, StoredReading};
pub use resolver::{RangeResolver, Resolution};
pub use store::{CacheEntry, MemoryRangeStore, RangeStore, SledRangeStore, StoreError};
