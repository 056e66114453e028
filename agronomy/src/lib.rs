//! Soil parameter model and plant knowledge for the Nasgh advisory core.
//!
//! This crate holds the domain layer shared by the rest of the workspace:
//!
//! - [`ParameterKey`] and friends: the closed set of tracked soil parameters,
//!   target ranges, readings, and growth stages
//! - [`normalize`]: free-text plant names (any script) to stable slug keys
//! - [`table`]: the compile-time table of target ranges for known plants
//! - [`classify`]: per-parameter status of a reading against its target range
//! - [`PromptAssembler`]: prompt text for range generation, advice, and chat
//!
//! Everything here is pure and synchronous; network calls and persistence
//! live in the `nasgh-agent` and `nasgh-engine` crates.

pub mod classify;
pub mod normalize;
pub mod prompt;
pub mod table;
pub mod types;

// Re-export main types
pub use classify::{classify, classify_reading};
pub use normalize::{normalize, NormalizeError};
pub use prompt::{AdviceLanguage, PromptAssembler};
pub use types::*;
