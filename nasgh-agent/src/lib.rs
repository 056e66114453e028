//! Nasgh Agent - inference backend plumbing.
//!
//! Provides everything the advisory engine needs to talk to hosted
//! language-model backends:
//!
//! - Trait-based backends (Gemini, OpenAI-compatible, mock)
//! - A multi-provider fallback router with per-attempt timeouts
//! - Balanced-JSON extraction from free-text model replies
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │           FallbackRouter             │
//! │  (ordered backends, first usable     │
//! │   non-empty reply wins)              │
//! └───────┬──────────┬──────────┬────────┘
//!         ▼          ▼          ▼
//!   ┌──────────┐ ┌─────────┐ ┌────────┐
//!   │  Gemini  │ │ OpenAI- │ │  Mock  │
//!   │ backend  │ │ compat  │ │        │
//!   └──────────┘ └─────────┘ └────────┘
//! ```

pub mod backend;
pub mod extract;
pub mod fallback;

// Re-export main types for convenience
pub use backend::traits::{
    BackendError, CompletionRequest, CompletionResponse, InferenceBackend, Message, MessageRole,
};
pub use backend::{GeminiBackend, MockBackend, OpenAiBackend};
pub use extract::extract_json_object;
pub use fallback::{FallbackError, FallbackRouter};
