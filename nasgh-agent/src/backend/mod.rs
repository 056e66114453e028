//! Inference backend implementations.
//!
//! - Gemini (Google generative language API)
//! - OpenAI-compatible chat completions (DeepSeek, OpenAI, vLLM, Ollama)
//! - Mock backend for testing

pub mod gemini;
pub mod mock;
pub mod openai;
pub mod traits;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai::OpenAiBackend;
pub use traits::{BackendError, CompletionRequest, CompletionResponse, InferenceBackend};
