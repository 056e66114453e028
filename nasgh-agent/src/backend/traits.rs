//! Core traits for inference backends.
//!
//! This module defines the `InferenceBackend` trait - the abstraction over
//! the hosted model endpoints the advisory engine can call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error types for backend calls.
///
/// Every failure is classified so the fallback loop can log it precisely
/// and callers can distinguish quota exhaustion from ordinary failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// Backend is not reachable or not configured
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Connection, DNS, TLS, or timeout failure before an HTTP status
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with an error status
    #[error("backend error (HTTP {code}): {message}")]
    Api { code: u16, message: String },

    /// Quota or rate limit exhausted
    #[error("rate limited by backend")]
    RateLimited { retry_after_ms: Option<u64> },

    /// The call succeeded but carried no usable text
    #[error("empty response text")]
    EmptyResponse,

    /// The response body could not be decoded
    #[error("response parse error: {0}")]
    Parse(String),
}

impl BackendError {
    /// Whether this failure is a quota or rate-limit condition.
    ///
    /// Callers use this to show a "service temporarily degraded" message
    /// instead of a generic failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Core trait for inference backends.
///
/// Implementations issue exactly one request per `complete` call; retrying
/// across backends is the fallback router's job, never the backend's.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Backend identifier (the model id, e.g. `gemini-2.0-flash`).
    fn id(&self) -> &str;

    /// Cheap availability probe; `false` only when the backend is known
    /// to be unusable (e.g. missing credentials).
    async fn is_available(&self) -> bool;

    /// Issue one completion request.
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, BackendError>;
}

/// Request for a text completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System prompt (optional)
    pub system_prompt: Option<String>,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0-2.0)
    pub temperature: Option<f32>,
    /// Ask the backend for a JSON-only reply where it supports that mode
    pub json_only: bool,
}

impl CompletionRequest {
    /// Create a request with a single user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(content)],
            ..Default::default()
        }
    }

    /// Add a system prompt.
    pub fn with_system(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Add a message.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set temperature, clamped to the valid band.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp.clamp(0.0, 2.0));
        self
    }

    /// Request JSON output.
    pub fn with_json_output(mut self) -> Self {
        self.json_only = true;
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Response from a completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,
}

impl CompletionResponse {
    /// Create a response from raw text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Whether the response carries no usable text.
    pub fn is_empty_text(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::user("hello")
            .with_system("be brief")
            .with_max_tokens(256)
            .with_temperature(0.6)
            .with_json_output();

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(request.max_tokens, Some(256));
        assert!(request.json_only);
    }

    #[test]
    fn test_temperature_is_clamped() {
        let request = CompletionRequest::user("hi").with_temperature(9.0);
        assert_eq!(request.temperature, Some(2.0));
    }

    #[test]
    fn test_empty_text_detection() {
        assert!(CompletionResponse::new("  \n ").is_empty_text());
        assert!(!CompletionResponse::new("ok").is_empty_text());
    }

    #[test]
    fn test_rate_limit_classification() {
        let err = BackendError::RateLimited { retry_after_ms: None };
        assert!(err.is_rate_limited());
        let err = BackendError::Api {
            code: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_rate_limited());
    }
}
