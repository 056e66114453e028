//! Mock inference backend for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::traits::*;

/// One scripted call outcome.
#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Fail(BackendError),
    /// Sleep before replying, to exercise per-attempt timeouts
    Stall(Duration, String),
}

/// Mock backend with scriptable outcomes.
///
/// Outcomes queued with `then_*` are consumed one per `complete` call; once
/// the queue is drained every further call returns the default reply.
pub struct MockBackend {
    model_id: String,
    default_reply: String,
    script: Mutex<VecDeque<Outcome>>,
    call_count: AtomicU32,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            default_reply: "mock reply".to_string(),
            script: Mutex::new(VecDeque::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the default reply used once the script is drained.
    pub fn with_reply(mut self, content: impl Into<String>) -> Self {
        self.default_reply = content.into();
        self
    }

    /// Queue a successful reply.
    pub fn then_reply(self, content: impl Into<String>) -> Self {
        self.push(Outcome::Reply(content.into()));
        self
    }

    /// Queue a failure.
    pub fn then_fail(self, error: BackendError) -> Self {
        self.push(Outcome::Fail(error));
        self
    }

    /// Queue a reply that arrives only after a delay.
    pub fn then_stall(self, delay: Duration, content: impl Into<String>) -> Self {
        self.push(Outcome::Stall(delay, content.into()));
        self
    }

    /// Number of `complete` calls so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn push(&self, outcome: Outcome) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    fn next_outcome(&self) -> Outcome {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Outcome::Reply(self.default_reply.clone()))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    fn id(&self) -> &str {
        &self.model_id
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.next_outcome() {
            Outcome::Reply(content) => Ok(CompletionResponse::new(content)),
            Outcome::Fail(error) => Err(error),
            Outcome::Stall(delay, content) => {
                tokio::time::sleep(delay).await;
                Ok(CompletionResponse::new(content))
            }
        }
    }
}
