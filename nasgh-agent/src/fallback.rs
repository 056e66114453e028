//! Multi-provider fallback across ranked inference backends.
//!
//! Callers hand the router an ordered backend list (most capable first) and
//! one request; the router walks the list until a backend returns usable
//! non-empty text. Transport failures, backend-reported errors, and empty
//! replies all just advance the loop; only full exhaustion surfaces as an
//! error, carrying the most recent failure for diagnostics.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::backend::traits::{BackendError, CompletionRequest, InferenceBackend};

/// Default per-attempt timeout. Applied to each backend attempt separately,
/// never to the whole sequence, so one hung backend cannot stall the request
/// past its own slot.
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error from a fallback call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FallbackError {
    /// The router was built with an empty backend list
    #[error("no inference backends configured")]
    NoBackends,

    /// Every backend in the list failed or returned nothing usable
    #[error("all {attempts} backend attempts failed; last error: {last}")]
    AllBackendsFailed {
        /// How many attempts were made
        attempts: usize,
        /// The most recent failure
        last: BackendError,
    },
}

impl FallbackError {
    /// Whether the terminal failure was a quota or rate-limit condition,
    /// so callers can report "temporarily degraded" instead of a generic
    /// failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::AllBackendsFailed { last, .. } if last.is_rate_limited()
        )
    }
}

/// Walks an ordered backend list until one produces usable text.
pub struct FallbackRouter {
    backends: Vec<Arc<dyn InferenceBackend>>,
    attempt_timeout: Duration,
}

impl FallbackRouter {
    /// Create a router over backends in priority order.
    pub fn new(backends: Vec<Arc<dyn InferenceBackend>>) -> Self {
        Self {
            backends,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Set the per-attempt timeout.
    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Backend ids in the order they will be tried.
    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    /// Try each backend in order and return the first non-empty reply text.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, FallbackError> {
        if self.backends.is_empty() {
            return Err(FallbackError::NoBackends);
        }

        let mut attempts = 0usize;
        let mut last_error = BackendError::Unavailable("no attempt made".to_string());

        for backend in &self.backends {
            attempts += 1;
            debug!(backend = backend.id(), attempt = attempts, "trying backend");

            let outcome = timeout(self.attempt_timeout, backend.complete(request)).await;

            let error = match outcome {
                Err(_) => BackendError::Transport(format!(
                    "attempt timed out after {:?}",
                    self.attempt_timeout
                )),
                Ok(Err(error)) => error,
                Ok(Ok(response)) if response.is_empty_text() => BackendError::EmptyResponse,
                Ok(Ok(response)) => {
                    info!(
                        backend = backend.id(),
                        attempts, "backend produced usable reply"
                    );
                    return Ok(response.content);
                }
            };

            warn!(backend = backend.id(), %error, "backend attempt failed, advancing");
            last_error = error;
        }

        Err(FallbackError::AllBackendsFailed {
            attempts,
            last: last_error,
        })
    }
}
