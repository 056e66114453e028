//! Error taxonomy for the advisory engine.
//!
//! Tier-local misses and individual backend failures never reach callers;
//! they are absorbed by the resolver and the fallback loop. What remains
//! here is the terminal surface: bad input, failed range generation, and
//! advisory exhaustion. Cache persistence failures are logged where they
//! happen and never become errors.

use crate::generator::GenerationError;
use nasgh_agent::FallbackError;

/// Terminal errors surfaced to the embedding layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed or missing required input (empty plant name, empty
    /// message, reading without a single finite value)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Range generation produced no usable record; terminal for resolve,
    /// never silently replaced by an empty record
    #[error("could not determine target ranges: {0}")]
    Generation(#[from] GenerationError),

    /// The advisory call exhausted every configured backend
    #[error("advisory call failed: {0}")]
    Advisory(#[from] FallbackError),
}

impl EngineError {
    /// Whether the underlying failure was quota exhaustion on the last
    /// backend tried.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::InvalidArgument(_) => false,
            Self::Generation(e) => e.is_rate_limited(),
            Self::Advisory(e) => e.is_rate_limited(),
        }
    }

    /// Short farmer-facing message. Operator detail stays in the error
    /// chain and the logs; raw backend text is never shown to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "the request is missing required data",
            Self::Generation(_) => "could not determine target ranges for this plant and stage",
            Self::Advisory(_) if self.is_rate_limited() => {
                "the advisory service is temporarily degraded, try again shortly"
            }
            Self::Advisory(_) => "the advisory service is temporarily unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nasgh_agent::BackendError;

    #[test]
    fn test_rate_limited_advisory_gets_degraded_message() {
        let err = EngineError::Advisory(FallbackError::AllBackendsFailed {
            attempts: 3,
            last: BackendError::RateLimited { retry_after_ms: None },
        });
        assert!(err.is_rate_limited());
        assert!(err.user_message().contains("degraded"));
    }

    #[test]
    fn test_generic_advisory_failure_message() {
        let err = EngineError::Advisory(FallbackError::AllBackendsFailed {
            attempts: 3,
            last: BackendError::Transport("down".to_string()),
        });
        assert!(!err.is_rate_limited());
        assert!(err.user_message().contains("unavailable"));
    }

    #[test]
    fn test_generation_failure_message() {
        let err = EngineError::Generation(GenerationError::NoUsableTargets);
        assert!(err.user_message().contains("target ranges"));
    }
}
