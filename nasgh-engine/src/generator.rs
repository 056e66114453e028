//! Live range generation through the inference backends.
//!
//! Builds one strict-schema prompt, gets one reply text via the fallback
//! router, and turns it into a validated `RangeRecord`. The generator holds
//! no state and never retries on its own: backend iteration belongs to the
//! router, and a reply that parses to nothing usable is a terminal failure
//! for this call.

use tracing::{debug, warn};

use agronomy::{GrowthStage, ParameterKey, PromptAssembler, Range, RangeRecord, Reading};
use nasgh_agent::{extract_json_object, CompletionRequest, FallbackError, FallbackRouter};

/// Error from one generation call.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Every backend failed before any reply text came back
    #[error(transparent)]
    Backends(#[from] FallbackError),

    /// The reply contained no balanced JSON object
    #[error("no JSON object in backend reply")]
    NoJson,

    /// The extracted span was not valid JSON
    #[error("backend reply is not valid JSON: {0}")]
    Malformed(String),

    /// JSON parsed but zero parameters survived validation
    #[error("no usable targets")]
    NoUsableTargets,
}

impl GenerationError {
    /// Whether the failure traces back to quota exhaustion.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Backends(e) if e.is_rate_limited())
    }
}

/// Request parameters for generation calls.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Maximum tokens for the reply
    pub max_tokens: u32,
    /// Sampling temperature; low, the output is a table of numbers
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// Generates target ranges for plants outside the static table.
pub struct RangeGenerator {
    router: FallbackRouter,
    params: GenerationParams,
}

impl RangeGenerator {
    /// Create a generator over the given router.
    pub fn new(router: FallbackRouter) -> Self {
        Self {
            router,
            params: GenerationParams::default(),
        }
    }

    /// Override the request parameters.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Generate a validated range record for one plant and stage.
    ///
    /// `plant_display` is the farmer's own wording (any script), which gives
    /// the model more signal than the normalized slug. The optional reading
    /// snapshot is context only and never constrains validation.
    pub async fn generate(
        &self,
        plant_display: &str,
        stage: GrowthStage,
        snapshot: Option<&Reading>,
    ) -> Result<RangeRecord, GenerationError> {
        let prompt = PromptAssembler::build_range_prompt(plant_display, stage, snapshot);
        let request = CompletionRequest::user(prompt)
            .with_max_tokens(self.params.max_tokens)
            .with_temperature(self.params.temperature)
            .with_json_output();

        let text = self.router.complete(&request).await?;
        debug!(plant = plant_display, %stage, "parsing generated targets");

        parse_range_record(&text)
    }
}

/// Parse a reply text into a validated record.
///
/// Invalid parameters (unknown names, non-numeric bounds, inverted or
/// degenerate ranges) are dropped one by one; only a record with zero
/// surviving parameters fails the call.
pub(crate) fn parse_range_record(text: &str) -> Result<RangeRecord, GenerationError> {
    let span = extract_json_object(text).ok_or(GenerationError::NoJson)?;
    let value: serde_json::Value =
        serde_json::from_str(span).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| GenerationError::Malformed("top level is not an object".to_string()))?;

    // Some backends honor the schema exactly, others wrap it in "targets"
    let targets = object
        .get("targets")
        .and_then(serde_json::Value::as_object)
        .unwrap_or(object);

    let mut record = RangeRecord::new();
    for (name, entry) in targets {
        let Some(parameter) = ParameterKey::from_wire(name) else {
            debug!(name = %name, "dropping unknown parameter");
            continue;
        };

        let min = entry.get("min").and_then(serde_json::Value::as_f64);
        let max = entry.get("max").and_then(serde_json::Value::as_f64);
        let (Some(min), Some(max)) = (min, max) else {
            warn!(%parameter, "dropping target without numeric bounds");
            continue;
        };

        let range = Range::new(min, max);
        if !range.is_valid() {
            warn!(%parameter, min, max, "dropping target with invalid bounds");
            continue;
        }

        record.set(parameter, range);
    }

    if record.is_empty() {
        return Err(GenerationError::NoUsableTargets);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nasgh_agent::{BackendError, InferenceBackend, MockBackend};
    use std::sync::Arc;

    fn generator(backend: MockBackend) -> RangeGenerator {
        let backends: Vec<Arc<dyn InferenceBackend>> = vec![Arc::new(backend)];
        RangeGenerator::new(FallbackRouter::new(backends))
    }

    #[tokio::test]
    async fn test_generates_from_clean_json() {
        let reply = r#"{"ph": {"min": 6.0, "max": 7.5}, "moisture": {"min": 55, "max": 65}}"#;
        let generator = generator(MockBackend::default().with_reply(reply));

        let record = generator
            .generate("Dragonfruit", GrowthStage::Flowering, None)
            .await
            .unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(ParameterKey::Ph), Some(Range::new(6.0, 7.5)));
    }

    #[tokio::test]
    async fn test_tolerates_fences_and_targets_wrapper() {
        let reply = "```json\n{\"targets\": {\"n\": {\"min\": 100, \"max\": 160}}}\n```";
        let generator = generator(MockBackend::default().with_reply(reply));

        let record = generator
            .generate("okra", GrowthStage::Harvest, None)
            .await
            .unwrap();
        assert_eq!(
            record.get(ParameterKey::Nitrogen),
            Some(Range::new(100.0, 160.0))
        );
    }

    #[tokio::test]
    async fn test_invalid_parameters_are_dropped_not_fatal() {
        let reply = r#"{
            "ph": {"min": 6.0, "max": 7.5},
            "n": {"min": 50, "max": 10},
            "k": {"min": "low", "max": 300},
            "banana": {"min": 1, "max": 2}
        }"#;
        let generator = generator(MockBackend::default().with_reply(reply));

        let record = generator
            .generate("okra", GrowthStage::Harvest, None)
            .await
            .unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get(ParameterKey::Ph), Some(Range::new(6.0, 7.5)));
        assert_eq!(record.get(ParameterKey::Nitrogen), None);
    }

    #[tokio::test]
    async fn test_zero_usable_parameters_fails() {
        // max < min on the only parameter, as a backend sometimes produces
        let reply = r#"{"n": {"min": 50, "max": 10}}"#;
        let generator = generator(MockBackend::default().with_reply(reply));

        let err = generator
            .generate("Dragonfruit", GrowthStage::Flowering, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoUsableTargets));
    }

    #[tokio::test]
    async fn test_prose_only_reply_fails() {
        let generator = generator(MockBackend::default().with_reply("I cannot help with that."));
        let err = generator
            .generate("okra", GrowthStage::Harvest, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoJson));
    }

    #[tokio::test]
    async fn test_backend_exhaustion_propagates() {
        let backend = MockBackend::default()
            .then_fail(BackendError::RateLimited { retry_after_ms: None });
        let generator = generator(backend);

        // Single backend in the router, scripted to fail once
        let err = generator
            .generate("okra", GrowthStage::Harvest, None)
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_parse_accepts_flat_and_wrapped_equally() {
        let flat = parse_range_record(r#"{"ph": {"min": 6, "max": 7}}"#).unwrap();
        let wrapped = parse_range_record(r#"{"targets": {"ph": {"min": 6, "max": 7}}}"#).unwrap();
        assert_eq!(flat, wrapped);
    }
}
