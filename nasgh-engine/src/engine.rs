//! NasghEngine - the assembled advisory pipeline.
//!
//! Wires the resolver, classifier, advisor, and history logs into the full
//! flow: a reading plus plant and stage resolve to target ranges, the
//! ranges classify the reading, and the classification grounds the advisory
//! text. Every completed evaluation is recorded as a session.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use agronomy::{classify_reading, GrowthStage, Provenance, RangeRecord, Reading, StatusEntry};
use nasgh_agent::{FallbackRouter, InferenceBackend, Message};

use crate::advisor::{AdvisoryContext, AdvisoryParams, AdvisoryService};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::generator::{GenerationParams, RangeGenerator};
use crate::history::{ReadingLog, SessionLog, SoilSession, StoredReading};
use crate::resolver::{RangeResolver, Resolution};
use crate::store::RangeStore;

/// Result of one full evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Id of the recorded session
    pub session_id: String,
    /// Normalized plant key
    pub plant_key: String,
    /// Which tier produced the targets
    pub provenance: Provenance,
    /// The resolved target ranges
    pub targets: RangeRecord,
    /// Per-parameter classification
    pub statuses: Vec<StatusEntry>,
    /// The advisory text
    pub advice: String,
}

/// The assembled advisory engine.
pub struct NasghEngine {
    resolver: RangeResolver,
    advisor: AdvisoryService,
    readings: ReadingLog,
    sessions: SessionLog,
    config: EngineConfig,
}

impl NasghEngine {
    /// Assemble an engine from config, a cache store, and backend lists.
    ///
    /// Backend order is priority order; the caller decides which concrete
    /// backends implement the model ids named in the config.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn RangeStore>,
        generation_backends: Vec<Arc<dyn InferenceBackend>>,
        advisory_backends: Vec<Arc<dyn InferenceBackend>>,
    ) -> Self {
        let generation_router = FallbackRouter::new(generation_backends)
            .with_attempt_timeout(Duration::from_secs(config.generation.attempt_timeout_secs));
        let generator = RangeGenerator::new(generation_router).with_params(GenerationParams {
            max_tokens: config.generation.max_tokens,
            temperature: config.generation.temperature,
        });

        let advisory_router = FallbackRouter::new(advisory_backends)
            .with_attempt_timeout(Duration::from_secs(config.advisory.attempt_timeout_secs));
        let advisor = AdvisoryService::new(advisory_router).with_params(AdvisoryParams {
            advice_max_tokens: config.advisory.advice_max_tokens,
            chat_max_tokens: config.advisory.chat_max_tokens,
            temperature: config.advisory.temperature,
        });

        Self {
            resolver: RangeResolver::new(store, generator),
            advisor,
            readings: ReadingLog::new(config.history.reading_capacity),
            sessions: SessionLog::new(config.history.session_capacity),
            config,
        }
    }

    /// Record a probe reading.
    ///
    /// A reading must carry at least one finite value to be accepted.
    pub async fn ingest_reading(
        &self,
        reading: Reading,
        plant_name: Option<String>,
        stage: Option<GrowthStage>,
    ) -> Result<(), EngineError> {
        if !reading.iter().any(|(_, v)| v.is_finite()) {
            return Err(EngineError::InvalidArgument(
                "reading has no finite values".to_string(),
            ));
        }

        self.readings
            .push(StoredReading {
                received_at: chrono::Utc::now(),
                reading,
                plant_name,
                stage,
            })
            .await;
        Ok(())
    }

    /// The most recent probe reading.
    pub async fn latest_reading(&self) -> Option<StoredReading> {
        self.readings.latest().await
    }

    /// Up to `limit` most recent readings, latest first.
    pub async fn recent_readings(&self, limit: usize) -> Vec<StoredReading> {
        self.readings.recent(limit).await
    }

    /// Up to `limit` most recent advisory sessions, latest first.
    pub async fn recent_sessions(&self, limit: usize) -> Vec<SoilSession> {
        self.sessions.recent(limit).await
    }

    /// Resolve target ranges without running the full pipeline.
    pub async fn resolve_targets(
        &self,
        raw_plant: &str,
        stage: GrowthStage,
        snapshot: Option<&Reading>,
    ) -> Result<Resolution, EngineError> {
        self.resolver.resolve(raw_plant, stage, snapshot).await
    }

    /// Run the full pipeline for one reading and record the session.
    pub async fn evaluate(
        &self,
        reading: Reading,
        plant_name: &str,
        stage: GrowthStage,
    ) -> Result<Evaluation, EngineError> {
        if !reading.iter().any(|(_, v)| v.is_finite()) {
            return Err(EngineError::InvalidArgument(
                "reading has no finite values".to_string(),
            ));
        }

        let resolution = self
            .resolver
            .resolve(plant_name, stage, Some(&reading))
            .await?;
        debug!(
            plant_key = %resolution.plant_key,
            provenance = resolution.provenance.as_str(),
            "targets resolved"
        );

        let statuses = classify_reading(&reading, &resolution.record);

        let context = AdvisoryContext {
            plant_name: Some(plant_name.to_string()),
            stage: Some(stage),
            language: self.config.advisory.language,
        };
        let advice = self.advisor.advise(&reading, &statuses, &context).await?;

        let mut session = SoilSession::new(reading);
        session.plant_name = Some(plant_name.to_string());
        session.stage = Some(stage);
        session.targets = Some(resolution.record.clone());
        session.status_summary = statuses.clone();
        session.advice = advice.clone();
        let session_id = session.id.clone();
        self.sessions.push(session).await;

        info!(
            session_id = %session_id,
            plant_key = %resolution.plant_key,
            classified = statuses.len(),
            "evaluation complete"
        );

        Ok(Evaluation {
            session_id,
            plant_key: resolution.plant_key,
            provenance: resolution.provenance,
            targets: resolution.record,
            statuses,
            advice,
        })
    }

    /// Answer a follow-up chat message with the latest soil context.
    pub async fn chat(&self, message: &str, history: &[Message]) -> Result<String, EngineError> {
        let latest = self.readings.latest().await;
        let last_advice = self.sessions.latest().await.map(|s| s.advice);

        self.advisor
            .chat(
                message,
                history,
                latest.as_ref().map(|r| &r.reading),
                last_advice.as_deref(),
                self.config.advisory.language,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRangeStore;
    use agronomy::{NutrientStatus, ParameterKey};
    use nasgh_agent::MockBackend;

    const GENERATED_REPLY: &str =
        r#"{"ph": {"min": 5.5, "max": 6.8}, "moisture": {"min": 60, "max": 75}}"#;

    fn engine(generation: MockBackend, advisory: MockBackend) -> NasghEngine {
        NasghEngine::new(
            EngineConfig::default(),
            Arc::new(MemoryRangeStore::new()),
            vec![Arc::new(generation)],
            vec![Arc::new(advisory)],
        )
    }

    fn sample_reading() -> Reading {
        Reading::new()
            .with(ParameterKey::Moisture, 40.0)
            .with(ParameterKey::Ph, 6.8)
            .with(ParameterKey::Nitrogen, 140.0)
    }

    #[tokio::test]
    async fn test_evaluate_known_plant_uses_static_tier() {
        let engine = engine(
            MockBackend::new("generation"),
            MockBackend::new("advisory").with_reply("increase irrigation slightly"),
        );

        let evaluation = engine
            .evaluate(sample_reading(), "طماطم", GrowthStage::Vegetative)
            .await
            .unwrap();

        assert_eq!(evaluation.plant_key, "tomato");
        assert_eq!(evaluation.provenance, Provenance::Static);
        assert_eq!(evaluation.advice, "increase irrigation slightly");

        let moisture = evaluation
            .statuses
            .iter()
            .find(|e| e.parameter == ParameterKey::Moisture)
            .unwrap();
        assert_eq!(moisture.status, NutrientStatus::Deficient);

        let sessions = engine.recent_sessions(10).await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, evaluation.session_id);
        assert_eq!(sessions[0].advice, evaluation.advice);
    }

    #[tokio::test]
    async fn test_evaluate_unknown_plant_generates() {
        let engine = engine(
            MockBackend::new("generation").with_reply(GENERATED_REPLY),
            MockBackend::new("advisory").with_reply("looks healthy"),
        );

        let evaluation = engine
            .evaluate(sample_reading(), "dragonfruit", GrowthStage::Flowering)
            .await
            .unwrap();

        assert_eq!(evaluation.provenance, Provenance::Generated);
        assert!(evaluation.targets.is_well_formed());
        // Nitrogen has no generated target, so it must be excluded
        assert!(!evaluation
            .statuses
            .iter()
            .any(|e| e.parameter == ParameterKey::Nitrogen));
    }

    #[tokio::test]
    async fn test_evaluate_rejects_unusable_reading() {
        let engine = engine(MockBackend::new("g"), MockBackend::new("a"));
        let reading = Reading::new().with(ParameterKey::Ph, f64::NAN);

        let err = engine
            .evaluate(reading, "tomato", GrowthStage::Harvest)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_ingest_and_chat_share_context() {
        let engine = engine(
            MockBackend::new("g"),
            MockBackend::new("a").with_reply("yes, water in the evening"),
        );

        engine
            .ingest_reading(sample_reading(), Some("tomato".to_string()), None)
            .await
            .unwrap();
        assert!(engine.latest_reading().await.is_some());

        let reply = engine
            .chat("should I water at night?", &[])
            .await
            .unwrap();
        assert_eq!(reply, "yes, water in the evening");
    }

    #[tokio::test]
    async fn test_reading_log_is_bounded() {
        let mut config = EngineConfig::default();
        config.history.reading_capacity = 2;

        let engine = NasghEngine::new(
            config,
            Arc::new(MemoryRangeStore::new()),
            vec![Arc::new(MockBackend::new("g"))],
            vec![Arc::new(MockBackend::new("a"))],
        );

        for i in 0..4 {
            engine
                .ingest_reading(
                    Reading::new().with(ParameterKey::Moisture, i as f64),
                    None,
                    None,
                )
                .await
                .unwrap();
        }

        assert_eq!(engine.recent_readings(10).await.len(), 2);
    }
}
