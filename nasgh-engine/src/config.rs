//! Configuration for the advisory engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use agronomy::AdviceLanguage;

/// Configuration for a [`crate::NasghEngine`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Range generation settings
    pub generation: GenerationSection,
    /// Advisory and chat settings
    pub advisory: AdvisorySection,
    /// Range cache settings
    pub cache: CacheSection,
    /// History log settings
    pub history: HistorySection,
}

impl EngineConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Range generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Ranked model ids for generation calls, most capable first
    pub models: Vec<String>,
    /// Per-attempt timeout (seconds)
    pub attempt_timeout_secs: u64,
    /// Maximum tokens per reply
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            models: vec![
                "gemini-2.0-pro".to_string(),
                "gemini-2.0-flash".to_string(),
                "gemini-2.0-flash-lite".to_string(),
            ],
            attempt_timeout_secs: 10,
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// Advisory and chat settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorySection {
    /// Ranked model ids for advisory and chat calls
    pub models: Vec<String>,
    /// Per-attempt timeout (seconds)
    pub attempt_timeout_secs: u64,
    /// Maximum tokens for an advisory reply
    pub advice_max_tokens: u32,
    /// Maximum tokens for a chat reply
    pub chat_max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Response language for farmer-facing text
    pub language: AdviceLanguage,
}

impl Default for AdvisorySection {
    fn default() -> Self {
        Self {
            models: vec!["gemini-1.5-flash".to_string(), "deepseek-chat".to_string()],
            attempt_timeout_secs: 10,
            advice_max_tokens: 800,
            chat_max_tokens: 500,
            temperature: 0.6,
            language: AdviceLanguage::Arabic,
        }
    }
}

/// Range cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSection {
    /// Path of the sled database; `None` selects the in-memory store
    pub path: Option<PathBuf>,
}

/// History log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySection {
    /// Capacity of the reading log
    pub reading_capacity: usize,
    /// Capacity of the session log
    pub session_capacity: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            reading_capacity: crate::history::DEFAULT_CAPACITY,
            session_capacity: crate::history::DEFAULT_CAPACITY,
        }
    }
}
