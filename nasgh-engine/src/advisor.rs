//! Farmer-facing advisory and chat replies.
//!
//! Both operations build a prompt from domain data and fetch one reply
//! through the fallback router. The advisory is grounded in the status
//! table computed by classification; the chat carries bounded conversation
//! history plus the latest soil context.

use tracing::debug;

use agronomy::{AdviceLanguage, GrowthStage, PromptAssembler, Reading, StatusEntry};
use nasgh_agent::{CompletionRequest, FallbackRouter, Message};

use crate::error::EngineError;

/// How many history turns a chat request may carry.
const MAX_CHAT_HISTORY: usize = 20;

/// Plant context attached to an advisory request.
#[derive(Debug, Clone, Default)]
pub struct AdvisoryContext {
    /// Plant display name, as the farmer wrote it
    pub plant_name: Option<String>,
    /// Current growth stage
    pub stage: Option<GrowthStage>,
    /// Response language
    pub language: AdviceLanguage,
}

/// Request parameters for advisory calls.
#[derive(Debug, Clone)]
pub struct AdvisoryParams {
    /// Maximum tokens for an advisory reply
    pub advice_max_tokens: u32,
    /// Maximum tokens for a chat reply
    pub chat_max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for AdvisoryParams {
    fn default() -> Self {
        Self {
            advice_max_tokens: 800,
            chat_max_tokens: 500,
            temperature: 0.6,
        }
    }
}

/// Produces advisory and chat text through the fallback router.
pub struct AdvisoryService {
    router: FallbackRouter,
    params: AdvisoryParams,
}

impl AdvisoryService {
    /// Create a service over the given router.
    pub fn new(router: FallbackRouter) -> Self {
        Self {
            router,
            params: AdvisoryParams::default(),
        }
    }

    /// Override the request parameters.
    pub fn with_params(mut self, params: AdvisoryParams) -> Self {
        self.params = params;
        self
    }

    /// Produce an advisory for a reading and its classification summary.
    ///
    /// The status entries are the source of truth; the backends only word
    /// the guidance around them.
    pub async fn advise(
        &self,
        reading: &Reading,
        statuses: &[StatusEntry],
        context: &AdvisoryContext,
    ) -> Result<String, EngineError> {
        if reading.is_empty() {
            return Err(EngineError::InvalidArgument(
                "reading has no measured values".to_string(),
            ));
        }

        let prompt = PromptAssembler::build_advice_prompt(
            reading,
            statuses,
            context.plant_name.as_deref(),
            context.stage,
            context.language,
        );
        let request = CompletionRequest::user(prompt)
            .with_max_tokens(self.params.advice_max_tokens)
            .with_temperature(self.params.temperature);

        let text = self.router.complete(&request).await?;
        debug!(classified = statuses.len(), "advisory reply received");
        Ok(clean_reply(&text))
    }

    /// Answer a follow-up chat message.
    ///
    /// History beyond [`MAX_CHAT_HISTORY`] turns is truncated from the
    /// front, keeping the most recent exchange intact.
    pub async fn chat(
        &self,
        message: &str,
        history: &[Message],
        soil: Option<&Reading>,
        last_advice: Option<&str>,
        language: AdviceLanguage,
    ) -> Result<String, EngineError> {
        if message.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "chat message is empty".to_string(),
            ));
        }

        let system = PromptAssembler::build_chat_system_prompt(soil, last_advice, language);
        let mut request = CompletionRequest::default()
            .with_system(system)
            .with_max_tokens(self.params.chat_max_tokens)
            .with_temperature(self.params.temperature);

        let skip = history.len().saturating_sub(MAX_CHAT_HISTORY);
        for turn in history.iter().skip(skip) {
            if turn.content.trim().is_empty() {
                continue;
            }
            request = request.with_message(turn.clone());
        }
        request = request.with_message(Message::user(message));

        let text = self.router.complete(&request).await?;
        Ok(clean_reply(&text))
    }
}

/// Unescape literal `\n` sequences some backends emit and trim the edges.
fn clean_reply(text: &str) -> String {
    text.replace("\\n", "\n").trim().to_string()
}
