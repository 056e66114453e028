//! OpenAI-compatible chat completions backend.
//!
//! Works with any endpoint speaking the chat completions wire format,
//! which in this deployment means DeepSeek for the chat assistant, and
//! doubles as an escape hatch for OpenAI, vLLM, or Ollama.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::*;

/// OpenAI-compatible backend.
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiBackend {
    /// Create a new OpenAI-compatible backend.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        }
    }

    /// Create a backend for the DeepSeek API.
    pub fn deepseek(model: &str, api_key: impl Into<String>) -> Self {
        Self::new("https://api.deepseek.com", model, Some(api_key.into()))
    }

    /// Create a backend for the OpenAI API.
    pub fn openai(model: &str, api_key: impl Into<String>) -> Self {
        Self::new("https://api.openai.com/v1", model, Some(api_key.into()))
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key.as_ref().map(|k| format!("Bearer {}", k))
    }
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Chat completion response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[async_trait]
impl InferenceBackend for OpenAiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        // Hosted endpoints need a key; self-hosted ones (vLLM, Ollama) don't
        self.api_key.as_deref().map_or(true, |k| !k.is_empty())
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        let mut messages: Vec<ChatMessage> = Vec::new();

        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(ChatMessage {
                role: match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        let chat_request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_only.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let mut http_request = self.client.post(self.chat_completions_url());
        if let Some(auth) = self.auth_header() {
            http_request = http_request.header(header::AUTHORIZATION, auth);
        }

        let response = http_request
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(BackendError::RateLimited { retry_after_ms: None });
            }

            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or(text);

            return Err(BackendError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        Ok(CompletionResponse::new(content))
    }
}
