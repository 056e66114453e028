//! Gemini backend (Google generative language API).
//!
//! Speaks the `generateContent` endpoint. One `GeminiBackend` instance is
//! pinned to one model id; the fallback router holds several instances in
//! priority order (e.g. pro before flash before flash-lite).

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::*;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a backend for one Gemini model.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
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
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Point the backend at a different API root (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

/// `generateContent` response body.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
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
impl InferenceBackend for GeminiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        if self.api_key.is_empty() {
            return Err(BackendError::Unavailable("missing API key".to_string()));
        }

        let contents = request
            .messages
            .iter()
            .map(|msg| Content {
                role: Some(
                    match msg.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![Part {
                    text: msg.content.clone(),
                }],
            })
            .collect();

        let system_instruction = request.system_prompt.as_ref().map(|text| Content {
            role: None,
            parts: vec![Part { text: text.clone() }],
        });

        let generation_config = Some(GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type: request.json_only.then_some("application/json"),
        });

        let body = GenerateRequest {
            contents,
            system_instruction,
            generation_config,
        };

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
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

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        // Join all parts of the first candidate, as the backend may split
        // long replies across parts
        let content = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        Ok(CompletionResponse::new(content))
    }
}
