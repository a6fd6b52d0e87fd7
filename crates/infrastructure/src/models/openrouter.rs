//! OpenRouter-backed model client.
//!
//! Speaks the chat-completions protocol against the OpenRouter endpoint
//! (or any compatible one via `OPENROUTER_BASE_URL`). Each query carries a
//! per-call timeout; timeouts, rate limits, and server errors are reported
//! as transient so the scheduler's retry policy can back off and retry.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

use super::{ModelClient, ModelResponse};
use merge_bench_domain::errors::{ConfigError, ModelError};

/// Default OpenRouter API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the API endpoint.
pub const BASE_URL_ENV: &str = "OPENROUTER_BASE_URL";

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// HTTP client for OpenRouter-served models.
#[derive(Clone)]
pub struct OpenRouterClient {
    http: Client,
    model: String,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Create a client with explicit credentials and endpoint.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::Invalid(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
        })
    }

    /// Create a client from environment credentials.
    ///
    /// Reads `OPENROUTER_API_KEY` (required) and `OPENROUTER_BASE_URL`
    /// (optional) once at construction; a missing key is a fatal
    /// configuration error.
    pub fn from_env(model: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let api_key =
            env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingCredential(API_KEY_ENV))?;
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(model, api_key, base_url, timeout)
    }

    fn classify_transport(&self, err: reqwest::Error) -> ModelError {
        if err.is_timeout() {
            ModelError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ModelError::Transport(err.to_string())
        }
    }

    fn classify_status(status: StatusCode, body: String) -> ModelError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Unauthorized {
                status: status.as_u16(),
            },
            s if s.is_server_error() => ModelError::ServerError {
                status: s.as_u16(),
                message: body,
            },
            s => ModelError::InvalidResponse(format!("unexpected status {s}: {body}")),
        }
    }
}

#[async_trait::async_trait]
impl ModelClient for OpenRouterClient {
    async fn query(&self, prompt: &str) -> Result<ModelResponse, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        debug!(model = %self.model, prompt_bytes = prompt.len(), "Querying model");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| self.classify_transport(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ModelError::InvalidResponse(format!("malformed body: {err}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("response has no choices".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| ModelError::InvalidResponse("response is missing content".to_string()))?;

        Ok(ModelResponse {
            content,
            reasoning: choice.message.reasoning,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
