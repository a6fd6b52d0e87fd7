//! Model backends.
//!
//! Every backend, API-hosted or locally served, is consumed through the
//! single [`ModelClient`] capability. The scheduler and equivalence engine
//! never branch on the concrete backend type; backends are selected once at
//! run construction.

mod openrouter;

pub use openrouter::OpenRouterClient;

use async_trait::async_trait;

use merge_bench_domain::errors::{ConfigError, ModelError};

/// Prefixes identifying models served through the OpenRouter API.
const API_MODEL_PREFIXES: [&str; 8] = [
    "api/",
    "openai/",
    "anthropic/",
    "qwen/",
    "meta/",
    "google/",
    "x-ai/",
    "deepseek/",
];

/// Validate that a model identifier maps to a supported backend.
pub fn validate_model_id(model: &str) -> Result<(), ConfigError> {
    let supported =
        model == "o3" || API_MODEL_PREFIXES.iter().any(|prefix| model.starts_with(prefix));
    if supported {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedModel(model.to_string()))
    }
}

/// A raw response from a model backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    /// The answer content.
    pub content: String,

    /// Reasoning trace, for backends that expose one.
    pub reasoning: Option<String>,
}

impl ModelResponse {
    /// The completion text handed to the response parser, with any
    /// reasoning trace wrapped in a `<think>...</think>` prelude.
    pub fn full_text(&self) -> String {
        match &self.reasoning {
            Some(reasoning) => format!("<think>\n{}</think>\n{}", reasoning, self.content),
            None => self.content.clone(),
        }
    }
}

/// The single capability every model backend exposes.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Query the model with a prompt and return its raw response.
    ///
    /// Implementations enforce their own per-call timeout and classify
    /// failures via [`ModelError::is_transient`] so the scheduler's retry
    /// policy can decide what to do.
    async fn query(&self, prompt: &str) -> Result<ModelResponse, ModelError>;

    /// Identifier of the model served by this client.
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_model_prefixes() {
        assert!(validate_model_id("anthropic/claude-3.5-sonnet").is_ok());
        assert!(validate_model_id("deepseek/deepseek-r1").is_ok());
        assert!(validate_model_id("o3").is_ok());
    }

    #[test]
    fn rejects_unknown_models() {
        let err = validate_model_id("my-local-model").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedModel(_)));
    }

    #[test]
    fn full_text_with_and_without_reasoning() {
        let with = ModelResponse {
            content: "answer".to_string(),
            reasoning: Some("steps".to_string()),
        };
        assert_eq!(with.full_text(), "<think>\nsteps</think>\nanswer");

        let without = ModelResponse {
            content: "answer".to_string(),
            reasoning: None,
        };
        assert_eq!(without.full_text(), "answer");
    }
}
