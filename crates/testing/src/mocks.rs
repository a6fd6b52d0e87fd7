//! Mock model client for testing without network dependencies.

use parking_lot::Mutex;
use std::collections::HashMap;

use merge_bench_domain::errors::ModelError;
use merge_bench_infrastructure::models::{ModelClient, ModelResponse};

/// Failure mode injected before (or instead of) a successful response.
#[derive(Debug, Clone, Copy)]
enum InjectedFailure {
    /// Retryable: reported as a provider server error.
    Transient,
    /// Not retryable: reported as rejected credentials.
    Permanent,
}

struct MockState {
    responses: HashMap<String, ModelResponse>,
    default_response: ModelResponse,
    remaining_failures: u32,
    failure: InjectedFailure,
    calls: Vec<String>,
}

/// A scriptable in-memory [`ModelClient`].
///
/// Responses can be keyed by exact prompt; unmatched prompts get the
/// default response. A number of leading failures can be injected to
/// exercise retry behavior, and every query's prompt is recorded.
pub struct MockModelClient {
    model: String,
    state: Mutex<MockState>,
}

impl MockModelClient {
    /// Create a mock serving `model` with an empty default response.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            state: Mutex::new(MockState {
                responses: HashMap::new(),
                default_response: ModelResponse {
                    content: String::new(),
                    reasoning: None,
                },
                remaining_failures: 0,
                failure: InjectedFailure::Transient,
                calls: Vec::new(),
            }),
        }
    }

    /// Set the response returned for prompts with no scripted match.
    pub fn with_default_response(self, content: impl Into<String>) -> Self {
        self.state.lock().default_response = ModelResponse {
            content: content.into(),
            reasoning: None,
        };
        self
    }

    /// Script the response for one exact prompt.
    pub fn with_response(self, prompt: impl Into<String>, content: impl Into<String>) -> Self {
        self.state.lock().responses.insert(
            prompt.into(),
            ModelResponse {
                content: content.into(),
                reasoning: None,
            },
        );
        self
    }

    /// Attach a reasoning trace to the default response.
    pub fn with_default_reasoning(self, reasoning: impl Into<String>) -> Self {
        self.state.lock().default_response.reasoning = Some(reasoning.into());
        self
    }

    /// Fail the next `n` queries with a transient error before succeeding.
    pub fn fail_transiently(self, n: u32) -> Self {
        {
            let mut state = self.state.lock();
            state.remaining_failures = n;
            state.failure = InjectedFailure::Transient;
        }
        self
    }

    /// Fail the next `n` queries with a permanent error.
    pub fn fail_permanently(self, n: u32) -> Self {
        {
            let mut state = self.state.lock();
            state.remaining_failures = n;
            state.failure = InjectedFailure::Permanent;
        }
        self
    }

    /// Number of queries issued so far.
    pub fn query_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Prompts of all queries issued so far, in call order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }
}

#[async_trait::async_trait]
impl ModelClient for MockModelClient {
    async fn query(&self, prompt: &str) -> Result<ModelResponse, ModelError> {
        let mut state = self.state.lock();
        state.calls.push(prompt.to_string());

        if state.remaining_failures > 0 {
            state.remaining_failures -= 1;
            return Err(match state.failure {
                InjectedFailure::Transient => ModelError::ServerError {
                    status: 503,
                    message: "injected transient failure".to_string(),
                },
                InjectedFailure::Permanent => ModelError::Unauthorized { status: 401 },
            });
        }

        Ok(state
            .responses
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| state.default_response.clone()))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
