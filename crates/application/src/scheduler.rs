//! Bounded-concurrency evaluation scheduler.
//!
//! Turns a set of merge examples into evaluation outcomes: cache hit or
//! model query per example, retries with exponential backoff for transient
//! failures, a semaphore bounding examples in flight, and results
//! correlated back to their examples by identifier rather than completion
//! order. Cancellation stops issuing new queries while in-flight cache
//! writes complete atomically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::metrics::{AggregateMetrics, MetricsAggregator};
use crate::scoring::evaluate_response;
use merge_bench_common::retry::{retry_transient, RetryConfig};
use merge_bench_common::prompt_digest;
use merge_bench_domain::errors::ModelError;
use merge_bench_domain::{build_prompt, EvaluationOutcome, Language, MergeExample};
use merge_bench_infrastructure::cache::{CachedResponse, ResponseCache};
use merge_bench_infrastructure::models::ModelClient;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum examples in flight at once.
    pub max_workers: usize,

    /// Retry policy for transient provider errors.
    pub retry: RetryConfig,

    /// Bypass cache reads for this run (entries are still written).
    pub force_refresh: bool,

    /// Log prompts and raw responses.
    pub verbose: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_workers: 32,
            retry: RetryConfig::default(),
            force_refresh: false,
            verbose: false,
        }
    }
}

/// The evaluation scheduler for one (model, language) run.
pub struct EvalScheduler {
    client: Arc<dyn ModelClient>,
    cache: Arc<ResponseCache>,
    config: SchedulerConfig,
    cancelled: Arc<AtomicBool>,
}

impl EvalScheduler {
    /// Create a scheduler over a model client and a shared cache.
    pub fn new(
        client: Arc<dyn ModelClient>,
        cache: Arc<ResponseCache>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            client,
            cache,
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that cancels the run when set (e.g. from a ctrl-c handler).
    ///
    /// Examples not yet started are abandoned; in-flight queries and their
    /// cache writes run to completion so no partial entry is left behind.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Evaluate all examples, returning outcomes in input order together
    /// with the aggregated metrics. Cancelled (never-started) examples are
    /// omitted from both.
    pub async fn run(
        &self,
        language: Language,
        examples: Vec<MergeExample>,
    ) -> (Vec<EvaluationOutcome>, AggregateMetrics) {
        let total = examples.len();
        let order: Vec<String> = examples.iter().map(|e| e.id.clone()).collect();
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let mut join_set: JoinSet<Option<EvaluationOutcome>> = JoinSet::new();

        info!(
            model = self.client.model_id(),
            %language,
            total,
            max_workers = self.config.max_workers,
            force_refresh = self.config.force_refresh,
            "Starting evaluation run"
        );

        for example in examples {
            let client = self.client.clone();
            let cache = self.cache.clone();
            let config = self.config.clone();
            let cancelled = self.cancelled.clone();
            let semaphore = semaphore.clone();

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                evaluate_one(&*client, &cache, &config, &cancelled, &example).await
            });
        }

        let mut aggregator = MetricsAggregator::new();
        let mut by_id: HashMap<String, EvaluationOutcome> = HashMap::with_capacity(total);
        let model = self.client.model_id().to_string();
        let mut completed = 0usize;

        while let Some(joined) = join_set.join_next().await {
            let outcome = match joined {
                Ok(Some(outcome)) => outcome,
                Ok(None) => continue, // abandoned before start
                Err(err) => {
                    error!(error = %err, "Evaluation task panicked");
                    continue;
                }
            };

            aggregator.accumulate(&model, language, &outcome);
            by_id.insert(outcome.example_id.clone(), outcome);

            completed += 1;
            if completed % 25 == 0 || completed == total {
                if let Some(counts) = aggregator.snapshot().get(&model, language) {
                    info!(
                        completed,
                        total,
                        pct_exact = format!("{:.2}", counts.pct_exact()),
                        pct_semantic = format!("{:.2}", counts.pct_semantic()),
                        "Progress"
                    );
                }
            }
        }

        // Correlate by identifier, not completion order.
        let outcomes = order
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect();

        (outcomes, aggregator.finalize())
    }
}

/// Evaluate a single example: cache-or-query, then score.
async fn evaluate_one(
    client: &dyn ModelClient,
    cache: &ResponseCache,
    config: &SchedulerConfig,
    cancelled: &AtomicBool,
    example: &MergeExample,
) -> Option<EvaluationOutcome> {
    if cancelled.load(Ordering::SeqCst) {
        return None;
    }

    let prompt = build_prompt(example);
    let key = prompt_digest(&prompt);
    let model = client.model_id();

    if config.verbose {
        info!(example_id = %example.id, prompt = %prompt, "Input prompt");
    }

    let raw = if let Some(entry) = cached_lookup(cache, config, model, &key) {
        entry.full_text()
    } else {
        if cancelled.load(Ordering::SeqCst) {
            return None;
        }

        let response = retry_transient(
            config.retry.clone(),
            || client.query(&prompt),
            ModelError::is_transient,
        )
        .await;

        match response {
            Ok(response) => {
                let entry =
                    CachedResponse::new(prompt.clone(), response.content, response.reasoning);
                // A failed cache write is not fatal to the example; the key
                // will simply be re-queried next run.
                if let Err(err) = cache.put(model, &key, &entry) {
                    warn!(example_id = %example.id, error = %err, "Cache write failed");
                }
                entry.full_text()
            }
            Err(err) => {
                error!(
                    example_id = %example.id,
                    model,
                    language = %example.language,
                    error = %err,
                    "Model query failed terminally"
                );
                return Some(EvaluationOutcome::terminal_error(&example.id));
            }
        }
    };

    if config.verbose {
        info!(example_id = %example.id, response = %raw, "Model response");
    }

    Some(evaluate_response(example, &raw))
}

fn cached_lookup(
    cache: &ResponseCache,
    config: &SchedulerConfig,
    model: &str,
    key: &str,
) -> Option<CachedResponse> {
    if config.force_refresh {
        return None;
    }
    cache.get(model, key)
}
