//! Metrics aggregation.
//!
//! A commutative fold over per-example outcomes: only counters are kept,
//! so the final percentages are identical regardless of completion order,
//! and a snapshot can be taken mid-run for partial metrics. The denominator
//! is the count of attempted examples (parse failures and terminal errors
//! included), so every bucket's percentage is over the same total and the
//! buckets sum to 100.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use merge_bench_domain::{EvaluationOutcome, Language, Verdict};

/// Per-(model, language) bucket counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    /// Total attempted examples (the percentage denominator).
    pub attempted: u64,
    /// Byte-identical resolutions.
    pub exact: u64,
    /// Normalization-equivalent resolutions that were not byte-identical.
    pub semantic_only: u64,
    /// Responses that preserved the conflict markers.
    pub conflict_preserved: u64,
    /// Well-formed responses matching nothing.
    pub different: u64,
    /// Responses with no extractable code block (and no markers).
    pub invalid_markdown: u64,
    /// Terminal provider errors.
    pub error: u64,
    /// Responses with a valid fenced code block (orthogonal to buckets).
    pub markdown_valid: u64,
    /// Responses with the expected reasoning format (orthogonal to buckets).
    pub thinking_valid: u64,
}

impl BucketCounts {
    fn record(&mut self, outcome: &EvaluationOutcome) {
        self.attempted += 1;
        if outcome.markdown_valid {
            self.markdown_valid += 1;
        }
        if outcome.thinking_valid {
            self.thinking_valid += 1;
        }
        match outcome.verdict {
            Verdict::ExactMatch => self.exact += 1,
            Verdict::SemanticMatch => self.semantic_only += 1,
            Verdict::ConflictPreserved => self.conflict_preserved += 1,
            Verdict::Different => self.different += 1,
            Verdict::InvalidMarkdown => self.invalid_markdown += 1,
            Verdict::Error => self.error += 1,
        }
    }

    fn pct(&self, count: u64) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.attempted as f64
        }
    }

    /// Percentage of exactly resolved merges.
    pub fn pct_exact(&self) -> f64 {
        self.pct(self.exact)
    }

    /// Percentage of semantically resolved merges (exact matches included,
    /// since byte-identical text is always normalization-equivalent).
    pub fn pct_semantic(&self) -> f64 {
        self.pct(self.exact + self.semantic_only)
    }

    /// Percentage of responses that correctly raised the conflict.
    pub fn pct_conflict_preserved(&self) -> f64 {
        self.pct(self.conflict_preserved)
    }

    /// Percentage of responses with a valid fenced code block.
    pub fn pct_markdown_valid(&self) -> f64 {
        self.pct(self.markdown_valid)
    }

    /// Percentage of responses with the expected reasoning format.
    pub fn pct_thinking_valid(&self) -> f64 {
        self.pct(self.thinking_valid)
    }

    /// Percentage of well-formed but incorrect responses.
    pub fn pct_different(&self) -> f64 {
        self.pct(self.different)
    }

    /// Percentage of responses with no extractable code block.
    pub fn pct_invalid_markdown(&self) -> f64 {
        self.pct(self.invalid_markdown)
    }

    /// Percentage of terminal errors.
    pub fn pct_error(&self) -> f64 {
        self.pct(self.error)
    }

    /// Sum of all disjoint bucket percentages; 100 (within rounding) for a
    /// nonempty aggregate.
    pub fn bucket_sum(&self) -> f64 {
        self.pct(self.exact)
            + self.pct(self.semantic_only)
            + self.pct(self.conflict_preserved)
            + self.pct(self.different)
            + self.pct(self.invalid_markdown)
            + self.pct(self.error)
    }
}

/// Final (or partial) metrics, keyed by (model, language).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateMetrics {
    /// Bucket counters per (model, language).
    pub by_key: BTreeMap<(String, Language), BucketCounts>,
}

impl AggregateMetrics {
    /// Counters for one (model, language) pair, if any outcome was recorded.
    pub fn get(&self, model: &str, language: Language) -> Option<&BucketCounts> {
        self.by_key.get(&(model.to_string(), language))
    }
}

/// Incremental, order-insensitive aggregator.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    metrics: AggregateMetrics,
}

impl MetricsAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome into the aggregate.
    pub fn accumulate(&mut self, model: &str, language: Language, outcome: &EvaluationOutcome) {
        self.metrics
            .by_key
            .entry((model.to_string(), language))
            .or_default()
            .record(outcome);
    }

    /// Current metrics, for partial emission while a run is in flight.
    pub fn snapshot(&self) -> AggregateMetrics {
        self.metrics.clone()
    }

    /// Consume the aggregator and return the final metrics.
    pub fn finalize(self) -> AggregateMetrics {
        self.metrics
    }
}
