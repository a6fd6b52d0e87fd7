//! Application layer for the Merge-Bench evaluation engine.
//!
//! This crate turns raw model text into comparable correctness metrics:
//!
//! - `parser` - extracts the candidate resolution from raw model output
//! - `normalize` - per-language comment and whitespace normalization
//! - `scoring` - the equivalence engine assigning each example its verdict
//! - `metrics` - commutative aggregation into per-(model, language) metrics
//! - `scheduler` - bounded-concurrency cache-or-query dispatch with retries
//! - `report` - fixed-format summary emission for downstream tooling

pub mod metrics;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod scheduler;
pub mod scoring;

pub use metrics::{AggregateMetrics, BucketCounts, MetricsAggregator};
pub use normalize::normalize_code;
pub use parser::{extract_answer, extract_code_block};
pub use report::{render_summary, write_results_file};
pub use scheduler::{EvalScheduler, SchedulerConfig};
pub use scoring::evaluate_response;
