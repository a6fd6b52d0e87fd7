//! Merge-Bench Domain Types
//!
//! This crate provides the core domain model for the Merge-Bench evaluation
//! engine. It defines the supported languages, merge conflict examples,
//! evaluation outcomes, prompt construction, and the error hierarchy shared
//! by every other layer.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **language**: the eleven supported languages and their per-language
//!   evaluation rules (fence tags, comment grammar, whitespace sensitivity)
//! - **example**: merge conflict examples with ground-truth resolutions
//! - **outcome**: per-example evaluation verdicts and outcomes
//! - **prompt**: prompt construction for conflict resolution queries
//! - **errors**: error types for model queries, caching, datasets, and
//!   configuration

#![warn(clippy::all)]

pub mod errors;
pub mod example;
pub mod language;
pub mod outcome;
pub mod prompt;

// Re-export commonly used types
pub use errors::{CacheError, ConfigError, DatasetError, ModelError};
pub use example::{MergeExample, Provenance};
pub use language::{CommentStyle, Language};
pub use outcome::{EvaluationOutcome, Verdict, CONFLICT_MARKERS};
pub use prompt::build_prompt;
