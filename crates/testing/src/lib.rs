//! Test support for the Merge-Bench evaluation engine.
//!
//! Provides an in-memory mock model client and merge example fixtures so
//! pipeline tests run without network or dataset dependencies.

pub mod fixtures;
pub mod mocks;

pub use fixtures::{conflict_snippet, fenced, sample_example};
pub use mocks::MockModelClient;
