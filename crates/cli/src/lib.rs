//! Merge-Bench CLI Library
//!
//! Command handlers for the `merge-bench` binary: running evaluations over a
//! merge conflict dataset and inspecting or maintaining the response cache.

pub mod commands;

/// Re-export common types
pub use anyhow::{Context, Result};
