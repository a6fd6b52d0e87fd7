//! Infrastructure layer for the Merge-Bench evaluation engine.
//!
//! This crate provides the concrete collaborators the scheduler depends on:
//!
//! - `cache` - content-addressed, file-per-entry response cache with
//!   atomic writes, safe across concurrent workers and processes
//! - `dataset` - loader for directory-organized per-language example sets
//! - `models` - the model capability trait and the OpenRouter-backed
//!   HTTP client implementation

pub mod cache;
pub mod dataset;
pub mod models;

pub use cache::{CacheScan, CachedResponse, ResponseCache};
pub use dataset::load_examples;
pub use models::{ModelClient, ModelResponse, OpenRouterClient};
