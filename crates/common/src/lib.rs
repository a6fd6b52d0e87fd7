//! Common utilities shared across the Merge-Bench evaluation engine.
//!
//! This crate provides foundational utilities used by every layer:
//! - Retry logic with exponential backoff for transient provider errors
//! - Cache key digests over prompt bytes
//! - Telemetry and structured logging setup

pub mod digest;
pub mod retry;
pub mod telemetry;

// Re-export commonly used types
pub use digest::prompt_digest;
pub use retry::{retry_transient, ExponentialBackoff, RetryConfig};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
