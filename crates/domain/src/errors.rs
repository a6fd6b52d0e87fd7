//! Error types for the Merge-Bench evaluation engine.
//!
//! The types mirror the failure taxonomy of the pipeline: transient
//! versus permanent model errors, cache corruption, fatal dataset load
//! failures, and fatal configuration problems. Only model errors carry a
//! retryability classification; everything else is either absorbed (cache
//! corruption becomes a miss) or aborts the run.

use std::path::PathBuf;

/// Errors from querying a model backend.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The query did not complete within its per-call timeout.
    #[error("Query timed out after {timeout_secs}s")]
    Timeout {
        /// Per-call timeout that elapsed.
        timeout_secs: u64,
    },

    /// The provider rejected the request due to rate limiting.
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    /// The provider returned a server-side error.
    #[error("Provider server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The request could not be transported (connection refused, DNS, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials were rejected.
    #[error("Unauthorized (status {status})")]
    Unauthorized {
        /// HTTP status code (401 or 403).
        status: u16,
    },

    /// The provider answered but the response was not usable.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Whether this error is transient and eligible for retry.
    ///
    /// Timeouts, rate limits, server errors, and transport failures are
    /// retried with backoff; bad credentials and malformed responses are
    /// not, since retrying them cannot succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::RateLimited(_) | Self::ServerError { .. } | Self::Transport(_)
        )
    }
}

/// Errors from the response cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Writing an entry failed.
    #[error("Failed to write cache entry at {path}: {source}")]
    WriteFailed {
        /// Destination path of the entry.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Cache root could not be created or listed.
    #[error("Cache I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors loading a dataset. Always fatal: there is nothing to evaluate.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file does not exist.
    #[error("Dataset not found at {path} (has the {language} dataset been built?)")]
    NotFound {
        /// Expected dataset path.
        path: PathBuf,
        /// Language whose dataset was requested.
        language: String,
    },

    /// The dataset file exists but cannot be read.
    #[error("Failed to read dataset at {path}: {source}")]
    Unreadable {
        /// Dataset path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The dataset file is not valid JSON or has the wrong shape.
    #[error("Malformed dataset at {path}: {source}")]
    Malformed {
        /// Dataset path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The dataset parsed but contains no examples.
    #[error("Dataset at {path} contains no examples")]
    Empty {
        /// Dataset path.
        path: PathBuf,
    },
}

/// Configuration errors. Always fatal, surfaced with a nonzero exit.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unknown language selector.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Model identifier does not match any supported backend.
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// A required credential environment variable is missing.
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),

    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
