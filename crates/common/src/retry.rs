//! Retry with exponential backoff for transient provider errors.
//!
//! Retry is modeled as an explicit policy invoked by the scheduler, not as
//! error handling scattered through call sites: the caller supplies the
//! operation and a transience predicate, and the policy decides how many
//! attempts to make and how long to sleep between them.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first (minimum 1).
    pub max_attempts: u32,

    /// Delay before the second attempt.
    pub initial_delay: Duration,

    /// Upper bound on any single delay.
    pub max_delay: Duration,

    /// Backoff multiplier applied per attempt (e.g. 2.0 for doubling).
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a configuration with exponential backoff and the default delays.
    pub fn exponential(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Create a configuration that makes a single attempt.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the maximum delay between attempts.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }
}

/// Exponential backoff calculator over a [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: RetryConfig,
    attempts_made: u32,
}

impl ExponentialBackoff {
    /// Create a new backoff calculator.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            attempts_made: 0,
        }
    }

    /// Record that an attempt was made.
    pub fn record_attempt(&mut self) {
        self.attempts_made += 1;
    }

    /// Number of attempts made so far.
    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    /// Whether the budget allows another attempt.
    pub fn has_attempts_remaining(&self) -> bool {
        self.attempts_made < self.config.max_attempts.max(1)
    }

    /// Delay to sleep before the next attempt.
    ///
    /// The delay after the first attempt is `initial_delay`, multiplied by
    /// `backoff_multiplier` for each further attempt and capped at
    /// `max_delay`.
    pub fn next_delay(&self) -> Duration {
        if self.attempts_made == 0 {
            return Duration::ZERO;
        }
        let delay_ms = self.config.initial_delay.as_millis() as f64
            * self
                .config
                .backoff_multiplier
                .powi(self.attempts_made.saturating_sub(1) as i32);
        Duration::from_millis(delay_ms as u64).min(self.config.max_delay)
    }
}

/// Retry an async operation, backing off between attempts, as long as the
/// error is transient according to `is_transient`.
///
/// Permanent errors are returned immediately; transient errors are returned
/// once the attempt budget is exhausted.
pub async fn retry_transient<F, Fut, T, E, P>(
    config: RetryConfig,
    mut operation: F,
    is_transient: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut backoff = ExponentialBackoff::new(config);

    loop {
        backoff.record_attempt();
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !is_transient(&error) {
                    return Err(error);
                }
                if !backoff.has_attempts_remaining() {
                    tracing::warn!(
                        attempts = backoff.attempts_made(),
                        error = %error,
                        "Retry budget exhausted"
                    );
                    return Err(error);
                }

                let delay = backoff.next_delay();
                tracing::debug!(
                    attempt = backoff.attempts_made(),
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Retrying after transient error"
                );
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn default_config_makes_three_attempts() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_delay, Duration::from_secs(2));
    }

    #[test]
    fn backoff_delays_double_and_cap() {
        let config = RetryConfig::exponential(10)
            .with_max_delay(Duration::from_secs(5))
            .with_backoff_multiplier(2.0);
        let mut backoff = ExponentialBackoff::new(config);

        assert_eq!(backoff.next_delay(), Duration::ZERO);

        backoff.record_attempt();
        assert_eq!(backoff.next_delay(), Duration::from_secs(2));

        backoff.record_attempt();
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));

        backoff.record_attempt();
        // 8s capped at 5s.
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    }

    #[test]
    fn budget_counts_total_attempts() {
        let mut backoff = ExponentialBackoff::new(fast_config(3));
        assert!(backoff.has_attempts_remaining());
        backoff.record_attempt();
        backoff.record_attempt();
        assert!(backoff.has_attempts_remaining());
        backoff.record_attempt();
        assert!(!backoff.has_attempts_remaining());
    }

    #[tokio::test]
    async fn succeeds_first_try_without_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_transient(
            fast_config(3),
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_within_budget() {
        // Fails twice, succeeds on the third attempt.
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_transient(
            fast_config(3),
            || {
                let calls = calls_clone.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_budget_on_persistent_transient_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_transient(
            fast_config(3),
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>("still down".to_string())
                }
            },
            |_| true,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_transient(
            fast_config(5),
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>("bad credentials".to_string())
                }
            },
            |_| false,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
