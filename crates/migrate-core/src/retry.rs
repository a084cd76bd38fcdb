//! Bounded retry with exponential backoff for rate-limited API calls

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MigrateError;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt)
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Backoff multiplier (2.0 doubles the wait on every attempt)
    pub multiplier: f64,
    /// Add up to 25% random jitter
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 60_000,
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// No waiting between attempts, for tests
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
            multiplier: 1.0,
            jitter: false,
        }
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Calculate backoff duration for a given attempt (0-based)
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let base = self.initial_backoff_ms as f64 * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_backoff_ms as f64);

        let millis = if self.jitter {
            capped * (1.0 + rand_jitter() * 0.25)
        } else {
            capped
        };

        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }
}

/// Pseudo-random value in 0.0..1.0 taken from the clock
fn rand_jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1000) as f64 / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    /// Retry after a server-provided duration (Retry-After)
    RetryAfter(Duration),
    NoRetry,
}

/// Errors that can tell whether the failed call is worth repeating
pub trait RetryableError {
    fn retry_decision(&self) -> RetryDecision;
}

impl RetryableError for MigrateError {
    /// Only throttling is retried: repeating a create after any other
    /// failure could produce a duplicate issue.
    fn retry_decision(&self) -> RetryDecision {
        match self {
            MigrateError::RateLimited {
                retry_after: Some(wait),
                ..
            } => RetryDecision::RetryAfter(*wait),
            MigrateError::RateLimited { .. } => RetryDecision::Retry,
            _ => RetryDecision::NoRetry,
        }
    }
}

/// Run `operation`, retrying with backoff while it reports a retryable error.
///
/// Returns the last error once `config.max_retries` retries are used up.
pub fn with_retry<T, E, F>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: RetryableError + std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        let err = match operation() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let decision = err.retry_decision();
        if decision == RetryDecision::NoRetry {
            debug!(
                operation = operation_name,
                attempt, "Operation failed with non-retryable error: {}", err
            );
            return Err(err);
        }

        if attempt >= config.max_retries {
            warn!(
                operation = operation_name,
                attempts = attempt + 1,
                "Giving up after {} attempts: {}",
                attempt + 1,
                err
            );
            return Err(err);
        }

        let backoff = match decision {
            RetryDecision::RetryAfter(wait) => wait.min(config.max_backoff()),
            _ => config.backoff_duration(attempt),
        };

        warn!(
            operation = operation_name,
            attempt = attempt + 1,
            max_attempts = config.max_retries + 1,
            backoff_secs = backoff.as_secs_f64(),
            "Retrying after error: {}",
            err
        );

        std::thread::sleep(backoff);
        attempt += 1;
    }
}
