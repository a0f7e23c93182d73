//! Retrying provider calls with exponential backoff

use crate::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How often and how patiently a failed request is repeated
///
/// Only errors for which [`crate::LLMError::is_retryable`] is true are repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_backoff: Duration,

    /// Upper bound for any single delay
    pub max_backoff: Duration,

    /// Factor applied to the delay after every retry
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_retries(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// `retries` extra attempts after the first, doubling from `initial_backoff`
    pub fn with_retries(retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: retries + 1,
            initial_backoff,
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    /// A single attempt
    pub fn no_retry() -> Self {
        Self::with_retries(0, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based)
    fn backoff_duration(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let factor = self.backoff_multiplier.powi(retry.saturating_sub(1) as i32);
        let backoff = self.initial_backoff.mul_f64(factor);
        backoff.min(self.max_backoff)
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(operation = operation_name, attempt, attempts, "Sending request");

            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_retryable() {
                debug!(operation = operation_name, %error, "Non-retryable error");
                return Err(error);
            }
            if attempt >= attempts {
                warn!(operation = operation_name, attempts, %error, "Giving up after retries");
                return Err(error);
            }

            let backoff = self.backoff_duration(attempt);
            warn!(
                operation = operation_name,
                attempt,
                attempts,
                %error,
                backoff_ms = backoff.as_millis() as u64,
                "Request failed, retrying"
            );
            sleep(backoff).await;
        }
    }
}
