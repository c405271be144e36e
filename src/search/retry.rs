//! Exponential backoff for transient API failures.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::error::ApiError;

/// Default number of extra attempts after the first.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default wait before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Default upper bound on a single wait.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Retry/backoff policy shared by every client operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first one.
    pub max_retries: u32,
    /// Wait before retry 1; doubled for each following retry.
    pub base_delay: Duration,
    /// Cap applied to every computed wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Wait before retry `n` (1-indexed): `min(base * 2^(n-1), max)`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = 2u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Runs `operation` until it succeeds, fails terminally, or the retry
    /// budget is spent.
    ///
    /// The closure receives the 1-indexed attempt number. The returned
    /// error carries the number of attempts made.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1;
        loop {
            match call(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() || attempt > self.max_retries => {
                    return Err(err.with_attempts(attempt));
                }
                Err(err) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_retries + 1,
                        kind = %err.kind,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err.message,
                        "retryable API failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
