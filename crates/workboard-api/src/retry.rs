//! Retry with exponential backoff.
//!
//! Reads against the backend are idempotent, so a timeout or a 5xx is worth
//! another try after a short wait. Writes are never retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use workboard_api::retry::{with_retry_if, RetryConfig};
//! use workboard_api::ApiError;
//!
//! async fn example() -> Result<String, ApiError> {
//!     with_retry_if(
//!         &RetryConfig::default(),
//!         || async { Ok("projects".to_string()) },
//!         ApiError::is_retryable,
//!     )
//!     .await
//! }
//! ```

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, first try included
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Ceiling for the delay between retries
    pub max_delay: Duration,

    /// Growth factor applied to the delay after each failure
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            exponential_base: 2.0,
        }
    }
}

impl RetryConfig {
    /// A configuration that tries exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            exponential_base: 1.0,
        }
    }

    /// Delay to wait after `delay`, capped at `max_delay`.
    pub fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(
            (delay.as_secs_f64() * self.exponential_base).min(self.max_delay.as_secs_f64()),
        )
    }
}

/// Run `f` until it succeeds, fails with an error `is_retryable` rejects,
/// or `max_attempts` is reached. The last error is returned.
pub async fn with_retry_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    mut f: F,
    mut is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
    P: FnMut(&E) -> bool,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;

        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, "request succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if !is_retryable(&e) => {
                debug!(error = ?e, "error is not retryable");
                return Err(e);
            }
            Err(e) if attempt >= config.max_attempts => {
                error!(attempts = attempt, error = ?e, "all retry attempts exhausted");
                return Err(e);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = ?e,
                    "request failed, retrying"
                );
                sleep(delay).await;
                delay = config.next_delay(delay);
            }
        }
    }
}
