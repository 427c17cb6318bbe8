//! Fixed-backoff retry for connection-bound operations.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::Result;

/// Retry configuration: a fixed number of retries with a fixed delay
/// between attempts. Every call site in this crate pins its own config
/// as a constant; there is no dynamic tuning.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay between attempts.
    pub min_delay: Duration,
}

impl RetryConfig {
    pub(crate) const fn new(max_retries: u32, min_delay: Duration) -> Self {
        Self {
            max_retries,
            min_delay,
        }
    }
}

/// Run `op`, retrying retryable errors up to `config.max_retries` more
/// times with `config.min_delay` between attempts. Non-retryable errors
/// are returned immediately; each retry is logged.
pub(crate) async fn with_retry<T, F, Fut>(config: RetryConfig, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                tracing::info!(error = %err, attempt, "retrying network call");
                sleep(config.min_delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
