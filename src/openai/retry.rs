//! Exponential backoff retry logic for the OpenAI API.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::debug;

use crate::error::OpenAiError;

/// Configuration: 3 total attempts, base 1s, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Retry an async operation with exponential backoff.
///
/// `attempt` is called up to `MAX_ATTEMPTS` times, but only while the
/// returned error is transient (network, rate limit, empty completion);
/// deterministic failures like a rejected API key are returned immediately.
/// `wrap_exhausted` converts the last error into `RetriesExhausted`.
pub async fn retry_with_backoff<T, Fut, F, W>(mut attempt: F, wrap_exhausted: W) -> Result<T, OpenAiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OpenAiError>>,
    W: FnOnce(OpenAiError) -> OpenAiError,
{
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;
    let mut last_error = None;

    while attempts < MAX_ATTEMPTS {
        attempts += 1;

        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => {
                debug!("OpenAI attempt {}/{} failed: {}", attempts, MAX_ATTEMPTS, e);
                last_error = Some(e);

                if attempts < MAX_ATTEMPTS
                    && let Some(wait_duration) = backoff.next_backoff()
                {
                    tokio::time::sleep(wait_duration).await;
                }
            }
        }
    }

    Err(wrap_exhausted(
        last_error.expect("last_error should be Some after failed retries"),
    ))
}
