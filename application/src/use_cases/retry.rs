//! Exponential backoff around provider calls.

use std::future::Future;

use tracing::warn;

use crate::config::RetryPolicy;
use crate::ports::completion::ProviderError;

/// Run `op`, retrying transient provider errors under `policy`.
///
/// A provider `retry_after` hint replaces the computed delay, capped at
/// `max_delay`. Non-transient errors and the error of the last attempt are
/// returned as-is.
pub(crate) async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = e
                    .retry_after()
                    .map_or_else(|| policy.delay_for(attempt), |d| d.min(policy.max_delay));
                warn!(
                    "Transient provider error (attempt {}/{}): {}; retrying in {:?}",
                    attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
