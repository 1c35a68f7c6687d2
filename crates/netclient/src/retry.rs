use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::config::RetryConfig;
use crate::error::NetError;

/// Delay before the given retry attempt (0-indexed), per spec.md §4.1's
/// `delay_n = min(max_delay, initial * factor^n) * (1 +/- jitter)`.
pub fn delay_for_attempt(policy: &RetryConfig, attempt: u32) -> Duration {
    let growth = policy.factor.max(1.0).powi(attempt.min(64) as i32);
    let scaled_secs = policy.base_delay.as_secs_f64() * growth;
    let capped_secs = scaled_secs.min(policy.max_delay.as_secs_f64());
    let capped = Duration::try_from_secs_f64(capped_secs.max(0.0)).unwrap_or(policy.max_delay);

    let jitter = policy.jitter.clamp(0.0, 1.0);
    if jitter > 0.0 && !capped.is_zero() {
        let mut rng = rand::rng();
        let magnitude: f64 = rng.random_range((1.0 - jitter)..=(1.0 + jitter));
        let jittered_secs = (capped.as_secs_f64() * magnitude).max(0.0);
        let jittered = Duration::try_from_secs_f64(jittered_secs).unwrap_or(capped);
        jittered.min(policy.max_delay)
    } else {
        capped
    }
}

enum RetryAction<T> {
    Success(T),
    Retry(NetError),
    Fail(NetError),
}

/// Run `operation` with exponential backoff, honoring `token` for early
/// cancellation. Generalizes `mesio::hls::retry::retry_with_backoff`.
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryConfig,
    token: &CancellationToken,
    mut operation: F,
) -> Result<T, NetError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NetError>>,
{
    let mut last_err: Option<NetError> = None;

    for attempt in 0..=policy.max_retries {
        if token.is_cancelled() {
            return Err(NetError::Cancelled);
        }

        let outcome = match operation().await {
            Ok(value) => RetryAction::Success(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => RetryAction::Retry(e),
            Err(e) => RetryAction::Fail(e),
        };

        match outcome {
            RetryAction::Success(value) => return Ok(value),
            RetryAction::Fail(e) => return Err(e),
            RetryAction::Retry(e) => {
                // Honor a server-dictated `Retry-After` (429/503) over our
                // own backoff schedule, capped the same as any other delay.
                let delay = e
                    .retry_after()
                    .map(|d| d.min(policy.max_delay))
                    .unwrap_or_else(|| delay_for_attempt(policy, attempt));
                tokio::select! {
                    _ = token.cancelled() => return Err(NetError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or(NetError::Unknown("retry loop exited without an error".into())))
}
