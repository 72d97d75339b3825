//! Exponential backoff for operations that fail with transient overload.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Classifies a failure as worth retrying.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Wait before the first retry; doubled before every further retry.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Total time spent sleeping when every attempt fails retryably.
    pub fn max_total_delay(&self) -> Duration {
        (0..self.max_retries)
            .map(|n| self.initial_delay.saturating_mul(2u32.saturating_pow(n)))
            .sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_INITIAL_DELAY)
    }
}

/// Run `operation`, retrying retryable failures with doubling delays.
///
/// Returns the first success, the first non-retryable failure, or the last
/// retryable failure once `policy.max_retries` is used up.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut retries = policy.max_retries;
    let mut delay = policy.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && retries > 0 => {
                tracing::warn!(
                    "Provider busy ({}), retrying in {}ms ({} left)",
                    err,
                    delay.as_millis(),
                    retries
                );
                tokio::time::sleep(delay).await;
                retries -= 1;
                delay = delay.saturating_mul(2);
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use thiserror::Error;
    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, Error, PartialEq)]
    enum FakeError {
        #[error("model overloaded")]
        Busy,
        #[error("bad request")]
        Fatal,
    }

    impl Retryable for FakeError {
        fn is_retryable(&self) -> bool {
            matches!(self, FakeError::Busy)
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.max_total_delay(), Duration::from_millis(14_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_three_busy_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let result = with_retry(RetryPolicy::default(), move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 3 { Err(FakeError::Busy) } else { Ok("soalan") }
        })
        .await;

        assert_eq!(result, Ok("soalan"));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), Duration::from_millis(14_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_immediately() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let result: Result<(), _> = with_retry(RetryPolicy::default(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(FakeError::Fatal)
        })
        .await;

        assert_eq!(result, Err(FakeError::Fatal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_four_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<(), _> = with_retry(RetryPolicy::default(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(FakeError::Busy)
        })
        .await;

        assert_eq!(result, Err(FakeError::Busy));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt_does_not_sleep() {
        let start = Instant::now();
        let result: Result<u8, FakeError> =
            with_retry(RetryPolicy::default(), || async { Ok(7) }).await;

        assert_eq!(result, Ok(7));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
