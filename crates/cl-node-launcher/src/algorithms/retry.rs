//! # Bounded Retry
//!
//! Fixed-count, fixed-delay retry combinator. Timing goes through the
//! [`Sleeper`] port so callers can test without real waiting.

use std::future::Future;
use std::time::Duration;

use crate::ports::Sleeper;

/// Attempt budget and inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` of 0 is treated as 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Total attempts allowed.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Longest total sleep the policy can cause, saturating at `Duration::MAX`.
    pub fn max_wait(&self) -> Duration {
        self.delay
            .checked_mul(self.max_attempts - 1)
            .unwrap_or(Duration::MAX)
    }
}

/// Successful result plus the attempt it arrived on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome<T> {
    /// Value returned by the successful attempt.
    pub value: T,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

/// Every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// Attempts made.
    pub attempts: u32,
    /// Delay used between attempts.
    pub delay: Duration,
    /// Error from the final attempt.
    pub last_error: E,
}

/// Run `op` until it succeeds or the policy's attempt budget is spent.
///
/// `op` receives the 1-based attempt number. The sleeper is awaited between
/// attempts only, never after the final one.
pub async fn bounded_retry<T, E, F, Fut, S>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut op: F,
) -> Result<RetryOutcome<T>, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    S: Sleeper + ?Sized,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => {
                return Ok(RetryOutcome {
                    value,
                    attempts: attempt,
                })
            }
            Err(last_error) if attempt >= policy.max_attempts() => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    delay: policy.delay(),
                    last_error,
                })
            }
            Err(_) => {
                sleeper.sleep(policy.delay()).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingSleeper;

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::from_secs(1)).max_attempts(), 1);
    }

    #[test]
    fn test_max_wait() {
        let policy = RetryPolicy::new(10, Duration::from_secs(1));
        assert_eq!(policy.max_wait(), Duration::from_secs(9));
    }

    #[test]
    fn test_max_wait_saturates() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_millis(u64::MAX));
        assert_eq!(policy.max_wait(), Duration::MAX);
    }

    #[tokio::test]
    async fn test_first_attempt_success_never_sleeps() {
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::new(5, Duration::from_millis(100));

        let outcome = bounded_retry(&policy, &sleeper, |_| async { Ok::<_, ()>(7) })
            .await
            .unwrap();

        assert_eq!(outcome, RetryOutcome { value: 7, attempts: 1 });
        assert_eq!(sleeper.sleep_count(), 0);
    }

    #[tokio::test]
    async fn test_succeeds_on_later_attempt() {
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::new(5, Duration::from_millis(100));

        let outcome = bounded_retry(&policy, &sleeper, |attempt| async move {
            if attempt < 3 {
                Err(attempt)
            } else {
                Ok(attempt)
            }
        })
        .await
        .unwrap();

        assert_eq!(outcome.attempts, 3);
        assert_eq!(sleeper.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_error() {
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::new(4, Duration::from_millis(50));

        let exhausted = bounded_retry(&policy, &sleeper, |attempt| async move {
            Err::<(), _>(format!("attempt {attempt} failed"))
        })
        .await
        .unwrap_err();

        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.delay, Duration::from_millis(50));
        assert_eq!(exhausted.last_error, "attempt 4 failed");
        assert_eq!(sleeper.sleep_count(), 3);
    }
}
