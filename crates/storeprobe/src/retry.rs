//! Fixed-count, fixed-delay retry for eventually-consistent reads.
//!
//! The pet-store service does not always serve a resource immediately after
//! it was written. Callers wrap read-after-write checks in a
//! [`RetryPolicy`]; the policy is configuration, not a constant.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of attempts (at least one attempt is always made)
    pub attempts: u32,
    /// Delay between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay_ms: delay.as_millis() as u64,
        }
    }

    /// Policy that makes a single attempt
    #[must_use]
    pub const fn once() -> Self {
        Self {
            attempts: 1,
            delay_ms: 0,
        }
    }

    /// Get the delay as Duration
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// `op` receives the 1-based attempt number. The error of the final
    /// attempt is returned inside [`ProbeError::RetriesExhausted`].
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> ProbeResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ProbeResult<T>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= attempts => {
                    return Err(ProbeError::RetriesExhausted {
                        what: what.to_string(),
                        attempts,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    debug!(what, attempt, error = %err, "retrying");
                    tokio::time::sleep(self.delay()).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[test]
    fn test_default_matches_pet_checks() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_new_from_duration() {
        let policy = RetryPolicy::new(10, Duration::from_millis(250));
        assert_eq!(policy.attempts, 10);
        assert_eq!(policy.delay_ms, 250);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_wins() {
        let calls = Cell::new(0);
        let value = RetryPolicy::default()
            .run("read", |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 3 {
                        Err(ProbeError::assertion("not yet"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_carries_last_error() {
        let start = Instant::now();
        let err = RetryPolicy::new(4, Duration::from_secs(1))
            .run("read pet 9", |attempt| async move {
                Err::<(), _>(ProbeError::assertion(format!("attempt {attempt}")))
            })
            .await
            .unwrap_err();

        match err {
            ProbeError::RetriesExhausted {
                what,
                attempts,
                last,
            } => {
                assert_eq!(what, "read pet 9");
                assert_eq!(attempts, 4);
                assert_eq!(last.to_string(), "Assertion failed: attempt 4");
            }
            other => panic!("unexpected error: {other}"),
        }
        // three sleeps between four attempts
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_runs_once() {
        let calls = Cell::new(0);
        let policy = RetryPolicy {
            attempts: 0,
            delay_ms: 10,
        };
        let result = policy
            .run("op", |_| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(ProbeError::assertion("no")) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
