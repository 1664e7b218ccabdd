//! Wait mechanisms for synchronisation with the browser.
//!
//! Every blocking browser primitive goes through [`WaitPolicy::poll_until`]:
//! evaluate a check, sleep for the poll interval, repeat until the check
//! yields a value or the timeout elapses.

use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Bounded polling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitPolicy {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// How long the cart badge may take to show before it counts as absent;
    /// falls back to `timeout_ms`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_settle_ms: Option<u64>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            badge_settle_ms: None,
        }
    }
}

impl WaitPolicy {
    /// Create a policy with the given timeout and the default poll interval
    #[must_use]
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            badge_settle_ms: None,
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Cap the wait for the cart badge separately from `timeout_ms`
    #[must_use]
    pub const fn with_badge_settle(mut self, badge_settle_ms: u64) -> Self {
        self.badge_settle_ms = Some(badge_settle_ms);
        self
    }

    /// Milliseconds to wait for the cart badge
    #[must_use]
    pub const fn badge_timeout_ms(&self) -> u64 {
        match self.badge_settle_ms {
            Some(ms) => ms,
            None => self.timeout_ms,
        }
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Poll `check` until it yields `Some`, or return `None` once the
    /// timeout has elapsed.
    ///
    /// The check always runs at least once, and once more after the deadline
    /// has passed, so a zero timeout means "probe exactly once". Errors from
    /// `check` abort the wait immediately.
    pub async fn poll_until<T, F, Fut>(&self, mut check: F) -> ProbeResult<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeResult<Option<T>>>,
    {
        let deadline = Instant::now() + self.timeout();
        loop {
            if let Some(value) = check().await? {
                return Ok(Some(value));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let remaining = deadline - now;
            tokio::time::sleep(self.poll_interval().min(remaining)).await;
        }
    }
}
