//! Bounded retry with linear backoff.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::errors::{RetryClass, UpstreamError};

/// Default number of attempts, including the first call.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay after the first failed attempt.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Default upper bound for a single backoff delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// Default time an upstream call may take before it counts as timed out.
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// How many times to call an upstream, and how long to wait in between.
///
/// The delay after the n-th failed attempt is `base_delay * n`, capped at
/// `max_delay`. Each attempt is cut off after `attempt_timeout`, so a whole
/// run never takes longer than [`worst_case_duration`](Self::worst_case_duration).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call. Never less than one.
    pub max_attempts: u32,
    /// Delay unit; multiplied by the attempt number.
    pub base_delay: Duration,
    /// Cap for any single delay.
    pub max_delay: Duration,
    /// Limit for a single upstream call; exceeding it is a `Timeout` failure.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: DEFAULT_MAX_DELAY.max(base_delay),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Retry without sleeping between attempts.
    pub fn no_delay(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Longest a [`run`](Self::run) can take: every attempt timing out plus
    /// every backoff delay in between.
    pub fn worst_case_duration(&self) -> Duration {
        let attempts = self.max_attempts.max(1);
        let backoff: Duration = (1..attempts).map(|n| self.delay_for(n)).sum();
        self.attempt_timeout
            .saturating_mul(attempts)
            .saturating_add(backoff)
    }

    /// Delay to wait after the `attempt`-th failure (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(attempt)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, the attempts are used up, or it returns an
    /// error classified as [`RetryClass::Never`].
    ///
    /// On failure the error of the last attempt is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match tokio::time::timeout(self.attempt_timeout, op()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(UpstreamError::Timeout {
                    upstream: label.to_string(),
                }),
            };
            match outcome {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("'{}' succeeded on attempt {}/{}", label, attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        warn!("'{}' failed with terminal error: {}, not retrying", label, e);
                        return Err(e);
                    }

                    if attempt >= max_attempts {
                        warn!(
                            "'{}' failed after {} attempts, last error: {}",
                            label, attempt, e
                        );
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    debug!(
                        "'{}' attempt {}/{} failed: {}, retrying in {:?}",
                        label, attempt, max_attempts, e, delay
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
