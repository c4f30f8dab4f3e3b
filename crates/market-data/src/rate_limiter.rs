//! Token bucket pacing for a single upstream.
//!
//! Each provider owns one limiter sized from its [`RateLimit`]. Callers
//! `acquire().await` before every HTTP request; when the bucket is empty the
//! call sleeps until the next token is due instead of letting the upstream
//! answer with 429.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

use crate::provider::RateLimit;

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    capacity: f64,
    /// Tokens added per second.
    rate: f64,
    last_refill: Instant,
    min_delay: Duration,
    last_grant: Option<Instant>,
}

impl TokenBucket {
    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Take a token, or report how long until one is available.
    fn take(&mut self, now: Instant) -> Result<(), Duration> {
        if let Some(last) = self.last_grant {
            let since = now.saturating_duration_since(last);
            if since < self.min_delay {
                return Err(self.min_delay - since);
            }
        }
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            self.last_grant = Some(now);
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / self.rate))
        }
    }
}

/// Async token bucket limiter.
pub struct RateLimiter {
    name: &'static str,
    bucket: Mutex<TokenBucket>,
}

impl RateLimiter {
    /// Build a limiter for `name` from the provider's declared limits.
    ///
    /// The burst capacity is `max_concurrency` tokens; refill follows
    /// `requests_per_minute`. Consecutive grants are at least `min_delay`
    /// apart.
    pub fn new(name: &'static str, limit: &RateLimit) -> Self {
        let capacity = limit.max_concurrency.max(1) as f64;
        let rate = limit.requests_per_minute.max(1) as f64 / 60.0;
        Self {
            name,
            bucket: Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                rate,
                last_refill: Instant::now(),
                min_delay: limit.min_delay,
                last_grant: None,
            }),
        }
    }

    fn lock_bucket(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex for '{}' was poisoned, recovering", self.name);
            poisoned.into_inner()
        })
    }

    /// Wait until a token is available, then take it.
    pub async fn acquire(&self) {
        loop {
            let wait = match self.lock_bucket().take(Instant::now()) {
                Ok(()) => return,
                Err(wait) => wait,
            };
            debug!("Rate limiter: waiting {:?} for '{}'", wait, self.name);
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl RateLimiter {
        fn try_acquire(&self) -> bool {
            self.lock_bucket().take(Instant::now()).is_ok()
        }

        fn available(&self) -> f64 {
            let mut bucket = self.lock_bucket();
            bucket.refill(Instant::now());
            bucket.tokens
        }
    }

    fn limit(requests_per_minute: u32, burst: usize) -> RateLimit {
        RateLimit {
            requests_per_minute,
            max_concurrency: burst,
            min_delay: Duration::ZERO,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_empty() {
        let limiter = RateLimiter::new("TEST", &limit(60, 3));

        for _ in 0..3 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refills_over_time() {
        let limiter = RateLimiter::new("TEST", &limit(60, 1)); // 1 token/second

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(limiter.try_acquire());
        // Capped at capacity, not two tokens
        assert!(!limiter.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_for_next_token() {
        let limiter = RateLimiter::new("TEST", &limit(60, 1));
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(999));
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_delay_spaces_requests_within_burst() {
        let limiter = RateLimiter::new(
            "TEST",
            &RateLimit {
                requests_per_minute: 600,
                max_concurrency: 5,
                min_delay: Duration::from_millis(100),
            },
        );

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_available_reports_tokens() {
        let limiter = RateLimiter::new("TEST", &limit(60, 5));
        limiter.try_acquire();
        limiter.try_acquire();
        assert!((limiter.available() - 3.0).abs() < 0.01);
    }
}
