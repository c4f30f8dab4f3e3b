//! Request budget a provider declares for itself.

use std::time::Duration;

/// Pacing limits for one provider, enforced by
/// [`RateLimiter`](crate::RateLimiter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Sustained request budget.
    pub requests_per_minute: u32,

    /// Requests that may go out back to back before pacing starts.
    pub max_concurrency: usize,

    /// Spacing enforced between any two requests, even within a burst.
    pub min_delay: Duration,
}
