//! Per-cache configuration.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Default freshness window: 5 minutes.
const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(300);

/// Default maximum number of entries before LRU eviction kicks in.
const DEFAULT_MAX_ENTRIES: usize = 1024;

/// What to do with a successful upstream answer that carries no data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyResultPolicy {
    /// Count it as a failed attempt: retry, then fall back.
    #[default]
    TreatAsFailure,
    /// Cache and return it like any other value.
    Accept,
}

/// Configuration for one [`ReadThroughCache`](crate::ReadThroughCache).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum age at which an entry is served without calling the upstream.
    pub freshness_window: Duration,
    /// Maximum number of entries kept in memory.
    pub max_entries: usize,
    /// Retry policy applied to every upstream call.
    pub retry: RetryPolicy,
    /// Handling of empty upstream payloads.
    pub empty_result_policy: EmptyResultPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            max_entries: DEFAULT_MAX_ENTRIES,
            retry: RetryPolicy::default(),
            empty_result_policy: EmptyResultPolicy::default(),
        }
    }
}

impl CacheConfig {
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_result_policy = policy;
        self
    }
}
