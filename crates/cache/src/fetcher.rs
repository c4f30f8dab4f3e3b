//! Read-through fetcher.
//!
//! Orchestrates one lookup:
//! 1. Derive the key from the request kind and parameters
//! 2. Serve a fresh entry if there is one
//! 3. Otherwise call the producer through the retry policy
//! 4. On success store the value, on exhaustion return the fallback
//!
//! Fallback values are never written to the store, so the next call goes back
//! to the upstream instead of pinning a degraded value.
//!
//! The check-then-write sequence is not serialized. Two concurrent misses for
//! the same key both call the producer and the last write wins.

use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{CacheConfig, EmptyResultPolicy};
use crate::errors::UpstreamError;
use crate::freshness::{is_fresh, FreshnessWindow};
use crate::key::CacheKey;
use crate::retry::RetryPolicy;
use crate::stats::{CacheStats, CacheStatsSnapshot, FetchSource, Fetched};
use crate::store::{CacheEntry, EntryStore};
use crate::value::CacheValue;

/// Time-bounded memoization in front of a slow or rate-limited upstream.
pub struct ReadThroughCache<V> {
    name: String,
    store: EntryStore<V>,
    window: FreshnessWindow,
    retry: RetryPolicy,
    empty_result_policy: EmptyResultPolicy,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl<V: CacheValue> ReadThroughCache<V> {
    /// Create a cache using the system clock.
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Self {
        Self::with_clock(name, config, Arc::new(SystemClock))
    }

    /// Create a cache reading time from `clock`.
    pub fn with_clock(name: impl Into<String>, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            store: EntryStore::with_capacity(config.max_entries),
            window: FreshnessWindow::new(config.freshness_window),
            retry: config.retry,
            empty_result_policy: config.empty_result_policy,
            clock,
            stats: CacheStats::default(),
        }
    }

    /// Fetch the value for `(kind, params)`.
    ///
    /// Never fails: the result is a fresh cache entry, a new upstream value,
    /// or whatever `fallback` produces.
    pub async fn fetch<I, S, P, Fut, F>(&self, kind: &str, params: I, producer: P, fallback: F) -> V
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: FnMut() -> Fut,
        Fut: Future<Output = Result<V, UpstreamError>>,
        F: FnOnce() -> V,
    {
        self.fetch_with_source(kind, params, producer, fallback)
            .await
            .into_value()
    }

    /// Like [`fetch`](Self::fetch), also reporting where the value came from.
    pub async fn fetch_with_source<I, S, P, Fut, F>(
        &self,
        kind: &str,
        params: I,
        producer: P,
        fallback: F,
    ) -> Fetched<V>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: FnMut() -> Fut,
        Fut: Future<Output = Result<V, UpstreamError>>,
        F: FnOnce() -> V,
    {
        let key = CacheKey::derive(kind, params);
        self.fetch_key(key, producer, fallback).await
    }

    /// Fetch using an already derived key.
    pub async fn fetch_key<P, Fut, F>(&self, key: CacheKey, mut producer: P, fallback: F) -> Fetched<V>
    where
        P: FnMut() -> Fut,
        Fut: Future<Output = Result<V, UpstreamError>>,
        F: FnOnce() -> V,
    {
        if let Some(entry) = self.store.get(&key) {
            if is_fresh(&entry, self.clock.now(), self.window) {
                debug!("[{}] cache hit for '{}'", self.name, key);
                return self.served(entry.value, FetchSource::Cache);
            }
            debug!(
                "[{}] entry for '{}' is stale (stored at {}), refreshing",
                self.name, key, entry.stored_at
            );
        } else {
            debug!("[{}] cache miss for '{}'", self.name, key);
        }

        let name = self.name.as_str();
        let reject_empty = self.empty_result_policy == EmptyResultPolicy::TreatAsFailure;

        let attempt = || {
            let call = producer();
            async move {
                let value = call.await?;
                if reject_empty && value.is_empty_result() {
                    return Err(UpstreamError::EmptyResult {
                        upstream: name.to_string(),
                    });
                }
                Ok(value)
            }
        };

        match self.retry.run(key.as_str(), attempt).await {
            Ok(value) => {
                self.store.put(key.clone(), value.clone(), self.clock.now());
                debug!("[{}] stored fresh value for '{}'", self.name, key);
                self.served(value, FetchSource::Upstream)
            }
            Err(e) => {
                warn!(
                    "[{}] upstream {} failed for '{}': {}, serving fallback",
                    self.name,
                    e.upstream(),
                    key,
                    e
                );
                self.served(fallback(), FetchSource::Fallback)
            }
        }
    }

    /// Answer from `fallback` without a lookup or an upstream call, for
    /// requests the caller already knows cannot be served upstream.
    ///
    /// Counted as a fallback; nothing is stored.
    pub fn serve_fallback<F>(&self, fallback: F) -> Fetched<V>
    where
        F: FnOnce() -> V,
    {
        debug!("[{}] serving fallback without an upstream call", self.name);
        self.served(fallback(), FetchSource::Fallback)
    }

    fn served(&self, value: V, source: FetchSource) -> Fetched<V> {
        self.stats.record(source);
        Fetched { value, source }
    }

    /// Current entry for `key`, fresh or not, without affecting recency.
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry<V>> {
        self.store.peek(key)
    }

    /// Drop the entry for `key` so the next fetch goes upstream.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.store.invalidate(key)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Zero the hit, upstream and fallback counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot(
            &self.name,
            self.store.len(),
            self.store.capacity(),
            self.window.duration(),
        )
    }
}
