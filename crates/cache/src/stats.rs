//! Fetch outcome tracking.
//!
//! Every fetch is served from exactly one place: the cache, the upstream, or
//! the fallback generator. The counters here make a sustained upstream outage
//! visible even though callers never see an error.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Where a fetched value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    /// A fresh cache entry; the upstream was not called.
    Cache,
    /// A successful upstream call; the value is now cached.
    Upstream,
    /// The fallback generator; nothing was cached.
    Fallback,
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Upstream => write!(f, "upstream"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A value plus the place it was served from.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<V> {
    pub value: V,
    pub source: FetchSource,
}

impl<V> Fetched<V> {
    pub fn into_value(self) -> V {
        self.value
    }
}

/// Lock-free counters for one cache instance.
#[derive(Debug, Default)]
pub struct CacheStats {
    cache_hits: AtomicU64,
    upstream_fetches: AtomicU64,
    fallbacks: AtomicU64,
}

impl CacheStats {
    pub fn record(&self, source: FetchSource) {
        let counter = match source {
            FetchSource::Cache => &self.cache_hits,
            FetchSource::Upstream => &self.upstream_fetches,
            FetchSource::Fallback => &self.fallbacks,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.upstream_fetches.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(
        &self,
        name: &str,
        entries: usize,
        capacity: usize,
        freshness_window: Duration,
    ) -> CacheStatsSnapshot {
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let upstream_fetches = self.upstream_fetches.load(Ordering::Relaxed);
        let fallbacks = self.fallbacks.load(Ordering::Relaxed);
        let total_requests = cache_hits + upstream_fetches + fallbacks;
        // Share of requests answered by the fallback generator, 0.0 when idle
        let fallback_ratio = match total_requests {
            0 => 0.0,
            total => fallbacks as f64 / total as f64,
        };

        CacheStatsSnapshot {
            name: name.to_string(),
            cache_hits,
            upstream_fetches,
            fallbacks,
            total_requests,
            fallback_ratio,
            entries,
            capacity,
            freshness_window_secs: freshness_window.as_secs(),
        }
    }
}

/// Point-in-time copy of a cache's counters.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsSnapshot {
    pub name: String,
    pub cache_hits: u64,
    pub upstream_fetches: u64,
    pub fallbacks: u64,
    pub total_requests: u64,
    pub fallback_ratio: f64,
    pub entries: usize,
    pub capacity: usize,
    pub freshness_window_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(300);

    #[test]
    fn test_counters_track_each_source() {
        let stats = CacheStats::default();
        stats.record(FetchSource::Upstream);
        stats.record(FetchSource::Cache);
        stats.record(FetchSource::Cache);
        stats.record(FetchSource::Fallback);

        let snapshot = stats.snapshot("quotes", 1, 16, WINDOW);
        assert_eq!(snapshot.cache_hits, 2);
        assert_eq!(snapshot.upstream_fetches, 1);
        assert_eq!(snapshot.fallbacks, 1);
        assert_eq!(snapshot.total_requests, 4);
        assert_eq!(snapshot.fallback_ratio, 0.25);
        assert_eq!(snapshot.freshness_window_secs, 300);

        stats.reset();
        assert_eq!(stats.snapshot("quotes", 0, 16, WINDOW).total_requests, 0);
    }

    #[test]
    fn test_idle_cache_has_zero_fallback_ratio() {
        let snapshot = CacheStats::default().snapshot("sectors", 0, 16, WINDOW);
        assert_eq!(snapshot.fallback_ratio, 0.0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(CacheStats::default().snapshot("quotes", 0, 16, WINDOW)).unwrap();
        assert!(json.get("fallbackRatio").is_some());
        assert!(json.get("freshnessWindowSecs").is_some());
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FetchSource::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(FetchSource::Upstream.to_string(), "upstream");
    }
}
