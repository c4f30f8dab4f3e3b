//! Wealthdash Cache Crate
//!
//! Read-through, time-bounded memoization for slow or rate-limited upstream
//! calls (market quotes, news sentiment, sector performance).
//!
//! # Overview
//!
//! ```text
//! caller ──> CacheKey::derive(kind, params)
//!                    │
//!                    v
//!            EntryStore (LRU) ──fresh?──> value            (FetchSource::Cache)
//!                    │ miss / stale
//!                    v
//!            RetryPolicy::run(producer)
//!               │ ok                 │ exhausted
//!               v                    v
//!         store + value        fallback(), not stored
//!     (FetchSource::Upstream)  (FetchSource::Fallback)
//! ```
//!
//! # Core Types
//!
//! - [`ReadThroughCache`] - The fetcher every caller goes through
//! - [`CacheKey`] - Normalized request identity
//! - [`EntryStore`] / [`CacheEntry`] - Bounded key → (value, stored_at) map
//! - [`FreshnessWindow`] - Staleness predicate
//! - [`RetryPolicy`] - Attempt limit and linear backoff
//! - [`UpstreamError`] - What producers report; never surfaces to callers
//! - [`Clock`] - Injectable time source ([`SystemClock`], [`ManualClock`])

pub mod clock;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod freshness;
pub mod key;
pub mod retry;
pub mod stats;
pub mod store;
pub mod value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, EmptyResultPolicy};
pub use errors::{RetryClass, UpstreamError};
pub use fetcher::ReadThroughCache;
pub use freshness::{is_fresh, FreshnessWindow};
pub use key::CacheKey;
pub use retry::RetryPolicy;
pub use stats::{CacheStats, CacheStatsSnapshot, FetchSource, Fetched};
pub use store::{CacheEntry, EntryStore};
pub use value::CacheValue;
