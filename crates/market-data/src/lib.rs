//! Wealthdash Market Data Crate
//!
//! Market data for the dashboard (quotes, news sentiment, sector performance)
//! served through the read-through caches of `wealthdash-cache`.
//!
//! # Architecture
//!
//! ```text
//! +---------------------+
//! |  MarketDataService  |  (one ReadThroughCache per data kind)
//! +---------------------+
//!            |
//!            v
//! +---------------------+      exhausted      +---------------------+
//! | MarketDataProvider  | ------------------> |      fallback       |
//! | (Finnhub, Offline)  |                     | (synthetic, seeded) |
//! +---------------------+                     +---------------------+
//!            |
//!            v
//! +---------------------+
//! |     RateLimiter     |  (token bucket per provider)
//! +---------------------+
//! ```
//!
//! # Core Types
//!
//! - [`MarketDataService`] - Cached entry point used by the server
//! - [`MarketDataProvider`] - Upstream abstraction
//! - [`Quote`], [`Sentiment`], [`SectorPerformance`] - Returned data

pub mod fallback;
pub mod models;
pub mod provider;
pub mod rate_limiter;
pub mod service;

pub use models::{
    normalize_symbols, Quote, RequestKind, SectorPerformance, Sentiment, SentimentLabel,
    SECTOR_ETFS,
};
pub use provider::finnhub::FinnhubProvider;
pub use provider::offline::OfflineProvider;
pub use provider::{MarketDataProvider, RateLimit};
pub use rate_limiter::RateLimiter;
pub use service::{MarketDataConfig, MarketDataService};

// Re-exported so callers don't need a direct dependency for the common types
pub use wealthdash_cache::{CacheStatsSnapshot, FetchSource, Fetched};
