//! Cached market data access for the dashboard.
//!
//! `MarketDataService` owns one [`ReadThroughCache`] per data kind and sends
//! every request through it: fresh entries are served as is, misses go to the
//! provider with retries, and exhausted retries fall back to the synthetic
//! generators in [`crate::fallback`]. Callers always get data back.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use wealthdash_cache::{
    CacheConfig, CacheStatsSnapshot, Clock, Fetched, ReadThroughCache, RetryPolicy, SystemClock,
};

use crate::fallback::{synthetic_quotes, synthetic_sectors, synthetic_sentiment};
use crate::models::{normalize_symbols, Quote, RequestKind, SectorPerformance, Sentiment};
use crate::provider::MarketDataProvider;

/// Sentiment and sector data move slowly; keep them longer than quotes.
const SLOW_DATA_WINDOW: Duration = Duration::from_secs(15 * 60);

/// One sector refresh quotes every sector ETF, which takes several seconds
/// of provider pacing on a cold rate limiter.
const SECTOR_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(8);

/// Cache settings per data kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketDataConfig {
    pub quotes: CacheConfig,
    pub sentiment: CacheConfig,
    pub sectors: CacheConfig,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            quotes: CacheConfig::default(),
            sentiment: CacheConfig::default().with_freshness_window(SLOW_DATA_WINDOW),
            sectors: CacheConfig::default()
                .with_freshness_window(SLOW_DATA_WINDOW)
                .with_retry(RetryPolicy::default().with_attempt_timeout(SECTOR_ATTEMPT_TIMEOUT)),
        }
    }
}

/// Quotes, sentiment and sector performance behind read-through caches.
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    quotes: ReadThroughCache<Vec<Quote>>,
    sentiment: ReadThroughCache<Sentiment>,
    sectors: ReadThroughCache<Vec<SectorPerformance>>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: MarketDataConfig) -> Self {
        Self::with_clock(provider, config, Arc::new(SystemClock))
    }

    /// Build a service whose caches and fallback timestamps read `clock`.
    pub fn with_clock(
        provider: Arc<dyn MarketDataProvider>,
        config: MarketDataConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            "Market data service using provider {} (quotes window {:?}, sentiment window {:?}, sectors window {:?})",
            provider.id(),
            config.quotes.freshness_window,
            config.sentiment.freshness_window,
            config.sectors.freshness_window,
        );
        Self {
            quotes: ReadThroughCache::with_clock(
                RequestKind::Quotes.as_str(),
                config.quotes,
                clock.clone(),
            ),
            sentiment: ReadThroughCache::with_clock(
                RequestKind::Sentiment.as_str(),
                config.sentiment,
                clock.clone(),
            ),
            sectors: ReadThroughCache::with_clock(
                RequestKind::SectorPerformance.as_str(),
                config.sectors,
                clock.clone(),
            ),
            provider,
            clock,
        }
    }

    /// Latest quotes for `symbols`.
    ///
    /// Symbols are normalized first, so `["msft", "AAPL"]` and
    /// `["AAPL", "MSFT"]` share one cache entry. An empty list never reaches
    /// the provider; it is answered (and counted) as an empty fallback.
    pub async fn get_quotes<S: AsRef<str>>(&self, symbols: &[S]) -> Fetched<Vec<Quote>> {
        let symbols = normalize_symbols(symbols);
        let provider = &self.provider;
        let clock = &self.clock;
        if symbols.is_empty() {
            debug!("Quote request without symbols, nothing to fetch");
            return self
                .quotes
                .serve_fallback(|| synthetic_quotes(&symbols, clock.now()));
        }

        self.quotes
            .fetch_with_source(
                RequestKind::Quotes.as_str(),
                &symbols,
                || provider.get_quotes(&symbols),
                || synthetic_quotes(&symbols, clock.now()),
            )
            .await
    }

    /// News sentiment for one symbol.
    pub async fn get_sentiment(&self, symbol: &str) -> Fetched<Sentiment> {
        let symbol = symbol.trim().to_uppercase();
        let provider = &self.provider;
        self.sentiment
            .fetch_with_source(
                RequestKind::Sentiment.as_str(),
                [symbol.as_str()],
                || provider.get_sentiment(&symbol),
                || synthetic_sentiment(&symbol),
            )
            .await
    }

    /// Today's performance for every sector, best first.
    pub async fn get_sector_performance(&self) -> Fetched<Vec<SectorPerformance>> {
        let provider = &self.provider;
        let clock = &self.clock;
        self.sectors
            .fetch_with_source(
                RequestKind::SectorPerformance.as_str(),
                std::iter::empty::<&str>(),
                || provider.get_sector_performance(),
                || synthetic_sectors(clock.now()),
            )
            .await
    }

    pub fn cache_stats(&self) -> Vec<CacheStatsSnapshot> {
        vec![self.quotes.stats(), self.sentiment.stats(), self.sectors.stats()]
    }

    /// Drop every cached entry and zero the counters; the next request per
    /// key goes upstream.
    pub fn clear_caches(&self) {
        self.quotes.clear();
        self.sentiment.clear();
        self.sectors.clear();
        self.quotes.reset_stats();
        self.sentiment.reset_stats();
        self.sectors.reset_stats();
        info!("Market data caches cleared");
    }
}
