//! Market data provider trait definitions.

use async_trait::async_trait;
use wealthdash_cache::UpstreamError;

use crate::models::{Quote, SectorPerformance, Sentiment};

/// Trait for market data providers.
///
/// Implementations talk to one external source and report failures as
/// [`UpstreamError`]; retries, caching and fallbacks are handled by
/// [`MarketDataService`](crate::MarketDataService).
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use wealthdash_market_data::provider::MarketDataProvider;
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement quote, sentiment and sector methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "FINNHUB". Used for logging and as
    /// the `source` of the values it returns.
    fn id(&self) -> &'static str;

    /// Fetch latest quotes for the given symbols.
    ///
    /// `symbols` is already normalized (upper case, sorted, unique). Symbols
    /// the provider does not know may be left out of the result.
    async fn get_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, UpstreamError>;

    /// Fetch news sentiment for one symbol.
    async fn get_sentiment(&self, symbol: &str) -> Result<Sentiment, UpstreamError>;

    /// Fetch today's performance for every market sector.
    async fn get_sector_performance(&self) -> Result<Vec<SectorPerformance>, UpstreamError>;
}
