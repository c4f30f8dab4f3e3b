//! Provider used when no upstream is configured.

use async_trait::async_trait;
use wealthdash_cache::UpstreamError;

use crate::models::{Quote, SectorPerformance, Sentiment};
use crate::provider::MarketDataProvider;

const PROVIDER_ID: &str = "OFFLINE";

/// Rejects every request so the service answers from its fallback
/// generators without retrying.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    fn rejected() -> UpstreamError {
        UpstreamError::Rejected {
            upstream: PROVIDER_ID.to_string(),
            message: "No market data API key configured".to_string(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for OfflineProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_quotes(&self, _symbols: &[String]) -> Result<Vec<Quote>, UpstreamError> {
        Err(Self::rejected())
    }

    async fn get_sentiment(&self, _symbol: &str) -> Result<Sentiment, UpstreamError> {
        Err(Self::rejected())
    }

    async fn get_sector_performance(&self) -> Result<Vec<SectorPerformance>, UpstreamError> {
        Err(Self::rejected())
    }
}
