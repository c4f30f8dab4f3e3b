use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use wealthdash_market_data::{FinnhubProvider, MarketDataProvider, MarketDataService, OfflineProvider};

pub struct AppState {
    pub market_data: Arc<MarketDataService>,
}

pub fn init_tracing() {
    let log_format = std::env::var("WD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn MarketDataProvider> = match &config.finnhub_api_key {
        Some(key) => Arc::new(FinnhubProvider::new(key.clone())),
        None => {
            tracing::warn!(
                "WD_FINNHUB_API_KEY is not set, serving synthetic market data only"
            );
            Arc::new(OfflineProvider)
        }
    };
    tracing::info!("Market data provider in use: {}", provider.id());

    let market_data = Arc::new(MarketDataService::new(
        provider,
        config.market_data.clone(),
    ));

    Ok(Arc::new(AppState { market_data }))
}
