//! Finnhub market data provider implementation.
//!
//! This module provides market data from Finnhub API:
//! - Latest quotes via /quote
//! - News sentiment via /news-sentiment
//! - Sector performance derived from the SPDR sector ETF quotes
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};
use wealthdash_cache::UpstreamError;

use crate::models::{rank_sectors, sector_for_etf, Quote, SectorPerformance, Sentiment, SECTOR_ETFS};
use crate::provider::{MarketDataProvider, RateLimit};
use crate::rate_limiter::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Transport timeout per request. The cache's retry policy bounds each
/// attempt as well; this keeps a stalled socket from outliving it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Free tier: 60 calls per minute.
const RATE_LIMIT: RateLimit = RateLimit {
    requests_per_minute: 60,
    max_concurrency: 5,
    min_delay: Duration::from_millis(100),
};

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Response from /news-sentiment endpoint
#[derive(Debug, Deserialize)]
struct SentimentResponse {
    #[serde(default)]
    buzz: Option<BuzzResponse>,
    #[serde(default)]
    sentiment: Option<SharesResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuzzResponse {
    articles_in_last_week: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SharesResponse {
    bearish_percent: Option<f64>,
    bullish_percent: Option<f64>,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

fn decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok().map(|d| d.round_dp(4))
}

fn malformed(context: &str, e: impl std::fmt::Display) -> UpstreamError {
    UpstreamError::Malformed {
        upstream: PROVIDER_ID.to_string(),
        message: format!("Failed to parse {} response: {}", context, e),
    }
}

/// Map a non-success HTTP status to an upstream error.
///
/// 403 is what Finnhub sends once the plan's quota is used up, so it is
/// treated like 429. Other client errors are rejections and are not retried,
/// except 408 which is a timeout.
fn classify_status(status: StatusCode, body: &str) -> UpstreamError {
    let upstream = PROVIDER_ID.to_string();
    let message = || {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| format!("HTTP {} - {}", status, body))
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => {
            UpstreamError::RateLimited { upstream }
        }
        StatusCode::REQUEST_TIMEOUT => UpstreamError::Timeout { upstream },
        StatusCode::UNAUTHORIZED => UpstreamError::Rejected {
            upstream,
            message: "Invalid or missing API key".to_string(),
        },
        s if s.is_client_error() => UpstreamError::Rejected {
            upstream,
            message: message(),
        },
        _ => UpstreamError::Unavailable {
            upstream,
            message: message(),
        },
    }
}

/// Parse a /quote body. `Ok(None)` means Finnhub does not know the symbol.
fn parse_quote(symbol: &str, text: &str) -> Result<Option<Quote>, UpstreamError> {
    let response: QuoteResponse = serde_json::from_str(text).map_err(|e| malformed("quote", e))?;

    let price = match response.c {
        Some(c) => c,
        None => return Ok(None),
    };

    // Finnhub returns zeros for unknown symbols instead of an error
    if price == 0.0 && response.o.unwrap_or(0.0) == 0.0 && response.pc.unwrap_or(0.0) == 0.0 {
        return Ok(None);
    }

    let price = decimal(price).ok_or_else(|| malformed("quote", format!("invalid price {}", price)))?;
    let change_percent = response.dp.and_then(decimal).unwrap_or(Decimal::ZERO);
    let previous_close = response.pc.and_then(decimal);
    let change = previous_close
        .map(|pc| price - pc)
        .unwrap_or(Decimal::ZERO);
    let timestamp = response
        .t
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(Some(Quote {
        symbol: symbol.to_string(),
        price,
        change,
        change_percent,
        open: response.o.and_then(decimal),
        high: response.h.and_then(decimal),
        low: response.l.and_then(decimal),
        previous_close,
        timestamp,
        source: PROVIDER_ID.to_string(),
    }))
}

/// Parse a /news-sentiment body.
///
/// A symbol without coverage comes back as empty objects and parses to a
/// zero reading, which the cache treats as an empty result.
fn parse_sentiment(symbol: &str, text: &str) -> Result<Sentiment, UpstreamError> {
    let response: SentimentResponse =
        serde_json::from_str(text).map_err(|e| malformed("sentiment", e))?;

    let articles = response
        .buzz
        .and_then(|b| b.articles_in_last_week)
        .unwrap_or(0);
    let (bullish, bearish) = response
        .sentiment
        .map(|s| {
            (
                s.bullish_percent.and_then(decimal).unwrap_or(Decimal::ZERO),
                s.bearish_percent.and_then(decimal).unwrap_or(Decimal::ZERO),
            )
        })
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));

    Ok(Sentiment::from_shares(symbol, bullish, bearish, articles, PROVIDER_ID))
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
///
/// Free tier is limited to 60 API calls per minute; every request goes
/// through the provider's own [`RateLimiter`].
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
    limiter: RateLimiter,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a provider against a different API root (proxies, sandboxes).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        let limiter = RateLimiter::new(PROVIDER_ID, &RATE_LIMIT);

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
        }
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, UpstreamError> {
        self.limiter.acquire().await;

        let url = format!("{}{}", self.base_url, endpoint);

        // API key as header rather than query param
        let request = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout {
                    upstream: PROVIDER_ID.to_string(),
                }
            } else {
                UpstreamError::Unavailable {
                    upstream: PROVIDER_ID.to_string(),
                    message: format!("Request failed: {}", e),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        response.text().await.map_err(|e| UpstreamError::Unavailable {
            upstream: PROVIDER_ID.to_string(),
            message: format!("Failed to read response: {}", e),
        })
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>, UpstreamError> {
        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;
        parse_quote(symbol, &text)
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, UpstreamError> {
        let results = join_all(symbols.iter().map(|s| self.fetch_quote(s))).await;

        let mut quotes = Vec::with_capacity(symbols.len());
        for (symbol, result) in symbols.iter().zip(results) {
            match result? {
                Some(quote) => quotes.push(quote),
                None => warn!("Finnhub: no quote data for symbol {}", symbol),
            }
        }

        debug!("Finnhub: fetched {}/{} quotes", quotes.len(), symbols.len());
        Ok(quotes)
    }

    async fn get_sentiment(&self, symbol: &str) -> Result<Sentiment, UpstreamError> {
        let text = self.fetch("/news-sentiment", &[("symbol", symbol)]).await?;
        parse_sentiment(symbol, &text)
    }

    async fn get_sector_performance(&self) -> Result<Vec<SectorPerformance>, UpstreamError> {
        let etfs: Vec<String> = SECTOR_ETFS.iter().map(|(_, etf)| etf.to_string()).collect();
        let quotes = self.get_quotes(&etfs).await?;

        let mut sectors: Vec<SectorPerformance> = quotes
            .into_iter()
            .filter_map(|quote| {
                let sector = sector_for_etf(&quote.symbol)?;
                Some(SectorPerformance {
                    sector: sector.to_string(),
                    etf_symbol: quote.symbol,
                    change_percent: quote.change_percent.round_dp(2),
                    source: PROVIDER_ID.to_string(),
                })
            })
            .collect();
        rank_sectors(&mut sectors);
        Ok(sectors)
    }
}
