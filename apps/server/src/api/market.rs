use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use wealthdash_market_data::{
    CacheStatsSnapshot, FetchSource, Fetched, Quote, SectorPerformance, Sentiment,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Upper bound on symbols per quote request; each one costs an upstream call.
const MAX_SYMBOLS_PER_REQUEST: usize = 50;

/// Market data plus where it was served from.
#[derive(Serialize)]
pub struct SourcedResponse<T> {
    source: FetchSource,
    data: T,
}

impl<T> From<Fetched<T>> for SourcedResponse<T> {
    fn from(fetched: Fetched<T>) -> Self {
        Self {
            source: fetched.source,
            data: fetched.value,
        }
    }
}

#[derive(Deserialize)]
pub struct QuotesQuery {
    symbols: Option<String>,
}

pub async fn get_quotes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuotesQuery>,
) -> ApiResult<Json<SourcedResponse<Vec<Quote>>>> {
    let symbols: Vec<&str> = query
        .symbols
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter 'symbols' is required".to_string(),
        ));
    }
    if symbols.len() > MAX_SYMBOLS_PER_REQUEST {
        return Err(ApiError::BadRequest(format!(
            "At most {} symbols per request",
            MAX_SYMBOLS_PER_REQUEST
        )));
    }

    let fetched = state.market_data.get_quotes(&symbols).await;
    Ok(Json(fetched.into()))
}

pub async fn get_sentiment(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<SourcedResponse<Sentiment>>> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("Symbol is required".to_string()));
    }
    let fetched = state.market_data.get_sentiment(symbol).await;
    Ok(Json(fetched.into()))
}

pub async fn get_sector_performance(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SourcedResponse<Vec<SectorPerformance>>>> {
    let fetched = state.market_data.get_sector_performance().await;
    Ok(Json(fetched.into()))
}

pub async fn get_cache_stats(State(state): State<Arc<AppState>>) -> Json<Vec<CacheStatsSnapshot>> {
    Json(state.market_data.cache_stats())
}

pub async fn clear_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.market_data.clear_caches();
    StatusCode::NO_CONTENT
}
