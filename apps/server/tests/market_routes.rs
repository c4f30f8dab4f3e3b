use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use wealthdash_server::{api::app_router, build_state, config::Config};

/// Router with no API key configured, so every market route is answered
/// offline from synthetic data.
async fn offline_router() -> Router {
    let config = Config::default();
    let state = build_state(&config).await.unwrap();
    app_router(state, &config)
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn healthz_works() {
    let app = offline_router().await;
    let response = app
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn quotes_are_served_from_fallback_when_offline() {
    let app = offline_router().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/market/quotes?symbols=msft,%20AAPL").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["symbol"], "AAPL");
    assert_eq!(data[1]["symbol"], "MSFT");
    assert_eq!(data[0]["source"], "SYNTHETIC");
    assert!(data[0].get("changePercent").is_some());
}

#[tokio::test]
async fn quotes_without_symbols_is_bad_request() {
    let app = offline_router().await;

    for uri in ["/api/v1/market/quotes", "/api/v1/market/quotes?symbols=%20,%20"] {
        let (status, body) = send(&app, Method::GET, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], 400);
        assert!(body["message"].as_str().unwrap().contains("symbols"));
    }
}

#[tokio::test]
async fn too_many_symbols_is_bad_request() {
    let app = offline_router().await;
    let symbols: Vec<String> = (0..51).map(|i| format!("S{}", i)).collect();
    let uri = format!("/api/v1/market/quotes?symbols={}", symbols.join(","));

    let (status, _) = send(&app, Method::GET, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sentiment_and_sectors_routes() {
    let app = offline_router().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/market/sentiment/aapl").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["data"]["symbol"], "AAPL");
    assert!(body["data"]["label"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/v1/market/sectors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn cache_stats_count_fallbacks() {
    let app = offline_router().await;

    send(&app, Method::GET, "/api/v1/market/quotes?symbols=AAPL").await;
    send(&app, Method::GET, "/api/v1/market/quotes?symbols=AAPL").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/market/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats = body.as_array().unwrap();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0]["name"], "quotes");
    // Fallbacks are never cached, so both requests fell back
    assert_eq!(stats[0]["fallbacks"], 2);
    assert_eq!(stats[0]["cacheHits"], 0);
    assert_eq!(stats[0]["entries"], 0);
    assert_eq!(stats[0]["totalRequests"], 2);
    assert_eq!(stats[0]["fallbackRatio"], 1.0);
}

#[tokio::test]
async fn unknown_api_route_is_json_not_found() {
    let app = offline_router().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/market/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], "Not Found");
}
