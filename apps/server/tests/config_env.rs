use std::time::Duration;

use wealthdash_server::config::Config;

const VARS: [&str; 8] = [
    "WD_LISTEN_ADDR",
    "WD_REQUEST_TIMEOUT_MS",
    "WD_FINNHUB_API_KEY",
    "WD_CACHE_TTL_SECS",
    "WD_CACHE_MAX_ENTRIES",
    "WD_RETRY_MAX_ATTEMPTS",
    "WD_RETRY_BASE_DELAY_MS",
    "WD_RETRY_ATTEMPT_TIMEOUT_MS",
];

fn cleanup_env() {
    for key in VARS {
        std::env::remove_var(key);
    }
}

// One test per binary: the process environment is shared between threads.
#[test]
fn from_env_applies_overrides_and_rejects_garbage() {
    cleanup_env();
    std::env::set_var("WD_LISTEN_ADDR", "127.0.0.1:9090");
    std::env::set_var("WD_REQUEST_TIMEOUT_MS", "1500");
    std::env::set_var("WD_FINNHUB_API_KEY", "  ");
    std::env::set_var("WD_CACHE_TTL_SECS", "60");
    std::env::set_var("WD_CACHE_MAX_ENTRIES", "16");
    std::env::set_var("WD_RETRY_MAX_ATTEMPTS", "5");
    std::env::set_var("WD_RETRY_BASE_DELAY_MS", "10");
    std::env::set_var("WD_RETRY_ATTEMPT_TIMEOUT_MS", "200");

    let config = Config::from_env().unwrap();
    assert_eq!(config.listen_addr.port(), 9090);
    assert_eq!(config.request_timeout, Duration::from_millis(1500));
    assert!(config.finnhub_api_key.is_none());

    let market = &config.market_data;
    assert_eq!(market.quotes.freshness_window, Duration::from_secs(60));
    // TTL override is for quotes only
    assert_eq!(market.sentiment.freshness_window, Duration::from_secs(900));
    assert_eq!(market.sectors.max_entries, 16);
    assert_eq!(market.sentiment.retry.max_attempts, 5);
    assert_eq!(market.quotes.retry.base_delay, Duration::from_millis(10));
    assert_eq!(market.sectors.retry.attempt_timeout, Duration::from_millis(200));

    // 5 x 200 ms attempts plus backoff no longer fit in one second
    std::env::set_var("WD_REQUEST_TIMEOUT_MS", "1000");
    let err = Config::from_env().err().unwrap();
    assert!(err.to_string().contains("WD_REQUEST_TIMEOUT_MS"));
    std::env::set_var("WD_REQUEST_TIMEOUT_MS", "1500");

    std::env::set_var("WD_CACHE_TTL_SECS", "five minutes");
    let err = Config::from_env().err().unwrap();
    assert!(err.to_string().contains("WD_CACHE_TTL_SECS"));

    cleanup_env();
}
