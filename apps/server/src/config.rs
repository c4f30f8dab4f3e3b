use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use wealthdash_cache::RetryPolicy;
use wealthdash_market_data::MarketDataConfig;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Finnhub API key. Without one the server runs offline on synthetic data.
    pub finnhub_api_key: Option<String>,
    pub market_data: MarketDataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            finnhub_api_key: None,
            market_data: MarketDataConfig::default(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_var(name)
        .map(|raw| raw.parse::<T>().with_context(|| format!("Invalid {}: {}", name, raw)))
        .transpose()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Some(addr) = env_parse::<SocketAddr>("WD_LISTEN_ADDR")? {
            config.listen_addr = addr;
        }
        if let Some(origins) = env_var("WD_CORS_ALLOW_ORIGINS") {
            config.cors_allow = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(timeout_ms) = env_parse::<u64>("WD_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = Duration::from_millis(timeout_ms);
        }
        config.finnhub_api_key = env_var("WD_FINNHUB_API_KEY");

        let market = &mut config.market_data;
        if let Some(ttl) = env_parse::<u64>("WD_CACHE_TTL_SECS")? {
            market.quotes.freshness_window = Duration::from_secs(ttl);
        }
        if let Some(max_entries) = env_parse::<usize>("WD_CACHE_MAX_ENTRIES")? {
            for cache in [&mut market.quotes, &mut market.sentiment, &mut market.sectors] {
                cache.max_entries = max_entries;
            }
        }
        let attempts = env_parse::<u32>("WD_RETRY_MAX_ATTEMPTS")?;
        let base_delay_ms = env_parse::<u64>("WD_RETRY_BASE_DELAY_MS")?;
        let attempt_timeout_ms = env_parse::<u64>("WD_RETRY_ATTEMPT_TIMEOUT_MS")?;
        for cache in [&mut market.quotes, &mut market.sentiment, &mut market.sectors] {
            let current = &cache.retry;
            if attempts.is_some() || base_delay_ms.is_some() {
                cache.retry = RetryPolicy::new(
                    attempts.unwrap_or(current.max_attempts),
                    base_delay_ms
                        .map(Duration::from_millis)
                        .unwrap_or(current.base_delay),
                )
                .with_attempt_timeout(current.attempt_timeout);
            }
            if let Some(timeout_ms) = attempt_timeout_ms {
                cache.retry.attempt_timeout = Duration::from_millis(timeout_ms);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Every upstream retry budget must finish before the HTTP request times
    /// out, otherwise a stalled provider surfaces as a 408 instead of the
    /// synthetic fallback.
    pub fn validate(&self) -> anyhow::Result<()> {
        let market = &self.market_data;
        for (cache, settings) in [
            ("quotes", &market.quotes),
            ("sentiment", &market.sentiment),
            ("sectors", &market.sectors),
        ] {
            let worst_case = settings.retry.worst_case_duration();
            if worst_case >= self.request_timeout {
                anyhow::bail!(
                    "WD_REQUEST_TIMEOUT_MS ({} ms) must exceed the {} retry budget ({} ms); \
                     raise it or lower WD_RETRY_ATTEMPT_TIMEOUT_MS / WD_RETRY_MAX_ATTEMPTS",
                    self.request_timeout.as_millis(),
                    cache,
                    worst_case.as_millis()
                );
            }
        }
        Ok(())
    }
}
