//! Deterministic stand-in data served when the upstream cannot answer.
//!
//! Every generator is total and pure: the same symbol on the same day always
//! yields the same numbers, so a dashboard that keeps falling back does not
//! flicker between reloads. Values are seeded from an md5 digest of the
//! symbol (and the UTC date for prices that move day to day).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{rank_sectors, Quote, SectorPerformance, Sentiment, SECTOR_ETFS};

/// `source` tag carried by every generated value.
pub const SYNTHETIC_SOURCE: &str = "SYNTHETIC";

fn seed(parts: &[&str]) -> u64 {
    let digest = md5::compute(parts.join("|").as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.0[..8]);
    u64::from_le_bytes(bytes)
}

/// Map `seed` onto `[min, max]` in hundredths.
fn scaled(seed: u64, min_cents: i64, max_cents: i64) -> Decimal {
    let span = (max_cents - min_cents + 1) as u64;
    Decimal::new(min_cents + (seed % span) as i64, 2)
}

/// Synthetic quotes, one per symbol, in input order.
///
/// Prices fall between 20.00 and 520.00 and stay put for a symbol; the daily
/// change is re-rolled each UTC day within ±3.00%.
pub fn synthetic_quotes(symbols: &[String], now: DateTime<Utc>) -> Vec<Quote> {
    let day = now.date_naive().to_string();
    symbols
        .iter()
        .map(|symbol| {
            let price = scaled(seed(&[symbol]), 2_000, 52_000);
            let change_percent = scaled(seed(&[symbol, &day]), -300, 300);
            Quote::new(symbol.as_str(), price, change_percent, now, SYNTHETIC_SOURCE)
        })
        .collect()
}

/// Neutral-leaning synthetic sentiment with no articles behind it.
pub fn synthetic_sentiment(symbol: &str) -> Sentiment {
    let digest = seed(&[symbol, "sentiment"]);
    // Shares between 0.30 and 0.50 so the score stays near neutral
    let bullish = scaled(digest, 30, 50);
    let bearish = scaled(digest >> 16, 30, 50);
    Sentiment::from_shares(symbol, bullish, bearish, 0, SYNTHETIC_SOURCE)
}

/// One synthetic row per sector, ranked best first.
pub fn synthetic_sectors(now: DateTime<Utc>) -> Vec<SectorPerformance> {
    let day = now.date_naive().to_string();
    let mut sectors: Vec<SectorPerformance> = SECTOR_ETFS
        .iter()
        .map(|(sector, etf)| SectorPerformance {
            sector: sector.to_string(),
            etf_symbol: etf.to_string(),
            change_percent: scaled(seed(&[etf, &day]), -200, 200),
            source: SYNTHETIC_SOURCE.to_string(),
        })
        .collect();
    rank_sectors(&mut sectors);
    sectors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use wealthdash_cache::CacheValue;

    fn day(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quotes_are_deterministic_within_a_day() {
        let list = symbols(&["AAPL", "MSFT"]);
        let morning = synthetic_quotes(&list, day(3, 9));
        let evening = synthetic_quotes(&list, day(3, 20));

        assert_eq!(morning.len(), 2);
        for (a, b) in morning.iter().zip(&evening) {
            assert_eq!(a.price, b.price);
            assert_eq!(a.change_percent, b.change_percent);
        }
    }

    #[test]
    fn test_quotes_are_plausible() {
        let list = symbols(&["AAPL", "MSFT", "GOOG", "BRK.B", "^GSPC", "X"]);
        for quote in synthetic_quotes(&list, day(3, 12)) {
            assert!(quote.price >= dec!(20) && quote.price <= dec!(520), "{}", quote.price);
            assert!(quote.change_percent.abs() <= dec!(3));
            assert!(quote.is_synthetic());
        }
    }

    #[test]
    fn test_price_is_stable_across_days() {
        let list = symbols(&["AAPL"]);
        let monday = &synthetic_quotes(&list, day(3, 12))[0];
        let tuesday = &synthetic_quotes(&list, day(4, 12))[0];
        assert_eq!(monday.price, tuesday.price);
    }

    #[test]
    fn test_quotes_keep_input_order() {
        let list = symbols(&["MSFT", "AAPL"]);
        let quotes = synthetic_quotes(&list, day(3, 12));
        assert_eq!(quotes[0].symbol, "MSFT");
        assert_eq!(quotes[1].symbol, "AAPL");
        assert!(synthetic_quotes(&[], day(3, 12)).is_empty());
    }

    #[test]
    fn test_sentiment_is_near_neutral() {
        let sentiment = synthetic_sentiment("AAPL");
        assert_eq!(sentiment, synthetic_sentiment("AAPL"));
        assert!(sentiment.score.abs() <= dec!(0.2));
        assert_eq!(sentiment.articles_in_last_week, 0);
        assert_eq!(sentiment.source, SYNTHETIC_SOURCE);
        // Non-zero shares, so it would not be mistaken for an empty upstream answer
        assert!(!sentiment.is_empty_result());
    }

    #[test]
    fn test_sectors_cover_every_etf_ranked() {
        let sectors = synthetic_sectors(day(3, 12));
        assert_eq!(sectors.len(), SECTOR_ETFS.len());
        assert!(sectors
            .windows(2)
            .all(|w| w[0].change_percent >= w[1].change_percent));
        assert!(sectors.iter().all(|s| s.change_percent.abs() <= dec!(2)));
    }
}
