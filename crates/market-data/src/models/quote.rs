use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market quote for one symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol, upper case
    pub symbol: String,

    /// Current/last traded price
    pub price: Decimal,

    /// Absolute change against the previous close
    pub change: Decimal,

    /// Percentage change against the previous close
    pub change_percent: Decimal,

    /// Opening price of the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    /// Session high
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    /// Session low
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Previous session close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,

    /// Time of the quote
    pub timestamp: DateTime<Utc>,

    /// Source of the quote (FINNHUB, SYNTHETIC, etc.)
    pub source: String,
}

impl Quote {
    /// Create a quote with only price and change data
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        change_percent: Decimal,
        timestamp: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        let change = (price * change_percent)
            .checked_div(Decimal::ONE_HUNDRED + change_percent)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2);
        Self {
            symbol: symbol.into(),
            price,
            change,
            change_percent,
            open: None,
            high: None,
            low: None,
            previous_close: Some(price - change),
            timestamp,
            source: source.into(),
        }
    }

    /// Whether the quote came from the fallback generator
    pub fn is_synthetic(&self) -> bool {
        self.source == crate::fallback::SYNTHETIC_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_new_derives_change_from_percent() {
        let quote = Quote::new("AAPL", dec!(110), dec!(10), Utc::now(), "FINNHUB");
        assert_eq!(quote.change, dec!(10));
        assert_eq!(quote.previous_close, Some(dec!(100)));
        assert!(quote.open.is_none());
        assert!(!quote.is_synthetic());
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let quote = Quote::new("MSFT", dec!(400), dec!(0), Utc::now(), "FINNHUB");
        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("changePercent").is_some());
        assert!(json.get("previousClose").is_some());
        assert!(json.get("open").is_none());
    }
}
