use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wealthdash_cache::CacheValue;

/// Score above which sentiment reads as bullish (and below its negation, bearish).
const LABEL_THRESHOLD: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Coarse reading of a sentiment score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl SentimentLabel {
    pub fn from_score(score: Decimal) -> Self {
        if score > LABEL_THRESHOLD {
            Self::Bullish
        } else if score < -LABEL_THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

/// News sentiment for one symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    pub symbol: String,

    /// Net score in [-1, 1]: bullish share minus bearish share
    pub score: Decimal,

    pub label: SentimentLabel,

    /// Share of bullish articles, 0..=1
    pub bullish_percent: Decimal,

    /// Share of bearish articles, 0..=1
    pub bearish_percent: Decimal,

    /// Articles the score is based on
    pub articles_in_last_week: u32,

    pub source: String,
}

impl Sentiment {
    pub fn from_shares(
        symbol: impl Into<String>,
        bullish_percent: Decimal,
        bearish_percent: Decimal,
        articles_in_last_week: u32,
        source: impl Into<String>,
    ) -> Self {
        let score = (bullish_percent - bearish_percent)
            .clamp(-Decimal::ONE, Decimal::ONE)
            .round_dp(4);
        Self {
            symbol: symbol.into(),
            score,
            label: SentimentLabel::from_score(score),
            bullish_percent,
            bearish_percent,
            articles_in_last_week,
            source: source.into(),
        }
    }
}

/// A sentiment reading with no articles behind it counts as an empty result.
impl CacheValue for Sentiment {
    fn is_empty_result(&self) -> bool {
        self.articles_in_last_week == 0
            && self.bullish_percent.is_zero()
            && self.bearish_percent.is_zero()
    }
}
