//! Market data models.

mod quote;
mod sector;
mod sentiment;
mod types;

pub use quote::Quote;
pub use sector::{rank_sectors, sector_for_etf, SectorPerformance, SECTOR_ETFS};
pub use sentiment::{Sentiment, SentimentLabel};
pub use types::{normalize_symbols, RequestKind};
