use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GICS sectors and the SPDR ETF tracking each of them.
pub const SECTOR_ETFS: &[(&str, &str)] = &[
    ("Technology", "XLK"),
    ("Financials", "XLF"),
    ("Health Care", "XLV"),
    ("Energy", "XLE"),
    ("Consumer Discretionary", "XLY"),
    ("Consumer Staples", "XLP"),
    ("Industrials", "XLI"),
    ("Utilities", "XLU"),
    ("Materials", "XLB"),
    ("Real Estate", "XLRE"),
    ("Communication Services", "XLC"),
];

/// Sector name for a sector ETF symbol.
pub fn sector_for_etf(symbol: &str) -> Option<&'static str> {
    SECTOR_ETFS
        .iter()
        .find(|(_, etf)| etf.eq_ignore_ascii_case(symbol))
        .map(|(sector, _)| *sector)
}

/// Daily performance of one market sector
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorPerformance {
    pub sector: String,
    pub etf_symbol: String,
    pub change_percent: Decimal,
    pub source: String,
}

/// Sort best performer first.
pub fn rank_sectors(sectors: &mut [SectorPerformance]) {
    sectors.sort_by(|a, b| b.change_percent.cmp(&a.change_percent));
}
