//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Rate limiting configuration
//! - Concrete providers: Finnhub over REST, and an offline stand-in used when
//!   no API key is configured

mod capabilities;
mod traits;

pub mod finnhub;
pub mod offline;

// Re-exports
pub use capabilities::RateLimit;
pub use traits::MarketDataProvider;
