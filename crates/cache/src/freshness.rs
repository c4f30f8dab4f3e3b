//! Freshness policy.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::store::CacheEntry;

/// Maximum age at which a cached value may be served without a refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreshnessWindow(Duration);

impl FreshnessWindow {
    pub fn new(window: Duration) -> Self {
        Self(window)
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    /// `now - stored_at < window`.
    ///
    /// An entry stamped in the future (clock stepped backwards) has a negative
    /// age and counts as fresh. A zero window never yields a fresh entry.
    pub fn is_fresh_at(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match now.signed_duration_since(stored_at).to_std() {
            Ok(age) => age < self.0,
            Err(_) => true,
        }
    }
}

impl From<Duration> for FreshnessWindow {
    fn from(window: Duration) -> Self {
        Self::new(window)
    }
}

/// Whether `entry` may still be returned at `now`.
pub fn is_fresh<V>(entry: &CacheEntry<V>, now: DateTime<Utc>, window: FreshnessWindow) -> bool {
    window.is_fresh_at(entry.stored_at, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheKey;
    use chrono::TimeZone;

    fn entry_at(stored_at: DateTime<Utc>) -> CacheEntry<u32> {
        CacheEntry {
            key: CacheKey::derive("quotes", ["AAPL"]),
            value: 1,
            stored_at,
        }
    }

    #[test]
    fn test_entry_within_window_is_fresh() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let window = FreshnessWindow::new(Duration::from_secs(300));
        let entry = entry_at(t0);

        assert!(is_fresh(&entry, t0, window));
        assert!(is_fresh(&entry, t0 + chrono::Duration::seconds(299), window));
    }

    #[test]
    fn test_entry_at_or_past_window_is_stale() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let window = FreshnessWindow::new(Duration::from_secs(300));
        let entry = entry_at(t0);

        assert!(!is_fresh(&entry, t0 + chrono::Duration::seconds(300), window));
        assert!(!is_fresh(&entry, t0 + chrono::Duration::minutes(6), window));
    }

    #[test]
    fn test_zero_window_is_never_fresh() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let window = FreshnessWindow::new(Duration::ZERO);
        assert!(!is_fresh(&entry_at(t0), t0, window));
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let window = FreshnessWindow::new(Duration::from_secs(60));
        let entry = entry_at(t0 + chrono::Duration::minutes(10));
        assert!(is_fresh(&entry, t0, window));
    }
}
