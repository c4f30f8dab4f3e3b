//! Cache key derivation.
//!
//! A key is `"{kind}:{p1},{p2},..."` where the parameters are trimmed,
//! sorted and deduplicated, so `["MSFT", "AAPL"]` and `["AAPL", "MSFT"]`
//! land on the same entry. Every part is percent-encoded, which keeps `,`
//! and `:` inside a symbol from colliding with the separators.

use std::fmt;

/// Normalized identifier of one logical upstream request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a request of `kind` with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use wealthdash_cache::CacheKey;
    ///
    /// let key = CacheKey::derive("quotes", ["MSFT", "AAPL"]);
    /// assert_eq!(key.as_str(), "quotes:AAPL,MSFT");
    ///
    /// let empty = CacheKey::derive("sectors", Vec::<String>::new());
    /// assert_eq!(empty.as_str(), "sectors:");
    /// ```
    pub fn derive<I, S>(kind: &str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts: Vec<String> = params
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        parts.sort_unstable();
        parts.dedup();

        let encoded = parts
            .iter()
            .map(|p| urlencoding::encode(p))
            .collect::<Vec<_>>()
            .join(",");

        Self(format!("{}:{}", urlencoding::encode(kind.trim()), encoded))
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
