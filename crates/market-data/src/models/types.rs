/// Category of upstream data; also the kind prefix of cache keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Quotes,
    Sentiment,
    SectorPerformance,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Quotes => "quotes",
            RequestKind::Sentiment => "sentiment",
            RequestKind::SectorPerformance => "sectors",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize user supplied symbols: trimmed, upper case, sorted, unique.
pub fn normalize_symbols<I, S>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = symbols
        .into_iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbols() {
        assert_eq!(
            normalize_symbols([" msft", "AAPL", "aapl", ""]),
            vec!["AAPL".to_string(), "MSFT".to_string()]
        );
    }

    #[test]
    fn test_request_kind_tags() {
        assert_eq!(RequestKind::Quotes.as_str(), "quotes");
        assert_eq!(RequestKind::SectorPerformance.to_string(), "sectors");
    }
}
