//! Error types and retry classification for upstream producers.
//!
//! This module provides:
//! - [`UpstreamError`]: what a producer returns when it cannot deliver a value
//! - [`RetryClass`]: classification for determining retry behavior
//!
//! None of these errors ever leave [`ReadThroughCache`](crate::ReadThroughCache);
//! they drive retries and, once exhausted, the fallback path.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors an upstream producer can report.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The upstream rate limited the request (HTTP 429 or quota exceeded).
    #[error("Rate limited: {upstream}")]
    RateLimited {
        /// The upstream that rate limited the request
        upstream: String,
    },

    /// The request timed out before a response arrived.
    #[error("Timeout: {upstream}")]
    Timeout {
        /// The upstream that timed out
        upstream: String,
    },

    /// The upstream failed to answer (connection error, 5xx).
    #[error("Upstream unavailable: {upstream} - {message}")]
    Unavailable {
        /// The upstream that failed
        upstream: String,
        /// Transport or status detail
        message: String,
    },

    /// The upstream answered with a body that could not be decoded.
    #[error("Malformed response from {upstream}: {message}")]
    Malformed {
        /// The upstream that produced the body
        upstream: String,
        /// Decoder error
        message: String,
    },

    /// The upstream answered successfully but the payload carried no data.
    #[error("Empty result from {upstream}")]
    EmptyResult {
        /// The upstream (or cache) that observed the empty payload
        upstream: String,
    },

    /// The upstream refused the request itself.
    #[error("Request rejected by {upstream}: {message}")]
    Rejected {
        /// The upstream that rejected the request
        upstream: String,
        /// Reason reported by the upstream
        message: String,
    },
}

impl UpstreamError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use wealthdash_cache::errors::{RetryClass, UpstreamError};
    ///
    /// let error = UpstreamError::RateLimited { upstream: "FINNHUB".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = UpstreamError::Rejected {
    ///     upstream: "FINNHUB".to_string(),
    ///     message: "Invalid API key".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::Unavailable { .. }
            | Self::Malformed { .. }
            | Self::EmptyResult { .. } => RetryClass::WithBackoff,

            Self::Rejected { .. } => RetryClass::Never,
        }
    }

    /// Name of the upstream that produced this error.
    pub fn upstream(&self) -> &str {
        match self {
            Self::RateLimited { upstream }
            | Self::Timeout { upstream }
            | Self::Unavailable { upstream, .. }
            | Self::Malformed { upstream, .. }
            | Self::EmptyResult { upstream }
            | Self::Rejected { upstream, .. } => upstream,
        }
    }
}
