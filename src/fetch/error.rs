//! Error types for the fetch module.
//!
//! [`ScrapeError::Disallowed`] is the permission failure; every other variant
//! is a fetch failure (network, timeout, status or body). Both families only
//! ever affect a single citation.

use thiserror::Error;

/// Errors that can occur while fetching a cited source.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The host's crawl policy does not permit fetching this URL, or the
    /// policy could not be read.
    #[error("crawling disallowed for {url}")]
    Disallowed {
        /// The URL that was not fetched.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be read.
    #[error("failed to read body of {url}: {source}")]
    Body {
        /// The URL whose body failed.
        url: String,
        /// The underlying read error.
        #[source]
        source: reqwest::Error,
    },
}

impl ScrapeError {
    /// Creates a disallowed error.
    pub fn disallowed(url: impl Into<String>) -> Self {
        Self::Disallowed { url: url.into() }
    }

    /// Creates a network or timeout error from a reqwest error.
    ///
    /// Timeouts get their own variant so callers can tell them apart.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a body read error; timeouts while streaming map to [`ScrapeError::Timeout`].
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Body {
                url: url.into(),
                source,
            }
        }
    }

    /// Returns true when the crawl policy denied the fetch.
    #[must_use]
    pub fn is_disallowed(&self) -> bool {
        matches!(self, Self::Disallowed { .. })
    }

    /// The URL this error concerns.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Disallowed { url }
            | Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::HttpStatus { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}
