//! Error types for the article-source API client.

use thiserror::Error;

/// Errors from fetching an article's markup. Every variant is fatal for the
/// title being processed: without markup there is nothing to extract.
#[derive(Debug, Error)]
pub enum ApiResponseError {
    /// The API could not be reached.
    #[error("network error fetching article '{title}': {source}")]
    Network {
        /// Requested article title.
        title: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The API request timed out.
    #[error("timeout fetching article '{title}'")]
    Timeout {
        /// Requested article title.
        title: String,
    },

    /// The API answered with a non-success status.
    #[error("article API returned HTTP {status} for '{title}'")]
    HttpStatus {
        /// Requested article title.
        title: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected response for article '{title}': {source}")]
    InvalidJson {
        /// Requested article title.
        title: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The response JSON lacks a field on the path to the markup.
    #[error("unexpected response for article '{title}': missing {field}")]
    MissingField {
        /// Requested article title.
        title: String,
        /// Dotted path of the missing field.
        field: &'static str,
    },

    /// The API reports that no page exists under this title.
    #[error("article '{title}' does not exist")]
    PageMissing {
        /// Requested article title.
        title: String,
    },
}

impl ApiResponseError {
    /// Creates a network or timeout error from a reqwest error.
    pub fn network(title: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                title: title.into(),
            }
        } else {
            Self::Network {
                title: title.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(title: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            title: title.into(),
            status,
        }
    }

    /// Creates a missing-field error.
    pub fn missing(title: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            title: title.into(),
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let error = ApiResponseError::missing("Radiohead", "query");
        assert_eq!(
            error.to_string(),
            "unexpected response for article 'Radiohead': missing query"
        );
    }

    #[test]
    fn test_http_status_display() {
        let error = ApiResponseError::http_status("Radiohead", 503);
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected status in: {msg}");
        assert!(msg.contains("Radiohead"), "Expected title in: {msg}");
    }
}
