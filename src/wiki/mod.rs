//! Article-source API client.
//!
//! [`WikiClient`] asks a MediaWiki `api.php` endpoint for the latest revision
//! of an article and returns its raw markup. Pipelines depend on the
//! [`MarkupSource`] trait rather than the client, so tests can feed markup
//! directly.

mod error;

pub use error::ApiResponseError;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::fetch::HttpClient;

/// Supplies the raw markup of an article.
#[async_trait]
pub trait MarkupSource: Send + Sync {
    /// Returns the markup of the latest revision of `title`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiResponseError`] when no markup can be obtained.
    async fn fetch_markup(&self, title: &str) -> Result<String, ApiResponseError>;
}

// ==================== MediaWiki API Response Types ====================

/// Top-level `action=query` response (`formatversion=2`).
#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    pages: Option<Vec<Page>>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    revisions: Option<Vec<Revision>>,
}

/// A revision carries its content either in the `main` slot or, for
/// requests without `rvslots`, directly.
#[derive(Debug, Deserialize)]
struct Revision {
    content: Option<String>,
    slots: Option<Slots>,
}

#[derive(Debug, Deserialize)]
struct Slots {
    main: Option<Slot>,
}

#[derive(Debug, Deserialize)]
struct Slot {
    content: Option<String>,
}

// ==================== WikiClient ====================

/// Fetches article markup from a MediaWiki API endpoint.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: HttpClient,
    base_url: String,
}

impl WikiClient {
    /// Creates a client for the API at `base_url` (for example
    /// `https://en.wikipedia.org/w/api.php`, or a wiremock server in tests).
    #[must_use]
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Returns the API endpoint this client queries.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_url(&self, title: &str) -> String {
        format!(
            "{}?action=query&titles={}&prop=revisions&rvprop=content&rvslots=main&format=json&formatversion=2",
            self.base_url,
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl MarkupSource for WikiClient {
    #[instrument(skip(self), fields(title = %title))]
    async fn fetch_markup(&self, title: &str) -> Result<String, ApiResponseError> {
        let url = self.query_url(title);
        debug!(api_url = %url, "Calling article API");

        let response = self
            .client
            .get(&url)
            .await
            .map_err(|e| ApiResponseError::network(title, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiResponseError::http_status(title, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiResponseError::network(title, e))?;
        let parsed: QueryResponse =
            serde_json::from_str(&body).map_err(|source| ApiResponseError::InvalidJson {
                title: title.to_string(),
                source,
            })?;

        let markup = markup_from_response(title, parsed)?;
        debug!(markup_len = markup.len(), "Article markup received");
        Ok(markup)
    }
}

/// Navigates `query.pages[0].revisions[0]` to the revision content.
fn markup_from_response(title: &str, response: QueryResponse) -> Result<String, ApiResponseError> {
    let query = response
        .query
        .ok_or_else(|| ApiResponseError::missing(title, "query"))?;
    let page = query
        .pages
        .and_then(|pages| pages.into_iter().next())
        .ok_or_else(|| ApiResponseError::missing(title, "query.pages"))?;

    if page.missing || page.invalid {
        return Err(ApiResponseError::PageMissing {
            title: title.to_string(),
        });
    }

    let revision = page
        .revisions
        .and_then(|revisions| revisions.into_iter().next())
        .ok_or_else(|| ApiResponseError::missing(title, "query.pages.revisions"))?;

    revision
        .slots
        .and_then(|slots| slots.main)
        .and_then(|main| main.content)
        .or(revision.content)
        .ok_or_else(|| ApiResponseError::missing(title, "query.pages.revisions.content"))
}
