//! Polite page fetching and paragraph text extraction.

use std::sync::LazyLock;

use async_trait::async_trait;
use html_escape::decode_html_entities;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use super::client::HttpClient;
use super::error::ScrapeError;
use super::robots::RobotsChecker;
use crate::text::clean_text;

/// Separator placed between paragraphs before normalization.
const PARAGRAPH_SEPARATOR: &str = ". ";

#[allow(clippy::expect_used)]
static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("paragraph selector is valid")); // Static pattern, safe to panic

/// Retrieves the cleaned text of a cited source.
///
/// This is the seam the pipeline depends on, so tests can substitute a fake.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetches `url` and returns its cleaned body text.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Disallowed`] when the crawl policy denies the
    /// URL, or another [`ScrapeError`] variant when the request fails.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Fetches pages after checking the host's robots.txt.
#[derive(Debug)]
pub struct ContentFetcher {
    client: HttpClient,
    robots: RobotsChecker,
}

impl ContentFetcher {
    /// Creates a fetcher; `robots` should share `client`'s settings.
    #[must_use]
    pub fn new(client: HttpClient, robots: RobotsChecker) -> Self {
        Self { client, robots }
    }
}

#[async_trait]
impl SourceFetcher for ContentFetcher {
    /// Checks permission, downloads the page and reduces it to paragraph text.
    ///
    /// No request is made to the page when the policy denies it.
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        if !self.robots.is_allowed(url).await {
            return Err(ScrapeError::disallowed(url));
        }

        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| ScrapeError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::http_status(url, status.as_u16()));
        }

        let html = response.text().await.map_err(|e| ScrapeError::body(url, e))?;
        let text = paragraph_text(&html);
        debug!(html_len = html.len(), text_len = text.len(), "page text extracted");
        Ok(text)
    }
}

/// Joins the text of every `<p>` element, decodes leftover HTML entities and
/// normalizes the result.
#[must_use]
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let joined = document
        .select(&PARAGRAPH)
        .map(|paragraph| paragraph.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR);

    clean_text(&decode_html_entities(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text_joins_paragraphs() {
        let html = "<html><body><h1>Title</h1><p>First paragraph.</p><div><p>Second <b>bold</b> one</p></div></body></html>";
        assert_eq!(paragraph_text(html), "first paragraph second bold one");
    }

    #[test]
    fn test_paragraph_text_ignores_non_paragraph_text() {
        let html = "<nav>Menu</nav><p>Body</p><footer>Footer</footer><script>var x = 1;</script>";
        assert_eq!(paragraph_text(html), "body");
    }

    #[test]
    fn test_paragraph_text_decodes_entities() {
        let html = "<p>Rock &amp;amp; Roll &#8212; Caf&eacute;</p>";
        assert_eq!(paragraph_text(html), "rock roll café");
    }

    #[test]
    fn test_paragraph_text_without_paragraphs() {
        assert_eq!(paragraph_text("<html><body><div>no p</div></body></html>"), "");
        assert_eq!(paragraph_text(""), "");
    }
}
