//! Shared HTTP client for policy, page and article API requests.

use reqwest::{Client, ClientBuilder, Response};
use tracing::instrument;

use crate::config::ScraperConfig;

/// HTTP client with the crate's timeout and User-Agent policy applied.
///
/// Create one and share it (it is cheap to clone) so requests reuse pooled
/// connections.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Builds a client from the given settings.
    ///
    /// The configured timeout bounds both connecting and the whole request,
    /// so no single call can outlive it.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest::Error` if the TLS backend or resolver
    /// cannot be initialized.
    #[instrument(level = "debug", skip(config), fields(timeout_secs = config.timeout.as_secs()))]
    pub fn new(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        let client = ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest::Error` for connection failures and timeouts.
    /// Non-success statuses are returned as responses, not errors.
    pub async fn get(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client.get(url).send().await
    }
}
