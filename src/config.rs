//! Runtime settings shared by the HTTP-facing components.

use std::time::Duration;

use thiserror::Error;

use crate::user_agent::default_user_agent;

/// Default article-source API endpoint.
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Default per-request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound for the per-request timeout.
pub const MAX_TIMEOUT_SECS: u64 = 30;

/// Robots agent used when evaluating crawl policies.
pub const WILDCARD_AGENT: &str = "*";

/// Settings for the policy checker, content fetcher and article API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Timeout applied to every request, connect included.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Agent name matched against `User-agent:` groups in robots.txt.
    pub robots_agent: String,
    /// Article-source API endpoint.
    pub api_url: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            robots_agent: WILDCARD_AGENT.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero timeout, a timeout above
    /// [`MAX_TIMEOUT_SECS`], or an empty user agent, robots agent or API URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() || self.timeout > Duration::from_secs(MAX_TIMEOUT_SECS) {
            return Err(ConfigError::Timeout {
                secs: self.timeout.as_secs(),
            });
        }
        for (field, value) in [
            ("user_agent", &self.user_agent),
            ("robots_agent", &self.robots_agent),
            ("api_url", &self.api_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }
        Ok(())
    }
}

/// Invalid [`ScraperConfig`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Timeout outside `1..=MAX_TIMEOUT_SECS`.
    #[error("timeout of {secs}s is out of range (expected 1..=30)")]
    Timeout {
        /// Rejected timeout in whole seconds.
        secs: u64,
    },
    /// A required string setting is empty.
    #[error("`{field}` must not be empty")]
    Empty {
        /// Name of the empty setting.
        field: &'static str,
    },
}
