//! Polite fetching of cited sources.
//!
//! # Features
//!
//! - robots.txt enforcement before every page request, fail-closed
//! - Per-origin policy cache for the lifetime of a [`RobotsChecker`]
//! - One timeout (30s by default) bounding every request
//! - Paragraph-level text extraction from fetched HTML
//!
//! # Example
//!
//! ```no_run
//! use citeset_core::ScraperConfig;
//! use citeset_core::fetch::{ContentFetcher, HttpClient, RobotsChecker, SourceFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScraperConfig::default();
//! let client = HttpClient::new(&config)?;
//! let robots = RobotsChecker::new(client.clone(), config.robots_agent.clone());
//! let fetcher = ContentFetcher::new(client, robots);
//! let text = fetcher.fetch("https://example.com/article").await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

mod client;
mod content;
mod error;
mod robots;

pub use client::HttpClient;
pub use content::{ContentFetcher, SourceFetcher, paragraph_text};
pub use error::ScrapeError;
pub use robots::{CrawlDecision, RobotsChecker, RobotsRules};
