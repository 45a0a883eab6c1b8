//! Citeset Core Library
//!
//! This library builds citation datasets from wiki articles: it pulls the
//! markup of an article, extracts `(sentence, url)` citation pairs, fetches
//! each cited page while honoring robots.txt, and pairs every sentence with
//! the cleaned text of its source.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Citation extraction from wiki markup
//! - [`fetch`] - HTTP client, robots.txt policy and page text extraction
//! - [`wiki`] - Article-source API client
//! - [`pipeline`] - Composition of the above into article summaries
//! - [`output`] - JSON persistence of summaries
//! - [`config`] - Scraper settings shared by the fetchers

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod text;
mod user_agent;
pub mod wiki;

// Re-export commonly used types
pub use config::{ConfigError, ScraperConfig};
pub use fetch::{
    ContentFetcher, CrawlDecision, HttpClient, RobotsChecker, ScrapeError, SourceFetcher,
};
pub use output::{OutputError, write_summaries};
pub use parser::{Citation, extract_citations};
pub use pipeline::{ArticleSummary, CitationPipeline, PipelineReport, SkipReason, SkippedCitation};
pub use text::clean_text;
pub use wiki::{ApiResponseError, MarkupSource, WikiClient};
