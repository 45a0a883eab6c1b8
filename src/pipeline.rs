//! Citation pipeline: markup -> citations -> fetched sources -> summaries.
//!
//! A single bad source never aborts a run. Each citation either becomes an
//! [`ArticleSummary`] or a [`SkippedCitation`] recording why it was dropped;
//! only a failure to obtain the article markup is fatal.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::fetch::{ScrapeError, SourceFetcher};
use crate::parser::{Citation, extract_citations};
use crate::wiki::{ApiResponseError, MarkupSource};

/// A cited sentence paired with the cleaned text of its source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Normalized sentence from the article.
    pub sentence: String,
    /// Cleaned body text of the cited page.
    pub source: String,
}

/// Why a citation produced no summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The crawl policy denied the URL (or could not be read).
    Disallowed,
    /// The page request failed.
    FetchFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disallowed => write!(f, "disallowed"),
            Self::FetchFailed => write!(f, "fetch failed"),
        }
    }
}

impl From<&ScrapeError> for SkipReason {
    fn from(error: &ScrapeError) -> Self {
        if error.is_disallowed() {
            Self::Disallowed
        } else {
            Self::FetchFailed
        }
    }
}

/// A citation dropped during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCitation {
    /// The citation that was dropped.
    pub citation: Citation,
    /// Failure family.
    pub reason: SkipReason,
    /// Error message for logs.
    pub message: String,
}

/// Result of processing one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Article title, empty when built from bare citations.
    pub title: String,
    /// Number of citations extracted from the markup.
    pub citations: usize,
    /// Successful summaries, in citation order.
    pub summaries: Vec<ArticleSummary>,
    /// Dropped citations, in citation order.
    pub skipped: Vec<SkippedCitation>,
}

impl PipelineReport {
    /// Number of citations skipped for the given reason.
    #[must_use]
    pub fn skipped_count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }

    /// Consumes the report, keeping only the summaries.
    #[must_use]
    pub fn into_summaries(self) -> Vec<ArticleSummary> {
        self.summaries
    }

    fn record(mut self, citation: &Citation, outcome: Result<String, ScrapeError>) -> Self {
        match outcome {
            Ok(source) => self.summaries.push(ArticleSummary {
                sentence: citation.sentence.clone(),
                source,
            }),
            Err(error) => {
                let reason = SkipReason::from(&error);
                warn!(url = %citation.url, %reason, error = %error, "Skipping citation");
                self.skipped.push(SkippedCitation {
                    citation: citation.clone(),
                    reason,
                    message: error.to_string(),
                });
            }
        }
        self
    }
}

/// Composes a markup source and a source fetcher into the full pipeline.
///
/// Citations are processed one at a time, so at most one request is in
/// flight and hosts never see bursts.
#[derive(Debug)]
pub struct CitationPipeline<M, F> {
    markup: M,
    fetcher: F,
}

impl<M, F> CitationPipeline<M, F>
where
    M: MarkupSource,
    F: SourceFetcher,
{
    /// Creates a pipeline.
    #[must_use]
    pub fn new(markup: M, fetcher: F) -> Self {
        Self { markup, fetcher }
    }

    /// Runs the pipeline for one article.
    ///
    /// # Errors
    ///
    /// Returns [`ApiResponseError`] if the article markup cannot be obtained.
    /// Per-citation failures are recorded in the report instead.
    #[instrument(skip(self), fields(title = %title))]
    pub async fn run(&self, title: &str) -> Result<PipelineReport, ApiResponseError> {
        let markup = self.markup.fetch_markup(title).await?;
        let citations = extract_citations(&markup);
        info!(citations = citations.len(), "Extracted citations");

        let mut report = self.summarize(&citations).await;
        report.title = title.to_string();

        info!(
            summaries = report.summaries.len(),
            disallowed = report.skipped_count(SkipReason::Disallowed),
            failed = report.skipped_count(SkipReason::FetchFailed),
            "Article processed"
        );
        Ok(report)
    }

    /// Fetches the source of every citation in order, folding successes into
    /// summaries and failures into skip records.
    pub async fn summarize(&self, citations: &[Citation]) -> PipelineReport {
        let mut report = PipelineReport {
            citations: citations.len(),
            ..PipelineReport::default()
        };
        for citation in citations {
            info!(url = %citation.url, "Reading source");
            let outcome = self.fetcher.fetch(&citation.url).await;
            report = report.record(citation, outcome);
        }
        report
    }
}
