//! JSON persistence of article summaries.
//!
//! Output is assembled in memory and written in one call after a run, so a
//! failed run never leaves a partial file behind.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::pipeline::ArticleSummary;

/// Errors from writing a summary file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Serialization failed.
    #[error("failed to serialize summaries for '{title}': {source}")]
    Serialize {
        /// Article title.
        title: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the file failed.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns `<dir>/<title>.json`, with path separators in the title replaced
/// by `_`.
#[must_use]
pub fn output_path(dir: &Path, title: &str) -> PathBuf {
    let file_stem: String = title
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    dir.join(format!("{file_stem}.json"))
}

/// Serializes summaries as a JSON array of `{sentence, source}` objects.
///
/// # Errors
///
/// Returns [`OutputError::Serialize`] if serialization fails.
pub fn to_json(title: &str, summaries: &[ArticleSummary]) -> Result<String, OutputError> {
    serde_json::to_string(summaries).map_err(|source| OutputError::Serialize {
        title: title.to_string(),
        source,
    })
}

/// Writes the summaries for `title` into `dir` and returns the file path.
///
/// # Errors
///
/// Returns [`OutputError`] if serialization or the write fails.
#[instrument(skip(summaries), fields(count = summaries.len()))]
pub async fn write_summaries(
    dir: &Path,
    title: &str,
    summaries: &[ArticleSummary],
) -> Result<PathBuf, OutputError> {
    let json = to_json(title, summaries)?;
    let path = output_path(dir, title);
    tokio::fs::write(&path, json)
        .await
        .map_err(|source| OutputError::Io {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), "Summaries written");
    Ok(path)
}
