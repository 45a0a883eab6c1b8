//! The citation pair produced by markup extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cited sentence and the source URL attached to it.
///
/// `sentence` is already normalized (lowercase, punctuation and link markup
/// removed). `url` is the raw value of the citation template's `url=` field;
/// it is not validated and may be empty for malformed templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    /// Normalized sentence text preceding the reference.
    pub sentence: String,
    /// Source URL as written in the citation template.
    pub url: String,
}

impl Citation {
    /// Creates a new citation.
    #[must_use]
    pub fn new(sentence: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" <{}>", self.sentence, self.url)
    }
}
