//! Citation extraction from wiki markup.
//!
//! This module recovers `(sentence, url)` pairs from the inline citation
//! templates of an article's raw markup. It is a short sequence of text
//! passes rather than a grammar:
//!
//! 1. Segment the markup into candidates, each ending at one `</ref>`
//! 2. Split every candidate into lines; each line is parsed on its own
//! 3. Cut the line at its first self-closing reference
//! 4. Split off the reference body and read its `url=` value
//! 5. Resolve wiki links in the sentence and normalize it
//!
//! # Known limitations
//!
//! - A reference whose body wraps across lines is dropped, because no single
//!   line holds both the opening and the closing tag.
//! - Nested links inside a piped link are not resolved; the first match wins.
//! - Named references with a body (`<ref name="a">...</ref>`) are read like a
//!   plain `<ref>`, unlike a grammar that only accepts a bare opening tag.
//! - A malformed `url=` value (for example `url=[[Page]]`) yields a truncated
//!   or empty URL, which is passed through unvalidated.
//!
//! # Example
//!
//! ```
//! use citeset_core::parser::extract_citations;
//!
//! let markup = "Kid A was released in 2000.<ref>{{cite web|url=https://example.com/kid-a|title=Kid A}}</ref>";
//! let citations = extract_citations(markup);
//! assert_eq!(citations.len(), 1);
//! assert_eq!(citations[0].sentence, "kid a was released in 2000");
//! assert_eq!(citations[0].url, "https://example.com/kid-a");
//! ```

mod citation;
mod links;
mod reference;

pub use citation::Citation;

use tracing::{debug, trace};

use crate::text::clean_text;

use self::links::{cleanup_wiki_links, strip_named_refs};
use self::reference::{REF_CLOSE, split_reference, url_from_reference};

/// Extracts citations from raw article markup, in document order.
///
/// Never fails: input without references yields an empty list, and
/// candidates that do not parse are skipped. Duplicates are preserved.
#[tracing::instrument(skip(markup), fields(markup_len = markup.len()))]
#[must_use]
pub fn extract_citations(markup: &str) -> Vec<Citation> {
    let mut citations = Vec::new();
    let mut candidates = 0usize;

    for segment in segments(markup) {
        for line in segment.lines() {
            candidates += 1;
            if let Some(citation) = parse_candidate(line) {
                trace!(url = %citation.url, "citation extracted");
                citations.push(citation);
            }
        }
    }

    debug!(
        candidates,
        extracted = citations.len(),
        "citation extraction finished"
    );
    citations
}

/// Splits markup into the shortest spans that each end with `</ref>`.
/// Text after the last closing tag belongs to no segment.
fn segments(markup: &str) -> impl Iterator<Item = &str> {
    let mut rest = markup;
    std::iter::from_fn(move || {
        let end = rest.find(REF_CLOSE)? + REF_CLOSE.len();
        let (segment, tail) = rest.split_at(end);
        rest = tail;
        Some(segment)
    })
}

fn parse_candidate(line: &str) -> Option<Citation> {
    let line = strip_named_refs(line);
    let (sentence, body) = split_reference(line)?;
    let url = url_from_reference(body)?;

    let sentence = clean_text(&cleanup_wiki_links(sentence));
    if sentence.is_empty() {
        return None;
    }

    if url.is_empty() {
        debug!(%sentence, "citation template has an empty url value");
    } else if url::Url::parse(url).is_err() {
        debug!(%url, "citation url is not an absolute URL");
    }

    Some(Citation::new(sentence, url))
}
