//! Wiki link resolution and named-reference stripping for candidate lines.

use std::sync::LazyLock;

use regex::Regex;

/// Marker that suppresses wiki rendering; it carries no text.
const NOWIKI_MARKERS: [&str; 2] = ["<nowiki/>", "<nowiki />"];

/// Self-closing reference that re-uses a definition, e.g. `<ref name="RANDALL" />`
/// or `<ref group="n" name="x"/>`, whatever the attribute order.
#[allow(clippy::expect_used)]
static NAMED_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<ref\b[^>]*/>").expect("named ref regex is valid") // Static pattern, safe to panic
});

/// `[[target|label]]`; the target part is greedy, so the last pipe wins.
#[allow(clippy::expect_used)]
static PIPED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[[^\]]+\|([^\]]+)\]\]").expect("piped link regex is valid") // Static pattern, safe to panic
});

/// `[[target]]`
#[allow(clippy::expect_used)]
static BARE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^|]+?)\]\]").expect("bare link regex is valid") // Static pattern, safe to panic
});

/// Cuts a candidate line at its first named self-closing reference.
///
/// Named references point at a definition elsewhere in the article and carry
/// no URL of their own. Everything from the first one onward is discarded, so
/// a line whose inline reference follows a named one yields no citation.
#[must_use]
pub(crate) fn strip_named_refs(line: &str) -> &str {
    match NAMED_REF.find(line) {
        Some(found) => &line[..found.start()],
        None => line,
    }
}

/// Replaces wiki links with their display text and deletes `<nowiki/>` markers.
///
/// - `[[Liars (band)|Liars]]` -> `Liars`
/// - `[[Liars]]` -> `Liars`
///
/// Nested links are not handled; the first match wins.
#[must_use]
pub(crate) fn cleanup_wiki_links(sentence: &str) -> String {
    let mut cleaned = sentence.to_string();
    for marker in NOWIKI_MARKERS {
        if cleaned.contains(marker) {
            cleaned = cleaned.replace(marker, "");
        }
    }

    let cleaned = PIPED_LINK.replace_all(&cleaned, "$1");
    BARE_LINK.replace_all(&cleaned, "$1").into_owned()
}
