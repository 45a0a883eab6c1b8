//! Reference tag splitting and `url=` value extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Closing marker of an inline reference.
pub(crate) const REF_CLOSE: &str = "</ref>";

/// Opening tag of an inline reference with content: `<ref>` or `<ref name="x">`.
/// Self-closing tags never match because `/` is excluded from the attributes.
#[allow(clippy::expect_used)]
static REF_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<ref(?:\s+[^>/]*)?>").expect("ref open regex is valid") // Static pattern, safe to panic
});

/// The `url` key inside a citation template, e.g. `{{cite web|url=...}}`.
/// Keys such as `archive-url` do not match.
#[allow(clippy::expect_used)]
static URL_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|\s*url\s*=").expect("url key regex is valid") // Static pattern, safe to panic
});

/// Splits a candidate line into the sentence before its first reference and
/// the reference body.
///
/// Returns `None` unless the line holds both an opening tag and a closing
/// `</ref>` after it.
#[must_use]
pub(crate) fn split_reference(line: &str) -> Option<(&str, &str)> {
    let open = REF_OPEN.find(line)?;
    let rest = &line[open.end()..];
    let close = rest.find(REF_CLOSE)?;
    Some((&line[..open.start()], &rest[..close]))
}

/// Extracts the `url=` value from a reference body.
///
/// The value runs up to the first `|`, `}` or `[[`, whichever comes first,
/// and is trimmed. Returns `None` when the body has no `url` key; an empty
/// value is returned as `Some("")`.
///
/// `{{cite web|url=http://www.example.com|title=test}}` -> `http://www.example.com`
#[must_use]
pub(crate) fn url_from_reference(body: &str) -> Option<&str> {
    let key = URL_KEY.find(body)?;
    let value = &body[key.end()..];

    let end = [value.find('|'), value.find('}'), value.find("[[")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(value.len());

    Some(value[..end].trim())
}
