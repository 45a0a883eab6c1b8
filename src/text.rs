//! Text normalization shared by citation sentences and fetched page bodies.

/// Normalizes free text for dataset output.
///
/// Normalization steps:
/// 1. Convert to lowercase
/// 2. Drop every character that is neither alphanumeric nor whitespace
/// 3. Collapse runs of whitespace into a single space and trim the ends
///
/// Punctuation is removed rather than replaced, so `"(ocean) Bloom,"`
/// becomes `"ocean bloom"`.
///
/// # Example
///
/// ```
/// use citeset_core::text::clean_text;
///
/// assert_eq!(clean_text("  The new track, \"(ocean) Bloom\"! "), "the new track ocean bloom");
/// ```
#[must_use]
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
