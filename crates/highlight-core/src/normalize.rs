//! Snippet whitespace canonicalization

/// Collapse every run of whitespace (newlines included) to a single space and
/// trim both ends. Whitespace-only input becomes the empty string.
pub fn normalize_snippet(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
