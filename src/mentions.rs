//! `@mention` extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// `@` followed by word characters or hyphens
static MENTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@([\w\-]+)").expect("MENTION_PATTERN: hardcoded regex is invalid")
});

/// Find every `@mention` in `text`, without the `@`.
///
/// Matches are non-overlapping and returned in order; duplicates are kept.
/// Purely numeric names such as `@123` count as mentions.
pub fn find_mentions(text: &str) -> Vec<String> {
    MENTION_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
