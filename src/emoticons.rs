//! `(emoticon)` extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum emoticon name length
pub const MAX_EMOTICON_LEN: usize = 15;

/// 1 to 15 word characters between parentheses
static EMOTICON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\((\w{{1,{}}})\)", MAX_EMOTICON_LEN))
        .expect("EMOTICON_PATTERN: hardcoded regex is invalid")
});

/// Find every `(emoticon)` in `text`, without the parentheses.
///
/// Only well-formed innermost groups match, so `(nested (emoticon))` yields
/// just `emoticon`. Duplicates are kept.
pub fn find_emoticons(text: &str) -> Vec<String> {
    EMOTICON_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
