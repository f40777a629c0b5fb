use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::tld::TldSet;
use crate::types::MatchSpan;

/// Schemes a link may carry. Links without a scheme are treated as `http`.
pub const VALID_SCHEMES: [&str; 8] = ["http", "https", "ftp", "ssh", "mailto", "git", "svn", "hg"];

/// Compiled size limit for the TLD alternation
const TLD_PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Fallback for hosts without a registered TLD, e.g. `http://localhost/`.
/// Deliberately loose about hostnames.
static FALLBACK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:{})://[a-z0-9.\-]+", VALID_SCHEMES.join("|")))
        .expect("FALLBACK_PATTERN: hardcoded regex is invalid")
});

static DEFAULT_MATCHER: Lazy<LinkMatcher> = Lazy::new(|| {
    LinkMatcher::new(TldSet::bundled()).expect("DEFAULT_MATCHER: bundled TLD pattern is invalid")
});

/// Which pattern produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// `.tld` followed by a boundary
    Tld,
    /// `scheme://hostname`
    Fallback,
}

/// Locates the next link literal in a text.
#[derive(Debug, Clone)]
pub struct LinkMatcher {
    tld_pattern: Regex,
}

impl LinkMatcher {
    /// Build a matcher over the given TLD registry.
    pub fn new(tlds: &TldSet) -> Result<Self> {
        // Longest first so that overlapping labels prefer the longer TLD
        let mut labels: Vec<&str> = tlds.iter().collect();
        labels.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = labels
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");

        // A TLD only counts when followed by the end of text, whitespace, a
        // slash, a port, or any other non-word character.
        let pattern = format!(r"\.({})(?:$|\s|/|:\d+|\W)", alternation);

        let tld_pattern = RegexBuilder::new(&pattern)
            .size_limit(TLD_PATTERN_SIZE_LIMIT)
            .build()?;

        Ok(Self { tld_pattern })
    }

    /// Matcher over the bundled registry.
    pub fn bundled() -> &'static LinkMatcher {
        &DEFAULT_MATCHER
    }

    /// Find the first link literal in `text`.
    ///
    /// The TLD pattern wins whenever it matches anywhere in the text; the
    /// scheme fallback is only consulted otherwise.
    pub fn find(&self, text: &str) -> Option<(MatchSpan, MatchKind)> {
        if let Some(tld) = self.tld_pattern.captures(text).and_then(|c| c.get(1)) {
            // Include the leading dot
            return Some((MatchSpan::new(tld.start() - 1, tld.end()), MatchKind::Tld));
        }

        FALLBACK_PATTERN
            .find(text)
            .map(|m| (MatchSpan::new(m.start(), m.end()), MatchKind::Fallback))
    }
}
