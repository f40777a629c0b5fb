use serde::{Deserialize, Serialize};

/// Byte offsets of a matched literal inside the text being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl MatchSpan {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The matched text
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Text before the match
    pub fn head<'a>(&self, text: &'a str) -> &'a str {
        &text[..self.start]
    }

    /// Text after the match
    pub fn tail<'a>(&self, text: &'a str) -> &'a str {
        &text[self.end..]
    }
}

/// A matched literal expanded to its surrounding hostname and path.
///
/// Lives for a single scan step; it is either accepted as a link or dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateLink {
    /// Hostname characters collected to the left of the match
    pub prefix: String,
    /// The matched literal (`.tld` or `scheme://host`)
    pub core: String,
    /// Path characters collected to the right of the match
    pub suffix: String,
}

impl CandidateLink {
    /// The assembled link text
    pub fn link(&self) -> String {
        let mut link = String::with_capacity(self.prefix.len() + self.core.len() + self.suffix.len());
        link.push_str(&self.prefix);
        link.push_str(&self.core);
        link.push_str(&self.suffix);
        link
    }

    /// First character of the assembled link
    pub fn first_char(&self) -> Option<char> {
        self.prefix
            .chars()
            .next()
            .or_else(|| self.core.chars().next())
            .or_else(|| self.suffix.chars().next())
    }
}

/// A link found in a message, with its page title when one was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedLink {
    pub url: String,
    pub title: Option<String>,
}

impl ExtractedLink {
    /// Create a link without a title
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    /// Create a link with an optional title
    pub fn with_title(url: impl Into<String>, title: Option<String>) -> Self {
        Self {
            url: url.into(),
            title,
        }
    }
}
