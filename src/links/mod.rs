//! Link extraction.
//!
//! Links are found by locating a registered TLD (or, failing that, a
//! `scheme://host` literal) and scanning outwards from it:
//!
//! 1. The text is IDNA-encoded so Unicode domains can be matched.
//! 2. [`LinkMatcher`] finds the first literal in the remaining text.
//! 3. The scanner expands it left over hostname characters and right over
//!    path characters.
//! 4. The candidate is validated (leading character, scheme whitelist) and
//!    either accepted or dropped; scanning continues after it either way.
//!
//! The scan character classes are loose on purpose; validation is where
//! candidates get rejected.

mod idn;
mod matcher;
mod scanner;

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::tld::TldSet;
use crate::types::CandidateLink;

pub use idn::{decode_link, encode_text, Encoded};
pub use matcher::{LinkMatcher, MatchKind, VALID_SCHEMES};
pub use scanner::{scan, Scanned};

/// Characters a link may not start with.
const INVALID_LEADING_CHARS: [char; 5] = ['.', '/', '\\', ':', '-'];

/// Scheme assumed for links without one.
pub const DEFAULT_SCHEME: &str = "http";

static DEFAULT_EXTRACTOR: Lazy<LinkExtractor> = Lazy::new(|| LinkExtractor {
    matcher: LinkMatcher::bundled().clone(),
});

/// Why a candidate was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    LeadingChar(char),
    Scheme(String),
}

/// Extracts links from text using a TLD registry.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    matcher: LinkMatcher,
}

impl LinkExtractor {
    /// Create an extractor over a custom registry.
    pub fn new(tlds: &TldSet) -> Result<Self> {
        Ok(Self {
            matcher: LinkMatcher::new(tlds)?,
        })
    }

    /// Extractor over the bundled registry.
    pub fn bundled() -> &'static LinkExtractor {
        &DEFAULT_EXTRACTOR
    }

    /// Extract distinct links in the order they first appear.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let encoded = encode_text(text);
        let haystack: &str = &encoded.text;

        let mut links = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = 0;

        while cursor < haystack.len() {
            let remaining = &haystack[cursor..];

            let Some((span, kind)) = self.matcher.find(remaining) else {
                tracing::trace!(remaining, "no further link literals");
                break;
            };

            let core = span.as_str(remaining);
            let scanned = scan(span.head(remaining), core, span.tail(remaining));
            let start = cursor + scanned.start;
            let next = cursor + span.end + scanned.consumed;
            debug_assert!(next > cursor, "scan must make progress");
            cursor = next;

            let link = match validate(&scanned.candidate) {
                Ok(link) => link,
                Err(reason) => {
                    tracing::debug!(
                        link = %scanned.candidate.link(),
                        ?reason,
                        "rejected candidate link"
                    );
                    continue;
                }
            };
            tracing::debug!(?kind, core, link = %link, "accepted candidate link");

            // Report the link as it was written, not in its encoded form
            let link = if encoded.must_decode {
                encoded.original(start..next)
            } else {
                link
            };

            if seen.insert(link.clone()) {
                links.push(link);
            }
        }

        links
    }
}

/// Check a candidate and return the assembled link if it is acceptable.
fn validate(candidate: &CandidateLink) -> std::result::Result<String, Rejection> {
    if let Some(first) = candidate.first_char() {
        if INVALID_LEADING_CHARS.contains(&first) {
            return Err(Rejection::LeadingChar(first));
        }
    }

    let link = candidate.link();
    let scheme = scheme_of(&link).unwrap_or(DEFAULT_SCHEME);
    if !is_valid_scheme(scheme) {
        return Err(Rejection::Scheme(scheme.to_string()));
    }

    Ok(link)
}

/// The scheme of a link, if it starts with a well-formed `scheme://`.
///
/// Text before `://` only counts as a scheme when it looks like one (a
/// letter followed by letters, digits, `+`, `-` or `.`), so query strings
/// that embed another URL do not.
pub fn scheme_of(link: &str) -> Option<&str> {
    let (scheme, _) = link.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some(scheme)
}

/// Whether a scheme is in the whitelist. Case-insensitive.
pub fn is_valid_scheme(scheme: &str) -> bool {
    VALID_SCHEMES
        .iter()
        .any(|valid| valid.eq_ignore_ascii_case(scheme))
}

/// Extract distinct links from `text` using the bundled TLD registry.
///
/// Never fails; text without links yields an empty list.
pub fn extract_links(text: &str) -> Vec<String> {
    LinkExtractor::bundled().extract(text)
}
