use crate::types::CandidateLink;

/// Characters the leftward scan accepts.
///
/// `/` and `:` are not hostname characters, but allowing them lets the scan
/// walk back over a `scheme://` prefix. Links that start with them are
/// rejected during validation.
fn is_hostname_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '/' | ':')
}

/// Characters that end the path portion of a link.
fn is_path_terminator(c: char) -> bool {
    matches!(c, ')' | ' ' | '\t' | '\r' | '\n')
}

/// Walk `head` backwards collecting hostname characters.
///
/// Returns the prefix and the byte offset in `head` where it starts.
fn scan_left(head: &str) -> (String, usize) {
    let mut reversed = Vec::new();
    let mut start = head.len();
    for (idx, c) in head.char_indices().rev() {
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) if is_hostname_char(l) => {
                reversed.push(l);
                start = idx;
            }
            _ => break,
        }
    }
    (reversed.into_iter().rev().collect(), start)
}

/// Walk `tail` forwards collecting path characters.
///
/// Returns the suffix and the byte offset in `tail` where scanning stopped.
fn scan_right(tail: &str) -> (String, usize) {
    let mut suffix = String::new();
    for (idx, c) in tail.char_indices() {
        if is_path_terminator(c) {
            return (suffix, idx);
        }
        suffix.extend(c.to_lowercase());
    }
    (suffix, tail.len())
}

/// A candidate link and its extent around the matched literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    pub candidate: CandidateLink,
    /// Byte offset in `head` where the prefix starts
    pub start: usize,
    /// Bytes of `tail` taken by the suffix; scanning resumes after them
    pub consumed: usize,
}

/// Expand a matched literal into a candidate link.
///
/// A trailing `.` is left in the tail so that a sentence-ending period is
/// not swallowed into the link.
pub fn scan(head: &str, core: &str, tail: &str) -> Scanned {
    let (prefix, start) = scan_left(head);
    let (mut suffix, mut consumed) = scan_right(tail);

    if suffix.ends_with('.') {
        suffix.pop();
        consumed -= 1;
    }

    Scanned {
        candidate: CandidateLink {
            prefix,
            core: core.to_string(),
            suffix,
        },
        start,
        consumed,
    }
}
