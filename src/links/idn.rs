//! IDNA round trip for link matching.
//!
//! Text is matched in its ASCII-compatible form so that Unicode TLDs hit the
//! normalized registry. Every encoded piece remembers where it came from, so
//! accepted links are cut back out of the original text rather than decoded.

use std::borrow::Cow;
use std::ops::Range;

/// Text prepared for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded<'a> {
    /// The text to run the matchers over
    pub text: Cow<'a, str>,
    /// Whether accepted links must be mapped back to the original text
    pub must_decode: bool,
    source: &'a str,
    segments: Vec<Segment>,
}

/// A piece of encoded text and the original text it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    encoded: Range<usize>,
    original: Range<usize>,
    /// Encoded bytes equal the original bytes
    verbatim: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Label,
    Dot,
    Separator,
}

/// Full stops IDNA treats as label separators: ideographic, full-width and
/// half-width ideographic.
fn is_dot_variant(c: char) -> bool {
    matches!(c, '\u{3002}' | '\u{FF0E}' | '\u{FF61}')
}

fn kind_of(c: char) -> RunKind {
    if c == '-' || c.is_alphanumeric() {
        RunKind::Label
    } else if is_dot_variant(c) {
        RunKind::Dot
    } else {
        RunKind::Separator
    }
}

/// Split text into runs of label characters and separators. Dot variants
/// are always single-character runs.
fn runs(text: &str) -> impl Iterator<Item = (RunKind, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let kind = kind_of(first);
        let end = match kind {
            RunKind::Dot => first.len_utf8(),
            _ => rest
                .char_indices()
                .find(|&(_, c)| kind_of(c) != kind)
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len()),
        };
        let (run, remainder) = rest.split_at(end);
        rest = remainder;
        Some((kind, run))
    })
}

impl<'a> Encoded<'a> {
    fn raw(text: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            must_decode: false,
            source: text,
            segments: Vec::new(),
        }
    }

    /// The original text behind a byte range of the encoded text, lowercased
    /// like the scanners lowercase.
    ///
    /// Encoded pieces touched by the range contribute their whole original
    /// text; verbatim pieces contribute exactly the overlapping bytes.
    pub fn original(&self, range: Range<usize>) -> String {
        if !self.must_decode {
            return self.text[range].to_lowercase();
        }

        let mut original = String::with_capacity(range.len());
        for segment in &self.segments {
            if segment.encoded.end <= range.start || segment.encoded.start >= range.end {
                continue;
            }
            if segment.verbatim {
                let from = range.start.max(segment.encoded.start) - segment.encoded.start;
                let to = range.end.min(segment.encoded.end) - segment.encoded.start;
                let base = segment.original.start;
                original.push_str(&self.source[base + from..base + to]);
            } else {
                original.push_str(&self.source[segment.original.clone()]);
            }
        }
        original.to_lowercase()
    }

    fn push(&mut self, piece: &str, original: Range<usize>, verbatim: bool) {
        let text = self.text.to_mut();
        let start = text.len();
        text.push_str(piece);
        self.segments.push(Segment {
            encoded: start..text.len(),
            original,
            verbatim,
        });
    }
}

/// IDNA-encode every non-ASCII label in `text` and map dot variants to `.`.
///
/// Falls back to the original text if any label cannot be encoded.
pub fn encode_text(text: &str) -> Encoded<'_> {
    if text.is_ascii() {
        return Encoded::raw(text);
    }

    let mut encoded = Encoded {
        text: Cow::Owned(String::with_capacity(text.len() * 2)),
        must_decode: false,
        source: text,
        segments: Vec::new(),
    };

    let mut offset = 0;
    for (kind, run) in runs(text) {
        let original = offset..offset + run.len();
        offset += run.len();

        match kind {
            RunKind::Label if !run.is_ascii() => match idna::domain_to_ascii(run) {
                Ok(ascii) => encoded.push(&ascii, original, false),
                Err(e) => {
                    tracing::debug!(
                        label = run,
                        error = ?e,
                        "IDNA encoding failed, matching raw text"
                    );
                    return Encoded::raw(text);
                }
            },
            RunKind::Dot => encoded.push(".", original, false),
            _ => encoded.push(run, original, true),
        }
    }

    if encoded.text == text {
        return Encoded::raw(text);
    }

    encoded.must_decode = true;
    encoded
}

/// Decode every `xn--` label of a link back to Unicode.
///
/// Labels that are not valid punycode are left untouched.
pub fn decode_link(link: &str) -> String {
    let mut decoded = String::with_capacity(link.len());
    for (kind, run) in runs(link) {
        if kind == RunKind::Label && is_ace_label(run) {
            let (unicode, result) = idna::domain_to_unicode(run);
            if result.is_ok() {
                decoded.push_str(&unicode);
                continue;
            }
        }
        decoded.push_str(run);
    }
    decoded
}

fn is_ace_label(run: &str) -> bool {
    run.len() > 4 && run.is_ascii() && run[..4].eq_ignore_ascii_case("xn--")
}
