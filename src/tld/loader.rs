use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{ChatParseError, Result};

/// Parse a TLD dataset: one label per line, `#` and `//` comments allowed.
pub(super) fn parse_dataset(text: &str) -> Result<HashSet<String>> {
    let mut labels = HashSet::new();

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let label = normalize_label(line).map_err(|message| ChatParseError::TldParse {
            line: line_num,
            message,
        })?;
        labels.insert(label);
    }

    if labels.is_empty() {
        return Err(ChatParseError::EmptyTldSet);
    }

    Ok(labels)
}

/// Read and parse a TLD dataset file.
pub(super) fn load_dataset(path: &Path) -> Result<HashSet<String>> {
    let text = fs::read_to_string(path)?;
    parse_dataset(&text)
}

/// Lowercase a label and convert it to its IDNA (`xn--`) form.
pub(super) fn normalize_label(raw: &str) -> std::result::Result<String, String> {
    let label = raw.trim();
    let label = label.strip_prefix('.').unwrap_or(label);

    if label.is_empty() {
        return Err("empty label".to_string());
    }
    if label.contains(char::is_whitespace) {
        return Err(format!("label contains whitespace: {:?}", label));
    }
    if label.contains('.') {
        return Err(format!("expected a single label: {:?}", label));
    }

    let lowered = label.to_lowercase();
    let encoded = if lowered.is_ascii() {
        lowered
    } else {
        idna::domain_to_ascii(&lowered)
            .map_err(|e| format!("IDNA encoding failed for {:?}: {:?}", label, e))?
    };

    if !encoded
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return Err(format!("invalid characters in label: {:?}", label));
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let labels = parse_dataset("# header\n\ncom\n// another comment\n  org  \n").unwrap();
        assert_eq!(labels.len(), 2);
        assert!(labels.contains("com"));
        assert!(labels.contains("org"));
    }

    #[test]
    fn test_normalize_lowercases_and_encodes() {
        assert_eq!(normalize_label("COM").unwrap(), "com");
        assert_eq!(normalize_label(".io").unwrap(), "io");
        assert_eq!(normalize_label("中国").unwrap(), "xn--fiqs8s");
        assert_eq!(normalize_label("公司").unwrap(), "xn--55qx5d");
        assert_eq!(normalize_label("xn--fiqs8s").unwrap(), "xn--fiqs8s");
    }

    #[test]
    fn test_parse_rejects_bad_lines_with_line_number() {
        let err = parse_dataset("com\nco uk\n").unwrap_err();
        match err {
            ChatParseError::TldParse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected TldParse, got {:?}", other),
        }

        let err = parse_dataset("com\nnet\nco.uk\n").unwrap_err();
        assert!(matches!(err, ChatParseError::TldParse { line: 3, .. }));

        let err = parse_dataset("com\nfoo_bar\n").unwrap_err();
        assert!(matches!(err, ChatParseError::TldParse { line: 2, .. }));
    }

    #[test]
    fn test_parse_empty_dataset_fails() {
        let err = parse_dataset("# nothing here\n\n").unwrap_err();
        assert!(matches!(err, ChatParseError::EmptyTldSet));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_dataset(Path::new("/nonexistent/chatparse/tlds.txt")).unwrap_err();
        assert!(matches!(err, ChatParseError::IoError(_)));
    }
}
