//! Integration tests for loading TLD datasets from disk

use std::fs;
use std::path::PathBuf;

use chatparse::{ChatParseError, LinkExtractor, TldSet};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("chatparse-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_dataset_from_file() {
    let path = temp_file("tlds.txt", "# test registry\ncom\n.Org\n中国\n");
    let tlds = TldSet::from_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(tlds.len(), 3);
    assert!(tlds.contains("org"));
    assert!(tlds.contains("xn--fiqs8s"));

    let extractor = LinkExtractor::new(&tlds).unwrap();
    assert_eq!(
        extractor.extract("example.org and 食狮.中国 but not example.net"),
        vec!["example.org", "食狮.中国"]
    );
}

#[test]
fn test_invalid_dataset_file() {
    let path = temp_file("bad-tlds.txt", "com\nnot a label\n");
    let err = TldSet::from_file(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, ChatParseError::TldParse { line: 2, .. }), "got {:?}", err);
}

#[test]
fn test_missing_dataset_file() {
    let err = TldSet::from_file("/nonexistent/chatparse/tlds.txt").unwrap_err();
    assert!(matches!(err, ChatParseError::IoError(_)));
}
