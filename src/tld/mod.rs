//! TLD registry.
//!
//! An immutable set of normalized top-level domain labels. The bundled
//! dataset is compiled into the binary and parsed once, on first use.

mod loader;

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::error::{ChatParseError, Result};

/// The bundled TLD dataset.
const BUNDLED_DATASET: &str = include_str!("../../data/tlds.txt");

static BUNDLED: Lazy<TldSet> = Lazy::new(|| {
    TldSet::parse(BUNDLED_DATASET).expect("BUNDLED: bundled TLD dataset is invalid")
});

/// Set of valid TLD labels, lowercased and IDNA-encoded.
#[derive(Debug, Clone)]
pub struct TldSet {
    labels: HashSet<String>,
}

impl TldSet {
    /// The registry built from the bundled dataset.
    ///
    /// Panics on first use if the bundled dataset cannot be parsed.
    pub fn bundled() -> &'static TldSet {
        &BUNDLED
    }

    /// Parse a dataset with one label per line.
    pub fn parse(text: &str) -> Result<Self> {
        let labels = loader::parse_dataset(text)?;
        tracing::debug!(count = labels.len(), "loaded TLD dataset");
        Ok(Self { labels })
    }

    /// Load a dataset from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let labels = loader::load_dataset(path.as_ref())?;
        tracing::debug!(
            count = labels.len(),
            path = %path.as_ref().display(),
            "loaded TLD dataset"
        );
        Ok(Self { labels })
    }

    /// Build a set from individual labels.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for (idx, label) in labels.into_iter().enumerate() {
            let normalized = loader::normalize_label(label.as_ref())
                .map_err(|message| ChatParseError::TldParse {
                    line: idx + 1,
                    message,
                })?;
            set.insert(normalized);
        }
        if set.is_empty() {
            return Err(ChatParseError::EmptyTldSet);
        }
        Ok(Self { labels: set })
    }

    /// Check whether a label is a known TLD. The label is normalized first.
    pub fn contains(&self, label: &str) -> bool {
        if self.labels.contains(label) {
            return true;
        }
        match loader::normalize_label(label) {
            Ok(normalized) => self.labels.contains(&normalized),
            Err(_) => false,
        }
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set is empty (never true for a constructed set)
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        labels.sort_unstable();
        labels.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_contains_common_tlds() {
        let tlds = TldSet::bundled();
        assert!(tlds.len() > 1000, "got {}", tlds.len());
        for tld in ["com", "org", "io", "uk", "cn", "goog", "holdings", "horse"] {
            assert!(tlds.contains(tld), "missing {}", tld);
        }
        assert!(!tlds.contains("local"));
        assert!(!tlds.contains("localhost"));
    }

    #[test]
    fn test_bundled_is_normalized() {
        let tlds = TldSet::bundled();
        assert!(tlds.iter().all(|t| t.is_ascii() && t == t.to_lowercase()));
        assert!(tlds.iter().any(|t| t == "xn--fiqs8s"));
        assert!(tlds.contains("中国"));
        assert!(tlds.contains("COM"));
    }

    #[test]
    fn test_from_labels() {
        let tlds = TldSet::from_labels(["com", "Net", "公司"]).unwrap();
        assert_eq!(tlds.len(), 3);
        assert_eq!(tlds.iter().collect::<Vec<_>>(), vec!["com", "net", "xn--55qx5d"]);
        assert!(TldSet::from_labels(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_iter_is_sorted() {
        let tlds = TldSet::parse("org\ncom\nnet\n").unwrap();
        assert_eq!(tlds.iter().collect::<Vec<_>>(), vec!["com", "net", "org"]);
        assert!(!tlds.is_empty());
    }
}
