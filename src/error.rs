use thiserror::Error;

/// Classifies title fetch failures for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete within the configured timeout
    Timeout,
    /// Connection, DNS or protocol failure
    Transport,
    /// The server answered with a non-success status code
    Status,
    /// The response body was empty
    EmptyBody,
    /// The link uses a scheme other than http or https
    UnsupportedScheme,
}

/// chatparse error types
#[derive(Error, Debug)]
pub enum ChatParseError {
    #[error("TLD dataset error at line {line}: {message}")]
    TldParse { line: usize, message: String },

    #[error("TLD dataset contains no labels")]
    EmptyTldSet,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch error: {message}")]
    Fetch {
        kind: FetchErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ChatParseError {
    /// Shorthand for a [`ChatParseError::Fetch`] error.
    pub fn fetch(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self::Fetch {
            kind,
            message: message.into(),
        }
    }

    /// Returns the fetch error kind, if this is a fetch error.
    pub fn fetch_kind(&self) -> Option<FetchErrorKind> {
        match self {
            Self::Fetch { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatParseError>;
