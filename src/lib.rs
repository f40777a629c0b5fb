//! chatparse - Extract links, mentions and emoticons from chat messages
//!
//! This library pulls structured entities out of short, informal text:
//! - Links, including bare domains (`slipsum.com`), scheme-only hosts
//!   (`http://localhost/`) and internationalized domains (`食狮.中国`)
//! - `@mentions`
//! - `(emoticons)`
//! - Page titles for links, through a pluggable [`TitleResolver`]
//!
//! # Example
//!
//! ```rust
//! use chatparse::{extract_links, find_emoticons, find_mentions, Parser};
//!
//! let text = "@bob (coffee) have you seen slipsum.com yet?";
//!
//! assert_eq!(extract_links(text), vec!["slipsum.com"]);
//! assert_eq!(find_mentions(text), vec!["bob"]);
//! assert_eq!(find_emoticons(text), vec!["coffee"]);
//!
//! // Without a resolver, links come back untitled
//! let parser = Parser::default();
//! assert_eq!(
//!     parser.parse_json("@chris you around?").unwrap(),
//!     r#"{"mentions":["chris"]}"#
//! );
//! ```
//!
//! # Link detection
//!
//! | Input | Links |
//! |-------|-------|
//! | `butt.holdings.` | `butt.holdings` |
//! | `wrapping (in-parens.com)` | `in-parens.com` |
//! | `http://localhost/testing/` | `http://localhost/testing/` |
//! | `alex://google.com` | none, scheme not allowed |
//! | `-invalid-leader.com` | none |
//! | `食狮.com.cn` | `食狮.com.cn` |
//!
//! Allowed schemes are `http`, `https`, `ftp`, `ssh`, `mailto`, `git`, `svn`
//! and `hg`; links without a scheme are treated as `http`.

pub mod emoticons;
pub mod error;
pub mod links;
pub mod mentions;
pub mod parser;
pub mod resolver;
pub mod tld;
pub mod types;

// Re-export commonly used items
pub use emoticons::find_emoticons;
pub use error::{ChatParseError, FetchErrorKind, Result};
pub use links::{extract_links, LinkExtractor, LinkMatcher, MatchKind, VALID_SCHEMES};
pub use mentions::find_mentions;
pub use parser::{parse, ParsedMessage, Parser};
pub use tld::TldSet;
pub use types::{CandidateLink, ExtractedLink, MatchSpan};

#[cfg(feature = "async")]
pub use parser::parse_async;

// Re-export resolver types
pub use resolver::{
    HttpTitleResolver, NilTitleResolver, ResolverOptions, StaticTitleResolver, TitleCache,
    TitleResolver, DEFAULT_CACHE_SIZE, DEFAULT_TITLE_TIMEOUT,
};

#[cfg(feature = "async")]
pub use resolver::AsyncTitleResolver;
