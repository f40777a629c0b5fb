use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::emoticons::find_emoticons;
use crate::error::Result;
use crate::links::extract_links;
use crate::mentions::find_mentions;
use crate::resolver::{NilTitleResolver, TitleResolver};
use crate::types::ExtractedLink;

#[cfg(feature = "async")]
use crate::resolver::AsyncTitleResolver;

/// Everything found in a single chat message.
///
/// Empty fields are left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emoticons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ExtractedLink>,
}

impl ParsedMessage {
    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty() && self.emoticons.is_empty() && self.links.is_empty()
    }

    /// Render as a JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parses chat messages, resolving link titles through a [`TitleResolver`].
pub struct Parser {
    resolver: Arc<dyn TitleResolver>,
}

impl Parser {
    /// Create a parser with the given title resolver.
    pub fn new(resolver: Arc<dyn TitleResolver>) -> Self {
        Self { resolver }
    }

    /// Parse a message.
    pub fn parse(&self, text: &str) -> ParsedMessage {
        parse(text, self.resolver.as_ref())
    }

    /// Parse a message and render the result as JSON.
    pub fn parse_json(&self, text: &str) -> Result<String> {
        self.parse(text).to_json()
    }
}

impl Default for Parser {
    /// A parser that does not resolve titles.
    fn default() -> Self {
        Self::new(Arc::new(NilTitleResolver::new()))
    }
}

/// Parse a message, resolving each link's title with `resolver`.
pub fn parse(text: &str, resolver: &dyn TitleResolver) -> ParsedMessage {
    let links = extract_links(text)
        .into_iter()
        .map(|url| {
            let title = resolver.resolve_title(&url);
            ExtractedLink::with_title(url, title)
        })
        .collect();

    ParsedMessage {
        mentions: find_mentions(text),
        emoticons: find_emoticons(text),
        links,
    }
}

/// Parse a message, resolving link titles concurrently.
#[cfg(feature = "async")]
pub async fn parse_async(text: &str, resolver: &dyn AsyncTitleResolver) -> ParsedMessage {
    let urls = extract_links(text);
    let titles =
        futures_util::future::join_all(urls.iter().map(|url| resolver.resolve_title(url))).await;

    let links = urls
        .into_iter()
        .zip(titles)
        .map(|(url, title)| ExtractedLink::with_title(url, title))
        .collect();

    ParsedMessage {
        mentions: find_mentions(text),
        emoticons: find_emoticons(text),
        links,
    }
}
