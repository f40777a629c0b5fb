//! Page title resolution.
//!
//! Link extraction itself does no I/O. Titles are looked up afterwards
//! through a [`TitleResolver`], which callers inject; resolvers never fail,
//! they return `None` when no title is available.

mod cache;
mod http;

use std::collections::HashMap;

use url::Url;

use crate::error::{ChatParseError, FetchErrorKind, Result};
use crate::links::scheme_of;

#[cfg(feature = "async")]
use async_trait::async_trait;

pub use cache::{TitleCache, DEFAULT_CACHE_SIZE};
pub use http::{
    extract_title, HttpTitleResolver, ResolverOptions, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_TITLE_TIMEOUT, DEFAULT_USER_AGENT,
};

/// Title resolver interface.
pub trait TitleResolver: Send + Sync {
    /// Resolve the page title for an extracted link.
    ///
    /// Returns `None` if the link cannot be fetched or the page has no title.
    fn resolve_title(&self, url: &str) -> Option<String>;
}

/// Async title resolver interface.
#[cfg(feature = "async")]
#[async_trait]
pub trait AsyncTitleResolver: Send + Sync {
    /// Resolve the page title for an extracted link asynchronously.
    ///
    /// Returns `None` if the link cannot be fetched or the page has no title.
    async fn resolve_title(&self, url: &str) -> Option<String>;
}

/// Turn an extracted link into a fetchable http(s) URL.
///
/// Leading `:` and `/` are stripped, links without a scheme get `http://`,
/// and schemes other than http and https are refused.
pub fn normalize_url(link: &str) -> Result<Url> {
    let link = link.trim_start_matches([':', '/']);

    let absolute = match scheme_of(link) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            link.to_string()
        }
        Some(scheme) => {
            return Err(ChatParseError::fetch(
                FetchErrorKind::UnsupportedScheme,
                format!("cannot fetch titles over {}", scheme),
            ));
        }
        None => format!("http://{}", link),
    };

    Url::parse(&absolute).map_err(|e| ChatParseError::InvalidUrl(format!("{}: {}", link, e)))
}

/// Nil resolver that never finds a title.
pub struct NilTitleResolver;

impl NilTitleResolver {
    /// Create a new nil resolver.
    pub fn new() -> Self {
        Self
    }
}

impl Default for NilTitleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleResolver for NilTitleResolver {
    fn resolve_title(&self, _url: &str) -> Option<String> {
        None
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl AsyncTitleResolver for NilTitleResolver {
    async fn resolve_title(&self, _url: &str) -> Option<String> {
        None
    }
}

/// Static resolver with predefined titles.
///
/// Keys are normalized like fetched URLs, so `google.com` and
/// `http://google.com/` share an entry.
pub struct StaticTitleResolver {
    titles: HashMap<String, String>,
}

impl StaticTitleResolver {
    /// Create a new empty static resolver.
    pub fn new() -> Self {
        Self {
            titles: HashMap::new(),
        }
    }

    /// Add a title for a URL.
    pub fn add(&mut self, url: &str, title: impl Into<String>) {
        self.titles.insert(Self::key(url), title.into());
    }

    /// Add a title and return self for chaining.
    pub fn with_title(mut self, url: &str, title: impl Into<String>) -> Self {
        self.add(url, title);
        self
    }

    fn key(url: &str) -> String {
        normalize_url(url)
            .map(String::from)
            .unwrap_or_else(|_| url.to_string())
    }
}

impl Default for StaticTitleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleResolver for StaticTitleResolver {
    fn resolve_title(&self, url: &str) -> Option<String> {
        self.titles.get(&Self::key(url)).cloned()
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl AsyncTitleResolver for StaticTitleResolver {
    async fn resolve_title(&self, url: &str) -> Option<String> {
        // Reuse sync implementation since it's non-blocking
        TitleResolver::resolve_title(self, url)
    }
}
