use std::sync::Arc;
use std::time::Duration;

use scraper::{Html, Selector};
use url::Url;

use crate::error::{ChatParseError, FetchErrorKind, Result};

use super::cache::{TitleCache, DEFAULT_CACHE_SIZE};
use super::{normalize_url, TitleResolver};

#[cfg(feature = "async")]
use super::AsyncTitleResolver;
#[cfg(feature = "async")]
use async_trait::async_trait;

/// Default per-request timeout
pub const DEFAULT_TITLE_TIMEOUT: Duration = Duration::from_millis(500);

/// Default cap on how much of a page body is read
pub const DEFAULT_MAX_BODY_BYTES: u64 = 2 * 1024 * 1024;

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("chatparse/", env!("CARGO_PKG_VERSION"));

/// HTTP title resolver options.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Timeout for a whole fetch attempt
    pub timeout: Duration,
    /// LRU cache size for resolved titles
    pub cache_size: usize,
    /// User-Agent header sent with each request
    pub user_agent: String,
    /// Maximum number of body bytes read
    pub max_body_bytes: u64,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TITLE_TIMEOUT,
            cache_size: DEFAULT_CACHE_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ResolverOptions {
    /// Create new resolver options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the body size limit.
    pub fn with_max_body_bytes(mut self, max: u64) -> Self {
        self.max_body_bytes = max;
        self
    }
}

/// Resolves titles by fetching pages over HTTP.
///
/// Completed fetches are memoized in a [`TitleCache`]; failed ones are not,
/// so a later call may retry them.
#[derive(Clone)]
pub struct HttpTitleResolver {
    agent: ureq::Agent,
    cache: Arc<TitleCache>,
    options: ResolverOptions,
}

impl HttpTitleResolver {
    /// Create a resolver with its own cache.
    pub fn new(options: ResolverOptions) -> Self {
        let cache = Arc::new(TitleCache::new(options.cache_size));
        Self::with_cache(options, cache)
    }

    /// Create a resolver backed by an existing cache.
    pub fn with_cache(options: ResolverOptions, cache: Arc<TitleCache>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            cache,
            options,
        }
    }

    /// The cache this resolver memoizes into.
    pub fn cache(&self) -> &Arc<TitleCache> {
        &self.cache
    }

    /// The options this resolver was built with.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Fetch a page and extract its title, without touching the cache.
    pub fn fetch_title(&self, url: &Url) -> Result<Option<String>> {
        let mut response = self
            .agent
            .get(url.as_str())
            .header("User-Agent", self.options.user_agent.as_str())
            .call()
            .map_err(map_ureq_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatParseError::fetch(
                FetchErrorKind::Status,
                format!("{} returned {}", url, status),
            ));
        }

        let body = response
            .body_mut()
            .with_config()
            .limit(self.options.max_body_bytes)
            .read_to_string()
            .map_err(map_ureq_error)?;

        if body.is_empty() {
            return Err(ChatParseError::fetch(
                FetchErrorKind::EmptyBody,
                format!("{} returned an empty body", url),
            ));
        }

        Ok(extract_title(&body))
    }
}

impl Default for HttpTitleResolver {
    fn default() -> Self {
        Self::new(ResolverOptions::default())
    }
}

impl std::fmt::Debug for HttpTitleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTitleResolver")
            .field("cache", &self.cache)
            .field("options", &self.options)
            .finish()
    }
}

impl TitleResolver for HttpTitleResolver {
    fn resolve_title(&self, link: &str) -> Option<String> {
        let url = match normalize_url(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(link, error = %e, "not fetching title");
                return None;
            }
        };

        if let Some(cached) = self.cache.get(url.as_str()) {
            tracing::debug!(url = %url, "title cache hit");
            return cached;
        }

        match self.fetch_title(&url) {
            Ok(title) => {
                tracing::debug!(url = %url, ?title, "fetched title");
                self.cache.insert(url.as_str(), title.clone());
                title
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "title fetch failed");
                None
            }
        }
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl AsyncTitleResolver for HttpTitleResolver {
    async fn resolve_title(&self, url: &str) -> Option<String> {
        let resolver = self.clone();
        let url = url.to_string();

        // ureq is blocking; keep it off the async worker threads
        match tokio::task::spawn_blocking(move || TitleResolver::resolve_title(&resolver, &url))
            .await
        {
            Ok(title) => title,
            Err(e) => {
                tracing::debug!(error = %e, "title resolution task failed");
                None
            }
        }
    }
}

fn map_ureq_error(err: ureq::Error) -> ChatParseError {
    let kind = match err {
        ureq::Error::Timeout(_) => FetchErrorKind::Timeout,
        ureq::Error::StatusCode(_) => FetchErrorKind::Status,
        _ => FetchErrorKind::Transport,
    };
    ChatParseError::fetch(kind, err.to_string())
}

/// Text of the first `<title>` in the document head, trimmed.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("html > head > title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TITLED_PAGE: &str =
        "<html><head><title> NBC Olympics </title></head><body>hello</body></html>";
    const UNTITLED_PAGE: &str = "<html><head></head><body></body></html>";

    fn resolver() -> HttpTitleResolver {
        HttpTitleResolver::new(ResolverOptions::new().with_timeout(Duration::from_secs(5)))
    }

    /// Run the blocking resolver off the runtime serving the mock.
    async fn resolve(resolver: &HttpTitleResolver, link: &str) -> Option<String> {
        let resolver = resolver.clone();
        let link = link.to_string();
        tokio::task::spawn_blocking(move || TitleResolver::resolve_title(&resolver, &link))
            .await
            .unwrap()
    }

    async fn fetch(resolver: &HttpTitleResolver, link: &str) -> Result<Option<String>> {
        let resolver = resolver.clone();
        let url = normalize_url(link).unwrap();
        tokio::task::spawn_blocking(move || resolver.fetch_title(&url))
            .await
            .unwrap()
    }

    async fn mount_page(server: &MockServer, status: u16, body: &str, hits: u64) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/html"))
            .expect(hits)
            .mount(server)
            .await;
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("<html><head><title>Hello</title></head></html>"),
            Some("Hello".to_string())
        );
        assert_eq!(
            extract_title("<title>\n  Spaced out \n</title>"),
            Some("Spaced out".to_string())
        );
        assert_eq!(extract_title("<html><head></head><body></body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn test_options_builder() {
        let options = ResolverOptions::new()
            .with_timeout(Duration::from_secs(2))
            .with_cache_size(16)
            .with_user_agent("test-agent")
            .with_max_body_bytes(1024);
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert_eq!(options.cache_size, 16);
        assert_eq!(options.user_agent, "test-agent");
        assert_eq!(options.max_body_bytes, 1024);

        let defaults = ResolverOptions::default();
        assert_eq!(defaults.timeout, Duration::from_millis(500));
        assert_eq!(defaults.cache_size, DEFAULT_CACHE_SIZE);
    }

    #[tokio::test]
    async fn test_resolves_and_memoizes_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(TITLED_PAGE, "text/html"))
            .expect(1)
            .mount(&server)
            .await;
        let resolver = resolver();

        let link = format!("{}/page", server.address());
        assert_eq!(resolve(&resolver, &link).await, Some("NBC Olympics".to_string()));

        // Same URL in another spelling hits the cache
        let again = format!("{}/page", server.uri());
        assert_eq!(resolve(&resolver, &again).await, Some("NBC Olympics".to_string()));
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "chatparse-test"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(TITLED_PAGE, "text/html"))
            .expect(1)
            .mount(&server)
            .await;
        let resolver =
            HttpTitleResolver::new(ResolverOptions::new().with_user_agent("chatparse-test"));

        assert!(resolve(&resolver, &server.uri()).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_title_is_cached_as_none() {
        let server = MockServer::start().await;
        mount_page(&server, 200, UNTITLED_PAGE, 1).await;
        let resolver = resolver();

        assert_eq!(resolve(&resolver, &server.uri()).await, None);
        assert_eq!(resolve(&resolver, &server.uri()).await, None);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_not_cached() {
        let server = MockServer::start().await;
        mount_page(&server, 404, "not found", 2).await;
        let resolver = resolver();

        let err = fetch(&resolver, &server.uri()).await.unwrap_err();
        assert_eq!(err.fetch_kind(), Some(FetchErrorKind::Status));

        assert_eq!(resolve(&resolver, &server.uri()).await, None);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let resolver = resolver();

        let err = fetch(&resolver, &server.uri()).await.unwrap_err();
        assert_eq!(err.fetch_kind(), Some(FetchErrorKind::EmptyBody));
        assert_eq!(resolve(&resolver, &server.uri()).await, None);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(TITLED_PAGE, "text/html")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let resolver = HttpTitleResolver::new(
            ResolverOptions::new().with_timeout(Duration::from_millis(200)),
        );
        let err = fetch(&resolver, &server.uri()).await.unwrap_err();
        assert_eq!(err.fetch_kind(), Some(FetchErrorKind::Timeout));
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_unsupported_scheme_skips_network() {
        let resolver = resolver();
        assert_eq!(TitleResolver::resolve_title(&resolver, "ftp://example.com"), None);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_shared_cache_between_resolvers() {
        let server = MockServer::start().await;
        mount_page(&server, 200, TITLED_PAGE, 1).await;
        let cache = Arc::new(TitleCache::new(8));
        let first = HttpTitleResolver::with_cache(ResolverOptions::new(), cache.clone());
        let second = HttpTitleResolver::with_cache(ResolverOptions::new(), cache.clone());

        assert!(resolve(&first, &server.uri()).await.is_some());
        assert!(resolve(&second, &server.uri()).await.is_some());
    }
}
