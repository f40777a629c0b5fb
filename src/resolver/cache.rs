use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

/// Default LRU cache size
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// LRU cache of resolved titles, keyed by normalized URL.
///
/// A cached `None` means the page was fetched and has no title.
pub struct TitleCache {
    entries: Mutex<LruCache<String, Option<String>>>,
}

impl TitleCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a URL. The outer `Option` is `None` on a miss.
    pub fn get(&self, url: &str) -> Option<Option<String>> {
        self.entries.lock().get(url).cloned()
    }

    /// Store the outcome for a URL.
    pub fn insert(&self, url: impl Into<String>, title: Option<String>) {
        self.entries.lock().put(url.into(), title);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for TitleCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl std::fmt::Debug for TitleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
