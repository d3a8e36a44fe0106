use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use quokka_common::{Error, Result};

use crate::include::{ContentResolver, IncludeKind, ResolverContext};

/// Default time an entry stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
/// Default entry ceiling.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: String,
    including_path: Option<String>,
    kind: IncludeKind,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    content: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Memoizes a delegate resolver with a TTL and an entry ceiling.
///
/// Entries are keyed by path, including path and kind. Eviction runs on
/// insert when the ceiling is reached: expired entries go first, then the
/// quarter of entries closest to expiry. Readers only take the read lock.
pub struct CachingResolver {
    delegate: Arc<dyn ContentResolver>,
    ttl: Duration,
    max_entries: usize,
    cache: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl CachingResolver {
    /// Start building a cache in front of `delegate`.
    #[must_use]
    pub fn builder(delegate: Arc<dyn ContentResolver>) -> CachingResolverBuilder {
        CachingResolverBuilder {
            delegate,
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.cache.write().clear();
    }

    /// Drop every entry for `path`, whatever its including path or kind.
    pub fn invalidate(&self, path: &str) {
        self.cache.write().retain(|key, _| key.path != path);
    }

    /// Number of cached entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    fn evict_if_needed(&self, cache: &mut HashMap<CacheKey, CacheEntry>) {
        if cache.len() < self.max_entries {
            return;
        }
        let now = Instant::now();
        cache.retain(|_, entry| !entry.is_expired(now));
        if cache.len() < self.max_entries {
            return;
        }
        let to_evict = (cache.len() / 4).max(1);
        let mut by_expiry: Vec<_> = cache
            .iter()
            .map(|(key, entry)| (entry.expires_at, key.clone()))
            .collect();
        by_expiry.sort_by_key(|(expires_at, _)| *expires_at);
        for (_, key) in by_expiry.into_iter().take(to_evict) {
            let _ = cache.remove(&key);
        }
        tracing::debug!(evicted = to_evict, "include cache over capacity");
    }
}

impl ContentResolver for CachingResolver {
    fn resolve(&self, path: &str, context: &ResolverContext) -> Result<String> {
        let key = CacheKey {
            path: path.to_string(),
            including_path: context.including_path.clone(),
            kind: context.kind,
        };
        if let Some(entry) = self.cache.read().get(&key) {
            if !entry.is_expired(Instant::now()) {
                return Ok(entry.content.clone());
            }
        }

        let content = self.delegate.resolve(path, context)?;
        let mut cache = self.cache.write();
        self.evict_if_needed(&mut cache);
        let _ = cache.insert(
            key,
            CacheEntry {
                content: content.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(content)
    }
}

/// Builder for [`CachingResolver`].
pub struct CachingResolverBuilder {
    delegate: Arc<dyn ContentResolver>,
    ttl: Duration,
    max_entries: usize,
}

impl CachingResolverBuilder {
    /// How long an entry stays fresh.
    #[must_use]
    pub const fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Entry ceiling that triggers eviction.
    #[must_use]
    pub const fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Finish the cache.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero TTL or a zero entry ceiling.
    pub fn build(self) -> Result<CachingResolver> {
        if self.ttl.is_zero() {
            return Err(Error::Configuration("ttl must be a positive duration".to_string()));
        }
        if self.max_entries == 0 {
            return Err(Error::Configuration(
                "maxEntries must be greater than 0".to_string(),
            ));
        }
        Ok(CachingResolver {
            delegate: self.delegate,
            ttl: self.ttl,
            max_entries: self.max_entries,
            cache: RwLock::new(HashMap::new()),
        })
    }
}
