//! Bounded in-process cache.

use super::{Cache, CachedValue};
use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use stash_config::CacheConfig;
use stash_core::StashResult;
use std::time::Duration;
use tracing::debug;

/// Default maximum number of entries.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Default expiry after write and after access (10 minutes).
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(600);

/// In-memory cache backed by Moka.
///
/// Entries expire a fixed time after they were written and after they were
/// last read, whichever comes first; once `max_entries` is reached the
/// least valuable entries are evicted.
#[derive(Clone)]
pub struct MemoryCache {
    inner: MokaCache<String, CachedValue>,
}

impl MemoryCache {
    /// Create a cache with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a cache.
    #[must_use]
    pub fn builder() -> MemoryCacheBuilder {
        MemoryCacheBuilder::default()
    }

    /// Create a cache from configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::builder()
            .max_entries(config.max_entries)
            .expire_after_write(config.expire_after_write())
            .expire_after_access(config.expire_after_access())
            .build()
    }

    /// Approximate number of live entries.
    ///
    /// Pending evictions are applied first, so the figure is accurate
    /// right after a quiet period.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("max_entries", &self.inner.policy().max_capacity())
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

/// Builder for [`MemoryCache`].
#[derive(Debug, Clone)]
pub struct MemoryCacheBuilder {
    max_entries: u64,
    expire_after_write: Option<Duration>,
    expire_after_access: Option<Duration>,
}

impl Default for MemoryCacheBuilder {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            expire_after_write: Some(DEFAULT_EXPIRY),
            expire_after_access: Some(DEFAULT_EXPIRY),
        }
    }
}

impl MemoryCacheBuilder {
    /// Maximum number of entries.
    #[must_use]
    pub const fn max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Expiry measured from the last write; `None` disables it.
    #[must_use]
    pub const fn expire_after_write(mut self, ttl: Option<Duration>) -> Self {
        self.expire_after_write = ttl;
        self
    }

    /// Expiry measured from the last read or write; `None` disables it.
    #[must_use]
    pub const fn expire_after_access(mut self, tti: Option<Duration>) -> Self {
        self.expire_after_access = tti;
        self
    }

    /// Build the cache.
    #[must_use]
    pub fn build(self) -> MemoryCache {
        let mut builder = MokaCache::builder().max_capacity(self.max_entries);
        if let Some(ttl) = self.expire_after_write {
            builder = builder.time_to_live(ttl);
        }
        if let Some(tti) = self.expire_after_access {
            builder = builder.time_to_idle(tti);
        }

        debug!(
            "Created memory cache (max_entries={}, ttl={:?}, tti={:?})",
            self.max_entries, self.expire_after_write, self.expire_after_access
        );

        MemoryCache {
            inner: builder.build(),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_raw(&self, key: &str) -> StashResult<Option<CachedValue>> {
        Ok(self.inner.get(key).await)
    }

    async fn put_raw(&self, key: &str, value: CachedValue) -> StashResult<()> {
        self.inner.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn evict(&self, key: &str) -> StashResult<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> StashResult<()> {
        self.inner.invalidate_all();
        debug!("Cleared memory cache");
        Ok(())
    }
}
