//! Cache-aside orchestration around reads and writes.
//!
//! [`CacheService`] decides when a producer runs and how the cache changes
//! afterwards. It holds no locks: concurrent misses on the same key may all
//! run the producer, and the last write wins.
//!
//! Failures are split in two. Errors from the wrapped producer or operation
//! are returned unchanged and leave the cache untouched. Errors from the
//! cache backend are logged, counted and otherwise ignored, so caching can
//! only ever cost a trip to the backing store.

use crate::cache::{cache_keys, Cache, CacheEntry, CacheExt, CacheMetrics, NoopCache};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// What to do with a producer that found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissPolicy {
    /// Leave the key absent so the next read retries.
    Skip,
    /// Store the null marker so the next read skips the producer.
    StoreNull,
}

/// Cache-aside operations over a shared [`Cache`].
#[derive(Clone)]
pub struct CacheService {
    cache: Arc<dyn Cache>,
}

impl CacheService {
    /// Create a service over a cache backend.
    #[must_use]
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Create a service that never caches.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopCache::new()))
    }

    /// The cache backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Read through the cache, caching only values that exist.
    ///
    /// A hit returns the cached value without running `producer`; a cached
    /// null marker returns `None` the same way. On a miss `producer` runs and
    /// its value is stored when it is `Some`. A `None` is not stored, so the
    /// next call asks the backing store again.
    pub async fn cacheable<T, E, F, Fut>(&self, key: &str, producer: F) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        self.read_through(key, producer, MissPolicy::Skip).await
    }

    /// Read through the cache, caching misses as well.
    ///
    /// Like [`cacheable`](Self::cacheable), but when `producer` returns
    /// `None` a null marker is stored, and later calls return `None` without
    /// running their producer until the key is evicted.
    pub async fn cache_include_null<T, E, F, Fut>(
        &self,
        key: &str,
        producer: F,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        self.read_through(key, producer, MissPolicy::StoreNull).await
    }

    /// Run `mutator` and store its result under `key`.
    ///
    /// The cache is not consulted first. Use this when the mutation's result
    /// is the authoritative new value, such as a freshly inserted record.
    pub async fn cache<T, E, F, Fut>(&self, key: &str, mutator: F) -> Result<T, E>
    where
        T: Serialize + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let value = mutator().await?;
        self.put(key, &value).await;
        Ok(value)
    }

    /// Run `operation`, then evict `key` if it succeeded.
    ///
    /// A failed operation leaves the cache exactly as it was.
    pub async fn evict<R, E, F, Fut>(&self, key: &str, operation: F) -> Result<R, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let result = operation().await?;
        self.remove(key).await;
        Ok(result)
    }

    /// Run `operation`, then evict every key in `keys` if it succeeded.
    pub async fn batch_evict<K, R, E, F, Fut>(&self, keys: &[K], operation: F) -> Result<R, E>
    where
        K: AsRef<str>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let result = operation().await?;
        self.remove_all(keys).await;
        Ok(result)
    }

    /// Run `operation`, then evict the keys `keys_of` derives from its result.
    ///
    /// For operations whose affected keys are only known afterwards, such as
    /// a delete-by-filter that returns the removed records.
    pub async fn batch_evict_with<R, E, K, F, Fut>(&self, keys_of: K, operation: F) -> Result<R, E>
    where
        K: FnOnce(&R) -> Vec<String>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let result = operation().await?;
        let keys = keys_of(&result);
        self.remove_all(&keys).await;
        Ok(result)
    }

    /// Look up a key, degrading backend failures to [`CacheEntry::Absent`].
    pub async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> CacheEntry<T> {
        if !self.check_key(key) {
            return CacheEntry::Absent;
        }

        match self.cache.get::<T>(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache lookup for key '{}' failed, treating as miss: {}", key, e);
                CacheMetrics::backend_error(self.cache.name(), "get");
                CacheEntry::Absent
            }
        }
    }

    /// Store a value, logging and ignoring backend failures.
    pub async fn put<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        if !self.check_key(key) {
            return;
        }

        match self.cache.put(key, value).await {
            Ok(()) => CacheMetrics::put(self.cache.name(), false),
            Err(e) => {
                warn!("Failed to cache key '{}': {}", key, e);
                CacheMetrics::backend_error(self.cache.name(), "put");
            }
        }
    }

    /// Store the null marker, logging and ignoring backend failures.
    pub async fn put_null(&self, key: &str) {
        if !self.check_key(key) {
            return;
        }

        match self.cache.put_null(key).await {
            Ok(()) => CacheMetrics::put(self.cache.name(), true),
            Err(e) => {
                warn!("Failed to cache null marker for key '{}': {}", key, e);
                CacheMetrics::backend_error(self.cache.name(), "put");
            }
        }
    }

    /// Evict a key, logging and ignoring backend failures.
    pub async fn remove(&self, key: &str) {
        if !self.check_key(key) {
            return;
        }

        match self.cache.evict(key).await {
            Ok(()) => {
                debug!("Evicted key '{}'", key);
                CacheMetrics::evicted(self.cache.name(), 1);
            }
            Err(e) => {
                warn!("Failed to evict key '{}': {}", key, e);
                CacheMetrics::backend_error(self.cache.name(), "evict");
            }
        }
    }

    /// Evict several independent keys concurrently.
    pub async fn remove_all<K: AsRef<str>>(&self, keys: &[K]) {
        join_all(keys.iter().map(|key| self.remove(key.as_ref()))).await;
    }

    /// Drop everything this cache owns, logging and ignoring failures.
    pub async fn clear(&self) {
        if let Err(e) = self.cache.clear().await {
            warn!("Failed to clear {} cache: {}", self.cache.name(), e);
            CacheMetrics::backend_error(self.cache.name(), "clear");
        }
    }

    async fn read_through<T, E, F, Fut>(
        &self,
        key: &str,
        producer: F,
        policy: MissPolicy,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if !self.check_key(key) {
            return producer().await;
        }

        let name = self.cache.name();
        match self.get::<T>(key).await {
            CacheEntry::Value(value) => {
                debug!("Cache hit for key '{}'", key);
                CacheMetrics::hit(name);
                return Ok(Some(value));
            }
            CacheEntry::Null => {
                debug!("Cached null for key '{}'", key);
                CacheMetrics::null_hit(name);
                return Ok(None);
            }
            CacheEntry::Absent => {
                debug!("Cache miss for key '{}'", key);
                CacheMetrics::miss(name);
            }
        }

        let started = Instant::now();
        let value = producer().await?;
        CacheMetrics::producer_duration(name, started.elapsed());

        match (&value, policy) {
            (Some(value), _) => self.put(key, value).await,
            (None, MissPolicy::StoreNull) => self.put_null(key).await,
            (None, MissPolicy::Skip) => debug!("Producer found nothing for key '{}'", key),
        }

        Ok(value)
    }

    /// Blank keys never reach the backend.
    fn check_key(&self, key: &str) -> bool {
        if cache_keys::is_usable(key) {
            return true;
        }
        error!(
            cache = self.cache.name(),
            "Blank cache key; bypassing the cache for this call"
        );
        false
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("backend", &self.cache.name())
            .field("enabled", &self.cache.is_enabled())
            .finish()
    }
}
