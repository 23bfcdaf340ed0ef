//! Cache contract shared by every backend.

use super::{CacheEntry, CachedValue};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use stash_core::StashResult;

/// Key/value store behind the cache-aside layer.
///
/// Values are stored as JSON strings so the trait stays dyn-compatible and
/// the same payload works for in-process and remote backends.
/// Implementations must be safe for concurrent use; callers add no
/// synchronization of their own.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Backend label used in logs and metrics.
    fn name(&self) -> &str;

    /// Get the stored value for a key.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> StashResult<Option<CachedValue>>;

    /// Store a value, replacing any previous value or null marker.
    async fn put_raw(&self, key: &str, value: CachedValue) -> StashResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn evict(&self, key: &str) -> StashResult<()>;

    /// Remove every entry owned by this cache.
    ///
    /// Backends sharing storage with other subsystems only remove their own
    /// namespace.
    async fn clear(&self) -> StashResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Typed access on top of [`Cache`].
#[async_trait]
pub trait CacheExt: Cache {
    /// Get a typed entry from the cache.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> StashResult<CacheEntry<T>> {
        match self.get_raw(key).await? {
            Some(CachedValue::Value(json)) => Ok(CacheEntry::Value(serde_json::from_str(&json)?)),
            Some(CachedValue::Null) => Ok(CacheEntry::Null),
            None => Ok(CacheEntry::Absent),
        }
    }

    /// Store a typed value.
    async fn put<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> StashResult<()> {
        let json = serde_json::to_string(value)?;
        self.put_raw(key, CachedValue::Value(json)).await
    }

    /// Record a confirmed miss for a key.
    async fn put_null(&self, key: &str) -> StashResult<()> {
        self.put_raw(key, CachedValue::Null).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}
