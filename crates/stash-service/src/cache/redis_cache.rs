//! Redis-based cache implementation.

use super::{Cache, CachedValue};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, Runtime};
use stash_config::RedisConfig;
use stash_core::{StashError, StashResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Payload stored for a confirmed miss.
///
/// Serialized JSON never contains a raw control character, so this can't
/// collide with a real value.
const NULL_MARKER: &str = "\u{0}";

/// Keys examined per `SCAN` round trip during `clear`.
const SCAN_BATCH: usize = 500;

/// Redis-based cache.
///
/// Keys are stored as `{key_prefix}:{key}` so several applications (or
/// several caches of one application) can share a Redis database.
pub struct RedisCache {
    pool: Arc<Pool>,
    key_prefix: String,
    ttl: Duration,
}

impl RedisCache {
    /// Create a Redis cache over an existing pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>, key_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            pool,
            key_prefix: key_prefix.into(),
            ttl,
        }
    }

    /// Create a Redis cache and its connection pool from configuration.
    ///
    /// No connection is opened until the first command.
    pub fn from_config(config: &RedisConfig) -> StashResult<Self> {
        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size as usize));
        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StashError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self::new(Arc::new(pool), config.key_prefix.clone(), config.ttl()))
    }

    /// The namespace every key is stored under.
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> StashResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| StashError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("key_prefix", &self.key_prefix)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn encode(value: &CachedValue) -> &str {
    match value {
        CachedValue::Value(json) => json,
        CachedValue::Null => NULL_MARKER,
    }
}

fn decode(raw: String) -> CachedValue {
    if raw == NULL_MARKER {
        CachedValue::Null
    } else {
        CachedValue::Value(raw)
    }
}

/// Escape glob metacharacters so a prefix matches literally in `SCAN MATCH`.
fn escape_pattern(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl Cache for RedisCache {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get_raw(&self, key: &str) -> StashResult<Option<CachedValue>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(self.namespaced(key)).await.map_err(|e| {
            StashError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value.map(decode))
    }

    async fn put_raw(&self, key: &str, value: CachedValue) -> StashResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_secs = self.ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(self.namespaced(key), encode(&value), ttl_secs)
            .await
            .map_err(|e| StashError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn evict(&self, key: &str) -> StashResult<()> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(self.namespaced(key)).await.map_err(|e| {
            StashError::Cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(())
    }

    async fn clear(&self) -> StashResult<()> {
        let mut conn = self.get_conn().await?;
        let pattern = format!("{}:*", escape_pattern(&self.key_prefix));

        let mut cursor: u64 = 0;
        let mut total: i64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = deadpool_redis::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| StashError::Cache(format!("Failed to scan keys: {}", e)))?;

            if !keys.is_empty() {
                let deleted: i64 = conn.del(&keys).await.map_err(|e| {
                    StashError::Cache(format!("Failed to delete keys: {}", e))
                })?;
                total += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Deleted {} keys matching pattern '{}'", total, pattern);
        Ok(())
    }
}
