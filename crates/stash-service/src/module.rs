//! Assembly of the cache layer from configuration.
//!
//! The application entry point loads a [`StashConfig`], builds one
//! [`CacheService`] here and hands clones of it to every service that needs
//! caching.

use crate::cache::{Cache, MemoryCache, NoopCache};
use crate::cache_aside::CacheService;
use stash_config::{CacheBackend, CacheConfig, RedisConfig, StashConfig};
use stash_core::StashResult;
use std::sync::Arc;
use tracing::info;

/// Builds the configured cache backend.
pub fn build_cache(cache: &CacheConfig, redis: &RedisConfig) -> StashResult<Arc<dyn Cache>> {
    let backend: Arc<dyn Cache> = match cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::from_config(cache)),
        CacheBackend::Redis => build_redis(redis)?,
        CacheBackend::Disabled => Arc::new(NoopCache::new()),
    };

    info!("Cache backend: {}", backend.name());
    Ok(backend)
}

#[cfg(feature = "redis")]
fn build_redis(config: &RedisConfig) -> StashResult<Arc<dyn Cache>> {
    Ok(Arc::new(crate::cache::RedisCache::from_config(config)?))
}

#[cfg(not(feature = "redis"))]
fn build_redis(_config: &RedisConfig) -> StashResult<Arc<dyn Cache>> {
    Err(stash_core::StashError::Configuration(
        "cache backend 'redis' requires the `redis` feature".to_string(),
    ))
}

impl CacheService {
    /// Builds a cache service for the configured backend.
    pub fn from_config(config: &StashConfig) -> StashResult<Self> {
        Ok(Self::new(build_cache(&config.cache, &config.redis)?))
    }
}
