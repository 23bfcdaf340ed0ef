//! Caching infrastructure for the service layer.
//!
//! This module provides the [`Cache`] abstraction with in-memory, Redis and
//! no-op implementations, plus the typed three-state [`CacheEntry`] used to
//! tell "never looked up" apart from "looked up, found nothing".

mod cache_interface;
pub mod cache_keys;
pub mod cache_metrics;
mod entry;
mod memory_cache;
mod noop_cache;
#[cfg(feature = "redis")]
mod redis_cache;

pub use cache_interface::{Cache, CacheExt};
pub use cache_metrics::{register_metrics, CacheMetrics};
pub use entry::{CacheEntry, CachedValue};
pub use memory_cache::{MemoryCache, MemoryCacheBuilder, DEFAULT_EXPIRY, DEFAULT_MAX_ENTRIES};
pub use noop_cache::NoopCache;
#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;
