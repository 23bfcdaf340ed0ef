//! Application configuration structures.

use serde::{Deserialize, Serialize};
use stash_core::LoggingConfig;
use std::fmt;
use std::time::Duration;
use validator::Validate;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StashConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Cache selection and in-memory tunables.
    #[serde(default)]
    #[validate(nested)]
    pub cache: CacheConfig,

    /// Redis connection settings, used when `cache.backend = "redis"`.
    /// Only validated when Redis is the selected backend.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: LoggingConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "stash".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Which cache implementation backs the cache-aside layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Bounded in-process cache.
    #[default]
    Memory,
    /// Shared Redis instance.
    Redis,
    /// Caching switched off; every lookup misses.
    Disabled,
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Redis => write!(f, "redis"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheConfig {
    /// Active backend.
    pub backend: CacheBackend,
    /// Maximum number of entries held by the in-memory cache.
    #[validate(range(min = 1))]
    pub max_entries: u64,
    /// Seconds after insertion before an entry expires (0 = never).
    pub expire_after_write_secs: u64,
    /// Seconds after last access before an entry expires (0 = never).
    pub expire_after_access_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            max_entries: 10_000,
            expire_after_write_secs: 600,
            expire_after_access_secs: 600,
        }
    }
}

impl CacheConfig {
    /// Returns the write expiry, or `None` when disabled.
    #[must_use]
    pub const fn expire_after_write(&self) -> Option<Duration> {
        non_zero_secs(self.expire_after_write_secs)
    }

    /// Returns the access expiry, or `None` when disabled.
    #[must_use]
    pub const fn expire_after_access(&self) -> Option<Duration> {
        non_zero_secs(self.expire_after_access_secs)
    }
}

const fn non_zero_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    #[validate(length(min = 1))]
    pub url: String,
    /// Connection pool size.
    #[validate(range(min = 1, max = 512))]
    pub pool_size: u32,
    /// Namespace prepended to every key; `clear` only touches this prefix.
    #[validate(length(min = 1))]
    pub key_prefix: String,
    /// Expiry applied to every written key, in seconds.
    #[validate(range(min = 1))]
    pub ttl_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            key_prefix: "stash:cache".to_string(),
            ttl_secs: 600,
        }
    }
}

impl RedisConfig {
    /// Returns the key TTL as a Duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
