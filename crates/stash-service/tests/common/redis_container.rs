//! Redis container for the Redis cache integration tests.

use stash_config::RedisConfig;
use stash_service::RedisCache;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

/// Port Redis listens on inside the container.
const REDIS_PORT: u16 = 6379;

/// Test Redis server.
///
/// The container stops when this value is dropped.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    url: String,
}

impl TestRedis {
    /// Starts a fresh Redis container.
    pub async fn new() -> Self {
        let container = Redis::default()
            .start()
            .await
            .expect("Failed to start Redis container");

        let port = container
            .get_host_port_ipv4(REDIS_PORT)
            .await
            .expect("Failed to get Redis port");

        Self {
            _container: container,
            url: format!("redis://127.0.0.1:{}", port),
        }
    }

    /// Builds a cache over this server under `key_prefix`.
    pub fn cache(&self, key_prefix: &str) -> RedisCache {
        self.cache_with_ttl(key_prefix, RedisConfig::default().ttl_secs)
    }

    /// Builds a cache over this server with a custom key expiry.
    pub fn cache_with_ttl(&self, key_prefix: &str, ttl_secs: u64) -> RedisCache {
        let config = RedisConfig {
            url: self.url.clone(),
            pool_size: 4,
            key_prefix: key_prefix.to_string(),
            ttl_secs,
        };
        RedisCache::from_config(&config).expect("Failed to create Redis cache")
    }
}
