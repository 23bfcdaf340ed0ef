//! Integration tests for RedisCache.
//!
//! These tests run against a real Redis server using testcontainers.
//! Requires Docker to be available on the system.

#![cfg(feature = "redis")]

mod common;

use common::redis_container::TestRedis;
use common::Order;
use stash_core::StashError;
use stash_service::{Cache, CacheEntry, CacheExt, CacheService, CachedValue};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_put_and_get_typed_value() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("stash:cache");

    cache.put("order/1", &Order::new(1, "NEW")).await.unwrap();

    assert_eq!(
        cache.get::<Order>("order/1").await.unwrap(),
        CacheEntry::Value(Order::new(1, "NEW"))
    );
    assert!(cache.get::<Order>("order/2").await.unwrap().is_absent());
}

#[tokio::test]
async fn test_null_marker_round_trip() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("stash:cache");

    cache.put_null("user/42").await.unwrap();

    assert_eq!(cache.get_raw("user/42").await.unwrap(), Some(CachedValue::Null));
    assert!(cache.get::<Order>("user/42").await.unwrap().is_null());
}

#[tokio::test]
async fn test_json_null_is_stored_as_value() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("stash:cache");

    cache.put("maybe/1", &Option::<u32>::None).await.unwrap();

    assert_eq!(
        cache.get_raw("maybe/1").await.unwrap(),
        Some(CachedValue::Value("null".to_string()))
    );
    assert_eq!(
        cache.get::<Option<u32>>("maybe/1").await.unwrap(),
        CacheEntry::Value(None)
    );
}

#[tokio::test]
async fn test_put_overwrites_null_marker() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("stash:cache");

    cache.put_null("order/7").await.unwrap();
    cache.put("order/7", &Order::new(7, "NEW")).await.unwrap();

    assert_eq!(
        cache.get::<Order>("order/7").await.unwrap(),
        CacheEntry::Value(Order::new(7, "NEW"))
    );
}

#[tokio::test]
async fn test_evict_is_idempotent() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("stash:cache");
    cache.put("order/3", &Order::new(3, "NEW")).await.unwrap();

    cache.evict("order/3").await.unwrap();
    cache.evict("order/3").await.unwrap();
    cache.evict("never-written").await.unwrap();

    assert_eq!(cache.get_raw("order/3").await.unwrap(), None);
}

#[tokio::test]
async fn test_keys_expire_after_ttl() {
    let redis = TestRedis::new().await;
    let cache = redis.cache_with_ttl("stash:cache", 1);

    cache.put("short", &1u32).await.unwrap();
    assert!(cache.get_raw("short").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert_eq!(cache.get_raw("short").await.unwrap(), None);
}

#[tokio::test]
async fn test_clear_only_removes_own_prefix() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("stash:cache");
    let sibling = redis.cache("stash:cache2");
    let other = redis.cache("sessions");

    for i in 0..1200u32 {
        cache.put(&format!("order/{}", i), &i).await.unwrap();
    }
    cache.put_null("order/missing").await.unwrap();
    sibling.put("x", &"kept").await.unwrap();
    other.put("abc", &"kept").await.unwrap();

    cache.clear().await.unwrap();

    assert_eq!(cache.get_raw("order/0").await.unwrap(), None);
    assert_eq!(cache.get_raw("order/1199").await.unwrap(), None);
    assert_eq!(cache.get_raw("order/missing").await.unwrap(), None);
    assert_eq!(
        sibling.get::<String>("x").await.unwrap(),
        CacheEntry::Value("kept".to_string())
    );
    assert_eq!(
        other.get::<String>("abc").await.unwrap(),
        CacheEntry::Value("kept".to_string())
    );
}

#[tokio::test]
async fn test_clear_treats_prefix_literally() {
    let redis = TestRedis::new().await;
    let bracketed = redis.cache("app[1]");
    let plain = redis.cache("app1");

    bracketed.put("k", &1u32).await.unwrap();
    plain.put("k", &2u32).await.unwrap();

    bracketed.clear().await.unwrap();

    assert!(bracketed.get::<u32>("k").await.unwrap().is_absent());
    assert_eq!(plain.get::<u32>("k").await.unwrap(), CacheEntry::Value(2));
}

#[tokio::test]
async fn test_cache_service_over_redis() {
    let redis = TestRedis::new().await;
    let backend = Arc::new(redis.cache("stash:cache"));
    let service = CacheService::new(backend.clone());

    let first: Result<Option<Order>, StashError> =
        service.cache_include_null("user/42", || async { Ok(None) }).await;
    assert_eq!(first.unwrap(), None);

    let second: Result<Option<Order>, StashError> = service
        .cache_include_null("user/42", || async {
            Err(StashError::Database("must not run".to_string()))
        })
        .await;
    assert_eq!(second.unwrap(), None);

    let evicted: Result<(), StashError> = service.evict("user/42", || async { Ok(()) }).await;
    evicted.unwrap();
    assert_eq!(backend.get_raw("user/42").await.unwrap(), None);
}
