//! Prometheus metrics for the cache-aside layer.
//!
//! Recording is a no-op until the host application installs a `metrics`
//! recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metric names for the cache layer.
pub mod names {
    /// Lookups answered with a cached value.
    pub const CACHE_HITS_TOTAL: &str = "stash_cache_hits_total";
    /// Lookups answered with a cached null marker.
    pub const CACHE_NULL_HITS_TOTAL: &str = "stash_cache_null_hits_total";
    /// Lookups that had to invoke the producer.
    pub const CACHE_MISSES_TOTAL: &str = "stash_cache_misses_total";
    /// Values and null markers written.
    pub const CACHE_PUTS_TOTAL: &str = "stash_cache_puts_total";
    /// Keys evicted after a successful operation.
    pub const CACHE_EVICTIONS_TOTAL: &str = "stash_cache_evictions_total";
    /// Backend failures degraded to a miss or ignored.
    pub const CACHE_BACKEND_ERRORS_TOTAL: &str = "stash_cache_backend_errors_total";
    /// Producer execution time in seconds.
    pub const CACHE_PRODUCER_DURATION_SECONDS: &str = "stash_cache_producer_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(
        names::CACHE_NULL_HITS_TOTAL,
        "Total number of lookups answered by a cached null marker"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of cache misses that invoked the producer"
    );
    describe_counter!(
        names::CACHE_PUTS_TOTAL,
        "Total number of values and null markers written to the cache"
    );
    describe_counter!(
        names::CACHE_EVICTIONS_TOTAL,
        "Total number of keys evicted after a successful operation"
    );
    describe_counter!(
        names::CACHE_BACKEND_ERRORS_TOTAL,
        "Total number of cache backend failures that were swallowed"
    );
    describe_histogram!(
        names::CACHE_PRODUCER_DURATION_SECONDS,
        "Time spent in producers after a cache miss, in seconds"
    );
}

/// Cache metrics recorder.
#[derive(Clone, Copy, Debug)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a hit.
    pub fn hit(cache: &str) {
        counter!(names::CACHE_HITS_TOTAL, "cache" => cache.to_string()).increment(1);
    }

    /// Record a null-marker hit.
    pub fn null_hit(cache: &str) {
        counter!(names::CACHE_NULL_HITS_TOTAL, "cache" => cache.to_string()).increment(1);
    }

    /// Record a miss.
    pub fn miss(cache: &str) {
        counter!(names::CACHE_MISSES_TOTAL, "cache" => cache.to_string()).increment(1);
    }

    /// Record a write.
    pub fn put(cache: &str, null: bool) {
        counter!(
            names::CACHE_PUTS_TOTAL,
            "cache" => cache.to_string(),
            "null" => if null { "true" } else { "false" }
        )
        .increment(1);
    }

    /// Record evicted keys.
    pub fn evicted(cache: &str, count: usize) {
        counter!(names::CACHE_EVICTIONS_TOTAL, "cache" => cache.to_string())
            .increment(count as u64);
    }

    /// Record a swallowed backend failure.
    pub fn backend_error(cache: &str, operation: &'static str) {
        counter!(
            names::CACHE_BACKEND_ERRORS_TOTAL,
            "cache" => cache.to_string(),
            "operation" => operation
        )
        .increment(1);
    }

    /// Record how long a producer ran.
    pub fn producer_duration(cache: &str, duration: Duration) {
        histogram!(
            names::CACHE_PRODUCER_DURATION_SECONDS,
            "cache" => cache.to_string()
        )
        .record(duration.as_secs_f64());
    }
}
