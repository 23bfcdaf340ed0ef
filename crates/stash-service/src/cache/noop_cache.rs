//! Cache that stores nothing.

use super::{Cache, CachedValue};
use async_trait::async_trait;
use stash_core::StashResult;

/// A cache that always misses.
///
/// Selecting it turns caching off without touching any call site: every
/// read goes to the producer and every write is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Cache for NoopCache {
    fn name(&self) -> &str {
        "noop"
    }

    async fn get_raw(&self, _key: &str) -> StashResult<Option<CachedValue>> {
        Ok(None)
    }

    async fn put_raw(&self, _key: &str, _value: CachedValue) -> StashResult<()> {
        Ok(())
    }

    async fn evict(&self, _key: &str) -> StashResult<()> {
        Ok(())
    }

    async fn clear(&self) -> StashResult<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
