//! # Stash Service
//!
//! Cache-aside layer for data-access services.
//!
//! ```text
//! CrudService / caller
//!   ↓  cacheable · cache_include_null · cache · evict · batch_evict
//! CacheService                  (cache-aside orchestration)
//!   ↓  Arc<dyn Cache>
//! MemoryCache | RedisCache | NoopCache
//! ```
//!
//! Callers supply the key and a closure that reaches the backing store;
//! the cache never talks to the store itself.

pub mod cache;
pub mod cache_aside;
pub mod crud_service;
pub mod module;

pub use cache::*;
pub use cache_aside::CacheService;
pub use crud_service::{CrudService, WritePolicy};
pub use module::build_cache;
