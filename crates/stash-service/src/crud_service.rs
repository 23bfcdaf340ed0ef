//! Generic CRUD service with cache-aside reads and invalidating writes.

use crate::cache::cache_keys;
use crate::cache_aside::CacheService;
use stash_core::{Entity, Repository, StashError, StashResult};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

/// How an update is reflected in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Store the updated record under its key.
    Refresh,
    /// Drop the key; the next read reloads it.
    #[default]
    Evict,
}

/// CRUD operations for one entity type, cached under `"{KIND}/{id}"`.
///
/// ```ignore
/// let brands = CrudService::new(Arc::new(BrandRepository::new(pool)), cache.clone());
/// let brand = brands.find_by_id(&7).await?;
/// brands.update(&brand, WritePolicy::Evict).await?;
/// ```
pub struct CrudService<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    repository: Arc<R>,
    cache: CacheService,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> CrudService<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    /// Creates a new CRUD service.
    pub fn new(repository: Arc<R>, cache: CacheService) -> Self {
        Self {
            repository,
            cache,
            _entity: PhantomData,
        }
    }

    /// The repository behind this service.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Cache key of the entity with `id`.
    pub fn cache_key(&self, id: &E::Id) -> String {
        cache_keys::entity_key(E::KIND, id)
    }

    /// Finds an entity, caching it when found.
    pub async fn find_by_id(&self, id: &E::Id) -> StashResult<Option<E>> {
        debug!("Finding {}: {}", E::KIND, id);
        let key = self.cache_key(id);
        self.cache
            .cacheable(&key, || self.repository.find_by_id(id))
            .await
    }

    /// Finds an entity, caching the absence of a record as well.
    ///
    /// Suited to ids that are probed repeatedly but rarely exist.
    pub async fn find_by_id_include_null(&self, id: &E::Id) -> StashResult<Option<E>> {
        debug!("Finding {} (negative caching): {}", E::KIND, id);
        let key = self.cache_key(id);
        self.cache
            .cache_include_null(&key, || self.repository.find_by_id(id))
            .await
    }

    /// Gets an entity or fails with `NotFound`.
    pub async fn get(&self, id: &E::Id) -> StashResult<E> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StashError::not_found(E::KIND, id))
    }

    /// Inserts an entity and caches the stored record.
    pub async fn insert(&self, entity: &E) -> StashResult<E> {
        let saved = self.repository.insert(entity).await?;
        self.cache.put(&self.cache_key(saved.id()), &saved).await;

        info!("{} created: {}", E::KIND, saved.id());
        Ok(saved)
    }

    /// Updates an entity and refreshes or evicts its cache entry.
    pub async fn update(&self, entity: &E, policy: WritePolicy) -> StashResult<E> {
        let key = self.cache_key(entity.id());
        let updated = match policy {
            WritePolicy::Refresh => {
                self.cache
                    .cache(&key, || self.repository.update(entity))
                    .await?
            }
            WritePolicy::Evict => {
                self.cache
                    .evict(&key, || self.repository.update(entity))
                    .await?
            }
        };

        info!("{} updated: {} ({:?})", E::KIND, updated.id(), policy);
        Ok(updated)
    }

    /// Deletes an entity and evicts its cache entry.
    pub async fn delete(&self, id: &E::Id) -> StashResult<bool> {
        let key = self.cache_key(id);
        let deleted = self
            .cache
            .evict(&key, || self.repository.delete(id))
            .await?;

        info!("{} deleted: {} ({})", E::KIND, id, deleted);
        Ok(deleted)
    }

    /// Deletes several entities and evicts each of their cache entries.
    pub async fn delete_many(&self, ids: &[E::Id]) -> StashResult<u64> {
        let keys = cache_keys::entity_keys(E::KIND, ids);
        let count = self
            .cache
            .batch_evict(&keys, || self.repository.delete_many(ids))
            .await?;

        info!("{} {} records deleted", count, E::KIND);
        Ok(count)
    }

    /// Evicts an entity's cache entry without touching the store.
    ///
    /// For records changed behind the service's back.
    pub async fn invalidate(&self, id: &E::Id) {
        self.cache.remove(&self.cache_key(id)).await;
    }
}

impl<E, R> Clone for CrudService<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: self.cache.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, R> std::fmt::Debug for CrudService<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudService")
            .field("kind", &E::KIND)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
