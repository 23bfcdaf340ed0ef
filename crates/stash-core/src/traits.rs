//! Entity and repository contracts consumed by cached CRUD services.

use crate::StashResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;

/// A persisted record with a stable identity.
///
/// `KIND` and the id together form the cache key of a record
/// (`"{KIND}/{id}"`), so `KIND` must be unique per entity type.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Identifier type.
    type Id: Display + Send + Sync;

    /// Entity type name used to namespace cache keys.
    const KIND: &'static str;

    /// Returns the entity's unique identifier.
    fn id(&self) -> &Self::Id;
}

/// Backing store for one entity type.
///
/// Implementations talk to a document store, a relational database or
/// anything else; callers only see these operations.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Finds an entity by its ID.
    async fn find_by_id(&self, id: &E::Id) -> StashResult<Option<E>>;

    /// Inserts a new entity and returns the stored record, which may
    /// carry a store-assigned id.
    async fn insert(&self, entity: &E) -> StashResult<E>;

    /// Updates an existing entity and returns the stored record.
    async fn update(&self, entity: &E) -> StashResult<E>;

    /// Deletes an entity by its ID. Returns `true` if a record was removed.
    async fn delete(&self, id: &E::Id) -> StashResult<bool>;

    /// Deletes every entity in `ids`. Returns the number removed.
    async fn delete_many(&self, ids: &[E::Id]) -> StashResult<u64>;
}
