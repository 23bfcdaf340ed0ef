//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

#[cfg(feature = "redis")]
pub mod redis_container;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stash_core::{Entity, Repository, StashError, StashResult};
use stash_service::{Cache, CachedValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Order record used throughout the tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub status: String,
}

impl Order {
    pub fn new(id: u64, status: &str) -> Self {
        Self {
            id,
            status: status.to_string(),
        }
    }
}

impl Entity for Order {
    type Id = u64;
    const KIND: &'static str = "order";

    fn id(&self) -> &u64 {
        &self.id
    }
}

/// In-memory repository that counts reads and can be told to fail.
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<u64, Order>>,
    next_id: AtomicU64,
    reads: AtomicUsize,
    fail_writes: Mutex<bool>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1000),
            reads: AtomicUsize::new(0),
            fail_writes: Mutex::new(false),
        }
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        let repo = Self::new();
        for order in orders {
            repo.orders.lock().unwrap().insert(order.id, order);
        }
        repo
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Changes a record without going through any service.
    pub fn put_directly(&self, order: Order) {
        self.orders.lock().unwrap().insert(order.id, order);
    }

    fn check_writable(&self) -> StashResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StashError::Database("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Order> for InMemoryOrderRepository {
    async fn find_by_id(&self, id: &u64) -> StashResult<Option<Order>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.orders.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, order: &Order) -> StashResult<Order> {
        self.check_writable()?;
        let mut saved = order.clone();
        if saved.id == 0 {
            saved.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        }
        self.orders.lock().unwrap().insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, order: &Order) -> StashResult<Order> {
        self.check_writable()?;
        let mut orders = self.orders.lock().unwrap();
        if !orders.contains_key(&order.id) {
            return Err(StashError::not_found("order", order.id));
        }
        orders.insert(order.id, order.clone());
        Ok(order.clone())
    }

    async fn delete(&self, id: &u64) -> StashResult<bool> {
        self.check_writable()?;
        Ok(self.orders.lock().unwrap().remove(id).is_some())
    }

    async fn delete_many(&self, ids: &[u64]) -> StashResult<u64> {
        self.check_writable()?;
        let mut orders = self.orders.lock().unwrap();
        Ok(ids.iter().filter(|id| orders.remove(*id).is_some()).count() as u64)
    }
}

/// Cache backend that is unreachable for every operation.
#[derive(Default)]
pub struct UnreachableCache {
    pub calls: AtomicUsize,
}

impl UnreachableCache {
    fn fail<T>(&self, operation: &str) -> StashResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StashError::cache(format!("{} failed: connection refused", operation)))
    }
}

#[async_trait]
impl Cache for UnreachableCache {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn get_raw(&self, _key: &str) -> StashResult<Option<CachedValue>> {
        self.fail("get")
    }

    async fn put_raw(&self, _key: &str, _value: CachedValue) -> StashResult<()> {
        self.fail("put")
    }

    async fn evict(&self, _key: &str) -> StashResult<()> {
        self.fail("evict")
    }

    async fn clear(&self) -> StashResult<()> {
        self.fail("clear")
    }
}
