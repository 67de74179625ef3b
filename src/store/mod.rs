//! # Record Store
//!
//! Typed access to a key-value table keyed by a generated identifier.
//!
//! Writes are single-item and conditional: `put` succeeds only for a new
//! key, `update` and `delete` only for an existing one. A rejected
//! condition surfaces as [`StoreError::ConditionFailed`], which collapses
//! check-then-act into one atomic round trip.

pub mod errors;
pub mod expression;
pub mod memory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

use std::future::Future;
use std::sync::Arc;

use crate::codec::Item;

pub use errors::{StoreError, StoreResult};
pub use expression::UpdateExpression;
pub use memory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;

/// Primary key attribute of the movies table
pub const KEY_ATTRIBUTE: &str = "movieId";

/// Record store adapter consumed by the dispatcher
pub trait RecordStore: Send + Sync {
    /// Fetch one item by key
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<Item>>> + Send;

    /// Fetch every item; order is store-defined
    fn scan(&self) -> impl Future<Output = StoreResult<Vec<Item>>> + Send;

    /// Write a new item. Fails with `ConditionFailed` if its key exists.
    fn put(&self, item: Item) -> impl Future<Output = StoreResult<()>> + Send;

    /// Merge `update` into an existing item. Fails with `ConditionFailed`
    /// if the key is absent.
    fn update(
        &self,
        key: &str,
        update: &UpdateExpression,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Remove an existing item. Fails with `ConditionFailed` if the key is
    /// absent.
    fn delete(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send;
}

impl<S: RecordStore> RecordStore for Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<Item>>> + Send {
        (**self).get(key)
    }

    fn scan(&self) -> impl Future<Output = StoreResult<Vec<Item>>> + Send {
        (**self).scan()
    }

    fn put(&self, item: Item) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).put(item)
    }

    fn update(
        &self,
        key: &str,
        update: &UpdateExpression,
    ) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).update(key, update)
    }

    fn delete(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).delete(key)
    }
}
