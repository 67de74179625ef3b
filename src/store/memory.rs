//! In-memory record store.
//!
//! Same conditional-write semantics as the service-backed store; each
//! operation holds the table lock for its whole duration, so every write
//! is atomic.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::codec::Item;

use super::errors::{StoreError, StoreResult};
use super::expression::UpdateExpression;
use super::{RecordStore, KEY_ATTRIBUTE};

/// Table held in process memory
#[derive(Debug)]
pub struct InMemoryStore {
    items: RwLock<HashMap<String, Item>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored items. Fails like every other read once the table
    /// lock is poisoned.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Item>>> {
        self.items
            .read()
            .map_err(|_| StoreError::Backend("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Item>>> {
        self.items
            .write()
            .map_err(|_| StoreError::Backend("Lock poisoned".to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Item>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        let key = item
            .get(KEY_ATTRIBUTE)
            .and_then(|k| k.as_str())
            .ok_or_else(|| StoreError::MissingKey(KEY_ATTRIBUTE.to_string()))?
            .to_string();

        let mut items = self.write()?;
        if items.contains_key(&key) {
            return Err(StoreError::condition_failed(key));
        }
        items.insert(key, item);
        Ok(())
    }

    async fn update(&self, key: &str, update: &UpdateExpression) -> StoreResult<()> {
        let mut items = self.write()?;
        let item = items
            .get_mut(key)
            .ok_or_else(|| StoreError::condition_failed(key))?;
        update.apply(item);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.write()?
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::condition_failed(key))
    }
}
