//! JSON blobs cached in memory
//!
//! [`JsonList`] and [`JsonDocument`] keep one key's value in an `RwLock`.
//! Mutations hold the write lock while they clone the cached value, apply
//! the change, write the new blob, and only then swap it in. A rejected
//! store write leaves the cache as it was.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{TallyError, TallyResult};

use super::kv::KeyValueStore;

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> TallyResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> TallyResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Decode a stored blob; malformed content reads as None
fn decode<T: DeserializeOwned>(raw: Option<String>) -> Option<T> {
    raw.and_then(|raw| serde_json::from_str(&raw).ok())
}

/// A list stored as a JSON array under one key
pub struct JsonList<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    items: RwLock<Vec<T>>,
}

impl<T> JsonList<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            store,
            key,
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reload the cache from the store
    pub fn load(&self) -> TallyResult<()> {
        let loaded: Vec<T> = decode(self.store.get(&self.key)?).unwrap_or_default();
        *write_lock(&self.items)? = loaded;
        Ok(())
    }

    pub fn all(&self) -> TallyResult<Vec<T>> {
        Ok(read_lock(&self.items)?.clone())
    }

    pub fn len(&self) -> TallyResult<usize> {
        Ok(read_lock(&self.items)?.len())
    }

    pub fn is_empty(&self) -> TallyResult<bool> {
        Ok(self.len()? == 0)
    }

    /// First item matching `predicate`
    pub fn find<P>(&self, predicate: P) -> TallyResult<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(read_lock(&self.items)?.iter().find(|item| predicate(item)).cloned())
    }

    /// Items matching `predicate`, in stored order
    pub fn filter<P>(&self, predicate: P) -> TallyResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(read_lock(&self.items)?
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect())
    }

    /// Read-modify-write under the write lock
    ///
    /// `change` works on a copy. If it fails, or the store write fails, the
    /// cached list is unchanged.
    pub fn mutate<R, F>(&self, change: F) -> TallyResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> TallyResult<R>,
    {
        let mut items = write_lock(&self.items)?;
        let mut next = items.clone();
        let result = change(&mut next)?;
        self.persist(&next)?;
        *items = next;
        Ok(result)
    }

    /// Replace the whole list
    pub fn replace_all(&self, replacement: Vec<T>) -> TallyResult<()> {
        let mut items = write_lock(&self.items)?;
        self.persist(&replacement)?;
        *items = replacement;
        Ok(())
    }

    /// Remove the key and empty the cache
    pub fn clear(&self) -> TallyResult<()> {
        let mut items = write_lock(&self.items)?;
        self.store.remove(&self.key)?;
        items.clear();
        Ok(())
    }

    fn persist(&self, items: &[T]) -> TallyResult<()> {
        let json = serde_json::to_string(items)
            .map_err(|e| TallyError::Json(format!("Failed to serialize {}: {}", self.key, e)))?;
        self.store.set(&self.key, &json)
    }
}

/// A single JSON object stored under one key
pub struct JsonDocument<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    value: RwLock<Option<T>>,
}

impl<T> JsonDocument<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            store,
            key,
            value: RwLock::new(None),
        }
    }

    pub fn load(&self) -> TallyResult<()> {
        let loaded: Option<T> = decode(self.store.get(&self.key)?);
        *write_lock(&self.value)? = loaded;
        Ok(())
    }

    pub fn get(&self) -> TallyResult<Option<T>> {
        Ok(read_lock(&self.value)?.clone())
    }

    /// Persist `value`, then cache it
    pub fn set(&self, value: T) -> TallyResult<()> {
        let mut current = write_lock(&self.value)?;
        let json = serde_json::to_string(&value)
            .map_err(|e| TallyError::Json(format!("Failed to serialize {}: {}", self.key, e)))?;
        self.store.set(&self.key, &json)?;
        *current = Some(value);
        Ok(())
    }

    /// Remove the key; returns the value that was cached
    pub fn clear(&self) -> TallyResult<Option<T>> {
        let mut current = write_lock(&self.value)?;
        self.store.remove(&self.key)?;
        Ok(current.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;

    fn list_with_store() -> (JsonList<u32>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let list = JsonList::new(store.clone(), "@test:numbers".into());
        (list, store)
    }

    #[test]
    fn test_malformed_blob_loads_empty() {
        let (list, store) = list_with_store();
        store.set("@test:numbers", "{not json").unwrap();
        list.load().unwrap();
        assert!(list.is_empty().unwrap());
    }

    #[test]
    fn test_mutate_persists_then_commits() {
        let (list, store) = list_with_store();
        list.mutate(|items| {
            items.push(1);
            items.push(2);
            Ok(())
        })
        .unwrap();

        assert_eq!(list.all().unwrap(), vec![1, 2]);
        assert_eq!(store.get("@test:numbers").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_failed_write_keeps_cache() {
        let (list, store) = list_with_store();
        list.replace_all(vec![7]).unwrap();

        store.set_fail_writes(true);
        assert!(list
            .mutate(|items| {
                items.push(8);
                Ok(())
            })
            .is_err());
        assert!(list.clear().is_err());

        assert_eq!(list.all().unwrap(), vec![7]);
        assert_eq!(store.get("@test:numbers").unwrap().as_deref(), Some("[7]"));
    }

    #[test]
    fn test_failed_change_skips_write() {
        let (list, _store) = list_with_store();
        let result: TallyResult<()> = list.mutate(|items| {
            items.push(1);
            Err(TallyError::Validation("nope".into()))
        });
        assert!(result.is_err());
        assert!(list.is_empty().unwrap());
    }

    #[test]
    fn test_document_set_and_clear() {
        let store = Arc::new(MemoryStore::new());
        let doc: JsonDocument<String> = JsonDocument::new(store.clone(), "@test:doc".into());
        doc.load().unwrap();
        assert_eq!(doc.get().unwrap(), None);

        doc.set("hello".into()).unwrap();
        let reloaded: JsonDocument<String> = JsonDocument::new(store, "@test:doc".into());
        reloaded.load().unwrap();
        assert_eq!(reloaded.get().unwrap().as_deref(), Some("hello"));

        assert_eq!(reloaded.clear().unwrap().as_deref(), Some("hello"));
        assert_eq!(reloaded.get().unwrap(), None);
    }
}
