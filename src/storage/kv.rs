//! Key-value store abstraction
//!
//! The record store sits on a string-keyed store where a write replaces the
//! whole value for a key. [`FileStore`](super::file_io::FileStore) keeps one
//! file per key on disk; [`MemoryStore`] backs tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{TallyError, TallyResult};

/// A string-keyed blob store with whole-value writes
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or None if absent
    fn get(&self, key: &str) -> TallyResult<Option<String>>;

    /// Replace the value under `key`
    fn set(&self, key: &str, value: &str) -> TallyResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> TallyResult<()>;

    /// All keys currently present, sorted
    fn keys(&self) -> TallyResult<Vec<String>>;
}

/// In-memory store
///
/// `set_fail_writes(true)` makes every `set`/`remove` fail, which lets tests
/// check that a rejected write leaves prior state untouched.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> TallyResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TallyError::Storage(format!("Write rejected for key {}", key)));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> TallyResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TallyResult<()> {
        self.check_writable(key)?;
        let mut values = self
            .values
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TallyResult<()> {
        self.check_writable(key)?;
        let mut values = self
            .values
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        values.remove(key);
        Ok(())
    }

    fn keys(&self) -> TallyResult<Vec<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(values.keys().cloned().collect())
    }
}
