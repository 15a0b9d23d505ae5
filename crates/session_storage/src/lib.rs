//! Durable session storage for the SceneSplit client
//!
//! The client mirrors its session (login flag, user record, bearer token)
//! into a small key/value store so a restart can resume without signing in
//! again. State code talks to the [`SessionStorage`] trait; the backing store
//! is injected.

mod error;
mod file;
mod keys;

use std::collections::HashMap;
use std::sync::RwLock;

pub use error::*;
pub use file::*;
pub use keys::*;

/// Trait for durable key/value session storage
pub trait SessionStorage: Send + Sync {
    /// Reads a value
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>>;

    /// Writes a value, replacing any previous one
    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()>;

    /// Removes a value. Removing a missing key is not an error.
    fn clear(&self, key: StorageKey) -> StorageResult<()>;

    /// Checks if a value exists
    fn exists(&self, key: StorageKey) -> StorageResult<bool> {
        Ok(self.load(key)?.is_some())
    }
}

/// In-memory storage for testing
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage with pre-populated values
    pub fn with_values(values: HashMap<StorageKey, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(values.get(&key).cloned())
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&self, key: StorageKey) -> StorageResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        values.remove(&key);
        Ok(())
    }
}
