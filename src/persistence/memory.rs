//! In-memory store (native builds and tests)

use std::collections::HashMap;

use super::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            available: true,
        }
    }

    /// A store that fails every operation, like LocalStorage in a locked-down browser
    pub fn unavailable() -> Self {
        Self {
            items: HashMap::new(),
            available: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.items.remove(key);
        Ok(())
    }
}
