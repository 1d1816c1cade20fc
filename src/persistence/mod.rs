//! Key/value persistence for preferences, high scores and meadow progress
//!
//! Every record is a JSON blob under a fixed key. Loading is forgiving:
//! - Missing key, unavailable storage or corrupt JSON → defaults
//! - Missing fields default, unknown fields are ignored (`#[serde(default)]`)
//! - Write failures are logged and dropped (last write wins)

mod memory;

pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for storage operations (never surfaced past this module's
/// `load_or_default` / `save_or_log`)
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable")]
    Unavailable,

    #[error("Failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Corrupt JSON under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value store (LocalStorage on web, in-memory elsewhere)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a record; `Ok(None)` when the key is absent
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get_item(key)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a record
pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &json)
}

/// Load a record, falling back to `T::default()` on any fault
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match read_json(store, key) {
        Ok(Some(value)) => {
            log::info!("Loaded {}", key);
            value
        }
        Ok(None) => {
            log::info!("No {} found, using defaults", key);
            T::default()
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            T::default()
        }
    }
}

/// Save a record, logging (and otherwise ignoring) any fault
pub fn save_or_log<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    match write_json(store, key, value) {
        Ok(()) => log::debug!("Saved {}", key),
        Err(e) => log::warn!("{}", e),
    }
}

/// Drop a record, logging (and otherwise ignoring) any fault
pub fn remove_or_log<S>(store: &mut S, key: &str)
where
    S: KeyValueStore + ?Sized,
{
    match store.remove_item(key) {
        Ok(()) => log::debug!("Removed {}", key),
        Err(e) => log::warn!("{}", e),
    }
}
