//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall clock (ms) for scheduled reveals and popups
//! - Storage (LocalStorage on web, in-memory on native)
//! - JS bindings (web only)

#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use crate::persistence::{KeyValueStore, MemoryStore};

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// The platform's persistent store. Falls back to memory when LocalStorage
/// is blocked (private mode, sandboxed iframes).
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{}; progress will not persist", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// The platform's persistent store (memory only on native)
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_moves_forward() {
        let a = now_ms();
        let b = now_ms();
        assert!(a > 0.0 && b >= a);
    }

    #[test]
    fn test_native_store_is_usable() {
        let mut store = default_store();
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
