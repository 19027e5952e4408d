//! Persistent key-value storage for the session.
//!
//! The session mirrors its `token` and `user` into a [`KeyValueStore`]:
//! - **Browser** (`wasm32`): `window.localStorage`, survives page reloads
//! - **Memory**: a shared in-process map, used off the browser and in tests
//!
//! Storage failures (quota exceeded, storage disabled) are logged and
//! otherwise ignored; the in-memory session stays authoritative for the page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Storage key for the raw access token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the JSON-serialized user record.
pub const USER_KEY: &str = "user";

/// String key-value storage with `localStorage` semantics.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str);

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove_item(&self, key: &str);
}

/// In-memory storage.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the session persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Storage backed by `window.localStorage`.
///
/// Outside the browser every read returns `None` and writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for BrowserStorage {
    #[cfg(target_arch = "wasm32")]
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    #[cfg(target_arch = "wasm32")]
    fn set_item(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    tracing::warn!("Failed to write '{}' to localStorage", key);
                }
            }
            None => tracing::warn!("localStorage unavailable, '{}' not persisted", key),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn set_item(&self, key: &str, _value: &str) {
        tracing::trace!("Browser storage unavailable (non-WASM), dropping '{}'", key);
    }

    #[cfg(target_arch = "wasm32")]
    fn remove_item(&self, key: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.remove_item(key).is_err() {
                    tracing::warn!("Failed to remove '{}' from localStorage", key);
                }
            }
            None => tracing::warn!("localStorage unavailable, '{}' not removed", key),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn remove_item(&self, _key: &str) {}
}

/// Storage for the current target: `localStorage` in the browser, memory elsewhere.
pub fn default_storage() -> Rc<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserStorage)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStorage::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item(TOKEN_KEY).is_none());

        storage.set_item(TOKEN_KEY, "T1");
        assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("T1"));

        storage.set_item(TOKEN_KEY, "T2");
        assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("T2"));
        assert_eq!(storage.len(), 1);

        storage.remove_item(TOKEN_KEY);
        assert!(storage.get_item(TOKEN_KEY).is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_remove_absent_key() {
        let storage = MemoryStorage::new();
        storage.remove_item(USER_KEY);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_clones_share_items() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set_item(USER_KEY, r#"{"id":1}"#);
        assert_eq!(handle.get_item(USER_KEY).as_deref(), Some(r#"{"id":1}"#));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_browser_storage_is_inert_off_browser() {
        let storage = BrowserStorage;
        storage.set_item(TOKEN_KEY, "T1");
        assert!(storage.get_item(TOKEN_KEY).is_none());
        storage.remove_item(TOKEN_KEY);
    }
}
