//! Browser `localStorage` as the configuration store.

use web_sys::Storage;

use super::describe_js;
use crate::engine::store::KeyValueStore;
use crate::error::GlueError;

/// `window.localStorage`. Reads return `None` and writes fail softly when
/// storage is unavailable (privacy mode, sandboxed iframe).
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            zoon::eprintln!("[bridge] localStorage is not available, configuration will not persist");
        }
        Self { storage }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GlueError> {
        let storage = self.storage.as_ref().ok_or(GlueError::StorageUnavailable)?;
        storage
            .set_item(key, value)
            .map_err(|error| GlueError::StorageWrite {
                key: key.to_owned(),
                reason: describe_js(&error),
            })
    }
}
