//! Browser `localStorage` backing for the editor's snapshot slot.
//!
//! When storage is unavailable (private mode, sandboxed iframe) the slot
//! lives in memory and the collage does not survive a reload.

use collage_editor::store::{MemoryStore, SnapshotStore, StoreError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct LocalStorageStore {
    storage: Option<Storage>,
    memory: MemoryStore,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; the collage will not survive a reload");
        }
        Self {
            storage,
            memory: MemoryStore::new(),
        }
    }
}

impl SnapshotStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match &self.storage {
            Some(storage) => storage
                .get_item(key)
                .map_err(|e| StoreError::Unavailable(js_message(&e))),
            None => self.memory.load(key),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match &self.storage {
            // Quota errors land here.
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|e| StoreError::Write(js_message(&e))),
            None => self.memory.save(key, value),
        }
    }
}

pub(crate) fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
