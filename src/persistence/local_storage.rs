//! Browser `localStorage` document store for the web build.

use super::store::{next_revision, DocumentStore, Revision, StoredDocument};
use crate::error::{StoreError, StoreResult};
use serde_json::{Map, Value};

const KEY_PREFIX: &str = "diagram_editor:";

/// Keeps each document as a JSON string under `diagram_editor:{key}`.
///
/// The storage handle is looked up on every call since `web_sys::Storage`
/// cannot be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> StoreResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl DocumentStore for LocalStorageStore {
    fn get(&self, id: &str) -> StoreResult<StoredDocument> {
        let raw = Self::storage()?
            .get_item(&format!("{}{}", KEY_PREFIX, id))
            .map_err(|e| StoreError::Io(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn put(
        &self,
        id: &str,
        body: Map<String, Value>,
        rev: Option<&Revision>,
    ) -> StoreResult<Revision> {
        let current = match self.get(id) {
            Ok(doc) => Some(doc.rev),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        let new_rev = next_revision(id, current.as_ref(), rev)?;
        let document = StoredDocument {
            id: id.to_string(),
            rev: new_rev.clone(),
            body,
        };
        let json = serde_json::to_string(&document)?;
        Self::storage()?
            .set_item(&format!("{}{}", KEY_PREFIX, id), &json)
            .map_err(|e| StoreError::Io(format!("{:?}", e)))?;
        Ok(new_rev)
    }
}
