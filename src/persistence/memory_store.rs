//! In-memory document store, used by tests and as a fallback when no
//! durable backend can be opened.

use super::store::{next_revision, DocumentStore, Revision, StoredDocument};
use crate::error::{StoreError, StoreResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;

/// Documents held in a `RwLock`-guarded map; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &str) -> StoreResult<StoredDocument> {
        let docs = self.documents.read().map_err(|_| poisoned())?;
        docs.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put(
        &self,
        id: &str,
        body: Map<String, Value>,
        rev: Option<&Revision>,
    ) -> StoreResult<Revision> {
        let mut docs = self.documents.write().map_err(|_| poisoned())?;
        let new_rev = next_revision(id, docs.get(id).map(|d| &d.rev), rev)?;
        docs.insert(
            id.to_string(),
            StoredDocument {
                id: id.to_string(),
                rev: new_rev.clone(),
                body,
            },
        );
        Ok(new_rev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(n: i64) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("n".to_string(), Value::from(n));
        map
    }

    #[test]
    fn test_create_then_update() {
        let store = MemoryStore::new();
        let rev = store.put("doc", body(1), None).unwrap();
        let rev2 = store.put("doc", body(2), Some(&rev)).unwrap();

        let doc = store.get("doc").unwrap();
        assert_eq!(doc.rev, rev2);
        assert_eq!(doc.body["n"], 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_stale_revision_conflicts() {
        let store = MemoryStore::new();
        let rev = store.put("doc", body(1), None).unwrap();
        store.put("doc", body(2), Some(&rev)).unwrap();

        let err = store.put("doc", body(3), Some(&rev)).unwrap_err();
        assert_eq!(err, StoreError::Conflict { id: "doc".to_string() });
        assert_eq!(store.get("doc").unwrap().body["n"], 2);
    }

    #[test]
    fn test_missing_document() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(
            store.get("nope").unwrap_err(),
            StoreError::NotFound("nope".to_string())
        );
    }
}
