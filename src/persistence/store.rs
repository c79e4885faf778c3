//! Key-value document store abstraction.
//!
//! A store keeps JSON documents under string keys. Every write yields a new
//! [`Revision`]; overwriting an existing document requires presenting its
//! current revision, so two writers cannot silently clobber each other.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Opaque revision token of the form `"{generation}-{nonce}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Revision given to a newly created document.
    pub fn first() -> Self {
        Self::with_generation(1)
    }

    /// Revision that supersedes this one.
    pub fn next(&self) -> Self {
        Self::with_generation(self.generation() + 1)
    }

    /// Write count encoded in the token; zero if the token is not well formed.
    pub fn generation(&self) -> u64 {
        self.0
            .split_once('-')
            .and_then(|(generation, _)| generation.parse().ok())
            .unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn with_generation(generation: u64) -> Self {
        Self(format!("{}-{}", generation, Uuid::new_v4().simple()))
    }
}

impl From<String> for Revision {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored document: key, current revision and body fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev")]
    pub rev: Revision,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

/// Backend that persists documents by key.
///
/// Methods take `&self`; implementations use interior mutability so a store
/// can be shared behind an `Arc` with background tasks.
pub trait DocumentStore: Send + Sync {
    /// Fetches the document stored under `id`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when nothing is stored under `id`.
    fn get(&self, id: &str) -> StoreResult<StoredDocument>;

    /// Writes `body` under `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - Document key
    /// * `body` - Document fields to store
    /// * `rev` - Current revision when replacing, `None` when creating
    ///
    /// # Returns
    ///
    /// The new revision of the document
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] when `rev` does not match what is stored.
    fn put(&self, id: &str, body: Map<String, Value>, rev: Option<&Revision>)
        -> StoreResult<Revision>;
}

/// Checks the caller's revision against the stored one and picks the next revision.
pub(crate) fn next_revision(
    id: &str,
    current: Option<&Revision>,
    presented: Option<&Revision>,
) -> StoreResult<Revision> {
    match (current, presented) {
        (None, None) => Ok(Revision::first()),
        (Some(current), Some(presented)) if current == presented => Ok(current.next()),
        _ => Err(StoreError::Conflict { id: id.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_generations() {
        let first = Revision::first();
        assert_eq!(first.generation(), 1);
        let second = first.next();
        assert_eq!(second.generation(), 2);
        assert_ne!(first, second);
        assert!(second.as_str().starts_with("2-"));
    }

    #[test]
    fn test_malformed_revision_has_generation_zero() {
        assert_eq!(Revision::from("garbage".to_string()).generation(), 0);
    }

    #[test]
    fn test_next_revision_rules() {
        let rev = Revision::first();
        assert!(next_revision("d", None, None).is_ok());
        assert_eq!(next_revision("d", Some(&rev), Some(&rev)).unwrap().generation(), 2);
        assert!(matches!(
            next_revision("d", Some(&rev), None),
            Err(StoreError::Conflict { .. })
        ));
        assert!(matches!(
            next_revision("d", None, Some(&rev)),
            Err(StoreError::Conflict { .. })
        ));
    }

    #[test]
    fn test_stored_document_wire_shape() {
        let mut body = Map::new();
        body.insert("shapes".to_string(), Value::Array(vec![]));
        let doc = StoredDocument {
            id: "last-diagram".to_string(),
            rev: Revision::from("1-abc".to_string()),
            body,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_id"], "last-diagram");
        assert_eq!(json["_rev"], "1-abc");
        assert!(json["shapes"].is_array());
    }
}
