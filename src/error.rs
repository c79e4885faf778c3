//! Error types for document storage and diagram persistence.

use thiserror::Error;

/// Errors raised by a [`DocumentStore`](crate::persistence::DocumentStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No document is stored under the key
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The supplied revision does not match the stored one
    #[error("Revision conflict on document {id}")]
    Conflict { id: String },

    /// Reading or writing the backing medium failed
    #[error("I/O error: {0}")]
    Io(String),

    /// The stored bytes could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend cannot be reached at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while saving or loading a diagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Nothing has been saved yet
    #[error("No saved diagram found")]
    NotFound,

    /// Another save or load is still running
    #[error("Another save or load is in progress")]
    Busy,

    /// The stored document holds no shape list
    #[error("Saved diagram has no shape list")]
    MissingShapeList,

    /// A record lacks a usable number for a required field
    #[error("Shape record {index} has a missing or invalid '{field}'")]
    MalformedRecord { index: usize, field: &'static str },

    /// A record names a shape type this editor does not know
    #[error("Shape record {index} has unknown type '{kind}'")]
    UnknownKind { index: usize, kind: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
