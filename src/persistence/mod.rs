//! Saving and restoring the diagram through a [`DocumentStore`].
//!
//! The whole diagram is one document under a fixed key. Each shape becomes a
//! flat [`ShapeRecord`] (`type`, `x`, `y`, `w`, `h`, `rot`, `text`); IDs,
//! selection and stack order are not persisted.

mod memory_store;
mod store;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use memory_store::MemoryStore;
pub use store::{DocumentStore, Revision, StoredDocument};

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::constants::MIN_SHAPE_SIZE;
use crate::error::{PersistenceError, StoreError};
use crate::types::{Shape, ShapeDefaults, ShapeKind};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, TryLockError};

/// Field of the stored document holding the shape list.
const SHAPES_FIELD: &str = "shapes";
/// Older documents keep the shape list under this field.
const LEGACY_SHAPES_FIELD: &str = "diagram";

/// One shape as written to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRecord {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub rot: f32,
    pub text: String,
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            kind: shape.kind,
            x: shape.position.0,
            y: shape.position.1,
            w: shape.size.0,
            h: shape.size.1,
            rot: shape.rotation,
            text: shape.label.clone(),
        }
    }

    /// Geometry and label to recreate this shape with.
    pub fn to_defaults(&self) -> ShapeDefaults {
        ShapeDefaults {
            position: (self.x, self.y),
            size: (self.w, self.h),
            rotation: self.rot,
            label: self.text.clone(),
        }
    }
}

/// A record as read back, before validation.
///
/// Numbers stay as raw JSON so that numeric strings can be accepted.
#[derive(Debug, Deserialize)]
struct RawShapeRecord {
    #[serde(rename = "type", alias = "kind")]
    kind: Option<String>,
    x: Option<Value>,
    y: Option<Value>,
    w: Option<Value>,
    h: Option<Value>,
    rot: Option<Value>,
    #[serde(alias = "label")]
    text: Option<String>,
}

/// Reads a finite number from a JSON number or numeric string.
fn lenient_number(value: Option<&Value>) -> Option<f32> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let number = number as f32;
    number.is_finite().then_some(number)
}

impl RawShapeRecord {
    fn validate(self, index: usize) -> Result<ShapeRecord, PersistenceError> {
        let required = |value: Option<&Value>, field: &'static str| {
            lenient_number(value).ok_or(PersistenceError::MalformedRecord { index, field })
        };

        let kind_name = self
            .kind
            .ok_or(PersistenceError::MalformedRecord { index, field: "type" })?;
        let kind: ShapeKind = serde_json::from_value(Value::String(kind_name.clone()))
            .map_err(|_| PersistenceError::UnknownKind {
                index,
                kind: kind_name,
            })?;

        let x = required(self.x.as_ref(), "x")?;
        let y = required(self.y.as_ref(), "y")?;
        let w = required(self.w.as_ref(), "w")?;
        let h = required(self.h.as_ref(), "h")?;
        let rot = lenient_number(self.rot.as_ref()).unwrap_or(0.0);

        Ok(ShapeRecord {
            kind,
            x,
            y,
            w: w.max(MIN_SHAPE_SIZE),
            h: h.max(MIN_SHAPE_SIZE),
            rot,
            text: if kind.has_label() {
                self.text.unwrap_or_default()
            } else {
                String::new()
            },
        })
    }
}

/// Validates every record of a stored document body.
///
/// The first bad record rejects the whole list, and a body without a shape
/// list is rejected rather than read as an empty diagram.
pub fn parse_records(body: &Map<String, Value>) -> Result<Vec<ShapeRecord>, PersistenceError> {
    let list = body
        .get(SHAPES_FIELD)
        .or_else(|| body.get(LEGACY_SHAPES_FIELD));
    let Some(Value::Array(items)) = list else {
        return Err(PersistenceError::MissingShapeList);
    };
    let raw: Vec<RawShapeRecord> = serde_json::from_value(Value::Array(items.clone()))
        .map_err(|e| PersistenceError::Store(e.into()))?;
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| record.validate(index))
        .collect()
}

/// Saves and loads the diagram under one document key.
///
/// Only one save or load runs at a time; an overlapping call fails with
/// [`PersistenceError::Busy`] instead of waiting.
pub struct PersistenceBridge {
    store: Arc<dyn DocumentStore>,
    document_key: String,
    gate: Mutex<()>,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn DocumentStore>, document_key: impl Into<String>) -> Self {
        Self {
            store,
            document_key: document_key.into(),
            gate: Mutex::new(()),
        }
    }

    pub fn document_key(&self) -> &str {
        &self.document_key
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, ()>, PersistenceError> {
        match self.gate.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(PersistenceError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        }
    }

    /// Writes `records` as the current diagram, creating or replacing the document.
    ///
    /// # Returns
    ///
    /// The revision of the written document
    pub fn save(&self, records: &[ShapeRecord]) -> Result<Revision, PersistenceError> {
        let _guard = self.enter()?;
        let key = &self.document_key;

        let existing = match self.store.get(key) {
            Ok(doc) => Some(doc.rev),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => {
                warn!("Could not read {} before saving: {}", key, e);
                return Err(e.into());
            }
        };

        let mut body = Map::new();
        body.insert(
            SHAPES_FIELD.to_string(),
            serde_json::to_value(records).map_err(|e| PersistenceError::Store(e.into()))?,
        );
        let rev = self.store.put(key, body, existing.as_ref())?;
        info!("Saved {} shapes to {} (revision {})", records.len(), key, rev);
        Ok(rev)
    }

    /// Reads and validates the stored diagram.
    ///
    /// Nothing is applied here; the caller rebuilds its registry from the
    /// returned records only after the whole document validated.
    pub fn load(&self) -> Result<Vec<ShapeRecord>, PersistenceError> {
        let _guard = self.enter()?;
        let key = &self.document_key;

        let doc = match self.store.get(key) {
            Ok(doc) => doc,
            Err(StoreError::NotFound(_)) => return Err(PersistenceError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let records = parse_records(&doc.body)?;
        info!("Loaded {} shapes from {} (revision {})", records.len(), key, doc.rev);
        Ok(records)
    }
}

/// Opens the platform's durable store, falling back to memory if that fails.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_store(store_dir: &str) -> Arc<dyn DocumentStore> {
    match FileStore::new(store_dir) {
        Ok(store) => {
            info!("Using file store at {}", store.base_path().display());
            Arc::new(store)
        }
        Err(e) => {
            warn!("Falling back to in-memory store, {} unusable: {}", store_dir, e);
            Arc::new(MemoryStore::new())
        }
    }
}

/// Opens the platform's durable store.
#[cfg(target_arch = "wasm32")]
pub fn open_store(_store_dir: &str) -> Arc<dyn DocumentStore> {
    Arc::new(LocalStorageStore::new())
}
