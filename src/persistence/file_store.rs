//! File-backed document store for native builds.
//!
//! Each document lives in `{base}/{key}.json`. Writes go to a temporary file
//! first and are renamed into place, so a crash never leaves a half-written
//! document behind.

use super::store::{next_revision, DocumentStore, Revision, StoredDocument};
use crate::error::{StoreError, StoreResult};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stores one JSON file per document under a base directory.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl AsRef<Path>) -> StoreResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn document_path(&self, id: &str) -> PathBuf {
        let file_name: String = id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", file_name))
    }

    fn read(&self, id: &str) -> StoreResult<Option<StoredDocument>> {
        let path = self.document_path(id);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl DocumentStore for FileStore {
    fn get(&self, id: &str) -> StoreResult<StoredDocument> {
        self.read(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put(
        &self,
        id: &str,
        body: Map<String, Value>,
        rev: Option<&Revision>,
    ) -> StoreResult<Revision> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))?;

        let current = self.read(id)?;
        let new_rev = next_revision(id, current.as_ref().map(|d| &d.rev), rev)?;
        let document = StoredDocument {
            id: id.to_string(),
            rev: new_rev.clone(),
            body,
        };

        let path = self.document_path(id);
        write_atomically(&path, |writer| {
            serde_json::to_writer_pretty(writer, &document)?;
            Ok(())
        })?;

        debug!("Wrote {} revision {}", path.display(), new_rev);
        Ok(new_rev)
    }
}

/// Writes `path` through a sibling temp file that is renamed into place.
///
/// On any failure the temp file is removed and `path` is left untouched.
fn write_atomically<F>(path: &Path, write: F) -> StoreResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> StoreResult<()>,
{
    let temp_path = path.with_extension("json.tmp");
    let result = File::create(&temp_path)
        .map_err(StoreError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
            drop(writer);
            fs::rename(&temp_path, path)?;
            Ok(())
        });

    if result.is_err() {
        if let Err(e) = fs::remove_file(&temp_path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Could not remove {}: {}", temp_path.display(), e);
            }
        }
    }
    result
}
