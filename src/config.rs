//! Editor settings persisted between sessions.
//!
//! Settings are stored as JSON in eframe's app storage and may be overridden
//! from the environment at startup.

use crate::constants;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// eframe storage key the settings are kept under.
pub const CONFIG_STORAGE_KEY: &str = "editor_config";

/// Environment variable overriding [`EditorConfig::store_dir`].
pub const STORE_DIR_ENV: &str = "DIAGRAM_EDITOR_STORE_DIR";

/// Environment variable overriding [`EditorConfig::document_key`].
pub const DOCUMENT_KEY_ENV: &str = "DIAGRAM_EDITOR_DOCUMENT_KEY";

/// User-facing editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Key the diagram is saved under
    pub document_key: String,
    /// Directory of the file store (native builds only)
    pub store_dir: String,
    /// Whether selected shapes show a rotation handle
    pub rotation_enabled: bool,
    /// Whether the canvas draws a background grid
    pub show_grid: bool,
    /// Whether to use dark mode
    pub dark_mode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document_key: constants::DEFAULT_DOCUMENT_KEY.to_string(),
            store_dir: "./diagram-store".to_string(),
            rotation_enabled: true,
            show_grid: true,
            dark_mode: false,
        }
    }
}

impl EditorConfig {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Settings from eframe storage, or defaults when absent or unreadable.
    pub fn from_storage(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(json) = storage.and_then(|s| s.get_string(CONFIG_STORAGE_KEY)) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring unreadable editor settings: {}", e);
                Self::default()
            }
        }
    }

    /// Applies environment overrides, reading variables through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(STORE_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Store directory overridden to {}", dir);
            self.store_dir = dir;
        }
        if let Some(key) = lookup(DOCUMENT_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Document key overridden to {}", key);
            self.document_key = key;
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }
}
