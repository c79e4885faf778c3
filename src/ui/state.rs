//! Application state structures.
//!
//! This module holds the front end's state: canvas navigation, pointer
//! bookkeeping, in-flight store operations and the status line.

use crate::config::EditorConfig;
use crate::editor::DiagramEditor;
use crate::error::PersistenceError;
use crate::persistence::{self, DocumentStore, MemoryStore, PersistenceBridge, Revision, ShapeRecord};
use eframe::egui;
use log::info;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// State related to canvas navigation.
///
/// Tracks the current pan offset and zoom level.
pub struct CanvasState {
    /// Current canvas pan offset (in screen space)
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom)
    pub zoom_factor: f32,
    /// Whether the user is currently panning the canvas
    pub is_panning: bool,
    /// Last pointer position during panning
    pub last_pan_pos: Option<egui::Pos2>,
    /// Whether the initial centering offset has been applied
    pub initialized: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            is_panning: false,
            last_pan_pos: None,
            initialized: false,
        }
    }
}

/// Kind of store operation that can be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Save,
    Load,
}

/// Messages sent from background store operations back to the app.
#[derive(Debug)]
pub enum StoreOperationResult {
    /// Save finished with the document's new revision
    Saved(Revision),
    /// Load finished with validated records
    Loaded(Vec<ShapeRecord>),
    /// Operation failed
    Failed(StoreOperation, PersistenceError),
}

/// State of the document store connection.
pub struct StoreState {
    /// Bridge shared with background tasks
    pub bridge: Arc<PersistenceBridge>,
    /// Operation currently running, if any
    pub in_flight: Option<StoreOperation>,
    /// Channel for receiving results from background tasks
    pub sender: Sender<StoreOperationResult>,
    pub receiver: Receiver<StoreOperationResult>,
}

impl StoreState {
    pub fn new(store: Arc<dyn DocumentStore>, document_key: &str) -> Self {
        let (sender, receiver) = channel();
        Self {
            bridge: Arc::new(PersistenceBridge::new(store, document_key)),
            in_flight: None,
            sender,
            receiver,
        }
    }
}

/// Message shown in the toolbar status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// The main application structure.
///
/// Implements `eframe::App`; all diagram state lives in the [`DiagramEditor`].
pub struct DiagramApp {
    /// Shapes, gestures and label editing
    pub editor: DiagramEditor,
    /// Persisted settings
    pub config: EditorConfig,
    /// Canvas navigation state
    pub canvas: CanvasState,
    /// Save/load plumbing
    pub store: StoreState,
    /// Last user-visible outcome
    pub status: Option<StatusMessage>,
    /// Whether the label field should grab focus on the next frame
    pub focus_label_field: bool,
}

impl Default for DiagramApp {
    fn default() -> Self {
        Self::with_store(EditorConfig::default(), Arc::new(MemoryStore::new()))
    }
}

impl DiagramApp {
    /// Creates the app from eframe's creation context.
    ///
    /// Settings come from eframe storage with environment overrides applied on
    /// top; the platform's document store is opened from them.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut config = EditorConfig::from_storage(cc.storage);
        config.apply_env_overrides();
        info!(
            "Starting with document key {} (rotation {})",
            config.document_key,
            if config.rotation_enabled { "on" } else { "off" }
        );
        let store = persistence::open_store(&config.store_dir);
        Self::with_store(config, store)
    }

    /// Creates the app with an explicit store.
    pub fn with_store(config: EditorConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            editor: DiagramEditor::new(config.rotation_enabled),
            store: StoreState::new(store, &config.document_key),
            config,
            canvas: CanvasState::default(),
            status: None,
            focus_label_field: false,
        }
    }

    /// Sets the status line to an informational message.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    /// Sets the status line to an error message.
    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }
}
