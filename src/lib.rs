//! # Diagram Editor
//!
//! A direct-manipulation diagram editor. Shapes (rectangles, rounded
//! rectangles, diamonds and connector arrows) are placed on a canvas, then
//! dragged, resized from their corners, rotated about their center,
//! re-labelled and deleted. One diagram snapshot can be saved to and restored
//! from a key-value document store.
//!
//! ## Layers
//! - [`geometry`], [`types`]: the shape model and pure derived geometry
//! - [`registry`]: placed shapes, stacking and the single selection
//! - [`manipulation`]: the drag / resize / rotate gesture state machine
//! - [`render_sync`]: projection of shapes into drawable visuals and SVG
//! - [`text_edit`]: request/response label editing
//! - [`editor`]: the facade the front end drives
//! - [`persistence`]: snapshot save/load over pluggable document stores
//! - `ui`: the eframe/egui front end

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod manipulation;
pub mod persistence;
pub mod registry;
pub mod render_sync;
pub mod text_edit;
pub mod types;
mod ui;

// Re-export the types most callers need
pub use config::EditorConfig;
pub use editor::{DiagramEditor, EditorKey};
pub use error::{PersistenceError, StoreError};
pub use types::*;
pub use ui::DiagramApp;

/// Runs the diagram editor as a native desktop application.
///
/// # Returns
///
/// Returns `Ok(())` when the window closes normally, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use diagram_editor::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Diagram Editor",
        options,
        Box::new(|cc| Ok(Box::new(DiagramApp::new(cc)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_default() {
        let editor = DiagramEditor::default();
        assert!(editor.registry().is_empty());
        assert!(editor.rotation_enabled());
        assert_eq!(editor.mode(), manipulation::GestureMode::Idle);
    }

    #[test]
    fn test_every_kind_has_distinct_default_position() {
        let positions: Vec<_> = ShapeKind::ALL.iter().map(|k| k.defaults().position).collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
