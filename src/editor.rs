//! Toolkit-independent editor facade.
//!
//! [`DiagramEditor`] bundles the registry, the gesture state machine and the
//! label editor behind canvas-coordinate entry points. The egui front end
//! and the tests drive the editor exclusively through this type.

use crate::manipulation::{GestureMode, Manipulator, PointerInput, Transition};
use crate::persistence::ShapeRecord;
use crate::registry::ShapeRegistry;
use crate::render_sync::{self, ShapeVisual};
use crate::text_edit::{EditResolution, LabelEditor};
use crate::types::{Point, PressTarget, ShapeId, ShapeKind};
use log::{debug, info};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Enter,
    Escape,
}

/// Interactive diagram state: shapes, the active gesture and any open label edit.
#[derive(Debug, Clone)]
pub struct DiagramEditor {
    registry: ShapeRegistry,
    manipulator: Manipulator,
    label_editor: LabelEditor,
    rotation_enabled: bool,
}

impl Default for DiagramEditor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DiagramEditor {
    pub fn new(rotation_enabled: bool) -> Self {
        Self {
            registry: ShapeRegistry::new(),
            manipulator: Manipulator::new(),
            label_editor: LabelEditor::new(),
            rotation_enabled,
        }
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn label_editor(&self) -> &LabelEditor {
        &self.label_editor
    }

    pub fn label_editor_mut(&mut self) -> &mut LabelEditor {
        &mut self.label_editor
    }

    pub fn mode(&self) -> GestureMode {
        self.manipulator.mode()
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }

    pub fn set_rotation_enabled(&mut self, enabled: bool) {
        self.rotation_enabled = enabled;
    }

    /// Adds a shape of `kind` with its defaults and selects it.
    pub fn add_shape(&mut self, kind: ShapeKind) -> ShapeId {
        let id = self.registry.add(kind, kind.defaults());
        self.registry.select(id);
        id
    }

    /// What a press at `point` would land on.
    pub fn hit_test(&self, point: Point) -> PressTarget {
        self.registry.hit_test(point, self.rotation_enabled)
    }

    /// Feeds a raw pointer input to the gesture state machine.
    ///
    /// A press while the label editor is open counts as a press outside the
    /// editor: it cancels the edit and starts nothing.
    pub fn pointer(&mut self, input: PointerInput) -> Transition {
        if self.label_editor.is_open() {
            if let PointerInput::Press { .. } = input {
                debug!("Press outside label editor, cancelling edit");
                self.label_editor
                    .resolve(&mut self.registry, EditResolution::Cancel);
                let mode = self.manipulator.mode();
                return Transition {
                    from: mode,
                    to: mode,
                    touched: None,
                };
            }
        }
        self.manipulator.handle(&mut self.registry, input)
    }

    /// Resolves a press at `point` against the shapes and feeds it in.
    pub fn press_at(&mut self, point: Point) -> Transition {
        let target = self.hit_test(point);
        self.pointer(PointerInput::Press {
            target,
            position: point,
        })
    }

    pub fn move_to(&mut self, point: Point) -> Transition {
        self.pointer(PointerInput::Move { position: point })
    }

    pub fn release(&mut self) -> Transition {
        self.pointer(PointerInput::Release)
    }

    pub fn capture_lost(&mut self) -> Transition {
        self.pointer(PointerInput::CaptureLost)
    }

    /// Handles a double press at `point`: opens a label edit for the shape under it.
    ///
    /// # Returns
    ///
    /// `true` if an edit was opened
    pub fn double_press_at(&mut self, point: Point) -> bool {
        match self.hit_test(point).shape() {
            Some(id) => self.request_label_edit(id),
            None => false,
        }
    }

    /// Opens a label edit for `id`; connectors and unknown shapes are refused.
    pub fn request_label_edit(&mut self, id: ShapeId) -> bool {
        if self.label_editor.is_open() {
            return false;
        }
        self.label_editor.open(&self.registry, id)
    }

    /// Closes the open label edit with `resolution`.
    pub fn resolve_label_edit(&mut self, resolution: EditResolution) -> Option<ShapeId> {
        self.label_editor.resolve(&mut self.registry, resolution)
    }

    /// Handles a key press.
    ///
    /// # Arguments
    ///
    /// * `key` - The key pressed
    /// * `text_input_focused` - Whether a text field outside the editor holds keyboard focus
    ///
    /// # Returns
    ///
    /// `true` if the key changed editor state
    pub fn key(&mut self, key: EditorKey, text_input_focused: bool) -> bool {
        match key {
            EditorKey::Delete => {
                if text_input_focused || self.label_editor.is_open() {
                    return false;
                }
                self.delete_selected().is_some()
            }
            EditorKey::Enter => self.label_editor.commit_buffer(&mut self.registry).is_some(),
            EditorKey::Escape => {
                let open = self.label_editor.is_open();
                self.label_editor.close();
                open
            }
        }
    }

    /// Deletes the selected shape.
    pub fn delete_selected(&mut self) -> Option<ShapeId> {
        let removed = self.registry.delete_selected()?;
        if self.manipulator.active_shape() == Some(removed.id) {
            self.manipulator.reset();
        }
        Some(removed.id)
    }

    /// Snapshot of every shape for saving, bottom of the stack first.
    pub fn records(&self) -> Vec<ShapeRecord> {
        self.registry.iter().map(ShapeRecord::from_shape).collect()
    }

    /// Replaces all shapes with the given records, leaving nothing selected.
    pub fn restore(&mut self, records: &[ShapeRecord]) {
        self.manipulator.reset();
        self.label_editor.close();
        self.registry.clear();
        for record in records {
            self.registry.add(record.kind, record.to_defaults());
        }
        self.registry.clear_selection();
        info!("Restored {} shapes", records.len());
    }

    /// Visuals of every shape in draw order.
    pub fn visuals(&self) -> Vec<ShapeVisual> {
        render_sync::sync_all(&self.registry, self.rotation_enabled)
    }

    /// The whole diagram as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        render_sync::diagram_to_svg(&self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, PersistenceBridge};
    use std::sync::Arc;

    #[test]
    fn test_add_shape_selects_it() {
        let mut editor = DiagramEditor::default();
        let a = editor.add_shape(ShapeKind::Rectangle);
        let b = editor.add_shape(ShapeKind::Diamond);

        assert_eq!(editor.registry().selected_id(), Some(b));
        assert!(!editor.registry().get(a).unwrap().selected);
    }

    #[test]
    fn test_press_drag_release_through_hit_testing() {
        let mut editor = DiagramEditor::default();
        let id = editor.add_shape(ShapeKind::Rectangle);
        editor.registry.clear_selection();

        let t = editor.press_at((130.0, 90.0));
        assert_eq!(t.to, GestureMode::Dragging);
        editor.move_to((140.0, 110.0));
        let t = editor.release();

        assert_eq!(t.to, GestureMode::Idle);
        assert_eq!(editor.registry().get(id).unwrap().position, (130.0, 100.0));
        assert_eq!(editor.registry().selected_id(), Some(id));
    }

    #[test]
    fn test_corner_handle_wins_over_body_of_shape_above() {
        let mut editor = DiagramEditor::default();
        let below = editor.add_shape(ShapeKind::Rectangle);
        editor.add_shape(ShapeKind::RoundedRectangle);
        editor.registry.select(below);
        // Bring another shape over the handle without selecting it.
        let mut defaults = ShapeKind::Diamond.defaults();
        defaults.position = (200.0, 120.0);
        editor.registry.add(ShapeKind::Diamond, defaults);

        let t = editor.press_at((240.0, 160.0));
        assert_eq!(t.to, GestureMode::Resizing);
        assert_eq!(t.touched, Some(below));
    }

    #[test]
    fn test_delete_key_respects_focus() {
        let mut editor = DiagramEditor::default();
        let id = editor.add_shape(ShapeKind::Rectangle);

        assert!(!editor.key(EditorKey::Delete, true));
        assert!(editor.registry().get(id).is_some());

        editor.request_label_edit(id);
        assert!(!editor.key(EditorKey::Delete, false));
        assert!(editor.registry().get(id).is_some());

        editor.key(EditorKey::Escape, false);
        assert!(editor.key(EditorKey::Delete, false));
        assert!(editor.registry().is_empty());
        assert!(!editor.key(EditorKey::Delete, false));
    }

    #[test]
    fn test_double_press_opens_and_enter_commits() {
        let mut editor = DiagramEditor::default();
        let id = editor.add_shape(ShapeKind::Diamond);

        assert!(editor.double_press_at((220.0, 200.0)));
        if let Some(buffer) = editor.label_editor_mut().buffer_mut() {
            *buffer = "Decision".to_string();
        }
        assert!(editor.key(EditorKey::Enter, false));
        assert_eq!(editor.registry().get(id).unwrap().label, "Decision");
    }

    #[test]
    fn test_press_outside_editor_cancels() {
        let mut editor = DiagramEditor::default();
        let id = editor.add_shape(ShapeKind::Rectangle);
        editor.request_label_edit(id);
        if let Some(buffer) = editor.label_editor_mut().buffer_mut() {
            buffer.push('!');
        }

        let t = editor.press_at((130.0, 90.0));

        assert_eq!(t.to, GestureMode::Idle);
        assert!(!editor.label_editor().is_open());
        assert_eq!(editor.registry().get(id).unwrap().label, "Texto");
    }

    #[test]
    fn test_connector_double_press_is_ignored() {
        let mut editor = DiagramEditor::default();
        editor.add_shape(ShapeKind::Connector);
        assert!(!editor.double_press_at((240.0, 200.0)));
        assert!(!editor.label_editor().is_open());
    }

    #[test]
    fn test_save_load_roundtrip_rebuilds_shapes() {
        let bridge = PersistenceBridge::new(Arc::new(MemoryStore::new()), "last-diagram");
        let mut editor = DiagramEditor::default();
        for kind in ShapeKind::ALL {
            editor.add_shape(kind);
        }
        let rounded = editor.add_shape(ShapeKind::RoundedRectangle);
        editor.press_at((300.0, 200.0));
        editor.move_to((310.0, 230.0));
        editor.release();
        editor.registry.get_mut(rounded).unwrap().rotation = 33.0;

        bridge.save(&editor.records()).unwrap();
        let before = editor.records();

        let mut restored = DiagramEditor::default();
        restored.add_shape(ShapeKind::Diamond);
        restored.restore(&bridge.load().unwrap());

        assert_eq!(restored.records(), before);
        assert!(restored.registry().selected().is_none());
    }

    #[test]
    fn test_deleting_dragged_shape_resets_gesture() {
        let mut editor = DiagramEditor::default();
        editor.add_shape(ShapeKind::Rectangle);
        editor.press_at((130.0, 90.0));
        assert_eq!(editor.mode(), GestureMode::Dragging);

        editor.delete_selected();

        assert_eq!(editor.mode(), GestureMode::Idle);
    }
}
