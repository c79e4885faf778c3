//! egui front end of the diagram editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main DiagramApp
//! - `file_ops` - Save/load through the document store
//! - `canvas` - Canvas navigation and pointer routing
//! - `rendering` - Drawing shapes, handles and the grid
//! - `label_dialog` - Modal label editor
//! - `export` - SVG export

mod canvas;
mod export;
mod file_ops;
mod label_dialog;
mod rendering;
mod state;

#[cfg(test)]
mod tests;

pub use state::DiagramApp;

use crate::config::CONFIG_STORAGE_KEY;
use crate::editor::EditorKey;
use crate::types::ShapeKind;
use eframe::egui;
use log::{debug, error};

impl eframe::App for DiagramApp {
    /// Persist editor settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.config.to_json() {
            Ok(json) => storage.set_string(CONFIG_STORAGE_KEY, json),
            Err(err) => error!("Failed to serialize editor settings: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// Lays out the toolbar and canvas, applies finished store operations and
    /// shows the label dialog while an edit is open.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.config.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations();
        self.handle_delete_key(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_label_dialog(ctx);
    }
}

impl DiagramApp {
    /// Deletes the selected shape on Delete, unless a text field has focus.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        let is_editing_text = ctx.wants_keyboard_input();
        if ctx.input(|i| i.key_pressed(egui::Key::Delete))
            && self.editor.key(EditorKey::Delete, is_editing_text)
        {
            debug!("Deleted selected shape");
        }
    }

    /// Draws the top toolbar.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for kind in ShapeKind::ALL {
                if ui.button(kind.display_name()).clicked() {
                    self.editor.add_shape(kind);
                }
            }

            ui.separator();

            let busy = self.store.in_flight.is_some();
            if ui.add_enabled(!busy, egui::Button::new("Save")).clicked() {
                self.save_diagram(ui.ctx());
            }
            if ui.add_enabled(!busy, egui::Button::new("Load")).clicked() {
                self.load_diagram(ui.ctx());
            }
            if ui.button("Export SVG").clicked() {
                self.export_svg();
            }

            ui.separator();

            ui.checkbox(&mut self.config.show_grid, "Grid");
            ui.checkbox(&mut self.config.dark_mode, "Dark");
            let mut rotation = self.config.rotation_enabled;
            if ui.checkbox(&mut rotation, "Rotation").changed() {
                self.config.rotation_enabled = rotation;
                self.editor.set_rotation_enabled(rotation);
            }

            if let Some(status) = &self.status {
                ui.separator();
                if status.is_error {
                    ui.colored_label(ui.visuals().error_fg_color, &status.text);
                } else {
                    ui.label(&status.text);
                }
            }
        });
    }
}
