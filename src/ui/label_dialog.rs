//! Modal dialog for editing a shape's label.

use super::state::DiagramApp;
use crate::editor::EditorKey;
use crate::text_edit::EditResolution;
use eframe::egui;

impl DiagramApp {
    /// Shows the label dialog while a label edit is open.
    ///
    /// Accept and Enter commit the buffer. Cancel, Escape and a click on the
    /// backdrop close without changes.
    pub fn draw_label_dialog(&mut self, ctx: &egui::Context) {
        if !self.editor.label_editor().is_open() {
            return;
        }

        let mut resolution: Option<EditResolution> = None;
        let mut enter_pressed = false;
        let focus = std::mem::take(&mut self.focus_label_field);

        let modal = egui::Modal::new(egui::Id::new("label_dialog")).show(ctx, |ui| {
            ui.set_min_width(260.0);
            ui.heading("Edit label");

            if let Some(buffer) = self.editor.label_editor_mut().buffer_mut() {
                let response = ui.add(
                    egui::TextEdit::singleline(buffer)
                        .id(egui::Id::new("label_dialog_text"))
                        .desired_width(f32::INFINITY),
                );
                if focus {
                    response.request_focus();
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    enter_pressed = true;
                }
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Accept").clicked() {
                    if let Some(request) = self.editor.label_editor().request() {
                        resolution = Some(EditResolution::Commit(request.buffer.clone()));
                    }
                }
                if ui.button("Cancel").clicked() {
                    resolution = Some(EditResolution::Cancel);
                }
            });
        });

        if enter_pressed && resolution.is_none() {
            self.editor.key(EditorKey::Enter, true);
            return;
        }
        if resolution.is_none() && modal.should_close() {
            resolution = Some(EditResolution::Cancel);
        }

        if let Some(resolution) = resolution {
            if let Some(id) = self.editor.resolve_label_edit(resolution) {
                log::debug!("Label dialog closed for {}", id);
            }
        }
    }
}
