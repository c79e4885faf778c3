//! Canvas interaction and navigation.
//!
//! This module handles panning, zooming and the translation of egui pointer
//! state into editor pointer inputs in canvas coordinates.

use super::state::DiagramApp;
use crate::manipulation::GestureMode;
use crate::types::Point;
use eframe::egui;

impl DiagramApp {
    /// Converts screen coordinates to canvas coordinates accounting for zoom and pan.
    ///
    /// # Arguments
    ///
    /// * `screen_pos` - Position in screen space (pixels)
    ///
    /// # Returns
    ///
    /// The corresponding position in canvas space
    pub fn screen_to_canvas(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts canvas coordinates to screen coordinates accounting for zoom and pan.
    pub fn canvas_to_screen(&self, canvas_pos: egui::Pos2) -> egui::Pos2 {
        canvas_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Canvas point as the core's tuple type.
    fn canvas_point(&self, screen_pos: egui::Pos2) -> Point {
        let p = self.screen_to_canvas(screen_pos);
        (p.x, p.y)
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    ///
    /// `modifiers.command` maps to Cmd on macOS and Ctrl elsewhere.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    /// * `response` - The response from the canvas widget
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan && self.editor.mode() == GestureMode::Idle {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.canvas.is_panning {
                    self.canvas.is_panning = true;
                    self.canvas.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.canvas.last_pan_pos {
                    self.canvas.offset += current_pos - last_pos;
                    self.canvas.last_pan_pos = Some(current_pos);
                }
            }
        } else if !should_pan {
            self.canvas.is_panning = false;
            self.canvas.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming.
    ///
    /// Keeps the canvas point under the cursor fixed. Zoom is clamped to
    /// [`MIN_ZOOM`](crate::constants::MIN_ZOOM)..=[`MAX_ZOOM`](crate::constants::MAX_ZOOM).
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }

        let mouse_pos = ui
            .input(|i| i.pointer.hover_pos())
            .or_else(|| response.interact_pointer_pos());
        let Some(mouse_pos) = mouse_pos else {
            return;
        };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let before = self.screen_to_canvas(mouse_pos);
        let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
        let old_zoom = self.canvas.zoom_factor;
        self.canvas.zoom_factor = (old_zoom + zoom_delta)
            .clamp(crate::constants::MIN_ZOOM, crate::constants::MAX_ZOOM);

        if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
            let after = self.canvas_to_screen(before);
            self.canvas.offset += mouse_pos - after;
        }
    }

    /// Feeds primary-button pointer activity on the canvas to the editor.
    ///
    /// Press, move, release and double press are forwarded in that order.
    /// A gesture still active while the button is no longer down (pointer left
    /// the window, touch cancelled) is ended as a lost capture.
    pub fn handle_shape_pointer(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        if self.canvas.is_panning {
            return;
        }

        let (pressed, released, down, double, command, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.button_double_clicked(egui::PointerButton::Primary),
                i.modifiers.command,
                i.pointer.interact_pos(),
            )
        });

        if let Some(pos) = pos {
            let point = self.canvas_point(pos);
            if pressed && !command && response.rect.contains(pos) {
                self.editor.press_at(point);
            }
            if self.editor.mode() != GestureMode::Idle {
                self.editor.move_to(point);
            }
        }

        if self.editor.mode() != GestureMode::Idle {
            if released {
                self.editor.release();
            } else if !down {
                self.editor.capture_lost();
            }
        }

        if double {
            if let Some(pos) = pos.filter(|p| response.rect.contains(*p)) {
                let point = self.canvas_point(pos);
                if self.editor.double_press_at(point) {
                    self.focus_label_field = true;
                }
            }
        }
    }

    /// Draws the canvas and handles its interactions.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        // Shift the origin away from the panel corner once, so default shapes are visible
        if !self.canvas.initialized {
            self.canvas.offset = response.rect.min.to_vec2() + egui::vec2(40.0, 40.0);
            self.canvas.initialized = true;
        }

        // The label dialog owns all pointer input while open
        if !self.editor.label_editor().is_open() {
            self.handle_canvas_panning(ui, &response);
            self.handle_canvas_zoom(ui, &response);
            self.handle_shape_pointer(ui, &response);
        }

        self.render_diagram(&painter, response.rect);
    }
}
