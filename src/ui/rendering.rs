//! Canvas painting of shape visuals and the background grid.

use super::state::DiagramApp;
use crate::constants;
use crate::geometry;
use crate::render_sync::{Outline, ShapeVisual};
use crate::types::{Handle, Point};
use eframe::egui;

/// Fill of closed shapes.
const SHAPE_FILL: egui::Color32 = egui::Color32::from_rgb(0xfd, 0xe6, 0xb3);
/// Outline and connector color.
const SHAPE_STROKE: egui::Color32 = egui::Color32::from_rgb(0xc6, 0x9b, 0x2b);
/// Selection outline and handle border.
const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(0x3b, 0x82, 0xf6);
/// Segments per quarter circle when approximating rounded corners.
const CORNER_SEGMENTS: usize = 6;

impl DiagramApp {
    /// Renders the grid and every shape, bottom of the stack first.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle of the canvas area
    pub fn render_diagram(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.config.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        let visuals = self.editor.visuals();
        for visual in &visuals {
            self.draw_shape(painter, visual);
        }
        // Selection chrome on top of all shapes
        for visual in visuals.iter().filter(|v| v.selected) {
            self.draw_selection(painter, visual);
        }
    }

    /// Maps a shape-local point to screen space.
    fn local_to_screen(&self, visual: &ShapeVisual, local: Point) -> egui::Pos2 {
        let (x, y) = visual.placement.apply(local);
        self.canvas_to_screen(egui::pos2(x, y))
    }

    /// Draws a zoom-aware grid, with a stronger line every few cells.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let grid_size = constants::GRID_SIZE;
        let screen_grid_size = grid_size * self.canvas.zoom_factor;
        if screen_grid_size < 4.0 {
            return;
        }

        let minor = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 24));
        let major = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 56));

        let top_left = self.screen_to_canvas(canvas_rect.min);
        let bottom_right = self.screen_to_canvas(canvas_rect.max);
        let first_col = (top_left.x / grid_size).floor() as i64;
        let last_col = (bottom_right.x / grid_size).ceil() as i64;
        let first_row = (top_left.y / grid_size).floor() as i64;
        let last_row = (bottom_right.y / grid_size).ceil() as i64;
        let every = constants::GRID_WIDTH as i64;

        for col in first_col..=last_col {
            let x = self.canvas_to_screen(egui::pos2(col as f32 * grid_size, 0.0)).x;
            let stroke = if col.rem_euclid(every) == 0 { major } else { minor };
            painter.line_segment(
                [egui::pos2(x, canvas_rect.min.y), egui::pos2(x, canvas_rect.max.y)],
                stroke,
            );
        }
        for row in first_row..=last_row {
            let y = self.canvas_to_screen(egui::pos2(0.0, row as f32 * grid_size)).y;
            let stroke = if row.rem_euclid(every) == 0 { major } else { minor };
            painter.line_segment(
                [egui::pos2(canvas_rect.min.x, y), egui::pos2(canvas_rect.max.x, y)],
                stroke,
            );
        }
    }

    /// Draws one shape's outline and label.
    pub fn draw_shape(&self, painter: &egui::Painter, visual: &ShapeVisual) {
        let zoom = self.canvas.zoom_factor;
        let stroke = egui::Stroke::new(constants::SHAPE_STROKE_WIDTH * zoom, SHAPE_STROKE);

        match visual.outline {
            Outline::Rect {
                width,
                height,
                corner_radius,
            } => {
                let local: Vec<Point> = if corner_radius > 0.0 {
                    geometry::rounded_rect_outline(width, height, corner_radius, CORNER_SEGMENTS)
                } else {
                    vec![(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)]
                };
                let points = local
                    .into_iter()
                    .map(|p| self.local_to_screen(visual, p))
                    .collect();
                painter.add(egui::Shape::convex_polygon(points, SHAPE_FILL, stroke));
            }
            Outline::Polygon { points } => {
                let points = points
                    .iter()
                    .map(|p| self.local_to_screen(visual, *p))
                    .collect();
                painter.add(egui::Shape::convex_polygon(points, SHAPE_FILL, stroke));
            }
            Outline::Line { x1, y1, x2, y2 } => {
                let a = self.local_to_screen(visual, (x1, y1));
                let b = self.local_to_screen(visual, (x2, y2));
                let line_stroke =
                    egui::Stroke::new(constants::CONNECTOR_STROKE_WIDTH * zoom, SHAPE_STROKE);
                painter.line_segment([a, b], line_stroke);
                draw_arrowhead(painter, a, b, line_stroke, 10.0 * zoom);
            }
        }

        if let Some(label) = &visual.label {
            if !label.text.is_empty() {
                let center = self.local_to_screen(visual, label.anchor);
                draw_rotated_text(
                    painter,
                    center,
                    &label.text,
                    (constants::LABEL_FONT_SIZE * zoom).clamp(4.0, 96.0),
                    egui::Color32::from_gray(40),
                    visual.placement.rotation_deg.to_radians(),
                );
            }
        }
    }

    /// Draws the selection outline and handles of the selected shape.
    fn draw_selection(&self, painter: &egui::Painter, visual: &ShapeVisual) {
        let stroke = egui::Stroke::new(1.0, SELECTION_COLOR);
        let s = visual.selection_outline;
        let outline = [
            (s.x, s.y),
            (s.x + s.width, s.y),
            (s.x + s.width, s.y + s.height),
            (s.x, s.y + s.height),
        ]
        .iter()
        .map(|p| self.local_to_screen(visual, *p))
        .collect();
        painter.add(egui::Shape::closed_line(outline, stroke));

        for handle in &visual.handles {
            if handle.handle == Handle::Rotate {
                let top_mid = self.local_to_screen(visual, (visual.placement.pivot.0, 0.0));
                let anchor = self.local_to_screen(visual, handle.anchor);
                painter.line_segment([top_mid, anchor], stroke);
                painter.circle(anchor, constants::HANDLE_SIZE / 2.0 + 1.0, egui::Color32::WHITE, stroke);
                continue;
            }
            // Handles keep their screen size regardless of zoom
            let center = self.local_to_screen(visual, handle.anchor);
            let rect = egui::Rect::from_center_size(
                center,
                egui::vec2(handle.rect.width, handle.rect.height),
            );
            painter.rect(rect, 0.0, egui::Color32::WHITE, stroke, egui::StrokeKind::Middle);
        }
    }
}

fn draw_arrowhead(
    painter: &egui::Painter,
    a: egui::Pos2,
    b: egui::Pos2,
    stroke: egui::Stroke,
    size: f32,
) {
    let v = b - a;
    if v.length_sq() <= f32::EPSILON {
        return;
    }
    let dir = v.normalized();
    let perp = egui::vec2(-dir.y, dir.x);
    let base = b - dir * size;
    painter.add(egui::Shape::convex_polygon(
        vec![b, base + perp * (size * 0.5), base - perp * (size * 0.5)],
        stroke.color,
        egui::Stroke::NONE,
    ));
}

fn draw_rotated_text(
    painter: &egui::Painter,
    center: egui::Pos2,
    text: &str,
    font_size: f32,
    color: egui::Color32,
    rotation: f32,
) {
    let font_id = egui::FontId::proportional(font_size);
    let galley = painter.layout_no_wrap(text.to_string(), font_id, color);
    let half = galley.size() * 0.5;
    // Text rotates about its own top-left, so rotate the offset to it as well
    let (sin, cos) = rotation.sin_cos();
    let offset = egui::vec2(-half.x * cos + half.y * sin, -half.x * sin - half.y * cos);
    let shape = egui::epaint::TextShape::new(center + offset, galley, color).with_angle(rotation);
    painter.add(egui::Shape::Text(shape));
}
