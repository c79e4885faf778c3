//! Projection of shape state into visual attributes.
//!
//! [`sync`] is a pure function of a shape: it derives placement, outline,
//! label anchor, selection outline and handles from the current geometry.
//! Painters (the egui canvas, the SVG exporter) consume the resulting
//! [`ShapeVisual`] and never look at geometry fields directly.

use crate::constants;
use crate::geometry;
use crate::registry::ShapeRegistry;
use crate::types::{Bounds, Handle, Point, Shape, ShapeId, ShapeKind};

/// Translate-then-rotate transform from local to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Top-left of the bounding box
    pub translate: Point,
    /// Rotation in degrees
    pub rotation_deg: f32,
    /// Rotation pivot in local coordinates (the bounding-box center)
    pub pivot: Point,
}

impl Placement {
    /// Maps a local point to canvas coordinates.
    pub fn apply(&self, local: Point) -> Point {
        let rotated = geometry::rotate_about(local, self.pivot, self.rotation_deg);
        (rotated.0 + self.translate.0, rotated.1 + self.translate.1)
    }

    /// SVG `transform` attribute value for this placement.
    pub fn svg_transform(&self) -> String {
        format!(
            "translate({},{}) rotate({} {} {})",
            fmt_num(self.translate.0),
            fmt_num(self.translate.1),
            fmt_num(self.rotation_deg),
            fmt_num(self.pivot.0),
            fmt_num(self.pivot.1)
        )
    }
}

/// Outline primitive of a shape in local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    /// Rectangle at the local origin; `corner_radius` is zero for plain rectangles
    Rect {
        width: f32,
        height: f32,
        corner_radius: f32,
    },
    /// Closed polygon through four vertices
    Polygon { points: [Point; 4] },
    /// Straight line ending in an arrowhead at `(x2, y2)`
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
}

/// Text drawn centered on `anchor`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVisual {
    pub anchor: Point,
    pub text: String,
}

/// A handle's anchor and its square hit target, in local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleVisual {
    pub handle: Handle,
    pub anchor: Point,
    pub rect: Bounds,
}

/// Everything needed to draw one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeVisual {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub placement: Placement,
    pub outline: Outline,
    /// Absent for connectors
    pub label: Option<LabelVisual>,
    /// Bounding box grown by the selection padding on every side
    pub selection_outline: Bounds,
    /// Whether the selection outline and handles are shown
    pub selected: bool,
    pub handles: Vec<HandleVisual>,
    pub stack_order: u64,
}

/// Recomputes the visual attributes of a shape from its current geometry.
///
/// # Arguments
///
/// * `shape` - The shape to project
/// * `rotation_enabled` - Whether the rotation handle is part of the handle set
///
/// # Returns
///
/// The derived visual; equal inputs always give equal outputs
pub fn sync(shape: &Shape, rotation_enabled: bool) -> ShapeVisual {
    let (w, h) = shape.size;

    let outline = match shape.kind {
        ShapeKind::Rectangle => Outline::Rect {
            width: w,
            height: h,
            corner_radius: 0.0,
        },
        ShapeKind::RoundedRectangle => Outline::Rect {
            width: w,
            height: h,
            corner_radius: geometry::rounded_rect_radius(w, h),
        },
        ShapeKind::Diamond => Outline::Polygon {
            points: geometry::diamond_vertices(w, h),
        },
        ShapeKind::Connector => {
            let (x1, y1, x2, y2) = geometry::connector_endpoints(w, h);
            Outline::Line { x1, y1, x2, y2 }
        }
    };

    let label = shape.kind.has_label().then(|| LabelVisual {
        anchor: (w / 2.0, h / 2.0),
        text: shape.label.clone(),
    });

    let pad = constants::SELECTION_PADDING;
    let half = constants::HANDLE_SIZE / 2.0;
    let handles = geometry::handle_anchors(w, h, rotation_enabled)
        .into_iter()
        .map(|(handle, anchor)| HandleVisual {
            handle,
            anchor,
            rect: Bounds {
                x: anchor.0 - half,
                y: anchor.1 - half,
                width: constants::HANDLE_SIZE,
                height: constants::HANDLE_SIZE,
            },
        })
        .collect();

    ShapeVisual {
        id: shape.id,
        kind: shape.kind,
        placement: Placement {
            translate: shape.position,
            rotation_deg: shape.rotation,
            pivot: (w / 2.0, h / 2.0),
        },
        outline,
        label,
        selection_outline: Bounds {
            x: -pad,
            y: -pad,
            width: w + 2.0 * pad,
            height: h + 2.0 * pad,
        },
        selected: shape.selected,
        handles,
        stack_order: shape.stack_order,
    }
}

/// Visuals of every shape in the registry, bottom of the stack first.
pub fn sync_all(registry: &ShapeRegistry, rotation_enabled: bool) -> Vec<ShapeVisual> {
    registry.iter().map(|s| sync(s, rotation_enabled)).collect()
}

impl ShapeVisual {
    /// Canvas-space corners of the rotated bounding box.
    pub fn world_corners(&self) -> [Point; 4] {
        let (w, h) = (self.placement.pivot.0 * 2.0, self.placement.pivot.1 * 2.0);
        [
            self.placement.apply((0.0, 0.0)),
            self.placement.apply((w, 0.0)),
            self.placement.apply((w, h)),
            self.placement.apply((0.0, h)),
        ]
    }

    /// SVG `<g>` element for this shape, including selection chrome when selected.
    pub fn svg_group(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            r#"<g data-id="{}" transform="{}">"#,
            self.id,
            self.placement.svg_transform()
        ));
        out.push('\n');

        if self.selected {
            let s = self.selection_outline;
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-dasharray="4 3"/>"#,
                fmt_num(s.x),
                fmt_num(s.y),
                fmt_num(s.width),
                fmt_num(s.height),
                constants::SELECTION_HEX
            ));
            out.push('\n');
        }

        let stroke_width = fmt_num(constants::SHAPE_STROKE_WIDTH);
        match self.outline {
            Outline::Rect {
                width,
                height,
                corner_radius,
            } => {
                let rounding = if corner_radius > 0.0 {
                    format!(
                        r#" rx="{0}" ry="{0}""#,
                        fmt_num(corner_radius)
                    )
                } else {
                    String::new()
                };
                out.push_str(&format!(
                    r#"<rect x="0" y="0" width="{}" height="{}"{} fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    fmt_num(width),
                    fmt_num(height),
                    rounding,
                    constants::SHAPE_FILL_HEX,
                    constants::SHAPE_STROKE_HEX,
                    stroke_width
                ));
            }
            Outline::Polygon { points } => {
                out.push_str(&format!(
                    r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    points_attr(&points),
                    constants::SHAPE_FILL_HEX,
                    constants::SHAPE_STROKE_HEX,
                    stroke_width
                ));
            }
            Outline::Line { x1, y1, x2, y2 } => {
                out.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" marker-end="url(#arrowhead)"/>"#,
                    fmt_num(x1),
                    fmt_num(y1),
                    fmt_num(x2),
                    fmt_num(y2),
                    constants::SHAPE_STROKE_HEX,
                    fmt_num(constants::CONNECTOR_STROKE_WIDTH)
                ));
            }
        }
        out.push('\n');

        if let Some(label) = &self.label {
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" font-family="sans-serif" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                fmt_num(label.anchor.0),
                fmt_num(label.anchor.1),
                fmt_num(constants::LABEL_FONT_SIZE),
                escape_xml(&label.text)
            ));
            out.push('\n');
        }

        if self.selected {
            for handle in &self.handles {
                let r = handle.rect;
                out.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="white" stroke="{}"/>"#,
                    fmt_num(r.x),
                    fmt_num(r.y),
                    fmt_num(r.width),
                    fmt_num(r.height),
                    constants::SELECTION_HEX
                ));
                out.push('\n');
            }
        }

        out.push_str("</g>\n");
        out
    }
}

/// Renders every shape as a standalone SVG document.
///
/// Selection chrome is left out; the view box covers all shapes with some padding.
pub fn diagram_to_svg(registry: &ShapeRegistry) -> String {
    let visuals: Vec<ShapeVisual> = registry
        .iter()
        .map(|shape| {
            let mut visual = sync(shape, false);
            visual.selected = false;
            visual
        })
        .collect();

    let mut min = (f32::INFINITY, f32::INFINITY);
    let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for corner in visuals.iter().flat_map(|v| v.world_corners()) {
        min = (min.0.min(corner.0), min.1.min(corner.1));
        max = (max.0.max(corner.0), max.1.max(corner.1));
    }
    let (min_x, min_y, width, height) = if visuals.is_empty() {
        (0.0, 0.0, 800.0, 600.0)
    } else {
        let pad = constants::EXPORT_PADDING;
        (
            min.0 - pad,
            min.1 - pad,
            max.0 - min.0 + pad * 2.0,
            max.1 - min.1 + pad * 2.0,
        )
    };

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
        fmt_num(min_x),
        fmt_num(min_y),
        fmt_num(width),
        fmt_num(height),
        fmt_num(width),
        fmt_num(height)
    ));
    out.push('\n');
    out.push_str("<defs>\n");
    out.push_str(
        r#"<marker id="arrowhead" markerWidth="10" markerHeight="10" refX="9" refY="5" orient="auto" markerUnits="strokeWidth">"#,
    );
    out.push('\n');
    out.push_str(&format!(
        r#"<path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/>"#,
        constants::SHAPE_STROKE_HEX
    ));
    out.push('\n');
    out.push_str("</marker>\n</defs>\n");
    for visual in &visuals {
        out.push_str(&visual.svg_group());
    }
    out.push_str("</svg>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", fmt_num(*x), fmt_num(*y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a number with at most three decimals and no trailing zeros.
fn fmt_num(v: f32) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
