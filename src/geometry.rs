//! Pure geometry helpers for shapes.
//!
//! Everything in this module is derived from a shape's size, position and
//! rotation on demand. Local coordinates have their origin at the top-left of
//! the bounding box, before rotation.

use crate::constants;
use crate::types::{Corner, Handle, Point, Shape, ShapeKind};

/// Vertices of a diamond inscribed in a `w` x `h` box: top, right, bottom, left.
pub fn diamond_vertices(w: f32, h: f32) -> [Point; 4] {
    [(w / 2.0, 0.0), (w, h / 2.0), (w / 2.0, h), (0.0, h / 2.0)]
}

/// Corner radius of a rounded rectangle with the given size.
pub fn rounded_rect_radius(w: f32, h: f32) -> f32 {
    constants::CORNER_RADIUS_RATIO * w.min(h)
}

/// Endpoints `(x1, y1, x2, y2)` of a connector spanning the vertical midline.
pub fn connector_endpoints(w: f32, h: f32) -> (f32, f32, f32, f32) {
    (0.0, h / 2.0, w, h / 2.0)
}

/// Local anchor of a single corner handle.
pub fn corner_anchor(corner: Corner, w: f32, h: f32) -> Point {
    match corner {
        Corner::TopLeft => (0.0, 0.0),
        Corner::TopRight => (w, 0.0),
        Corner::BottomRight => (w, h),
        Corner::BottomLeft => (0.0, h),
    }
}

/// Local anchors of every handle of a `w` x `h` shape.
///
/// # Arguments
///
/// * `w` - Shape width
/// * `h` - Shape height
/// * `rotation_enabled` - Whether to include the rotation handle above the top edge
///
/// # Returns
///
/// Corner handles in [`Corner::ALL`] order, followed by the rotation handle if enabled.
pub fn handle_anchors(w: f32, h: f32, rotation_enabled: bool) -> Vec<(Handle, Point)> {
    let mut anchors: Vec<(Handle, Point)> = Corner::ALL
        .iter()
        .map(|corner| (Handle::Corner(*corner), corner_anchor(*corner, w, h)))
        .collect();
    if rotation_enabled {
        anchors.push((
            Handle::Rotate,
            (w / 2.0, -constants::ROTATE_HANDLE_OFFSET),
        ));
    }
    anchors
}

/// Center of the box with the given top-left and size.
pub fn bounding_center(position: Point, size: Point) -> Point {
    (position.0 + size.0 / 2.0, position.1 + size.1 / 2.0)
}

/// Angle in degrees of `point` as seen from `center`.
pub fn pointer_angle_degrees(center: Point, point: Point) -> f32 {
    (point.1 - center.1).atan2(point.0 - center.0).to_degrees()
}

/// Rotates a vector by `degrees`, clockwise on screen (y grows downward).
pub fn rotate_vec(v: Point, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (v.0 * cos - v.1 * sin, v.0 * sin + v.1 * cos)
}

/// Rotates `point` about `pivot` by `degrees`.
pub fn rotate_about(point: Point, pivot: Point, degrees: f32) -> Point {
    let (x, y) = rotate_vec((point.0 - pivot.0, point.1 - pivot.1), degrees);
    (x + pivot.0, y + pivot.1)
}

/// Maps a shape-local point into canvas coordinates.
pub fn to_world(shape: &Shape, local: Point) -> Point {
    let translated = (local.0 + shape.position.0, local.1 + shape.position.1);
    rotate_about(translated, shape.center(), shape.rotation)
}

/// Maps a canvas point into the shape's unrotated local frame.
pub fn to_local(shape: &Shape, point: Point) -> Point {
    let unrotated = rotate_about(point, shape.center(), -shape.rotation);
    (
        unrotated.0 - shape.position.0,
        unrotated.1 - shape.position.1,
    )
}

/// Whether a local point lies on the body of a shape of the given kind.
pub fn contains_local(kind: ShapeKind, w: f32, h: f32, p: Point) -> bool {
    match kind {
        ShapeKind::Rectangle | ShapeKind::RoundedRectangle => {
            p.0 >= 0.0 && p.0 <= w && p.1 >= 0.0 && p.1 <= h
        }
        ShapeKind::Diamond => {
            let half_w = w / 2.0;
            let half_h = h / 2.0;
            if half_w <= f32::EPSILON || half_h <= f32::EPSILON {
                return false;
            }
            (p.0 - half_w).abs() / half_w + (p.1 - half_h).abs() / half_h <= 1.0
        }
        ShapeKind::Connector => {
            let (x1, y1, x2, y2) = connector_endpoints(w, h);
            distance_to_segment(p, (x1, y1), (x2, y2)) <= constants::CONNECTOR_HIT_TOLERANCE
        }
    }
}

/// Whether a local point falls on the square hit target around a handle anchor.
pub fn handle_contains(anchor: Point, p: Point) -> bool {
    let reach = constants::HANDLE_SIZE / 2.0 + constants::HANDLE_HIT_SLOP;
    (p.0 - anchor.0).abs() <= reach && (p.1 - anchor.1).abs() <= reach
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (p.0 - a.0, p.1 - a.1);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((ap.0 * ab.0 + ap.1 * ab.1) / len_sq).clamp(0.0, 1.0)
    };
    let closest = (a.0 + ab.0 * t, a.1 + ab.1 * t);
    ((p.0 - closest.0).powi(2) + (p.1 - closest.1).powi(2)).sqrt()
}

/// Polygonal outline of a rounded rectangle in local coordinates.
///
/// Each corner arc is approximated by `segments` straight pieces. The outline
/// runs clockwise starting at the top edge.
pub fn rounded_rect_outline(w: f32, h: f32, radius: f32, segments: usize) -> Vec<Point> {
    let r = radius.clamp(0.0, w.min(h) / 2.0);
    let segments = segments.max(1);
    // Arc centers and the angle each quarter-arc starts at.
    let corners = [
        ((w - r, r), -90.0_f32),
        ((w - r, h - r), 0.0),
        ((r, h - r), 90.0),
        ((r, r), 180.0),
    ];
    let mut points = Vec::with_capacity(corners.len() * (segments + 1));
    for ((cx, cy), start) in corners {
        for step in 0..=segments {
            let angle = (start + 90.0 * step as f32 / segments as f32).to_radians();
            points.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    points
}

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_diamond_vertices_for_square_box() {
        assert_eq!(
            diamond_vertices(120.0, 120.0),
            [(60.0, 0.0), (120.0, 60.0), (60.0, 120.0), (0.0, 60.0)]
        );
    }

    #[test]
    fn test_rounded_radius_uses_shorter_side() {
        assert!(approx(rounded_rect_radius(120.0, 80.0), 14.4));
        assert!(approx(rounded_rect_radius(170.0, 110.0), 19.8));
        assert!(approx(rounded_rect_radius(20.0, 300.0), 3.6));
    }

    #[test]
    fn test_connector_endpoints_follow_midline() {
        assert_eq!(connector_endpoints(120.0, 80.0), (0.0, 40.0, 120.0, 40.0));
    }

    #[test]
    fn test_handle_anchors_with_and_without_rotation() {
        let with_rotation = handle_anchors(100.0, 50.0, true);
        assert_eq!(with_rotation.len(), 5);
        assert_eq!(with_rotation[2], (Handle::Corner(Corner::BottomRight), (100.0, 50.0)));
        assert_eq!(with_rotation[4], (Handle::Rotate, (50.0, -20.0)));

        let without_rotation = handle_anchors(100.0, 50.0, false);
        assert_eq!(without_rotation.len(), 4);
        assert!(without_rotation.iter().all(|(h, _)| *h != Handle::Rotate));
    }

    #[test]
    fn test_pointer_angle_quadrants() {
        assert!(approx(pointer_angle_degrees((0.0, 0.0), (10.0, 0.0)), 0.0));
        assert!(approx(pointer_angle_degrees((0.0, 0.0), (0.0, 10.0)), 90.0));
        assert!(approx(pointer_angle_degrees((0.0, 0.0), (-10.0, 0.0)), 180.0));
    }

    #[test]
    fn test_local_and_world_are_inverse() {
        let mut shape = Shape::new(ShapeKind::Rectangle, ShapeKind::Rectangle.defaults(), 1);
        shape.rotation = 37.0;
        let local = (15.0, 70.0);
        let world = to_world(&shape, local);
        let back = to_local(&shape, world);
        assert!(approx(back.0, local.0));
        assert!(approx(back.1, local.1));
    }

    #[test]
    fn test_rotated_shape_hit_in_local_frame() {
        // A 120x20 bar rotated 90 degrees stands upright around its center.
        let mut shape = Shape::new(ShapeKind::Rectangle, ShapeKind::Rectangle.defaults(), 1);
        shape.position = (0.0, 0.0);
        shape.size = (120.0, 20.0);
        shape.rotation = 90.0;
        let above_center = (60.0, -40.0);
        let local = to_local(&shape, above_center);
        assert!(contains_local(shape.kind, shape.size.0, shape.size.1, local));
        let far_right = (110.0, 10.0);
        let local = to_local(&shape, far_right);
        assert!(!contains_local(shape.kind, shape.size.0, shape.size.1, local));
    }

    #[test]
    fn test_diamond_excludes_bounding_box_corners() {
        assert!(contains_local(ShapeKind::Diamond, 100.0, 100.0, (50.0, 50.0)));
        assert!(!contains_local(ShapeKind::Diamond, 100.0, 100.0, (5.0, 5.0)));
    }

    #[test]
    fn test_connector_hit_tolerance() {
        assert!(contains_local(ShapeKind::Connector, 120.0, 80.0, (60.0, 44.0)));
        assert!(!contains_local(ShapeKind::Connector, 120.0, 80.0, (60.0, 10.0)));
    }

    #[test]
    fn test_rounded_outline_stays_inside_box() {
        let outline = rounded_rect_outline(120.0, 80.0, 14.4, 6);
        assert_eq!(outline.len(), 28);
        assert!(outline
            .iter()
            .all(|(x, y)| *x >= -1e-3 && *x <= 120.001 && *y >= -1e-3 && *y <= 80.001));
    }

    #[test]
    fn test_normalize_degrees() {
        assert!(approx(normalize_degrees(-90.0), 270.0));
        assert!(approx(normalize_degrees(720.0), 0.0));
    }
}
