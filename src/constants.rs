//! Shared application-wide constants.
//! Centralizes tweakable values used across geometry, interaction and rendering.

// Shape geometry
/// Smallest width or height (in canvas units) any resize may produce.
pub const MIN_SHAPE_SIZE: f32 = 20.0;
/// Rounded-rectangle corner radius as a fraction of the shorter side.
pub const CORNER_RADIUS_RATIO: f32 = 0.18;
/// Distance of the rotation handle above the top edge, independent of zoom.
pub const ROTATE_HANDLE_OFFSET: f32 = 20.0;
/// Padding of the selection outline around the bounding box, per side.
pub const SELECTION_PADDING: f32 = 6.0;
/// Side length of a handle's square hit target.
pub const HANDLE_SIZE: f32 = 8.0;
/// Extra slack around handles when hit testing, so small handles stay grabbable.
pub const HANDLE_HIT_SLOP: f32 = 2.0;
/// Distance from a connector's line that still counts as pressing it.
pub const CONNECTOR_HIT_TOLERANCE: f32 = 6.0;

// Shape defaults
/// Label given to every new labelled shape.
pub const DEFAULT_LABEL: &str = "Texto";
/// Default (x, y, width, height) of a new rectangle.
pub const RECTANGLE_DEFAULTS: (f32, f32, f32, f32) = (120.0, 80.0, 120.0, 80.0);
/// Default (x, y, width, height) of a new rounded rectangle.
pub const ROUNDED_RECTANGLE_DEFAULTS: (f32, f32, f32, f32) = (140.0, 120.0, 120.0, 80.0);
/// Default (x, y, width, height) of a new diamond.
pub const DIAMOND_DEFAULTS: (f32, f32, f32, f32) = (160.0, 140.0, 120.0, 120.0);
/// Default (x, y, width, height) of a new connector.
pub const CONNECTOR_DEFAULTS: (f32, f32, f32, f32) = (180.0, 160.0, 120.0, 80.0);

// Persistence
/// Fixed logical key the diagram snapshot is stored under.
pub const DEFAULT_DOCUMENT_KEY: &str = "last-diagram";

// Grid/drawing
/// Grid cell size in canvas units.
pub const GRID_SIZE: f32 = 20.0;
/// Number of grid cells between thicker grid lines.
pub const GRID_WIDTH: usize = 5;
/// Stroke width of shape outlines (in canvas units).
pub const SHAPE_STROKE_WIDTH: f32 = 1.6;
/// Stroke width of connector lines (in canvas units).
pub const CONNECTOR_STROKE_WIDTH: f32 = 3.0;
/// Font size of shape labels (in canvas units).
pub const LABEL_FONT_SIZE: f32 = 14.0;

// Canvas navigation
/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.25;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 5.0;

// Colors
/// Fill of closed shapes, as an SVG hex color.
pub const SHAPE_FILL_HEX: &str = "#fde6b3";
/// Outline and connector stroke, as an SVG hex color.
pub const SHAPE_STROKE_HEX: &str = "#c69b2b";
/// Selection outline and handle color, as an SVG hex color.
pub const SELECTION_HEX: &str = "#3b82f6";
/// Padding around the exported drawing's bounds.
pub const EXPORT_PADDING: f32 = 24.0;
