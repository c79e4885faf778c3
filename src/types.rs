//! Core data types for the diagram editor.
//!
//! This module defines the shape model shared by every other part of the crate:
//! shape identity and kind, the per-shape geometry fields, handles, and the
//! targets a pointer press can land on.

use crate::constants;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes placed on the canvas.
pub type ShapeId = Uuid;

/// A point or vector in canvas coordinates.
pub type Point = (f32, f32);

/// The geometric variants a shape can take.
///
/// Serialized with the names used by stored diagram documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Plain axis-aligned rectangle
    #[serde(rename = "square", alias = "rectangle")]
    Rectangle,
    /// Rectangle whose corner radius follows its size
    #[serde(rename = "round-rect", alias = "rounded-rectangle")]
    RoundedRectangle,
    /// Rhombus spanning the midpoints of the bounding box edges
    #[serde(rename = "diamond")]
    Diamond,
    /// Horizontal arrow across the vertical midpoint of the bounding box
    #[serde(rename = "arrow", alias = "connector")]
    Connector,
}

impl ShapeKind {
    /// Every kind, in toolbar order.
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::RoundedRectangle,
        ShapeKind::Diamond,
        ShapeKind::Connector,
    ];

    /// Whether shapes of this kind carry an editable label.
    pub fn has_label(self) -> bool {
        !matches!(self, ShapeKind::Connector)
    }

    /// Human readable name used by the toolbar and log output.
    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::RoundedRectangle => "Rounded",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Connector => "Connector",
        }
    }

    /// Creation defaults for a new shape of this kind.
    pub fn defaults(self) -> ShapeDefaults {
        let (x, y, width, height) = match self {
            ShapeKind::Rectangle => constants::RECTANGLE_DEFAULTS,
            ShapeKind::RoundedRectangle => constants::ROUNDED_RECTANGLE_DEFAULTS,
            ShapeKind::Diamond => constants::DIAMOND_DEFAULTS,
            ShapeKind::Connector => constants::CONNECTOR_DEFAULTS,
        };
        let label = if self.has_label() {
            constants::DEFAULT_LABEL.to_string()
        } else {
            String::new()
        };
        ShapeDefaults {
            position: (x, y),
            size: (width, height),
            rotation: 0.0,
            label,
        }
    }
}

/// Initial geometry and label handed to the registry when a shape is added.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDefaults {
    /// Top-left of the bounding box
    pub position: Point,
    /// Width and height; raised to the minimum size on creation
    pub size: Point,
    /// Rotation in degrees about the bounding-box center
    pub rotation: f32,
    /// Label text, ignored for connectors
    pub label: String,
}

/// Axis-aligned rectangle in canvas coordinates, before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Bounds {
    /// Center point of the rectangle.
    pub fn center(&self) -> Point {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One placed diagram element.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Stable identity of this shape
    pub id: ShapeId,
    /// Geometric variant
    pub kind: ShapeKind,
    /// Top-left of the bounding box in canvas coordinates
    pub position: Point,
    /// Width and height of the bounding box
    pub size: Point,
    /// Rotation in degrees about the bounding-box center
    pub rotation: f32,
    /// Text shown at the center; always empty for connectors
    pub label: String,
    /// Draw priority, higher is on top
    pub stack_order: u64,
    /// Whether this is the registry's selected shape
    pub selected: bool,
}

impl Shape {
    /// Creates an unselected shape from the given defaults.
    ///
    /// Sizes are raised to [`constants::MIN_SHAPE_SIZE`] and connectors drop their label.
    pub fn new(kind: ShapeKind, defaults: ShapeDefaults, stack_order: u64) -> Self {
        let label = if kind.has_label() {
            defaults.label
        } else {
            String::new()
        };
        Self {
            id: Uuid::new_v4(),
            kind,
            position: defaults.position,
            size: (
                defaults.size.0.max(constants::MIN_SHAPE_SIZE),
                defaults.size.1.max(constants::MIN_SHAPE_SIZE),
            ),
            rotation: defaults.rotation,
            label,
            stack_order,
            selected: false,
        }
    }

    /// Bounding box of the shape, ignoring rotation.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.position.0,
            y: self.position.1,
            width: self.size.0,
            height: self.size.1,
        }
    }

    /// Center of the bounding box; the pivot for rotation.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// A corner handle used to start a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Handle at (0, 0)
    TopLeft,
    /// Handle at (w, 0)
    TopRight,
    /// Handle at (w, h)
    BottomRight,
    /// Handle at (0, h)
    BottomLeft,
}

impl Corner {
    /// Corners in the order their anchors are produced.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];
}

/// Interactive hit-target drawn on the selected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Resize from the given corner
    Corner(Corner),
    /// Rotate about the bounding-box center
    Rotate,
}

/// What a pointer press landed on, as resolved by hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// Empty canvas
    Background,
    /// The body of a shape, away from its handles
    Body(ShapeId),
    /// One of a shape's handles
    Handle(ShapeId, Handle),
}

impl PressTarget {
    /// Shape this press targets, if any.
    pub fn shape(&self) -> Option<ShapeId> {
        match self {
            PressTarget::Background => None,
            PressTarget::Body(id) | PressTarget::Handle(id, _) => Some(*id),
        }
    }
}
