//! Direct manipulation of shapes through pointer gestures.
//!
//! A [`Manipulator`] turns a stream of [`PointerInput`]s into drag, resize and
//! rotate edits on the registry. It holds the only piece of interaction state
//! that survives between inputs: the active gesture and what it captured at
//! press time. Every move recomputes geometry from that capture, so
//! intermediate moves never accumulate.

use crate::constants::MIN_SHAPE_SIZE;
use crate::geometry;
use crate::registry::ShapeRegistry;
use crate::types::{Bounds, Corner, Handle, Point, PressTarget, ShapeId};
use log::debug;

/// Pointer events in canvas coordinates, already resolved against the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Button or touch went down on `target` at `position`
    Press {
        target: PressTarget,
        position: Point,
    },
    /// Pointer moved to `position`
    Move { position: Point },
    /// Button or touch went up
    Release,
    /// Pointer capture was lost or the touch was cancelled
    CaptureLost,
}

/// Observable gesture mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    #[default]
    Idle,
    Dragging,
    Resizing,
    Rotating,
}

/// Outcome of handling one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode before the input
    pub from: GestureMode,
    /// Mode after the input
    pub to: GestureMode,
    /// Shape whose geometry or selection changed, if any
    pub touched: Option<ShapeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Dragging {
        shape: ShapeId,
        offset: Point,
    },
    Resizing {
        shape: ShapeId,
        corner: Corner,
        origin: Bounds,
        press: Point,
    },
    Rotating {
        shape: ShapeId,
        center: Point,
        start_rotation: f32,
        press_angle: f32,
    },
}

impl Gesture {
    fn mode(&self) -> GestureMode {
        match self {
            Gesture::Idle => GestureMode::Idle,
            Gesture::Dragging { .. } => GestureMode::Dragging,
            Gesture::Resizing { .. } => GestureMode::Resizing,
            Gesture::Rotating { .. } => GestureMode::Rotating,
        }
    }

    fn shape(&self) -> Option<ShapeId> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging { shape, .. }
            | Gesture::Resizing { shape, .. }
            | Gesture::Rotating { shape, .. } => Some(*shape),
        }
    }
}

/// Gesture state machine: Idle, Dragging, Resizing or Rotating.
#[derive(Debug, Default, Clone)]
pub struct Manipulator {
    gesture: Gesture,
}

impl Manipulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture mode.
    pub fn mode(&self) -> GestureMode {
        self.gesture.mode()
    }

    /// Shape owned by the active gesture, if any.
    pub fn active_shape(&self) -> Option<ShapeId> {
        self.gesture.shape()
    }

    /// Drops any active gesture without touching the registry.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Feeds one pointer input through the state machine.
    ///
    /// # Arguments
    ///
    /// * `registry` - Shapes the gesture reads and mutates
    /// * `input` - The pointer event, in canvas coordinates
    ///
    /// # Returns
    ///
    /// The mode change caused by the input and the shape it touched
    pub fn handle(&mut self, registry: &mut ShapeRegistry, input: PointerInput) -> Transition {
        if let Some(id) = self.gesture.shape() {
            if registry.get(id).is_none() {
                debug!("Gesture target {} vanished, returning to idle", id);
                self.gesture = Gesture::Idle;
            }
        }

        let from = self.gesture.mode();
        let touched = match input {
            PointerInput::Press { target, position } => self.press(registry, target, position),
            PointerInput::Move { position } => self.apply_move(registry, position),
            PointerInput::Release | PointerInput::CaptureLost => {
                let shape = self.gesture.shape();
                self.gesture = Gesture::Idle;
                shape
            }
        };
        let to = self.gesture.mode();
        if from != to {
            debug!("Gesture {:?} -> {:?}", from, to);
        }
        Transition { from, to, touched }
    }

    fn press(
        &mut self,
        registry: &mut ShapeRegistry,
        target: PressTarget,
        position: Point,
    ) -> Option<ShapeId> {
        if self.gesture != Gesture::Idle {
            return None;
        }

        let id = match target {
            PressTarget::Background => {
                let previous = registry.selected_id();
                registry.clear_selection();
                return previous;
            }
            PressTarget::Body(id) | PressTarget::Handle(id, _) => id,
        };

        registry.select(id);
        let shape = registry.get(id)?;

        self.gesture = match target {
            PressTarget::Body(_) => Gesture::Dragging {
                shape: id,
                offset: (position.0 - shape.position.0, position.1 - shape.position.1),
            },
            PressTarget::Handle(_, Handle::Corner(corner)) => Gesture::Resizing {
                shape: id,
                corner,
                origin: shape.bounds(),
                press: position,
            },
            PressTarget::Handle(_, Handle::Rotate) => {
                let center = shape.center();
                Gesture::Rotating {
                    shape: id,
                    center,
                    start_rotation: shape.rotation,
                    press_angle: geometry::pointer_angle_degrees(center, position),
                }
            }
            PressTarget::Background => Gesture::Idle,
        };
        Some(id)
    }

    fn apply_move(&mut self, registry: &mut ShapeRegistry, position: Point) -> Option<ShapeId> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { shape, offset } => {
                let target = registry.get_mut(shape)?;
                target.position = (position.0 - offset.0, position.1 - offset.1);
                Some(shape)
            }
            Gesture::Resizing {
                shape,
                corner,
                origin,
                press,
            } => {
                let target = registry.get_mut(shape)?;
                let resized = resize_from(origin, corner, position.0 - press.0, position.1 - press.1);
                target.position = (resized.x, resized.y);
                target.size = (resized.width, resized.height);
                Some(shape)
            }
            Gesture::Rotating {
                shape,
                center,
                start_rotation,
                press_angle,
            } => {
                let target = registry.get_mut(shape)?;
                let now = geometry::pointer_angle_degrees(center, position);
                target.rotation = start_rotation + (now - press_angle);
                Some(shape)
            }
        }
    }
}

/// Applies a corner drag of `(dx, dy)` to the rectangle captured at press time.
///
/// The edge opposite the dragged corner's moving edge follows the pointer;
/// width and height never drop below [`MIN_SHAPE_SIZE`]. Position is not
/// compensated when the floor kicks in.
pub fn resize_from(origin: Bounds, corner: Corner, dx: f32, dy: f32) -> Bounds {
    let Bounds {
        x,
        y,
        width: w,
        height: h,
    } = origin;
    match corner {
        Corner::BottomRight => Bounds {
            x,
            y,
            width: (w + dx).max(MIN_SHAPE_SIZE),
            height: (h + dy).max(MIN_SHAPE_SIZE),
        },
        Corner::TopRight => Bounds {
            x,
            y: y + dy,
            width: (w + dx).max(MIN_SHAPE_SIZE),
            height: (h - dy).max(MIN_SHAPE_SIZE),
        },
        Corner::TopLeft => Bounds {
            x: x + dx,
            y: y + dy,
            width: (w - dx).max(MIN_SHAPE_SIZE),
            height: (h - dy).max(MIN_SHAPE_SIZE),
        },
        Corner::BottomLeft => Bounds {
            x: x + dx,
            y,
            width: (w - dx).max(MIN_SHAPE_SIZE),
            height: (h + dy).max(MIN_SHAPE_SIZE),
        },
    }
}
