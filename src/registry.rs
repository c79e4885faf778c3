//! The set of shapes on the canvas, their stacking and the single selection.

use crate::geometry;
use crate::types::{Point, PressTarget, Shape, ShapeDefaults, ShapeId, ShapeKind};
use log::{debug, info};

/// Owns every placed shape, kept sorted by ascending stack order.
#[derive(Debug, Default, Clone)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
    next_stack_order: u64,
}

impl ShapeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn bump_stack_order(&mut self) -> u64 {
        self.next_stack_order += 1;
        self.next_stack_order
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// Adds a new unselected shape on top of the stack.
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of shape to create
    /// * `defaults` - Initial geometry and label
    ///
    /// # Returns
    ///
    /// The ID of the new shape
    pub fn add(&mut self, kind: ShapeKind, defaults: ShapeDefaults) -> ShapeId {
        let order = self.bump_stack_order();
        let shape = Shape::new(kind, defaults, order);
        let id = shape.id;
        info!(
            "Added {} {} at ({}, {})",
            kind.display_name(),
            id,
            shape.position.0,
            shape.position.1
        );
        self.shapes.push(shape);
        id
    }

    /// Selects a shape and brings it to the front.
    ///
    /// Selecting the already selected shape changes nothing. Unknown IDs are ignored.
    pub fn select(&mut self, id: ShapeId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if self.shapes[index].selected {
            return;
        }
        for shape in &mut self.shapes {
            shape.selected = false;
        }
        let order = self.bump_stack_order();
        let mut shape = self.shapes.remove(index);
        shape.selected = true;
        shape.stack_order = order;
        debug!("Selected {} (stack order {})", id, order);
        self.shapes.push(shape);
    }

    /// Deselects the current shape, if any.
    pub fn clear_selection(&mut self) {
        for shape in &mut self.shapes {
            shape.selected = false;
        }
    }

    /// Removes a shape. Removing the selected shape empties the selection.
    ///
    /// # Returns
    ///
    /// The removed shape, or `None` if no shape has this ID
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        let shape = self.shapes.remove(index);
        info!("Removed {} {}", shape.kind.display_name(), id);
        Some(shape)
    }

    /// Removes the selected shape. Does nothing when nothing is selected.
    pub fn delete_selected(&mut self) -> Option<Shape> {
        let id = self.selected()?.id;
        self.remove(id)
    }

    /// Removes every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Finds what a press at `point` (canvas coordinates) lands on.
    ///
    /// Handles of the selected shape win over any body. Bodies are then tried
    /// from the top of the stack down, each in its own rotated frame.
    pub fn hit_test(&self, point: Point, rotation_enabled: bool) -> PressTarget {
        if let Some(selected) = self.selected() {
            let local = geometry::to_local(selected, point);
            let anchors = geometry::handle_anchors(selected.size.0, selected.size.1, rotation_enabled);
            for (handle, anchor) in anchors {
                if geometry::handle_contains(anchor, local) {
                    return PressTarget::Handle(selected.id, handle);
                }
            }
        }

        self.shapes
            .iter()
            .rev()
            .find(|shape| {
                let local = geometry::to_local(shape, point);
                geometry::contains_local(shape.kind, shape.size.0, shape.size.1, local)
            })
            .map(|shape| PressTarget::Body(shape.id))
            .unwrap_or(PressTarget::Background)
    }

    /// The selected shape, if any.
    pub fn selected(&self) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.selected)
    }

    /// ID of the selected shape, if any.
    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected().map(|s| s.id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Iterates shapes from the bottom of the stack to the top.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
