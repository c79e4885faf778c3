//! Label editing as a request/response exchange.
//!
//! A double press on a labelled shape opens an [`EditRequest`]. The UI shows
//! its buffer in a modal and answers with exactly one [`EditResolution`].

use crate::registry::ShapeRegistry;
use crate::types::ShapeId;
use log::{debug, info};

/// An open label edit for one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Shape whose label is being edited
    pub shape: ShapeId,
    /// Label at the time the request was opened
    pub original: String,
    /// Text currently in the editor, seeded with `original`
    pub buffer: String,
}

/// How an open edit ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResolution {
    /// Accept button or Enter: store the text as the label
    Commit(String),
    /// Dismiss button, Escape or a press outside the modal
    Cancel,
}

/// Holds at most one open [`EditRequest`].
#[derive(Debug, Default, Clone)]
pub struct LabelEditor {
    request: Option<EditRequest>,
}

impl LabelEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an edit for `id` if the shape exists and carries a label.
    ///
    /// # Returns
    ///
    /// `true` when an edit is now open for the shape
    pub fn open(&mut self, registry: &ShapeRegistry, id: ShapeId) -> bool {
        let Some(shape) = registry.get(id) else {
            return false;
        };
        if !shape.kind.has_label() {
            debug!("{} {} has no label to edit", shape.kind.display_name(), id);
            return false;
        }
        self.request = Some(EditRequest {
            shape: id,
            original: shape.label.clone(),
            buffer: shape.label.clone(),
        });
        true
    }

    pub fn is_open(&self) -> bool {
        self.request.is_some()
    }

    pub fn request(&self) -> Option<&EditRequest> {
        self.request.as_ref()
    }

    /// Mutable access to the edit buffer while a request is open.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        self.request.as_mut().map(|r| &mut r.buffer)
    }

    /// Closes the open request, applying `resolution` to the registry.
    ///
    /// Resolving with nothing open, or for a shape that has since been
    /// removed, changes nothing.
    ///
    /// # Returns
    ///
    /// The shape whose label changed, if any
    pub fn resolve(
        &mut self,
        registry: &mut ShapeRegistry,
        resolution: EditResolution,
    ) -> Option<ShapeId> {
        let request = self.request.take()?;
        match resolution {
            EditResolution::Commit(text) => {
                let shape = registry.get_mut(request.shape)?;
                info!("Label of {} set to {:?}", request.shape, text);
                shape.label = text;
                Some(request.shape)
            }
            EditResolution::Cancel => None,
        }
    }

    /// Commits whatever is in the buffer.
    pub fn commit_buffer(&mut self, registry: &mut ShapeRegistry) -> Option<ShapeId> {
        let text = self.request.as_ref()?.buffer.clone();
        self.resolve(registry, EditResolution::Commit(text))
    }

    /// Drops the open request without touching the registry.
    pub fn close(&mut self) {
        self.request = None;
    }
}
