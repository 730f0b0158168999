//! Drag gestures over a [`LayoutBackend`].
//!
//! While at least one gesture is active the layout is kept warm by raising
//! its alpha target, so it keeps ticking indefinitely. The dragged node is
//! pinned under the pointer and released when the gesture ends.

use log::debug;

use schemagraph_core::geometry::Point;

use super::{LayoutBackend, LayoutError};

/// Alpha target held while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f32 = 0.3;

/// Token for one in-progress drag.
///
/// Returned by [`DragController::start`] and consumed by
/// [`DragController::end`], so a gesture cannot be ended twice.
#[derive(Debug, PartialEq, Eq)]
pub struct DragGesture {
    node_id: String,
}

impl DragGesture {
    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

/// Tracks active gestures and applies them to a backend.
#[derive(Debug, Clone)]
pub struct DragController {
    active: usize,
    reheat_target: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self {
            active: 0,
            reheat_target: DRAG_ALPHA_TARGET,
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of gestures in progress.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.active > 0
    }

    /// Starts dragging `node_id`, pinning it where it currently is.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] if the backend has no such node.
    pub fn start<B: LayoutBackend>(
        &mut self,
        backend: &mut B,
        node_id: &str,
    ) -> Result<DragGesture, LayoutError> {
        let position = backend
            .position(node_id)
            .ok_or_else(|| LayoutError::UnknownNode(node_id.to_string()))?;

        if !self.is_dragging() {
            backend.set_alpha_target(self.reheat_target);
            backend.restart();
        }
        backend.pin(node_id, position)?;
        self.active += 1;

        debug!(node = node_id, active = self.active; "Drag started");
        Ok(DragGesture {
            node_id: node_id.to_string(),
        })
    }

    /// Starts dragging the node nearest to `pointer`, if one lies within
    /// `radius`.
    pub fn start_at<B: LayoutBackend>(
        &mut self,
        backend: &mut B,
        pointer: Point,
        radius: f32,
    ) -> Option<DragGesture> {
        let node_id = backend.find(pointer, radius)?;
        self.start(backend, &node_id).ok()
    }

    /// Moves the dragged node to `pointer`.
    pub fn drag<B: LayoutBackend>(
        &mut self,
        backend: &mut B,
        gesture: &DragGesture,
        pointer: Point,
    ) -> Result<(), LayoutError> {
        backend.pin(&gesture.node_id, pointer)
    }

    /// Ends a gesture and releases its node.
    ///
    /// The layout cools down again once no gesture remains active.
    pub fn end<B: LayoutBackend>(
        &mut self,
        backend: &mut B,
        gesture: DragGesture,
    ) -> Result<(), LayoutError> {
        self.active = self.active.saturating_sub(1);
        if !self.is_dragging() {
            backend.set_alpha_target(0.0);
        }
        backend.unpin(&gesture.node_id)?;

        debug!(node = gesture.node_id.as_str(), active = self.active; "Drag ended");
        Ok(())
    }
}
