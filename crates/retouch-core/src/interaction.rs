//! The crop-selection interaction controller.
//!
//! Translates raw pointer-drag sequences into geometry calls. This is the
//! only component that sees low-level input events; it owns the in-progress
//! candidate rect and never writes to the session until a gesture commits.
//!
//! State machine: `Idle -> Dragging` on pointer-down, `Dragging -> Idle` on
//! pointer-up - committing the selection, or cancelling it when the drag
//! was degenerate (zero area).

use crate::geometry::{rect_from_drag, CropRect, Point};
use crate::session::EditSession;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        start: Point,
        candidate: Option<CropRect>,
    },
}

/// Crop-selection state machine.
///
/// The tool only ever touches the session's crop field; resize and filter
/// state pending elsewhere is never disturbed by entering or leaving a
/// gesture.
#[derive(Debug, Default)]
pub struct CropTool {
    state: DragState,
}

impl CropTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The current live-preview rect, if the drag has covered any area yet.
    pub fn candidate(&self) -> Option<CropRect> {
        match self.state {
            DragState::Dragging { candidate, .. } => candidate,
            DragState::Idle => None,
        }
    }

    /// Begin a drag gesture. A pointer-down mid-drag restarts the gesture
    /// from the new anchor.
    pub fn pointer_down(&mut self, at: Point) {
        self.state = DragState::Dragging {
            start: at,
            candidate: None,
        };
    }

    /// Recompute the live candidate rect for preview.
    ///
    /// Called on every pointer-move; it is a couple of min/max/clamps, cheap
    /// enough to run unbuffered. The candidate is never committed to the
    /// session. Returns `None` while idle or while the drag is degenerate.
    pub fn pointer_move(&mut self, at: Point, session: &EditSession) -> Option<CropRect> {
        let DragState::Dragging { start, candidate } = &mut self.state else {
            return None;
        };
        *candidate = rect_from_drag(*start, at, session.source_bounds());
        *candidate
    }

    /// End the gesture: commit the selection, or cancel on a degenerate
    /// drag (no session change at all). Returns the committed rect.
    pub fn pointer_up(&mut self, at: Point, session: &mut EditSession) -> Option<CropRect> {
        let DragState::Dragging { start, .. } = self.state else {
            return None;
        };
        self.state = DragState::Idle;

        let rect = rect_from_drag(start, at, session.source_bounds())?;
        session.set_crop(Some(rect));
        Some(rect)
    }

    /// Abandon any in-progress gesture without touching the session
    /// (Escape, tool deactivated, image replaced).
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
