//! The edit session state machine.
//!
//! A session is either idle, dragging out a rectangle, or drawing a brush
//! stroke. Every edit starts from and returns to `Idle`:
//!
//! ```text
//!              pointer down (Rect)   ┌────────────┐
//!            ┌──────────────────────►│  Dragging  ├─────┐
//!            │                       └────────────┘     │ pointer up / leave
//! ┌──────────┤                                          ▼
//! │   Idle   │                                    ┌──────────┐
//! └──────────┤                                    │   Idle   │
//!            │   pointer down (Brush)┌────────────┐└──────────┘
//!            └──────────────────────►│  Drawing   ├─────▲
//!                                    └────────────┘
//! ```
//!
//! Pointer moves update the active state in place and never touch the
//! published buffer.
use egui::{Pos2, Rect};

use crate::stroke::MutableStroke;

/// The possible states of an edit session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    /// No active edit
    #[default]
    Idle,
    /// Dragging out a rectangle from `anchor` to `current`
    Dragging { anchor: Pos2, current: Pos2 },
    /// Painting a stroke
    Drawing { stroke: MutableStroke },
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::Dragging { .. } => "Dragging",
            EditorState::Drawing { .. } => "Drawing",
        }
    }

    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            // From Idle, an edit of either kind may begin
            (EditorState::Idle, EditorState::Dragging { .. }) => true,
            (EditorState::Idle, EditorState::Drawing { .. }) => true,
            (EditorState::Idle, EditorState::Idle) => true,

            // Active edits only update themselves or finish
            (EditorState::Dragging { .. }, EditorState::Dragging { .. }) => true,
            (EditorState::Dragging { .. }, EditorState::Idle) => true,
            (EditorState::Drawing { .. }, EditorState::Drawing { .. }) => true,
            (EditorState::Drawing { .. }, EditorState::Idle) => true,

            // All other transitions are invalid
            _ => false,
        }
    }

    /// Returns true if no edit is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    /// Returns true if a rectangle is being dragged
    pub fn is_dragging(&self) -> bool {
        matches!(self, EditorState::Dragging { .. })
    }

    /// Returns true if a stroke is being drawn
    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    /// The live drag rectangle, normalised, if dragging
    pub fn drag_rect(&self) -> Option<Rect> {
        match self {
            EditorState::Dragging { anchor, current } => Some(Rect::from_two_pos(*anchor, *current)),
            _ => None,
        }
    }

    /// The stroke in progress, if drawing
    pub fn stroke(&self) -> Option<&MutableStroke> {
        match self {
            EditorState::Drawing { stroke } => Some(stroke),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_idle_can_start_either_edit() {
        let idle = EditorState::Idle;
        assert!(idle.can_transition_to(&EditorState::Dragging {
            anchor: pos2(0.0, 0.0),
            current: pos2(0.0, 0.0),
        }));
        assert!(idle.can_transition_to(&EditorState::Drawing {
            stroke: MutableStroke::new(pos2(0.0, 0.0)),
        }));
    }

    #[test]
    fn test_cannot_switch_between_active_edits() {
        let dragging = EditorState::Dragging {
            anchor: pos2(0.0, 0.0),
            current: pos2(1.0, 1.0),
        };
        let drawing = EditorState::Drawing {
            stroke: MutableStroke::new(pos2(0.0, 0.0)),
        };
        assert!(!dragging.can_transition_to(&drawing));
        assert!(!drawing.can_transition_to(&dragging));
        assert!(dragging.can_transition_to(&EditorState::Idle));
        assert!(drawing.can_transition_to(&EditorState::Idle));
    }

    #[test]
    fn test_drag_rect_is_normalised() {
        let state = EditorState::Dragging {
            anchor: pos2(10.0, 2.0),
            current: pos2(4.0, 8.0),
        };
        let rect = state.drag_rect().unwrap();
        assert_eq!(rect.min, pos2(4.0, 2.0));
        assert_eq!(rect.max, pos2(10.0, 8.0));
    }
}
