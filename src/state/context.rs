//! The edit session: sequences pointer input, effects, and history.
//!
//! `EditSession` is owned by the caller and replaces any ambient "current
//! image" state. It turns pointer events (already in buffer coordinates) into
//! [`Command`]s, runs them against the current snapshot, and records the
//! result in the [`History`].
//!
//! # Example
//!
//! ```rust
//! use egui::pos2;
//! use redact_paint::{EditMode, EditSession, EffectConfig, PixelBuffer};
//! use redact_paint::state::CommitOutcome;
//!
//! let mut session = EditSession::new();
//! session.load_image(PixelBuffer::filled(64, 64, [255, 0, 0, 255]).unwrap());
//! session.set_mode(EditMode::Rect);
//!
//! session.pointer_down(pos2(4.0, 4.0)).unwrap();
//! session.pointer_move(pos2(40.0, 30.0));
//! let outcome = session.pointer_up(&EffectConfig::default());
//! assert!(matches!(outcome, CommitOutcome::Committed(_)));
//! assert!(session.can_undo());
//! ```
use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};

use super::EditorState;
use crate::buffer::{BufferRef, PixelBuffer};
use crate::command::{Command, History};
use crate::config::{EditMode, EffectConfig, HistoryConfig};
use crate::error::StateTransitionError;
use crate::geometry::PixelRect;
use crate::preview::{Overlay, PreviewCache};
use crate::stroke::MutableStroke;

/// A dragged rectangle must exceed this size on both axes to be applied
pub const MIN_DRAG_SIZE: f32 = 5.0;

/// What happened when an edit finished
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// A new snapshot was pushed and is now current
    Committed(BufferRef),
    /// The edit was too small to count and was dropped
    Discarded,
    /// No edit was in progress
    NoEdit,
}

/// Owns the state machine, the active edit mode, and the snapshot history.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditorState,
    mode: EditMode,
    history: History,
    // Composed frame for the edit in progress, reused across repaints
    preview: Option<PreviewCache>,
}

impl EditSession {
    /// Creates a session with unbounded history and no image
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session whose history is bounded by `config`
    pub fn with_history(config: HistoryConfig) -> Self {
        Self {
            state: EditorState::Idle,
            mode: EditMode::default(),
            history: History::with_config(config),
            preview: None,
        }
    }

    /// Start over with a freshly loaded image as history entry 0
    pub fn load_image(&mut self, buffer: PixelBuffer) -> BufferRef {
        self.cancel();
        self.history.clear();
        let buffer = buffer.into_ref();
        log::info!(
            "Loaded image {}x{} (buffer {})",
            buffer.width(),
            buffer.height(),
            buffer.id()
        );
        self.history.push(Arc::clone(&buffer));
        buffer
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switch between rectangle and brush editing.
    ///
    /// An edit in progress under the old mode is cancelled, not committed.
    pub fn set_mode(&mut self, mode: EditMode) {
        if mode == self.mode {
            return;
        }
        if self.cancel() {
            log::debug!("Edit mode changed mid-edit, in-progress edit dropped");
        }
        self.mode = mode;
    }

    /// Gets a reference to the current state
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The published snapshot the renderer should show
    pub fn current_snapshot(&self) -> Option<&BufferRef> {
        self.history.current()
    }

    pub fn has_image(&self) -> bool {
        self.history.current().is_some()
    }

    /// Attempts to transition to a new state, validating the transition
    fn transition_to(&mut self, new_state: EditorState) -> Result<(), StateTransitionError> {
        if !self.state.can_transition_to(&new_state) {
            log::warn!(
                "Rejected transition from {} to {}",
                self.state.name(),
                new_state.name()
            );
            return Err(StateTransitionError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        self.state = new_state;
        Ok(())
    }

    /// Begin a drag (rect mode) or a stroke (brush mode) at `pos`
    pub fn pointer_down(&mut self, pos: Pos2) -> Result<(), StateTransitionError> {
        if !self.has_image() {
            return Err(StateTransitionError::NoImage);
        }
        let next = match self.mode {
            EditMode::Rect => EditorState::Dragging {
                anchor: pos,
                current: pos,
            },
            EditMode::Brush => EditorState::Drawing {
                stroke: MutableStroke::new(pos),
            },
        };
        if !self.state.is_idle() {
            // Only Idle may start a new edit
            return Err(StateTransitionError::InvalidTransition {
                from: self.state.name(),
                to: next.name(),
            });
        }
        self.transition_to(next)
    }

    /// Extend the active edit. Does nothing while idle.
    pub fn pointer_move(&mut self, pos: Pos2) {
        match &mut self.state {
            EditorState::Idle => {}
            EditorState::Dragging { current, .. } => *current = pos,
            EditorState::Drawing { stroke } => stroke.add_point(pos),
        }
    }

    /// Finish the active edit and commit it if it qualifies.
    ///
    /// Drags whose clipped size is not larger than [`MIN_DRAG_SIZE`] on both
    /// axes are discarded. Strokes are always committed.
    pub fn pointer_up(&mut self, config: &EffectConfig) -> CommitOutcome {
        let finished = std::mem::take(&mut self.state);
        self.preview = None;
        if finished.is_idle() {
            return CommitOutcome::NoEdit;
        }
        let Some(command) = self.finish(finished, config) else {
            return CommitOutcome::Discarded;
        };
        match self.commit(&command) {
            Some(buffer) => CommitOutcome::Committed(buffer),
            None => CommitOutcome::NoEdit,
        }
    }

    /// The pointer left the canvas; treated exactly like a release
    pub fn pointer_leave(&mut self, config: &EffectConfig) -> CommitOutcome {
        self.pointer_up(config)
    }

    /// Turn a finished state into a command, or `None` if it should be dropped
    fn finish(&self, finished: EditorState, config: &EffectConfig) -> Option<Command> {
        let config = config.sanitized();
        match finished {
            EditorState::Idle => None,
            EditorState::Dragging { anchor, current } => {
                let base = self.current_snapshot()?;
                let drag = Rect::from_two_pos(anchor, current);
                let bounds = Rect::from_min_size(
                    Pos2::ZERO,
                    Vec2::new(base.width() as f32, base.height() as f32),
                );
                let clipped = drag.intersect(bounds);
                if clipped.width() > MIN_DRAG_SIZE && clipped.height() > MIN_DRAG_SIZE {
                    Some(Command::ApplyRect {
                        rect: PixelRect::from_rect(drag),
                        config,
                    })
                } else {
                    log::debug!("Drag of {:?} too small, discarded", drag.size());
                    None
                }
            }
            EditorState::Drawing { stroke } => Some(Command::ApplyStroke {
                stroke: stroke.to_stroke_ref(),
                config,
            }),
        }
    }

    /// Abort the active edit without committing. Returns true if one was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.state.is_idle();
        self.state = EditorState::Idle;
        self.preview = None;
        was_active
    }

    /// Execute `command` against the current snapshot and publish the result
    pub fn commit(&mut self, command: &Command) -> Option<BufferRef> {
        let base = self.current_snapshot()?;
        let result = command.execute(base).into_ref();
        log::info!(
            "Committed {} ({:?}) as buffer {}",
            command.name(),
            command.config().kind,
            result.id()
        );
        self.history.push(Arc::clone(&result));
        Some(result)
    }

    /// Step back one snapshot; cancels any edit in progress
    pub fn undo(&mut self) -> Option<BufferRef> {
        self.cancel();
        let buffer = self.history.undo();
        match &buffer {
            Some(b) => log::info!("Undo to buffer {}", b.id()),
            None => log::debug!("Nothing to undo"),
        }
        buffer
    }

    /// Step forward one snapshot; cancels any edit in progress
    pub fn redo(&mut self) -> Option<BufferRef> {
        self.cancel();
        let buffer = self.history.redo();
        match &buffer {
            Some(b) => log::info!("Redo to buffer {}", b.id()),
            None => log::debug!("Nothing to redo"),
        }
        buffer
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Description of the live preview for the edit in progress
    pub fn overlay(&self, config: &EffectConfig) -> Option<Overlay> {
        if let Some(rect) = self.state.drag_rect() {
            return Some(Overlay::Rect(rect));
        }
        self.state.stroke().map(|stroke| Overlay::Discs {
            points: stroke.points().to_vec(),
            radius: config.sanitized().brush_radius,
        })
    }

    /// Buffer to display this frame: the current snapshot plus any live overlay.
    ///
    /// The composed frame is cached and only rebuilt when the edit changes,
    /// so repeated calls between pointer events return the same buffer.
    pub fn preview(&mut self, config: &EffectConfig) -> Option<BufferRef> {
        let base = Arc::clone(self.current_snapshot()?);
        let Some(overlay) = self.overlay(config) else {
            self.preview = None;
            return Some(base);
        };
        match &mut self.preview {
            Some(cache) => {
                cache.update(&base, &overlay);
            }
            None => self.preview = Some(PreviewCache::new(&base, overlay)),
        }
        self.preview.as_ref().map(|cache| Arc::clone(cache.frame()))
    }
}
