mod editor_state;
pub mod context;

pub use context::{CommitOutcome, EditSession, MIN_DRAG_SIZE};
pub use editor_state::EditorState;
