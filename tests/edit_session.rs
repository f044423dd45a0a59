use std::sync::Arc;

use egui::pos2;
use redact_paint::preview::{Overlay, compose};
use redact_paint::{
    CommitOutcome, EditMode, EditSession, EditorState, EffectConfig, EffectKind, HistoryConfig,
    PixelBuffer, StateTransitionError,
};

fn checkerboard(size: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let v = if (x / 3 + y / 3) % 2 == 0 { 20 } else { 230 };
            data.extend_from_slice(&[v, 255 - v, v / 2, 255]);
        }
    }
    PixelBuffer::from_rgba(size, size, data).unwrap()
}

fn session_with_image() -> EditSession {
    let mut session = EditSession::new();
    session.load_image(checkerboard(64));
    session
}

fn mosaic() -> EffectConfig {
    EffectConfig {
        kind: EffectKind::Mosaic,
        mosaic_block_size: 8,
        ..Default::default()
    }
}

#[test]
fn test_pointer_down_without_image_fails() {
    let mut session = EditSession::new();
    assert_eq!(session.pointer_down(pos2(1.0, 1.0)), Err(StateTransitionError::NoImage));
    assert!(session.state().is_idle());
}

#[test]
fn test_rect_drag_commits() {
    let mut session = session_with_image();
    let before = Arc::clone(session.current_snapshot().unwrap());

    session.pointer_down(pos2(4.0, 4.0)).unwrap();
    assert!(session.state().is_dragging());
    session.pointer_move(pos2(30.0, 28.0));
    let outcome = session.pointer_up(&mosaic());

    let CommitOutcome::Committed(after) = outcome else {
        panic!("expected a commit, got {outcome:?}");
    };
    assert!(Arc::ptr_eq(session.current_snapshot().unwrap(), &after));
    assert_ne!(*after, *before);
    assert_eq!(session.history().len(), 2);
    assert!(session.state().is_idle());
}

#[test]
fn test_small_drag_is_discarded() {
    let mut session = session_with_image();

    // Exactly 5 wide is not enough
    session.pointer_down(pos2(10.0, 10.0)).unwrap();
    session.pointer_move(pos2(15.0, 40.0));
    assert_eq!(session.pointer_up(&mosaic()), CommitOutcome::Discarded);

    session.pointer_down(pos2(10.0, 10.0)).unwrap();
    session.pointer_move(pos2(40.0, 12.0));
    assert_eq!(session.pointer_up(&mosaic()), CommitOutcome::Discarded);

    assert_eq!(session.history().len(), 1);
    assert!(!session.can_undo());
    assert!(session.state().is_idle());
}

#[test]
fn test_drag_mostly_outside_buffer_is_discarded() {
    let mut session = session_with_image();
    // Large drag, but only 3 px of it overlaps the 64 px image horizontally
    session.pointer_down(pos2(61.0, 10.0)).unwrap();
    session.pointer_move(pos2(200.0, 50.0));
    assert_eq!(session.pointer_up(&mosaic()), CommitOutcome::Discarded);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_single_click_brush_commits() {
    let mut session = session_with_image();
    session.set_mode(EditMode::Brush);

    session.pointer_down(pos2(20.0, 20.0)).unwrap();
    assert!(session.state().is_drawing());
    let outcome = session.pointer_up(&mosaic());

    assert!(matches!(outcome, CommitOutcome::Committed(_)));
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_brush_stroke_matches_direct_application() {
    let mut session = session_with_image();
    session.set_mode(EditMode::Brush);
    let base = Arc::clone(session.current_snapshot().unwrap());
    let config = mosaic();

    session.pointer_down(pos2(5.0, 5.0)).unwrap();
    session.pointer_move(pos2(30.0, 9.0));
    session.pointer_move(pos2(50.0, 40.0));
    let expected = redact_paint::apply_along_path(
        &base,
        session.state().stroke().unwrap().points(),
        config.brush_radius,
        &config,
    );

    let CommitOutcome::Committed(after) = session.pointer_up(&config) else {
        panic!("brush stroke should commit");
    };
    assert_eq!(*after, expected);
}

#[test]
fn test_pointer_down_while_active_is_rejected() {
    let mut session = session_with_image();
    session.pointer_down(pos2(1.0, 1.0)).unwrap();
    let err = session.pointer_down(pos2(2.0, 2.0)).unwrap_err();
    assert!(matches!(err, StateTransitionError::InvalidTransition { .. }));
    // Original drag survives
    assert!(session.state().is_dragging());
}

#[test]
fn test_pointer_up_while_idle_does_nothing() {
    let mut session = session_with_image();
    assert_eq!(session.pointer_up(&mosaic()), CommitOutcome::NoEdit);
    session.pointer_move(pos2(3.0, 3.0));
    assert!(session.state().is_idle());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_pointer_leave_commits_like_release() {
    let mut session = session_with_image();
    session.pointer_down(pos2(2.0, 2.0)).unwrap();
    session.pointer_move(pos2(40.0, 40.0));
    assert!(matches!(session.pointer_leave(&mosaic()), CommitOutcome::Committed(_)));
    assert!(session.state().is_idle());
}

#[test]
fn test_preview_does_not_touch_history() {
    let mut session = session_with_image();
    let before = Arc::clone(session.current_snapshot().unwrap());
    let pristine = (*before).clone();

    session.pointer_down(pos2(4.0, 4.0)).unwrap();
    session.pointer_move(pos2(40.0, 40.0));
    let preview = session.preview(&mosaic()).unwrap();

    assert_ne!(*preview, *before);
    assert!(Arc::ptr_eq(session.current_snapshot().unwrap(), &before));
    assert_eq!(*before, pristine);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_idle_preview_is_current_snapshot() {
    let mut session = session_with_image();
    let preview = session.preview(&mosaic()).unwrap();
    assert!(Arc::ptr_eq(&preview, session.current_snapshot().unwrap()));
    assert!(session.overlay(&mosaic()).is_none());
}

#[test]
fn test_mode_change_cancels_edit() {
    let mut session = session_with_image();
    session.pointer_down(pos2(4.0, 4.0)).unwrap();
    session.pointer_move(pos2(40.0, 40.0));

    session.set_mode(EditMode::Brush);
    assert_eq!(*session.state(), EditorState::Idle);
    assert_eq!(session.pointer_up(&mosaic()), CommitOutcome::NoEdit);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_undo_and_redo_through_session() {
    let mut session = session_with_image();
    let original = Arc::clone(session.current_snapshot().unwrap());

    session.pointer_down(pos2(0.0, 0.0)).unwrap();
    session.pointer_move(pos2(32.0, 32.0));
    let CommitOutcome::Committed(edited) = session.pointer_up(&mosaic()) else {
        panic!("drag should commit");
    };

    let undone = session.undo().unwrap();
    assert!(Arc::ptr_eq(&undone, &original));
    assert!(session.can_redo());

    let redone = session.redo().unwrap();
    assert!(Arc::ptr_eq(&redone, &edited));
    assert!(session.redo().is_none());
}

#[test]
fn test_undo_then_new_edit_drops_redo() {
    let mut session = session_with_image();
    for end in [20.0, 40.0] {
        session.pointer_down(pos2(0.0, 0.0)).unwrap();
        session.pointer_move(pos2(end, end));
        session.pointer_up(&mosaic());
    }
    session.undo();
    assert!(session.can_redo());

    session.pointer_down(pos2(10.0, 10.0)).unwrap();
    session.pointer_move(pos2(50.0, 50.0));
    session.pointer_up(&mosaic());
    assert!(!session.can_redo());
    assert_eq!(session.history().len(), 3);
}

#[test]
fn test_loading_new_image_resets_history() {
    let mut session = session_with_image();
    session.pointer_down(pos2(0.0, 0.0)).unwrap();
    session.pointer_move(pos2(30.0, 30.0));
    session.pointer_up(&mosaic());
    assert!(session.can_undo());

    session.load_image(checkerboard(16));
    assert_eq!(session.history().len(), 1);
    assert!(!session.can_undo());
    assert_eq!(session.current_snapshot().unwrap().width(), 16);
}

#[test]
fn test_bounded_session_history() {
    let mut session = EditSession::with_history(HistoryConfig::bounded(2));
    session.load_image(checkerboard(32));
    for _ in 0..3 {
        session.pointer_down(pos2(0.0, 0.0)).unwrap();
        session.pointer_move(pos2(20.0, 20.0));
        session.pointer_up(&mosaic());
    }
    assert_eq!(session.history().len(), 2);
    assert!(session.undo().is_some());
    assert!(session.undo().is_none());
}

#[test]
fn test_preview_is_reused_until_the_edit_changes() {
    let mut session = session_with_image();
    session.pointer_down(pos2(4.0, 4.0)).unwrap();
    session.pointer_move(pos2(30.0, 30.0));

    let first = session.preview(&mosaic()).unwrap();
    let again = session.preview(&mosaic()).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    session.pointer_move(pos2(40.0, 40.0));
    let moved = session.preview(&mosaic()).unwrap();
    assert_ne!(first.id(), moved.id());
}

#[test]
fn test_drag_overlay_is_normalised() {
    let mut session = session_with_image();
    session.pointer_down(pos2(30.0, 5.0)).unwrap();
    session.pointer_move(pos2(10.0, 25.0));
    let Some(Overlay::Rect(rect)) = session.overlay(&mosaic()) else {
        panic!("dragging should show a rect overlay");
    };
    assert_eq!(rect.min, pos2(10.0, 5.0));
    assert_eq!(rect.max, pos2(30.0, 25.0));
}

#[test]
fn test_brush_preview_tracks_growing_stroke() {
    let mut session = session_with_image();
    session.set_mode(EditMode::Brush);
    let base = Arc::clone(session.current_snapshot().unwrap());
    let config = mosaic();

    session.pointer_down(pos2(8.0, 8.0)).unwrap();
    session.preview(&config);
    for p in [pos2(20.0, 10.0), pos2(35.0, 22.0), pos2(50.0, 50.0)] {
        session.pointer_move(p);
        let shown = session.preview(&config).unwrap();
        let overlay = session.overlay(&config).unwrap();
        assert_eq!(*shown, compose(&base, &overlay));
    }

    session.pointer_up(&config);
    let idle = session.preview(&config).unwrap();
    assert!(Arc::ptr_eq(&idle, session.current_snapshot().unwrap()));
}
