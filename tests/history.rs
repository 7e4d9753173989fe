use egui::{PointerButton, pos2, vec2};
use infinite_canvas::{CanvasState, LayerProperty};

fn canvas_with_edits() -> CanvasState {
    let mut state = CanvasState::default();
    state.resize(vec2(800.0, 600.0));
    let root = state.current_layer_id();
    state.add_layer(Some(root));
    state.pointer_down(pos2(0.0, 0.0), PointerButton::Primary);
    state.pointer_move(pos2(50.0, 50.0));
    state.pointer_up();
    state.update_layer_property(root, LayerProperty::Name("Background".into()));
    state
}

#[test]
fn test_redo_after_undo_restores_document() {
    let mut state = canvas_with_edits();
    let before = state.document().clone();
    let index = state.history().index();

    assert!(state.undo());
    assert_ne!(state.document(), &before);
    assert!(state.redo());

    assert_eq!(state.document(), &before);
    assert_eq!(state.history().index(), index);
}

#[test]
fn test_commit_after_undo_discards_redo() {
    let mut state = canvas_with_edits();
    state.undo();
    let root = state.document().first_layer_id().unwrap();
    state.update_layer_property(root, LayerProperty::Visible(false));
    let after_commit = state.document().clone();

    assert!(!state.can_redo());
    assert!(!state.redo());
    assert_eq!(state.document(), &after_commit);
}

#[test]
fn test_undo_to_the_start_and_back() {
    let mut state = canvas_with_edits();
    let last = state.document().clone();
    let entries = state.history().len();

    let mut undone = 0;
    while state.undo() {
        undone += 1;
    }
    assert_eq!(undone, entries - 1);
    assert_eq!(state.document().len(), 1);
    assert!(!state.document().has_content());

    while state.redo() {}
    assert_eq!(state.document(), &last);
}

#[test]
fn test_layer_ids_are_not_reused_after_undo() {
    let mut state = CanvasState::default();
    let first = state.add_layer(None).unwrap();
    state.undo();
    let second = state.add_layer(None).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_each_edit_is_one_entry() {
    let state = canvas_with_edits();
    // Initial, add layer, draw, rename
    assert_eq!(state.history().len(), 4);
    assert_eq!(state.history().undo_label(), Some("Edit Layer"));
}
