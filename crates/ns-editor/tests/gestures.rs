//! End-to-end pointer and keyboard flows through the session.

use ns_core::geometry::{Point, Rect};
use ns_core::item::{ItemId, SubnetShape};
use ns_editor::input::{PointerEvent, Tool};
use ns_editor::notice::Notice;
use ns_editor::session::EditorSession;
use ns_editor::state::EditorState;
use ns_editor::storage::{InMemoryStore, KeyValueStore};
use ns_render::{DrawOp, RecordingSurface};
use pretty_assertions::assert_eq;

fn session_with_node(x: f64, y: f64) -> (EditorSession, RecordingSurface, ItemId) {
    let mut session = EditorSession::new();
    let node = session.graph.add_node(Point::new(x, y), "router");
    (session, RecordingSurface::new(800.0, 600.0), node)
}

// ─── Drag ────────────────────────────────────────────────────────────────────

#[test]
fn drag_moves_the_selected_node() {
    let (mut session, mut surface, node) = session_with_node(100.0, 100.0);

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    assert_eq!(session.state, EditorState::Drag);
    assert!(session.graph.item(node).unwrap().selected);

    session.pointer_move(&mut surface, PointerEvent::at(140.0, 130.0));
    session.pointer_up(&mut surface, PointerEvent::at(140.0, 130.0));

    assert_eq!(session.graph.item(node).unwrap().focus(), Point::new(140.0, 130.0));
    assert_eq!(session.state, EditorState::Idle);
    assert!(session.dirty);
    assert!(session.notices.drain().contains(&Notice::Dirty("Drag")));
}

#[test]
fn tiny_pointer_jitter_does_not_move_anything() {
    let (mut session, mut surface, node) = session_with_node(100.0, 100.0);

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_move(&mut surface, PointerEvent::at(102.0, 101.0));
    session.pointer_up(&mut surface, PointerEvent::at(102.0, 101.0));

    assert_eq!(session.graph.item(node).unwrap().focus(), Point::new(100.0, 100.0));
}

#[test]
fn a_locked_node_does_not_start_a_drag() {
    let (mut session, mut surface, node) = session_with_node(100.0, 100.0);
    session.graph.item_mut(node).unwrap().set_locked(true);

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    assert_eq!(session.state, EditorState::Idle);
}

// ─── Rubberband select ───────────────────────────────────────────────────────

#[test]
fn empty_canvas_press_bands_a_multiple_selection() {
    let mut session = EditorSession::new();
    let a = session.graph.add_node(Point::new(200.0, 200.0), "router");
    let b = session.graph.add_node(Point::new(300.0, 300.0), "switch");
    let mut surface = RecordingSurface::new(800.0, 600.0);

    session.pointer_down(&mut surface, PointerEvent::at(50.0, 50.0));
    assert_eq!(session.state, EditorState::Banding);
    assert!(matches!(surface.ops[0], DrawOp::SaveBackground));

    session.pointer_move(&mut surface, PointerEvent::at(400.0, 400.0));
    session.pointer_up(&mut surface, PointerEvent::at(400.0, 400.0));

    assert!(session.graph.item(a).unwrap().selected);
    assert!(session.graph.item(b).unwrap().selected);
    assert_eq!(session.state, EditorState::Idle);
    assert!(matches!(surface.ops.last(), Some(DrawOp::RestoreBackground)));
}

#[test]
fn band_only_takes_fully_contained_items() {
    let mut session = EditorSession::new();
    let inside = session.graph.add_node(Point::new(100.0, 100.0), "router");
    let straddling = session.graph.add_node(Point::new(200.0, 100.0), "switch");
    let mut surface = RecordingSurface::new(800.0, 600.0);

    session.pointer_down(&mut surface, PointerEvent::at(50.0, 50.0));
    session.pointer_up(&mut surface, PointerEvent::at(190.0, 200.0));

    assert!(session.graph.item(inside).unwrap().selected);
    assert!(!session.graph.item(straddling).unwrap().selected);
}

// ─── Reshape ─────────────────────────────────────────────────────────────────

#[test]
fn corner_handle_press_reshapes_the_subnet() {
    let mut session = EditorSession::new();
    let subnet = session
        .graph
        .add_subnet(Rect::new(100.0, 100.0, 200.0, 100.0), SubnetShape::Rectangle);
    let mut surface = RecordingSurface::new(800.0, 600.0);

    // inside the 12x12 top-left handle
    session.pointer_down(&mut surface, PointerEvent::at(105.0, 105.0));
    assert_eq!(session.state, EditorState::Reshape);
    assert!(session.graph.item(subnet).unwrap().reshaping);

    session.pointer_move(&mut surface, PointerEvent::at(80.0, 90.0));
    session.pointer_up(&mut surface, PointerEvent::at(80.0, 90.0));

    assert_eq!(session.graph.item(subnet).unwrap().bounds(), Rect::new(75.0, 85.0, 225.0, 115.0));
    assert!(!session.graph.item(subnet).unwrap().reshaping);
    assert!(session.notices.drain().contains(&Notice::Dirty("Reshape")));
}

// ─── Subnet tool ─────────────────────────────────────────────────────────────

#[test]
fn subnet_tool_creates_a_box_in_two_clicks() {
    let mut session = EditorSession::new();
    let mut surface = RecordingSurface::new(800.0, 600.0);
    session.set_tool(Tool::Subnet);

    // the press does nothing; the first release anchors the band
    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    assert_eq!(session.state, EditorState::Idle);
    session.pointer_up(&mut surface, PointerEvent::at(100.0, 100.0));
    assert_eq!(session.state, EditorState::Banding);

    session.pointer_move(&mut surface, PointerEvent::at(250.0, 200.0));
    session.pointer_up(&mut surface, PointerEvent::at(300.0, 250.0));

    assert_eq!(session.graph.subnets.len(), 1);
    let subnet = session.graph.subnets.iter().next().unwrap();
    assert_eq!(subnet.bounds(), Rect::new(100.0, 100.0, 200.0, 150.0));
    assert_eq!(session.tool, Tool::Pointer);
}

#[test]
fn degenerate_subnet_sweeps_are_rejected() {
    let mut session = EditorSession::new();
    let mut surface = RecordingSurface::new(800.0, 600.0);
    session.set_tool(Tool::Subnet);

    session.pointer_up(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_up(&mut surface, PointerEvent::at(102.0, 180.0));

    assert!(session.graph.subnets.is_empty());
    assert_eq!(session.tool, Tool::Pointer);
}

#[test]
fn new_subnet_captures_the_nodes_it_covers() {
    let mut session = EditorSession::new();
    let node = session.graph.add_node(Point::new(200.0, 150.0), "router");
    let mut surface = RecordingSurface::new(800.0, 600.0);
    session.set_tool(Tool::Subnet);

    session.pointer_up(&mut surface, PointerEvent::at(100.0, 50.0));
    session.pointer_up(&mut surface, PointerEvent::at(400.0, 300.0));

    let subnet = session.graph.subnets.iter().next().unwrap().id();
    assert_eq!(session.graph.item(node).unwrap().subnet, Some(subnet));
}

// ─── Pan ─────────────────────────────────────────────────────────────────────

#[test]
fn pan_offsets_the_whole_scene() {
    let (mut session, mut surface, node) = session_with_node(100.0, 100.0);
    session.set_tool(Tool::Pan);

    session.pointer_down(&mut surface, PointerEvent::at(400.0, 300.0));
    assert_eq!(session.state, EditorState::Pan);
    session.pointer_move(&mut surface, PointerEvent::at(410.0, 310.0));
    session.pointer_up(&mut surface, PointerEvent::at(410.0, 310.0));

    assert_eq!(session.graph.item(node).unwrap().focus(), Point::new(110.0, 110.0));
    assert_eq!(session.state, EditorState::Idle);
    // the pan tool stays armed for the next stroke
    assert_eq!(session.tool, Tool::Pan);
}

#[test]
fn pan_refuses_to_push_the_scene_off_the_canvas() {
    let (mut session, mut surface, node) = session_with_node(100.0, 100.0);
    session.set_tool(Tool::Pan);

    session.pointer_down(&mut surface, PointerEvent::at(400.0, 300.0));
    // the scene's left edge is at x = 76; this would shove it past zero
    session.pointer_move(&mut surface, PointerEvent::at(300.0, 300.0));

    assert_eq!(session.graph.item(node).unwrap().focus(), Point::new(100.0, 100.0));
}

// ─── Text tool ───────────────────────────────────────────────────────────────

#[test]
fn text_tool_places_an_item_in_edit_mode() {
    let mut session = EditorSession::new();
    let mut surface = RecordingSurface::new(800.0, 600.0);
    session.set_tool(Tool::Text);

    session.single_click(&mut surface, PointerEvent::at(150.0, 150.0));

    assert_eq!(session.graph.annotations.len(), 1);
    let text = session.graph.annotations.iter().next().unwrap();
    assert!(text.selected);
    assert!(text.editing);
    assert_eq!(session.tool, Tool::Pointer);
}

// ─── Pointer exit ────────────────────────────────────────────────────────────

#[test]
fn leaving_the_canvas_finishes_a_drag() {
    let (mut session, mut surface, node) = session_with_node(100.0, 100.0);

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_move(&mut surface, PointerEvent::at(200.0, 100.0));
    session.pointer_exit(&mut surface, PointerEvent::at(200.0, 100.0));

    assert_eq!(session.state, EditorState::Idle);
    assert_eq!(session.graph.item(node).unwrap().focus(), Point::new(200.0, 100.0));
}

// ─── Keyboard ────────────────────────────────────────────────────────────────

#[test]
fn delete_key_removes_the_selection() {
    let (mut session, mut surface, node) = session_with_node(100.0, 100.0);
    let mut store = InMemoryStore::new();

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_up(&mut surface, PointerEvent::at(100.0, 100.0));
    session.key_down(&mut store, "Delete", false, false);

    assert!(session.graph.item(node).is_none());
}

#[test]
fn locking_shields_an_item_from_delete() {
    let (mut session, _surface, node) = session_with_node(100.0, 100.0);
    let mut store = InMemoryStore::new();
    session.graph.item_mut(node).unwrap().selected = true;

    session.key_down(&mut store, "l", true, true);
    assert!(session.graph.item(node).unwrap().locked());

    session.key_down(&mut store, "Backspace", false, false);
    assert!(session.graph.item(node).is_some());

    session.key_down(&mut store, "u", true, true);
    session.key_down(&mut store, "Delete", false, false);
    assert!(session.graph.item(node).is_none());
}

#[test]
fn ctrl_shift_g_toggles_the_grid() {
    let mut session = EditorSession::new();
    let mut store = InMemoryStore::new();
    assert!(session.settings.show_grid);

    session.key_down(&mut store, "g", true, true);
    assert!(!session.settings.show_grid);
    session.key_down(&mut store, "G", true, true);
    assert!(session.settings.show_grid);
}

#[test]
fn select_all_then_delete_clears_the_scene() {
    let mut session = EditorSession::new();
    session.graph.add_node(Point::new(100.0, 100.0), "router");
    session.graph.add_node(Point::new(300.0, 100.0), "switch");
    let mut store = InMemoryStore::new();

    session.key_down(&mut store, "a", true, true);
    session.key_down(&mut store, "Delete", false, false);

    assert!(session.graph.is_empty());
}

// ─── Snap and persistence ────────────────────────────────────────────────────

#[test]
fn snap_all_pulls_nodes_onto_the_grid() {
    let (mut session, _surface, node) = session_with_node(100.0, 100.0);

    session.snap_all();
    assert_eq!(session.graph.item(node).unwrap().focus(), Point::new(105.0, 105.0));
}

#[test]
fn save_and_reload_round_trips_through_the_store() {
    let (mut session, _surface, _) = session_with_node(100.0, 100.0);
    session.settings.map_name = Some("lab".to_owned());
    session.snap_all();
    let mut store = InMemoryStore::new();

    assert!(session.dirty);
    session.save(&mut store);
    assert!(!session.dirty);
    // named maps also get a snapshot under their own key
    assert!(store.get("lab").is_some());

    let mut restored = EditorSession::new();
    restored.reload(&mut store);
    assert_eq!(restored.graph.nodes.len(), 1);
    assert_eq!(restored.settings.map_name.as_deref(), Some("lab"));
    assert!(!restored.dirty);
}
