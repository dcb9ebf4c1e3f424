//! Connector tool flows: making, refusing and re-routing connections.

use ns_core::geometry::Point;
use ns_core::item::ItemId;
use ns_editor::input::{PointerEvent, Tool};
use ns_editor::notice::Notice;
use ns_editor::session::EditorSession;
use ns_editor::state::EditorState;
use ns_editor::storage::InMemoryStore;
use ns_render::{DrawOp, RecordingSurface};
use pretty_assertions::assert_eq;

fn two_node_session() -> (EditorSession, RecordingSurface, ItemId, ItemId) {
    let mut session = EditorSession::new();
    let a = session.graph.add_node(Point::new(100.0, 100.0), "router");
    let b = session.graph.add_node(Point::new(400.0, 100.0), "switch");
    (session, RecordingSurface::new(800.0, 600.0), a, b)
}

#[test]
fn connector_tool_joins_two_nodes() {
    let (mut session, mut surface, a, b) = two_node_session();
    session.set_tool(Tool::Connector);

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    assert_eq!(session.state, EditorState::Connect);

    // the gesture previews a line while the pointer travels
    session.pointer_move(&mut surface, PointerEvent::at(250.0, 100.0));
    assert!(surface.lines().count() > 0);

    session.pointer_down(&mut surface, PointerEvent::at(400.0, 100.0));

    assert!(session.graph.connected(a, b));
    assert_eq!(session.tool, Tool::Pointer);
    assert!(session.notices.drain().contains(&Notice::Dirty("Connect")));
}

#[test]
fn connecting_an_item_to_itself_alerts() {
    let (mut session, mut surface, a, _) = two_node_session();
    session.set_tool(Tool::Connector);

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_down(&mut surface, PointerEvent::at(110.0, 95.0));

    assert_eq!(surface.alerts, vec!["Cannot connect an item to itself.".to_owned()]);
    assert!(session.graph.connectors_touching(a).is_empty());
    assert_eq!(session.tool, Tool::Pointer);
}

#[test]
fn pressing_empty_canvas_abandons_the_connection() {
    let (mut session, mut surface, a, b) = two_node_session();
    session.set_tool(Tool::Connector);

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_down(&mut surface, PointerEvent::at(600.0, 400.0));

    assert!(!session.graph.connected(a, b));
    assert!(session.graph.connectors.is_empty());
    assert_eq!(session.tool, Tool::Pointer);
    assert_eq!(session.state, EditorState::Idle);
}

#[test]
fn duplicate_connections_are_refused() {
    let (mut session, mut surface, a, b) = two_node_session();
    session.graph.add_connector(a, b).unwrap();
    session.set_tool(Tool::Connector);

    // the two foci sit inside the dead 10% ends of the line, so the
    // nodes win the hit test even with the connector present
    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_down(&mut surface, PointerEvent::at(400.0, 100.0));

    assert_eq!(session.graph.connectors.len(), 1);
}

#[test]
fn text_items_cannot_be_connected() {
    let (mut session, mut surface, _, _) = two_node_session();
    let text = session.graph.add_text(590.0, 400.0);
    session.graph.item_mut(text).unwrap().set_bounds(ns_core::Rect::new(
        590.0, 380.0, 60.0, 20.0,
    ));
    session.set_tool(Tool::Connector);

    session.pointer_down(&mut surface, PointerEvent::at(600.0, 390.0));

    assert_eq!(session.state, EditorState::Idle);
    assert_eq!(session.tool, Tool::Pointer);
    assert!(!session.connection.active());
}

// ─── Deleting connections ────────────────────────────────────────────────────

#[test]
fn delete_spares_connectors_between_locked_endpoints() {
    let (mut session, _surface, a, b) = two_node_session();
    let c = session.graph.add_node(Point::new(250.0, 300.0), "server");
    let locked_pair = session.graph.add_connector(a, b).unwrap();
    let mixed = session.graph.add_connector(a, c).unwrap();
    for id in [a, b] {
        session.graph.item_mut(id).unwrap().set_locked(true);
    }
    session.graph.item_mut(locked_pair).unwrap().selected = true;
    session.graph.item_mut(mixed).unwrap().selected = true;

    let mut store = InMemoryStore::new();
    session.key_down(&mut store, "Delete", false, false);

    // both endpoints locked: the connector stays; one unlocked end is
    // enough for the other to go
    assert!(session.graph.item(locked_pair).is_some());
    assert!(session.graph.item(mixed).is_none());
}

#[test]
fn deleting_a_node_cascades_to_its_connectors() {
    let (mut session, mut surface, a, b) = two_node_session();
    session.graph.add_connector(a, b).unwrap();

    session.pointer_down(&mut surface, PointerEvent::at(100.0, 100.0));
    session.pointer_up(&mut surface, PointerEvent::at(100.0, 100.0));
    let mut store = InMemoryStore::new();
    session.key_down(&mut store, "Delete", false, false);

    assert!(session.graph.item(a).is_none());
    assert!(session.graph.item(b).is_some());
    assert!(session.graph.connectors.is_empty());
}

// ─── Reconnect ───────────────────────────────────────────────────────────────

#[test]
fn clicking_a_handle_starts_a_reconnect() {
    let (mut session, mut surface, a, b) = two_node_session();
    session.graph.add_connector(a, b).unwrap();
    let c = session.graph.add_node(Point::new(250.0, 300.0), "server");

    // the near handle sits 10% along the line, at x = 130
    session.single_click(&mut surface, PointerEvent::at(130.0, 100.0));
    assert_eq!(session.state, EditorState::Reconnect);
    assert_eq!(session.tool, Tool::Connector);
    assert!(session.graph.connectors.is_empty());

    // drop the loose end on a third node
    session.pointer_down(&mut surface, PointerEvent::at(250.0, 300.0));

    assert!(session.graph.connected(b, c));
    assert!(!session.graph.connected(a, b));
    assert_eq!(session.graph.connectors.len(), 1);
}

#[test]
fn aborted_reconnect_reattaches_the_old_endpoint() {
    let (mut session, mut surface, a, b) = two_node_session();
    session.graph.add_connector(a, b).unwrap();

    // grab the handle near b, then drop over empty canvas
    session.single_click(&mut surface, PointerEvent::at(370.0, 100.0));
    assert!(session.graph.connectors.is_empty());
    session.pointer_down(&mut surface, PointerEvent::at(600.0, 400.0));

    assert!(session.graph.connected(a, b));
    assert_eq!(session.graph.connectors.len(), 1);
}

#[test]
fn reconnect_keeps_the_line_color() {
    let (mut session, mut surface, a, b) = two_node_session();
    let connector = session.graph.add_connector(a, b).unwrap();
    session
        .graph
        .item_mut(connector)
        .unwrap()
        .props_mut()
        .set(ns_core::keys::FOREGROUND, "#123456");
    let c = session.graph.add_node(Point::new(250.0, 300.0), "server");

    session.single_click(&mut surface, PointerEvent::at(130.0, 100.0));
    session.pointer_down(&mut surface, PointerEvent::at(250.0, 300.0));

    let replacement = session.graph.connector_between(b, c).unwrap();
    assert_eq!(session.graph.item(replacement).unwrap().foreground(), "#123456");
}

#[test]
fn reconnect_previews_from_the_anchored_end() {
    let (mut session, mut surface, a, b) = two_node_session();
    session.graph.add_connector(a, b).unwrap();

    session.single_click(&mut surface, PointerEvent::at(130.0, 100.0));
    surface.clear();
    session.pointer_move(&mut surface, PointerEvent::at(200.0, 250.0));

    // the anchor is b, the endpoint farther from the grabbed handle
    assert!(matches!(
        surface.ops[0],
        DrawOp::Line { x1: 400.0, y1: 100.0, x2: 200.0, y2: 250.0, .. }
    ));
}
