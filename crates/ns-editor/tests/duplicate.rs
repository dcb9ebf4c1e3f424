//! Duplication through the keyboard shortcut, subnet carrying and
//! connection re-establishment included.

use ns_core::geometry::{Point, Rect};
use ns_core::item::{ItemId, SubnetShape};
use ns_editor::session::EditorSession;
use ns_editor::storage::InMemoryStore;
use pretty_assertions::assert_eq;

fn duplicate(session: &mut EditorSession) {
    let mut store = InMemoryStore::new();
    session.key_down(&mut store, "d", true, true);
}

fn node_ids(session: &EditorSession) -> Vec<ItemId> {
    session.graph.nodes.iter().map(|n| n.id()).collect()
}

#[test]
fn duplicates_fan_out_in_growing_steps() {
    let mut session = EditorSession::new();
    let node = session.graph.add_node(Point::new(100.0, 100.0), "router");
    session.graph.item_mut(node).unwrap().selected = true;

    duplicate(&mut session);
    duplicate(&mut session);

    let foci: Vec<Point> =
        session.graph.nodes.iter().map(|n| n.focus()).collect();
    assert_eq!(foci.len(), 3);
    assert_eq!(foci[1], Point::new(130.0, 130.0));
    // the second duplicate steps twice as far from the original
    assert_eq!(foci[2], Point::new(160.0, 160.0));
}

#[test]
fn duplicating_nothing_is_a_no_op() {
    let mut session = EditorSession::new();
    session.graph.add_node(Point::new(100.0, 100.0), "router");

    duplicate(&mut session);
    assert_eq!(session.graph.nodes.len(), 1);
    assert!(session.notices.is_empty());
}

#[test]
fn a_selected_subnet_carries_its_members() {
    let mut session = EditorSession::new();
    let subnet = session
        .graph
        .add_subnet(Rect::new(0.0, 0.0, 100.0, 100.0), SubnetShape::Rectangle);
    let member = session.graph.add_node(Point::new(50.0, 50.0), "router");
    session.graph.recompute_membership(subnet);

    // only the subnet is selected; the member comes along anyway
    session.graph.item_mut(subnet).unwrap().selected = true;
    duplicate(&mut session);

    assert_eq!(session.graph.subnets.len(), 2);
    assert_eq!(session.graph.nodes.len(), 2);

    let new_subnet = session.graph.subnets.iter().find(|s| s.id() != subnet).unwrap().id();
    let new_node = node_ids(&session).into_iter().find(|&id| id != member).unwrap();
    assert_eq!(session.graph.item(new_node).unwrap().subnet, Some(new_subnet));
    assert_eq!(session.graph.item(member).unwrap().subnet, Some(subnet));
}

#[test]
fn a_selected_member_is_not_copied_twice() {
    let mut session = EditorSession::new();
    let subnet = session
        .graph
        .add_subnet(Rect::new(0.0, 0.0, 100.0, 100.0), SubnetShape::Rectangle);
    let member = session.graph.add_node(Point::new(50.0, 50.0), "router");
    session.graph.recompute_membership(subnet);

    session.graph.item_mut(subnet).unwrap().selected = true;
    session.graph.item_mut(member).unwrap().selected = true;
    duplicate(&mut session);

    assert_eq!(session.graph.nodes.len(), 2);
}

#[test]
fn connections_are_reestablished_between_clone_pairs() {
    let mut session = EditorSession::new();
    let a = session.graph.add_node(Point::new(100.0, 100.0), "router");
    let b = session.graph.add_node(Point::new(300.0, 100.0), "switch");
    let connector = session.graph.add_connector(a, b).unwrap();
    session
        .graph
        .item_mut(connector)
        .unwrap()
        .props_mut()
        .set(ns_core::keys::FOREGROUND, "#123456");
    session.graph.item_mut(a).unwrap().selected = true;
    session.graph.item_mut(b).unwrap().selected = true;

    duplicate(&mut session);

    assert_eq!(session.graph.nodes.len(), 4);
    assert_eq!(session.graph.connectors.len(), 2);

    let new_ids: Vec<ItemId> =
        node_ids(&session).into_iter().filter(|&id| id != a && id != b).collect();
    let replica = session.graph.connector_between(new_ids[0], new_ids[1]).unwrap();
    assert_eq!(session.graph.item(replica).unwrap().foreground(), "#123456");
}

#[test]
fn a_selected_connector_alone_duplicates_nothing() {
    let mut session = EditorSession::new();
    let a = session.graph.add_node(Point::new(100.0, 100.0), "router");
    let b = session.graph.add_node(Point::new(300.0, 100.0), "switch");
    let connector = session.graph.add_connector(a, b).unwrap();
    session.graph.item_mut(connector).unwrap().selected = true;

    duplicate(&mut session);
    assert_eq!(session.graph.connectors.len(), 1);
    assert_eq!(session.graph.nodes.len(), 2);
}
