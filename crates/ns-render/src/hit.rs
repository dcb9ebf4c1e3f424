//! Layered hit testing.
//!
//! The probe order is not simple z-order: connectors are probed first
//! (their reconnect handles must win even when a subnet sits under
//! them), then subnet resize handles, then nodes, then subnet bodies,
//! then text. Within a layer the scan is front to back.

use ns_core::geometry::perpendicular_distance;
use ns_core::item::{ItemId, ItemType, SceneItem};
use ns_core::{Point, Rect, SceneGraph};

use crate::handles::{connector_handles, subnet_handles};
use crate::surface::Scale;

/// How close (in screen pixels) the pointer must be to a connector's
/// line to count as touching it.
pub const CONNECT_PROXIMITY: f64 = 25.0;

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: ItemId,
    pub kind: ItemType,
    /// Index of the resize (subnet) or reconnect (connector) handle
    /// under the pointer, if any.
    pub handle: Option<usize>,
}

/// Probe every layer.
pub fn hit_test(graph: &SceneGraph, scale: Scale, x: f64, y: f64) -> Option<Hit> {
    item_at(graph, scale, x, y, |_| true)
}

/// Probe the layers, skipping item types the filter rejects.
pub fn item_at(
    graph: &SceneGraph,
    scale: Scale,
    x: f64,
    y: f64,
    filter: impl Fn(ItemType) -> bool,
) -> Option<Hit> {
    // connectors win outright, handle or body
    if filter(ItemType::LineConnector)
        && let Some(hit) = connector_at(graph, scale, x, y)
    {
        return Some(hit);
    }

    // a subnet handle outranks any node sitting on it
    let subnet_hit = if filter(ItemType::NodeBox) {
        graph.subnets.top_item_at(x, y).map(|subnet| Hit {
            id: subnet.id(),
            kind: ItemType::NodeBox,
            handle: handle_index(&subnet_handles(subnet, scale), x, y),
        })
    } else {
        None
    };
    if let Some(hit) = subnet_hit
        && hit.handle.is_some()
    {
        return Some(hit);
    }

    if filter(ItemType::Node)
        && let Some(node) = graph.nodes.top_item_at(x, y)
    {
        return Some(Hit { id: node.id(), kind: ItemType::Node, handle: None });
    }

    if let Some(hit) = subnet_hit {
        return Some(hit);
    }

    if filter(ItemType::Text)
        && let Some(text) = graph.annotations.top_item_at(x, y)
    {
        return Some(Hit { id: text.id(), kind: ItemType::Text, handle: None });
    }

    None
}

/// The endpoint of a connector whose focus is farther from the given
/// point. During a reconnect this is the anchor that stays attached.
pub fn farther_endpoint(graph: &SceneGraph, connector: &SceneItem, x: f64, y: f64) -> Option<ItemId> {
    let start_id = connector.start_item?;
    let end_id = connector.end_item?;
    let start = graph.item(start_id)?.focus();
    let end = graph.item(end_id)?.focus();

    let p = Point::new(x, y);
    if p.distance_sq(start) > p.distance_sq(end) { Some(start_id) } else { Some(end_id) }
}

fn connector_at(graph: &SceneGraph, scale: Scale, x: f64, y: f64) -> Option<Hit> {
    for connector in graph.connectors.iter().rev() {
        let Some((start, end)) = graph.connector_endpoints(connector.id()) else {
            continue;
        };

        let handle = handle_index(&connector_handles(start, end, scale), x, y);
        if handle.is_some() || body_near(start, end, scale, x, y) {
            return Some(Hit { id: connector.id(), kind: ItemType::LineConnector, handle });
        }
    }
    None
}

/// Proximity test against the middle 80% of the line. The outer 10% at
/// each end is dead so connectors do not shadow their own endpoints.
fn body_near(start: Point, end: Point, scale: Scale, x: f64, y: f64) -> bool {
    let hit = perpendicular_distance(start, end, Point::new(x, y));
    if hit.t < 0.1 || hit.t > 0.9 {
        return false;
    }
    hit.distance * scale.mean() < CONNECT_PROXIMITY
}

fn handle_index(rects: &[Rect], x: f64, y: f64) -> Option<usize> {
    rects.iter().position(|r| r.contains(x, y))
}
