//! Resizing a subnet by one of its corner handles.

use ns_core::geometry::{Point, Rect};
use ns_core::item::ItemId;
use ns_core::SceneGraph;

/// A live reshape. The handle index picks which corner follows the
/// pointer; the opposite corner stays pinned. Dragging a corner past
/// its opposite flips the rect rather than inverting it.
#[derive(Debug)]
pub struct ReshapeGesture {
    item: ItemId,
    corner: usize,
    last: Point,
}

impl ReshapeGesture {
    pub fn start(graph: &mut SceneGraph, item: ItemId, corner: usize, at: Point) -> Self {
        if let Some(subnet) = graph.item_mut(item) {
            subnet.reshaping = true;
        }
        Self { item, corner, last: at }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn update(&mut self, graph: &mut SceneGraph, to: Point) {
        let dx = to.x - self.last.x;
        let dy = to.y - self.last.y;
        self.last = to;

        let Some(subnet) = graph.item_mut(self.item) else {
            return;
        };
        let b = subnet.bounds();

        // 0 = top-left, 1 = top-right, 2 = bottom-right, 3 = bottom-left
        let next = match self.corner {
            0 => Rect::new(b.x + dx, b.y + dy, b.width - dx, b.height - dy),
            1 => Rect::new(b.x, b.y + dy, b.width + dx, b.height - dy),
            2 => Rect::new(b.x, b.y, b.width + dx, b.height + dy),
            _ => Rect::new(b.x + dx, b.y, b.width - dx, b.height + dy),
        };
        subnet.set_bounds(next);
    }

    /// Finish: drop the preview flag and recompute which nodes the
    /// resized subnet now contains.
    pub fn end(self, graph: &mut SceneGraph) {
        if let Some(subnet) = graph.item_mut(self.item) {
            subnet.reshaping = false;
        }
        graph.recompute_membership(self.item);
    }
}
