//! Dragging the selected items.

use ns_core::geometry::{Point, Rect};
use ns_core::item::ItemId;
use ns_core::SceneGraph;

use crate::selection::selected_items;

/// A live drag. Deltas are clamped so the scene's confines never leave
/// the canvas, and sub-3-pixel jitter is swallowed.
#[derive(Debug)]
pub struct DragGesture {
    last: Point,
    items: Vec<ItemId>,
    confines: Rect,
    canvas_width: f64,
    canvas_height: f64,
}

impl DragGesture {
    pub fn start(graph: &SceneGraph, at: Point, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            last: at,
            items: selected_items(graph),
            confines: graph.confines(),
            canvas_width,
            canvas_height,
        }
    }

    /// Move the selection by the pointer delta. Subnets carry their
    /// unselected member nodes along; the selected ones move on their
    /// own. Locked items stay put.
    pub fn update(&mut self, graph: &mut SceneGraph, to: Point) {
        let mut dx = to.x - self.last.x;
        let mut dy = to.y - self.last.y;

        if self.confines.x + dx < 0.0 {
            dx = -self.confines.x;
        }
        if self.confines.right() + dx > self.canvas_width {
            dx = self.canvas_width - self.confines.right();
        }
        if self.confines.y + dy < 0.0 {
            dy = -self.confines.y;
        }
        if self.confines.bottom() + dy > self.canvas_height {
            dy = self.canvas_height - self.confines.bottom();
        }

        if dx.abs() <= 2.0 && dy.abs() <= 2.0 {
            return;
        }

        self.last = to;
        self.confines.translate(dx, dy);

        for &id in &self.items {
            let Some(item) = graph.item(id) else { continue };
            if item.locked() {
                continue;
            }

            if item.is_subnet() {
                let members: Vec<ItemId> = graph
                    .nodes
                    .iter()
                    .filter(|n| n.subnet == Some(id) && !n.selected)
                    .map(|n| n.id())
                    .collect();
                for member in members {
                    if let Some(node) = graph.item_mut(member) {
                        node.offset_by(dx, dy);
                    }
                }
            }

            if let Some(item) = graph.item_mut(id) {
                if !item.is_connector() {
                    item.offset_by(dx, dy);
                }
            }
        }
    }
}
