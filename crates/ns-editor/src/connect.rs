//! Making and re-routing connections.
//!
//! A connect gesture anchors on the start item and previews a dashed
//! line to the pointer. A reconnect is the same gesture with history:
//! the old connector is already deleted, the far endpoint is the
//! anchor, and the orphaned near endpoint is remembered as the broken
//! link so an aborted reconnect can fall back to it.

use ns_core::geometry::{Point, Rect};
use ns_core::item::ItemId;
use ns_core::property::keys;
use ns_core::SceneGraph;
use ns_render::{Pen, Surface};

/// Color of the dashed preview line.
pub const PREVIEW_COLOR: &str = "#CC1111";

#[derive(Debug, Default)]
pub struct ConnectionGesture {
    pub start_item: Option<ItemId>,
    pub end_item: Option<ItemId>,
    /// The endpoint a reconnect detached. Connecting over empty canvas
    /// or an invalid target reattaches here.
    pub broken_link: Option<ItemId>,
    /// Line color of the connector a reconnect deleted, restored on
    /// the replacement.
    cached_color: Option<String>,
    dirty: Option<Rect>,
}

impl ConnectionGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor a fresh connection on `start`.
    pub fn begin(&mut self, surface: &mut dyn Surface, start: ItemId) {
        self.start_item = Some(start);
        self.dirty = None;
        surface.save_background();
    }

    /// Anchor a reconnect: the old connector is gone, `anchor` stays
    /// attached, `broken` is where the other end used to be.
    pub fn begin_reconnect(
        &mut self,
        surface: &mut dyn Surface,
        anchor: ItemId,
        broken: ItemId,
        line_color: &str,
    ) {
        self.start_item = Some(anchor);
        self.broken_link = Some(broken);
        self.cached_color = Some(line_color.to_owned());
        self.dirty = None;
        surface.save_background();
    }

    pub fn active(&self) -> bool {
        self.start_item.is_some()
    }

    /// Redraw the dashed preview line from the anchor's focus to the
    /// pointer.
    pub fn update_preview(&mut self, surface: &mut dyn Surface, graph: &SceneGraph, to: Point) {
        let Some(start) = self.start_item.and_then(|id| graph.item(id)) else {
            return;
        };
        let focus = start.focus();

        if let Some(stale) = self.dirty {
            surface.restore_region(stale);
        }
        let mut dirty = Rect::from_points(focus, to);
        dirty.grow(3.0, 3.0);
        self.dirty = Some(dirty);

        let pen = Pen::with_style(PREVIEW_COLOR, 2.0, ns_core::LineStyle::Dashed);
        surface.draw_line(focus.x, focus.y, to.x, to.y, &pen);
    }

    /// Try to create the connection and reset the gesture.
    ///
    /// With no end item the broken link stands in. An end that is
    /// already connected to the anchor falls back to the broken link
    /// too, which quietly undoes an aborted reconnect. Self-connections
    /// and duplicates are refused.
    pub fn make(&mut self, graph: &mut SceneGraph) -> Option<ItemId> {
        let start = self.start_item;
        let mut end = self.end_item.or(self.broken_link);

        if let (Some(s), Some(e)) = (start, end)
            && graph.connected(s, e)
        {
            end = self.broken_link;
        }

        let mut created = None;
        if let (Some(s), Some(e)) = (start, end)
            && s != e
            && !graph.connected(s, e)
        {
            created = graph.add_connector(s, e);
            if let Some(id) = created
                && let Some(color) = self.cached_color.take()
                && let Some(connector) = graph.item_mut(id)
            {
                connector.props_mut().set(keys::FOREGROUND, color);
            }
        }

        self.reset();
        created
    }

    pub fn reset(&mut self) {
        self.start_item = None;
        self.end_item = None;
        self.broken_link = None;
        self.cached_color = None;
        self.dirty = None;
    }
}
