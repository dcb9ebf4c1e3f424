//! The editor session: one scene, one tool, one interaction state.
//!
//! Pointer events route through here. Most gestures start on pointer
//! down, not on click; the exceptions are text placement and connector
//! reconnects, which hang off single clicks. Every one-shot tool snaps
//! back to the pointer when its gesture completes.

use ns_core::document::{self, GlobalSettings};
use ns_core::geometry::{Point, Rect};
use ns_core::item::{ItemId, ItemType, SubnetShape};
use ns_core::SceneGraph;
use ns_render::{
    PaintOptions, Surface, farther_endpoint, hit_test, item_at, paint_scene, sync_text_bounds,
};

use crate::band::{BandGesture, BandMode};
use crate::clone::duplicate_selected;
use crate::connect::ConnectionGesture;
use crate::drag::DragGesture;
use crate::input::{PointerEvent, Tool};
use crate::notice::{Notice, NoticeQueue};
use crate::refresh::RefreshCoalescer;
use crate::reshape::ReshapeGesture;
use crate::selection::{any_selected, band_select, select_all, selected_items, update_selection};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::state::EditorState;
use crate::storage::{DOCUMENT_KEY, KeyValueStore};

/// Subnets thinner than this in either direction are accidental
/// clicks, not boxes.
const MIN_SUBNET_EXTENT: f64 = 4.0;

pub struct EditorSession {
    pub graph: SceneGraph,
    pub state: EditorState,
    pub tool: Tool,
    /// Shape the subnet tool will sweep out next.
    pub subnet_shape: SubnetShape,
    pub settings: GlobalSettings,
    /// Unsaved edits exist. Set by every mutating gesture, cleared on
    /// save and reload.
    pub dirty: bool,
    pub feedback_visible: bool,
    pub connection: ConnectionGesture,
    pub refresh: RefreshCoalescer,
    pub notices: NoticeQueue,
    drag: Option<DragGesture>,
    reshape: Option<ReshapeGesture>,
    band: Option<BandGesture>,
    last: Point,
    confining: Rect,
    dup_count: u32,
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            state: EditorState::Idle,
            tool: Tool::Pointer,
            subnet_shape: SubnetShape::Rectangle,
            settings: GlobalSettings::default(),
            dirty: false,
            feedback_visible: false,
            connection: ConnectionGesture::new(),
            refresh: RefreshCoalescer::new(),
            notices: NoticeQueue::new(),
            drag: None,
            reshape: None,
            band: None,
            last: Point::default(),
            confining: Rect::default(),
            dup_count: 0,
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.state = match tool {
            Tool::Place(_) => EditorState::Placing,
            _ => EditorState::Idle,
        };
    }

    /// Paint the scene, with text bounds freshly measured.
    pub fn paint(&mut self, surface: &mut dyn Surface) {
        sync_text_bounds(surface, &mut self.graph);
        let options = PaintOptions {
            show_grid: self.settings.show_grid,
            dragging: self.state == EditorState::Drag,
        };
        paint_scene(surface, &self.graph, &options);
    }

    // ─── Pointer events ──────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        self.last = e.point();

        match self.tool {
            Tool::Pointer => self.pointer_tool_down(surface, e),
            Tool::Connector => self.connector_tool_down(surface, e),
            // the subnet tool works entirely on mouse ups
            Tool::Subnet => {}
            // text items are placed on single click
            Tool::Text => {}
            Tool::Pan => {
                self.state = EditorState::Pan;
                self.confining = self.graph.confines();
            }
            Tool::Place(icon) => {
                self.graph.add_node(e.point(), icon.image_id());
                self.mark_dirty("Place");
                self.refresh.request_canvas();
                self.restore_default();
            }
        }
    }

    fn pointer_tool_down(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        let hit = hit_test(&self.graph, surface.scale(), e.x, e.y);
        let hit = update_selection(&mut self.graph, hit, e.modifiers);
        self.notices.push(Notice::SelectionChanged);

        let Some(hit) = hit else {
            // clicked empty canvas: band for multiple select
            self.state = EditorState::Banding;
            self.band = Some(BandGesture::start(surface, BandMode::Rectangle, e.point(), 1));
            return;
        };

        if self.graph.item(hit.id).is_some_and(|i| i.locked()) {
            return;
        }

        if hit.kind == ItemType::NodeBox
            && let Some(handle) = hit.handle
        {
            self.refresh.request_canvas();
            self.state = EditorState::Reshape;
            self.reshape = Some(ReshapeGesture::start(&mut self.graph, hit.id, handle, e.point()));
        } else {
            self.refresh.request_canvas();
            self.state = EditorState::Drag;
            self.drag = Some(DragGesture::start(
                &self.graph,
                e.point(),
                surface.canvas_width(),
                surface.canvas_height(),
            ));
        }
    }

    fn connector_tool_down(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        let hit = item_at(&self.graph, surface.scale(), e.x, e.y, |t| {
            t != ItemType::LineConnector
        });
        // over empty canvas a reconnect falls back to its broken link
        let item = hit.map(|h| h.id).or_else(|| self.connection.broken_link.take());

        let Some(item) = item else {
            self.connection.reset();
            self.restore_default();
            return;
        };
        if self.graph.item(item).is_some_and(|i| i.is_text()) {
            // cannot connect to text
            self.connection.reset();
            self.restore_default();
            return;
        }

        if !self.connection.active() {
            self.connection.begin(surface, item);
            self.state = EditorState::Connect;
        } else if self.connection.start_item == Some(item) {
            surface.alert("Cannot connect an item to itself.");
            self.connection.reset();
            self.restore_default();
        } else {
            self.connection.end_item = Some(item);
            if self.connection.make(&mut self.graph).is_some() {
                self.mark_dirty("Connect");
            }
            self.refresh.request_canvas();
            self.restore_default();
        }
    }

    pub fn pointer_move(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        match self.state {
            EditorState::Drag => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.update(&mut self.graph, e.point());
                }
                self.refresh.request_canvas();
            }
            EditorState::Reshape => {
                if let Some(reshape) = self.reshape.as_mut() {
                    reshape.update(&mut self.graph, e.point());
                }
                self.refresh.request_canvas();
            }
            EditorState::Banding => {
                if let Some(band) = self.band.as_mut() {
                    band.update(surface, e.point());
                }
            }
            EditorState::Connect | EditorState::Reconnect => {
                self.connection.update_preview(surface, &self.graph, e.point());
            }
            EditorState::Pan => self.pan_move(surface, e),
            _ => {}
        }
    }

    fn pan_move(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        let dx = e.x - self.last.x;
        let dy = e.y - self.last.y;

        // don't pan the scene off the canvas
        if self.confining.x + dx < 0.0 || self.confining.right() + dx > surface.canvas_width() {
            self.last = e.point();
            return;
        }
        if self.confining.y + dy < 0.0 || self.confining.bottom() + dy > surface.canvas_height() {
            self.last = e.point();
            return;
        }

        self.confining.translate(dx, dy);
        if dx.abs() > 2.0 || dy.abs() > 2.0 {
            for layer in [
                &mut self.graph.connectors,
                &mut self.graph.subnets,
                &mut self.graph.nodes,
                &mut self.graph.annotations,
            ] {
                for item in layer.iter_mut() {
                    item.offset_by(dx, dy);
                }
            }
            self.last = e.point();
        }
        self.refresh.request_canvas();
    }

    pub fn pointer_up(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        match self.tool {
            Tool::Pan => self.state = EditorState::Idle,
            Tool::Pointer => self.pointer_tool_up(surface, e),
            Tool::Subnet => self.subnet_tool_up(surface, e),
            _ => {}
        }
    }

    fn pointer_tool_up(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        match self.state {
            EditorState::Banding => {
                if let Some(band) = self.band.take() {
                    let start = band.end(surface);
                    let rect = Rect::from_points(start, e.point());
                    band_select(&mut self.graph, &rect, e.modifiers);
                    self.notices.push(Notice::SelectionChanged);
                    self.restore_default();
                    self.refresh.request_canvas();
                }
            }
            EditorState::Reshape => {
                if let Some(reshape) = self.reshape.take() {
                    reshape.end(&mut self.graph);
                }
                self.restore_default();
                self.mark_dirty("Reshape");
                self.refresh.request_canvas();
            }
            EditorState::Drag => {
                self.drag = None;
                self.graph.recompute_all_memberships();
                self.restore_default();
                self.mark_dirty("Drag");
                self.refresh.request_canvas();
            }
            _ => {}
        }
    }

    /// The subnet tool is a two-click protocol: the first mouse up
    /// anchors the band, the second one creates the box.
    fn subnet_tool_up(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        if self.state != EditorState::Banding {
            self.state = EditorState::Banding;
            self.band = Some(BandGesture::start(
                surface,
                BandMode::from(self.subnet_shape),
                e.point(),
                0,
            ));
            return;
        }

        let finish = match self.band.as_mut() {
            Some(band) => {
                band.click_count += 1;
                band.click_count > 0
            }
            None => false,
        };
        if finish
            && let Some(band) = self.band.take()
        {
            let start = band.end(surface);
            self.create_subnet(start, e.point());
            self.restore_default();
            self.refresh.request_canvas();
        }
    }

    fn create_subnet(&mut self, a: Point, b: Point) -> Option<ItemId> {
        let rect = Rect::from_points(a, b);
        if rect.width < MIN_SUBNET_EXTENT || rect.height < MIN_SUBNET_EXTENT {
            return None;
        }
        let id = self.graph.add_subnet(rect, self.subnet_shape);
        self.graph.recompute_membership(id);
        self.mark_dirty("Subnet");
        Some(id)
    }

    /// Pointer left the canvas. For the gesture tools this is a mouse
    /// up; a half-finished connect keeps following the pointer.
    pub fn pointer_exit(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        match self.tool {
            Tool::Pointer | Tool::Subnet | Tool::Text | Tool::Pan => self.pointer_up(surface, e),
            _ => {}
        }
    }

    pub fn single_click(&mut self, surface: &mut dyn Surface, e: PointerEvent) {
        if self.tool == Tool::Text {
            let id = self.graph.add_text(e.x, e.y);
            if let Some(item) = self.graph.item_mut(id) {
                item.selected = true;
                item.editing = true;
            }
            self.notices.push(Notice::SelectionChanged);
            self.mark_dirty("Text");
            self.refresh.request_canvas();
            self.restore_default();
            return;
        }

        let hit = hit_test(&self.graph, surface.scale(), e.x, e.y);
        if let Some(hit) = hit
            && hit.kind == ItemType::LineConnector
            && hit.handle.is_some()
        {
            self.begin_reconnect(surface, hit.id, e);
        }
        self.notices.push(Notice::SelectionChanged);
    }

    /// A single click on a reconnect handle of a fully connected
    /// connector detaches the nearer end: the connector is deleted,
    /// the farther endpoint anchors a reconnect gesture, and the
    /// detached endpoint is remembered in case the reconnect aborts.
    fn begin_reconnect(&mut self, surface: &mut dyn Surface, connector_id: ItemId, e: PointerEvent) {
        let Some(connector) = self.graph.item(connector_id) else {
            return;
        };
        let (Some(start), Some(end)) = (connector.start_item, connector.end_item) else {
            return;
        };
        let Some(anchor) = farther_endpoint(&self.graph, connector, e.x, e.y) else {
            return;
        };
        let broken = if anchor == start { end } else { start };
        let line_color = connector.foreground().to_owned();

        self.graph.remove(connector_id);
        self.connection.begin_reconnect(surface, anchor, broken, &line_color);
        self.state = EditorState::Reconnect;
        self.tool = Tool::Connector;
        self.refresh.request_canvas();
    }

    // ─── Keyboard ────────────────────────────────────────────────────────────

    pub fn key_down(&mut self, store: &mut dyn KeyValueStore, key: &str, ctrl: bool, shift: bool) {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift) else {
            return;
        };

        match action {
            ShortcutAction::Delete => {
                if any_selected(&self.graph, true) {
                    self.delete_selected();
                }
            }
            ShortcutAction::Duplicate => self.duplicate_selected(),
            ShortcutAction::SelectAll => {
                select_all(&mut self.graph);
                self.notices.push(Notice::SelectionChanged);
                self.refresh.request_all();
            }
            ShortcutAction::DumpJson => {
                let json = self.document_json();
                log::debug!("document dump:\n{json}");
            }
            ShortcutAction::Lock => self.lock_selected(true),
            ShortcutAction::Unlock => self.lock_selected(false),
            ShortcutAction::ReloadFromStorage => self.reload(store),
            ShortcutAction::ToggleGrid => {
                self.settings.show_grid = !self.settings.show_grid;
                self.refresh.request_canvas();
            }
            ShortcutAction::ToggleFeedback => {
                self.feedback_visible = !self.feedback_visible;
            }
        }
    }

    // ─── Editing operations ──────────────────────────────────────────────────

    /// Delete the selection. Connectors go first so nothing cascades
    /// into an item still on the list; a connector dies if either
    /// endpoint is unlocked, anything else only if itself unlocked.
    pub fn delete_selected(&mut self) {
        let selected = selected_items(&self.graph);

        for &id in &selected {
            let Some(item) = self.graph.item(id) else { continue };
            if !item.is_connector() {
                continue;
            }
            let unlocked = |end: Option<ItemId>| {
                end.and_then(|e| self.graph.item(e)).is_some_and(|i| !i.locked())
            };
            if unlocked(item.start_item) || unlocked(item.end_item) {
                self.graph.remove(id);
            }
        }

        for id in selected {
            if let Some(item) = self.graph.item(id)
                && !item.is_connector()
                && !item.locked()
            {
                self.graph.remove(id);
            }
        }

        self.mark_dirty("Delete");
        self.refresh.request_all();
        self.restore_default();
    }

    pub fn duplicate_selected(&mut self) {
        let created = duplicate_selected(&mut self.graph, &mut self.dup_count);
        if !created.is_empty() {
            self.mark_dirty("Duplication");
            self.refresh.request_all();
        }
    }

    fn lock_selected(&mut self, locked: bool) {
        for id in selected_items(&self.graph) {
            if let Some(item) = self.graph.item_mut(id)
                && (item.is_node() || item.is_subnet())
            {
                item.set_locked(locked);
            }
        }
        self.refresh.request_canvas();
    }

    /// Snap every node, subnet and annotation to the virtual grid.
    pub fn snap_all(&mut self) {
        for layer in [
            &mut self.graph.subnets,
            &mut self.graph.nodes,
            &mut self.graph.annotations,
        ] {
            for item in layer.iter_mut() {
                item.snap_to_grid(ns_core::graph::grid_snap);
            }
        }
        self.mark_dirty("Snap");
        self.refresh.request_canvas();
        self.restore_default();
    }

    pub fn delete_all(&mut self) {
        self.graph.clear();
        self.mark_dirty("DeleteAll");
        self.refresh.request_all();
    }

    // ─── Persistence ─────────────────────────────────────────────────────────

    pub fn document_json(&mut self) -> String {
        let map_name = self.settings.map_name.clone().unwrap_or_default();
        document::serialize(&mut self.graph, &map_name, self.settings.show_grid)
    }

    pub fn save(&mut self, store: &mut dyn KeyValueStore) {
        let json = self.document_json();
        store.set(DOCUMENT_KEY, &json);
        // named maps keep a snapshot under their own key too
        if let Some(name) = self.settings.map_name.as_deref()
            && !name.is_empty()
        {
            store.set(name, &json);
        }
        self.dirty = false;
    }

    pub fn reload(&mut self, store: &mut dyn KeyValueStore) {
        let Some(json) = store.get(DOCUMENT_KEY) else {
            return;
        };
        match document::load(&mut self.graph, &json) {
            Ok(settings) => {
                self.settings = settings;
                self.dirty = false;
                self.notices.push(Notice::SelectionChanged);
                self.refresh.request_all();
            }
            Err(err) => log::warn!("stored document failed to load: {err}"),
        }
    }

    // ─── State upkeep ────────────────────────────────────────────────────────

    /// Back to the pointer tool and the idle state.
    fn restore_default(&mut self) {
        self.state = EditorState::Idle;
        self.tool = Tool::Pointer;
    }

    fn mark_dirty(&mut self, operation: &'static str) {
        self.dirty = true;
        self.notices.push(Notice::Dirty(operation));
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
