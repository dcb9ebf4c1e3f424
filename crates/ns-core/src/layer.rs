//! Drawing layers. The scene has exactly four, each an ordered list of
//! items. Position in the list is z-order: later items draw on top.

use crate::geometry::Rect;
use crate::item::{ItemId, SceneItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Connectors,
    Subnets,
    Nodes,
    Annotations,
}

impl LayerKind {
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Connectors => "connectors",
            LayerKind::Subnets => "subnets",
            LayerKind::Nodes => "nodes",
            LayerKind::Annotations => "annotations",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    items: Vec<SceneItem>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self { kind, items: Vec::new() }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: SceneItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, id: ItemId) -> Option<SceneItem> {
        let index = self.items.iter().position(|i| i.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut SceneItem> {
        self.items.iter_mut().find(|i| i.id() == id)
    }

    pub fn from_guid(&self, guid: &str) -> Option<&SceneItem> {
        self.items.iter().find(|i| i.guid() == guid)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SceneItem> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut SceneItem> {
        self.items.iter_mut()
    }

    /// The top-most item containing the point. Scans back to front.
    pub fn top_item_at(&self, x: f64, y: f64) -> Option<&SceneItem> {
        self.items.iter().rev().find(|i| i.contains(x, y))
    }

    /// Items whose bounds are fully inside the given rect.
    pub fn items_inside(&self, rect: &Rect) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|i| rect.contains_rect(&i.bounds()))
            .map(|i| i.id())
            .collect()
    }

    pub fn select_all(&mut self) {
        for item in &mut self.items {
            item.selected = true;
        }
    }

    pub fn unselect_all(&mut self) {
        for item in &mut self.items {
            item.selected = false;
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &SceneItem> {
        self.items.iter().filter(|i| i.selected)
    }

    pub fn any_selected(&self) -> bool {
        self.items.iter().any(|i| i.selected)
    }

    /// Move an item to the top of the z-order within this layer.
    pub fn bring_to_front(&mut self, id: ItemId) {
        if let Some(index) = self.items.iter().position(|i| i.id() == id) {
            let item = self.items.remove(index);
            self.items.push(item);
        }
    }

    /// Move an item to the bottom of the z-order within this layer.
    pub fn send_to_back(&mut self, id: ItemId) {
        if let Some(index) = self.items.iter().position(|i| i.id() == id) {
            let item = self.items.remove(index);
            self.items.insert(0, item);
        }
    }
}
