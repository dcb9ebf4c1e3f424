//! The scene graph: four fixed layers and the operations that keep
//! them consistent. Connectors reference other items by runtime id;
//! removal cascades so a connector never outlives an endpoint.

use uuid::Uuid;

use crate::geometry::{Point, Rect};
use crate::item::{ItemId, ItemType, SceneItem, SubnetShape};
use crate::layer::{Layer, LayerKind};
use crate::property::keys;

/// Spacing of the invisible snap grid, in drawing units.
pub const VIRTUAL_GRID_SIZE: f64 = 15.0;

/// The nearest spot on the virtual grid.
pub fn grid_snap(v: f64) -> f64 {
    let half = VIRTUAL_GRID_SIZE / 2.0;
    let lv = (v + half) as i64;
    VIRTUAL_GRID_SIZE * (lv / VIRTUAL_GRID_SIZE as i64) as f64
}

#[derive(Debug)]
pub struct SceneGraph {
    pub connectors: Layer,
    pub subnets: Layer,
    pub nodes: Layer,
    pub annotations: Layer,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            connectors: Layer::new(LayerKind::Connectors),
            subnets: Layer::new(LayerKind::Subnets),
            nodes: Layer::new(LayerKind::Nodes),
            annotations: Layer::new(LayerKind::Annotations),
            next_id: 0,
        }
    }

    fn alloc_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId::from_raw(self.next_id)
    }

    /// Layers in document (and drawing) order.
    pub fn layers(&self) -> [&Layer; 4] {
        [&self.connectors, &self.subnets, &self.nodes, &self.annotations]
    }

    pub fn len(&self) -> usize {
        self.layers().iter().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.connectors.clear();
        self.subnets.clear();
        self.nodes.clear();
        self.annotations.clear();
    }

    // ─── Item creation ───────────────────────────────────────────────────────

    pub fn add_node(&mut self, focus: Point, icon: &str) -> ItemId {
        let id = self.alloc_id();
        self.nodes.push(SceneItem::node(id, focus, icon));
        id
    }

    pub fn add_subnet(&mut self, bounds: Rect, shape: SubnetShape) -> ItemId {
        let id = self.alloc_id();
        self.subnets.push(SceneItem::subnet(id, bounds, shape));
        id
    }

    pub fn add_text(&mut self, left: f64, bottom: f64) -> ItemId {
        let id = self.alloc_id();
        self.annotations.push(SceneItem::text(id, left, bottom));
        id
    }

    /// Connect two existing items. Fails only if an endpoint is gone.
    /// Duplicate-connection policy is enforced by the caller.
    pub fn add_connector(&mut self, start: ItemId, end: ItemId) -> Option<ItemId> {
        let start_guid = self.item(start)?.guid().to_owned();
        let end_guid = self.item(end)?.guid().to_owned();
        let id = self.alloc_id();
        self.connectors.push(SceneItem::connector(id, start, end, &start_guid, &end_guid));
        Some(id)
    }

    /// Rebuild an item from a deserialized property record.
    pub fn add_record(&mut self, kind: ItemType, props: crate::property::PropertySet) -> ItemId {
        let id = self.alloc_id();
        let item = SceneItem::from_props(id, kind, props);
        match kind {
            ItemType::Node => self.nodes.push(item),
            ItemType::NodeBox => self.subnets.push(item),
            ItemType::LineConnector => self.connectors.push(item),
            ItemType::Text => self.annotations.push(item),
        }
        id
    }

    /// Clone a single non-connector item: same properties, fresh guid,
    /// offset bounds, unlocked and unselected.
    pub fn clone_item(&mut self, id: ItemId, dx: f64, dy: f64) -> Option<ItemId> {
        let source = self.item(id)?;
        if source.is_connector() {
            return None;
        }
        let kind = source.item_type();
        let props = source.props().clone();

        let new_id = self.alloc_id();
        let mut copy = SceneItem::from_props(new_id, kind, props);
        copy.props_mut().set(keys::GUID, Uuid::new_v4().to_string());
        copy.offset_by(dx, dy);
        copy.set_locked(false);
        copy.selected = false;

        match kind {
            ItemType::Node => self.nodes.push(copy),
            ItemType::NodeBox => self.subnets.push(copy),
            ItemType::Text => self.annotations.push(copy),
            ItemType::LineConnector => unreachable!(),
        }
        Some(new_id)
    }

    // ─── Lookup ──────────────────────────────────────────────────────────────

    pub fn item(&self, id: ItemId) -> Option<&SceneItem> {
        self.nodes
            .get(id)
            .or_else(|| self.subnets.get(id))
            .or_else(|| self.connectors.get(id))
            .or_else(|| self.annotations.get(id))
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut SceneItem> {
        if self.nodes.get(id).is_some() {
            return self.nodes.get_mut(id);
        }
        if self.subnets.get(id).is_some() {
            return self.subnets.get_mut(id);
        }
        if self.connectors.get(id).is_some() {
            return self.connectors.get_mut(id);
        }
        self.annotations.get_mut(id)
    }

    pub fn from_guid(&self, guid: &str) -> Option<ItemId> {
        self.nodes
            .from_guid(guid)
            .or_else(|| self.subnets.from_guid(guid))
            .or_else(|| self.connectors.from_guid(guid))
            .or_else(|| self.annotations.from_guid(guid))
            .map(|i| i.id())
    }

    pub fn all_items(&self) -> impl Iterator<Item = &SceneItem> {
        self.connectors
            .iter()
            .chain(self.subnets.iter())
            .chain(self.nodes.iter())
            .chain(self.annotations.iter())
    }

    // ─── Removal ─────────────────────────────────────────────────────────────

    /// Remove an item. Removing a non-connector first removes every
    /// connector touching it; removing a subnet clears the back
    /// references of its member nodes.
    pub fn remove(&mut self, id: ItemId) -> Option<SceneItem> {
        if let Some(connector) = self.connectors.remove(id) {
            return Some(connector);
        }

        for touching in self.connectors_touching(id) {
            self.connectors.remove(touching);
        }

        if let Some(subnet) = self.subnets.remove(id) {
            for node in self.nodes.iter_mut() {
                if node.subnet == Some(id) {
                    node.subnet = None;
                }
            }
            return Some(subnet);
        }

        self.nodes.remove(id).or_else(|| self.annotations.remove(id))
    }

    // ─── Connector topology ──────────────────────────────────────────────────

    pub fn connectors_touching(&self, id: ItemId) -> Vec<ItemId> {
        self.connectors
            .iter()
            .filter(|c| c.start_item == Some(id) || c.end_item == Some(id))
            .map(|c| c.id())
            .collect()
    }

    pub fn connector_between(&self, a: ItemId, b: ItemId) -> Option<ItemId> {
        self.connectors
            .iter()
            .find(|c| {
                (c.start_item == Some(a) && c.end_item == Some(b))
                    || (c.start_item == Some(b) && c.end_item == Some(a))
            })
            .map(|c| c.id())
    }

    pub fn connected(&self, a: ItemId, b: ItemId) -> bool {
        self.connector_between(a, b).is_some()
    }

    /// Where a connector's line starts and ends right now. Subnet
    /// endpoints attach at the nearest of their eight connect points,
    /// anything else at its focus.
    pub fn connector_endpoints(&self, id: ItemId) -> Option<(Point, Point)> {
        let connector = self.connectors.get(id)?;
        let start_item = self.item(connector.start_item?)?;
        let end_item = self.item(connector.end_item?)?;

        let start = start_item.connection_point(end_item.focus());
        let end = end_item.connection_point(start);
        Some((start, end))
    }

    /// Sync every connector's bounds properties with its endpoints,
    /// so serialized documents carry current geometry.
    pub fn refresh_connector_bounds(&mut self) {
        let ids: Vec<ItemId> = self.connectors.iter().map(|c| c.id()).collect();
        for id in ids {
            if let Some((start, end)) = self.connector_endpoints(id)
                && let Some(connector) = self.connectors.get_mut(id)
            {
                connector.set_bounds(Rect::from_points(start, end));
            }
        }
    }

    // ─── Subnet membership ───────────────────────────────────────────────────

    /// Recompute which nodes a subnet contains, fixing stale back
    /// references both ways. Returns the members. A node already
    /// claimed by another subnet is not stolen.
    pub fn recompute_membership(&mut self, subnet_id: ItemId) -> Vec<ItemId> {
        let Some(subnet) = self.subnets.get(subnet_id).cloned() else {
            return Vec::new();
        };

        let mut members = Vec::new();
        for node in self.nodes.iter_mut() {
            if subnet.contains_bounds(&node.bounds()) {
                if node.subnet.is_none() || node.subnet == Some(subnet_id) {
                    node.subnet = Some(subnet_id);
                    members.push(node.id());
                }
            } else if node.subnet == Some(subnet_id) {
                node.subnet = None;
            }
        }
        members
    }

    pub fn recompute_all_memberships(&mut self) {
        let subnet_ids: Vec<ItemId> = self.subnets.iter().map(|s| s.id()).collect();
        for id in subnet_ids {
            self.recompute_membership(id);
        }
    }

    // ─── Extents and grid ────────────────────────────────────────────────────

    /// The union of all item bounds: the rect the scene occupies.
    pub fn confines(&self) -> Rect {
        let mut confines: Option<Rect> = None;
        for item in self.all_items() {
            let bounds = if item.is_connector() {
                match self.connector_endpoints(item.id()) {
                    Some((s, e)) => Rect::from_points(s, e),
                    None => continue,
                }
            } else {
                item.bounds()
            };
            match &mut confines {
                Some(c) => c.union(&bounds),
                None => confines = Some(bounds),
            }
        }
        confines.unwrap_or_default()
    }

    /// The nearest spot on the virtual grid.
    pub fn grid_value(&self, v: f64) -> f64 {
        grid_snap(v)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
