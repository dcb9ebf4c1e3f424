//! Scene items: nodes, subnets, connectors, and text annotations.
//!
//! One struct with a kind tag rather than a type hierarchy. All
//! persistent state lives in the item's `PropertySet`; the struct adds
//! only runtime identity, transient interaction flags, and caches.

use std::cell::Cell;
use std::fmt;

use uuid::Uuid;

use crate::geometry::{Point, Rect};
use crate::property::{PropertyBits, PropertySet, keys};

/// Side of the square resize/connect handles, in screen pixels.
pub const HANDLE_SIZE: f64 = 12.0;

/// New nodes are square, centered on the placement point.
pub const NODE_SIZE: f64 = 48.0;

pub const DEFAULT_FILL: &str = "rgba(85%,85%,85%,0.5)";
pub const DEFAULT_NODE_FILL: &str = "rgba(75%,95%,75%,0.20)";
pub const DEFAULT_TEXT_FILL: &str = "rgba(75%,75%,95%,0.20)";
pub const DEFAULT_FOREGROUND: &str = "#000000";
pub const CONNECTOR_LINE_COLOR: &str = "#92d36e";
pub const CONNECTOR_SELECT_COLOR: &str = "#ff0000";

/// Runtime identity of a scene item. Never persisted; documents refer
/// to items by GUID instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four item kinds. The string forms are pinned by the document
/// format; `ElbowConnector` is a legacy alias accepted on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Node,
    /// A subnet box. The document format calls it `NodeBox`.
    NodeBox,
    LineConnector,
    Text,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Node => "Node",
            ItemType::NodeBox => "NodeBox",
            ItemType::LineConnector => "LineConnector",
            ItemType::Text => "Text",
        }
    }

    pub fn parse(s: &str) -> Option<ItemType> {
        match s {
            "Node" => Some(ItemType::Node),
            "NodeBox" => Some(ItemType::NodeBox),
            "LineConnector" => Some(ItemType::LineConnector),
            // old documents, before elbow connectors were retired
            "ElbowConnector" => Some(ItemType::LineConnector),
            "Text" => Some(ItemType::Text),
            _ => None,
        }
    }
}

/// Subnet outline shapes, stored as an integer code in the `Shape`
/// property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubnetShape {
    #[default]
    Rectangle,
    Ellipse,
    Cloud,
}

impl SubnetShape {
    pub fn code(self) -> i64 {
        match self {
            SubnetShape::Rectangle => 0,
            SubnetShape::Ellipse => 1,
            SubnetShape::Cloud => 2,
        }
    }

    pub fn from_code(code: i64) -> SubnetShape {
        match code {
            1 => SubnetShape::Ellipse,
            2 => SubnetShape::Cloud,
            _ => SubnetShape::Rectangle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LineStyle::Solid => "SOLID",
            LineStyle::Dashed => "DASHED",
            LineStyle::Dotted => "DOTTED",
        }
    }

    pub fn parse(s: &str) -> LineStyle {
        match s.to_ascii_uppercase().as_str() {
            "DASHED" => LineStyle::Dashed,
            "DOTTED" => LineStyle::Dotted,
            _ => LineStyle::Solid,
        }
    }
}

/// A single item on one of the scene layers.
#[derive(Debug, Clone)]
pub struct SceneItem {
    id: ItemId,
    kind: ItemType,
    props: PropertySet,

    /// Transient interaction flags, never persisted.
    pub selected: bool,
    pub editing: bool,
    pub reshaping: bool,

    /// Connector endpoints, resolved to runtime ids. `None` on
    /// anything that is not a connector.
    pub start_item: Option<ItemId>,
    pub end_item: Option<ItemId>,

    /// For nodes: the subnet that geometrically contains this node.
    /// Corrected on every membership recomputation.
    pub subnet: Option<ItemId>,

    bounds: Cell<Option<Rect>>,
}

impl SceneItem {
    fn base(id: ItemId, kind: ItemType) -> Self {
        let mut props = PropertySet::new();
        props.create(keys::GUID, Uuid::new_v4().to_string(), PropertyBits::FEEDBACKABLE);
        Self {
            id,
            kind,
            props,
            selected: false,
            editing: false,
            reshaping: false,
            start_item: None,
            end_item: None,
            subnet: None,
            bounds: Cell::new(None),
        }
    }

    fn install_bounds(&mut self, bounds: Rect) {
        let b = PropertyBits::FEEDBACKABLE;
        self.props.create(keys::LEFT, bounds.x.to_string(), b);
        self.props.create(keys::TOP, bounds.y.to_string(), b);
        self.props.create(keys::WIDTH, bounds.width.to_string(), b);
        self.props.create(keys::HEIGHT, bounds.height.to_string(), b);
    }

    /// A node centered on the placement point, styled after its icon.
    pub fn node(id: ItemId, focus: Point, icon: &str) -> Self {
        let mut item = Self::base(id, ItemType::Node);
        item.install_bounds(Rect::new(
            focus.x - NODE_SIZE / 2.0,
            focus.y - NODE_SIZE / 2.0,
            NODE_SIZE,
            NODE_SIZE,
        ));
        let fb = PropertyBits::FEEDBACKABLE;
        item.props.create(keys::BACKGROUND, DEFAULT_NODE_FILL, fb);
        item.props.create(keys::FOREGROUND, "none", fb);
        item.props.create(keys::LINE_WIDTH, "0.5", fb);
        item.props.create(keys::ICON, icon, fb);
        item.props.create(keys::TYPE, ItemType::Node.as_str(), fb);
        item.props.create(keys::NAME, icon, PropertyBits::BASIC);
        item.props.create(keys::LOCKED, "false", PropertyBits::NOT_DISPLAYABLE);
        item
    }

    pub fn subnet(id: ItemId, bounds: Rect, shape: SubnetShape) -> Self {
        let mut item = Self::base(id, ItemType::NodeBox);
        item.install_bounds(bounds);
        let fb = PropertyBits::FEEDBACKABLE;
        item.props.create(keys::TYPE, ItemType::NodeBox.as_str(), fb);
        item.props.create(keys::NAME, "Subnet", PropertyBits::BASIC);
        item.props.create(keys::BACKGROUND, DEFAULT_FILL, fb);
        item.props.create(keys::LOCKED, "false", PropertyBits::NOT_DISPLAYABLE);
        item.props.create(keys::SHAPE, shape.code().to_string(), PropertyBits::HIDDEN);
        item
    }

    /// A text annotation anchored at its top-left corner. The bounds
    /// start out degenerate; the renderer sizes them to the text.
    pub fn text(id: ItemId, left: f64, bottom: f64) -> Self {
        let mut item = Self::base(id, ItemType::Text);
        item.install_bounds(Rect::new(left, bottom - 1.0, 1.0, 1.0));
        let fb = PropertyBits::FEEDBACKABLE;
        item.props.create(keys::TYPE, ItemType::Text.as_str(), fb);
        item.props.create(keys::BACKGROUND, DEFAULT_TEXT_FILL, fb);
        item.props.create(keys::FOREGROUND, DEFAULT_FOREGROUND, fb);
        item.props.create(keys::FONT_FAMILY, "Roboto", fb);
        item.props.create(keys::FONT_SIZE, "14", PropertyBits::NOT_DISPLAYABLE);
        item.props.create(keys::MARGIN_H, "2", fb);
        item.props.create(keys::MARGIN_V, "2", fb);
        item.props.create(keys::TEXT, "Edit this text.", PropertyBits::BASIC);
        item
    }

    /// A line connector between two resolved items.
    pub fn connector(id: ItemId, start: ItemId, end: ItemId, start_guid: &str, end_guid: &str) -> Self {
        let mut item = Self::base(id, ItemType::LineConnector);
        item.install_bounds(Rect::default());
        item.start_item = Some(start);
        item.end_item = Some(end);
        let fb = PropertyBits::FEEDBACKABLE;
        item.props.create(keys::START_GUID, start_guid, fb);
        item.props.create(keys::END_GUID, end_guid, fb);
        item.props.create(keys::LINE_STYLE, LineStyle::Solid.as_str(), fb);
        item.props.create(keys::LINE_WIDTH, "1", fb);
        item.props.create(keys::FOREGROUND, CONNECTOR_LINE_COLOR, fb);
        item.props.create(keys::SELECT_COLOR, CONNECTOR_SELECT_COLOR, fb);
        item.props.create(keys::TYPE, ItemType::LineConnector.as_str(), fb);
        item.props.create(keys::NAME, ItemType::LineConnector.as_str(), PropertyBits::BASIC);
        item
    }

    /// Rebuild an item from a deserialized property record, patching
    /// up what older documents are missing. Connector endpoints are
    /// resolved separately by the document loader.
    pub fn from_props(id: ItemId, kind: ItemType, mut props: PropertySet) -> Self {
        if !props.contains(keys::GUID) {
            props.create(keys::GUID, Uuid::new_v4().to_string(), PropertyBits::FEEDBACKABLE);
        }

        match kind {
            ItemType::Node | ItemType::NodeBox => {
                if !props.contains(keys::LOCKED) {
                    props.create(keys::LOCKED, "false", PropertyBits::NOT_DISPLAYABLE);
                }
                if kind == ItemType::NodeBox && !props.contains(keys::SHAPE) {
                    // before there were shapes, every subnet was a rectangle
                    props.create(
                        keys::SHAPE,
                        SubnetShape::Rectangle.code().to_string(),
                        PropertyBits::HIDDEN,
                    );
                }
            }
            ItemType::Text => {
                // text annotations once carried a name; drop it
                props.remove(keys::NAME);
            }
            ItemType::LineConnector => {}
        }

        // elbow records normalize to line connectors
        if kind == ItemType::LineConnector {
            props.set(keys::TYPE, kind.as_str());
        }

        let mut item = Self::base(id, kind);
        item.props = props;
        item
    }

    // ─── Identity and properties ─────────────────────────────────────────────

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn item_type(&self) -> ItemType {
        self.kind
    }

    pub fn guid(&self) -> &str {
        self.props.value(keys::GUID).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.props.name()
    }

    pub fn props(&self) -> &PropertySet {
        &self.props
    }

    /// Mutable property access invalidates the cached bounds, since
    /// the caller may be writing a geometry key.
    pub fn props_mut(&mut self) -> &mut PropertySet {
        self.bounds.set(None);
        &mut self.props
    }

    pub fn is_node(&self) -> bool {
        self.kind == ItemType::Node
    }

    pub fn is_subnet(&self) -> bool {
        self.kind == ItemType::NodeBox
    }

    pub fn is_connector(&self) -> bool {
        self.kind == ItemType::LineConnector
    }

    pub fn is_text(&self) -> bool {
        self.kind == ItemType::Text
    }

    // ─── Geometry ────────────────────────────────────────────────────────────

    /// The rectangular bounds, derived from the Left/Top/Width/Height
    /// properties. Missing properties read as zero.
    pub fn bounds(&self) -> Rect {
        if let Some(b) = self.bounds.get() {
            return b;
        }
        let b = Rect::new(
            self.props.value_f64(keys::LEFT).unwrap_or(0.0),
            self.props.value_f64(keys::TOP).unwrap_or(0.0),
            self.props.value_f64(keys::WIDTH).unwrap_or(0.0),
            self.props.value_f64(keys::HEIGHT).unwrap_or(0.0),
        );
        self.bounds.set(Some(b));
        b
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.install_bounds(bounds);
        self.bounds.set(Some(bounds));
    }

    pub fn offset_by(&mut self, dx: f64, dy: f64) {
        let mut b = self.bounds();
        b.translate(dx, dy);
        self.set_bounds(b);
    }

    /// The focus point: where connectors aim. The center of the bounds.
    pub fn focus(&self) -> Point {
        self.bounds().center()
    }

    pub fn locked(&self) -> bool {
        self.props.value(keys::LOCKED).is_some_and(|v| v.contains("rue"))
    }

    /// Lock or unlock. A no-op on items without a lock property
    /// (connectors and text).
    pub fn set_locked(&mut self, locked: bool) {
        self.props.set(keys::LOCKED, if locked { "true" } else { "false" });
    }

    // ─── Style ───────────────────────────────────────────────────────────────

    pub fn line_width(&self) -> f64 {
        self.props.value_f64(keys::LINE_WIDTH).unwrap_or(1.0)
    }

    pub fn line_style(&self) -> LineStyle {
        self.props.value(keys::LINE_STYLE).map(LineStyle::parse).unwrap_or_default()
    }

    pub fn foreground(&self) -> &str {
        self.props.value(keys::FOREGROUND).unwrap_or("#ffffff")
    }

    pub fn background(&self) -> &str {
        self.props.value(keys::BACKGROUND).unwrap_or(DEFAULT_FILL)
    }

    pub fn select_color(&self) -> &str {
        self.props.value(keys::SELECT_COLOR).unwrap_or(CONNECTOR_SELECT_COLOR)
    }

    pub fn shape(&self) -> SubnetShape {
        self.props
            .value_f64(keys::SHAPE)
            .map(|c| SubnetShape::from_code(c as i64))
            .unwrap_or_default()
    }

    // ─── Containment ─────────────────────────────────────────────────────────

    /// Does the item contain the given point? Exact for ellipse
    /// subnets, rectangular for everything else. Connector bodies are
    /// a proximity test and live with the hit tester, not here.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if self.is_subnet() && self.shape() == SubnetShape::Ellipse {
            let b = self.bounds();
            let a = b.width / 2.0;
            let bb = b.height / 2.0;
            if a <= 0.0 || bb <= 0.0 {
                return false;
            }
            let xx = (x - b.xc()) / a;
            let yy = (y - b.yc()) / bb;
            return xx * xx + yy * yy < 1.0;
        }
        self.bounds().contains(x, y)
    }

    /// Does this subnet geometrically contain a node's bounds? Exact
    /// for rectangles and ellipses, approximate for clouds. Ellipses
    /// test all four corners, inset by a pixel so a node snug against
    /// the rim still counts.
    pub fn contains_bounds(&self, nb: &Rect) -> bool {
        if self.is_subnet() && self.shape() == SubnetShape::Ellipse {
            let l = nb.x + 1.0;
            let t = nb.y + 1.0;
            let r = nb.right() - 1.0;
            let b = nb.bottom() - 1.0;
            return self.contains(l, t)
                && self.contains(r, t)
                && self.contains(r, b)
                && self.contains(l, b);
        }
        self.bounds().contains_rect(nb)
    }

    // ─── Connection points ───────────────────────────────────────────────────

    /// One of the eight places a connector may attach to a subnet.
    pub fn connect_point(&self, index: usize) -> Point {
        let b = self.bounds();
        match self.shape() {
            SubnetShape::Ellipse => {
                let theta = index as f64 * std::f64::consts::FRAC_PI_4;
                Point::new(
                    b.xc() + (b.width / 2.0) * theta.cos(),
                    b.yc() + (b.height / 2.0) * theta.sin(),
                )
            }
            SubnetShape::Cloud => {
                // hand-tuned to sit on the cloud outline
                let w = b.width;
                let h = b.height;
                match index {
                    0 => Point::new(b.x + w / 10.0, b.y + h / 10.0),
                    1 => Point::new(b.xc(), b.y + h / 30.0),
                    2 => Point::new(b.right() - w / 9.0, b.y + h / 10.0),
                    3 => Point::new(b.right() - w / 30.0, b.yc()),
                    4 => Point::new(b.right() - w / 15.0, b.bottom() - h / 10.0),
                    5 => Point::new(b.xc(), b.bottom() - h / 20.0),
                    6 => Point::new(b.x + w / 15.0, b.bottom() - h / 15.0),
                    _ => Point::new(b.x + w / 40.0, b.yc()),
                }
            }
            SubnetShape::Rectangle => match index {
                0 => Point::new(b.x, b.y),
                1 => Point::new(b.xc(), b.y),
                2 => Point::new(b.right(), b.y),
                3 => Point::new(b.right(), b.yc()),
                4 => Point::new(b.right(), b.bottom()),
                5 => Point::new(b.xc(), b.bottom()),
                6 => Point::new(b.x, b.bottom()),
                _ => Point::new(b.x, b.yc()),
            },
        }
    }

    /// Where a connector aimed at `toward` should attach: the nearest
    /// of the eight connect points for subnets, the focus otherwise.
    pub fn connection_point(&self, toward: Point) -> Point {
        if !self.is_subnet() {
            return self.focus();
        }
        let mut best = self.connect_point(0);
        let mut best_dist = toward.distance_sq(best);
        for index in 1..8 {
            let cp = self.connect_point(index);
            let dist = toward.distance_sq(cp);
            if dist < best_dist {
                best = cp;
                best_dist = dist;
            }
        }
        best
    }

    // ─── Grid ────────────────────────────────────────────────────────────────

    /// Snap to the virtual grid. Nodes snap their focus; subnets and
    /// text snap every edge. Connectors follow their endpoints and
    /// never snap themselves.
    pub fn snap_to_grid(&mut self, grid: impl Fn(f64) -> f64) {
        match self.kind {
            ItemType::Node => {
                let focus = self.focus();
                let dx = grid(focus.x) - focus.x;
                let dy = grid(focus.y) - focus.y;
                self.offset_by(dx, dy);
            }
            ItemType::NodeBox | ItemType::Text => {
                let b = self.bounds();
                let left = grid(b.x);
                let top = grid(b.y);
                let right = grid(b.right());
                let bottom = grid(b.bottom());
                self.set_bounds(Rect::new(left, top, right - left, bottom - top));
            }
            ItemType::LineConnector => {}
        }
    }
}
