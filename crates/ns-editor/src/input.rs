//! Pointer input and the toolbar's tool set.

use ns_core::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, alt: false, meta: false };

    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// One pointer event in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, modifiers: Modifiers::default() }
    }

    pub fn with_modifiers(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self { x, y, modifiers }
    }

    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Node icons the toolbar can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIcon {
    WebService,
    Router,
    Wireless,
    Plc,
    Workstation,
    Server,
    Switch,
    Laptop,
    Cloud,
    Printer,
    Firewall,
    Mirror,
}

impl NodeIcon {
    pub fn image_id(self) -> &'static str {
        match self {
            NodeIcon::WebService => "web_service",
            NodeIcon::Router => "router",
            NodeIcon::Wireless => "wireless",
            NodeIcon::Plc => "plc",
            NodeIcon::Workstation => "workstation",
            NodeIcon::Server => "server",
            NodeIcon::Switch => "switch",
            NodeIcon::Laptop => "laptop",
            NodeIcon::Cloud => "cloud",
            NodeIcon::Printer => "printer",
            NodeIcon::Firewall => "firewall",
            NodeIcon::Mirror => "mirror",
        }
    }
}

/// The active toolbar tool. Everything except `Pointer` is one-shot:
/// after the gesture completes the toolbar snaps back to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pointer,
    Connector,
    Subnet,
    Text,
    Pan,
    Place(NodeIcon),
}
