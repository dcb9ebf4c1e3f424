pub mod document;
pub mod geometry;
pub mod graph;
pub mod item;
pub mod layer;
pub mod property;

pub use document::{GlobalSettings, LoadError};
pub use geometry::{Point, Rect, SegmentHit, perpendicular_distance};
pub use graph::{SceneGraph, VIRTUAL_GRID_SIZE, grid_snap};
pub use item::{HANDLE_SIZE, ItemId, ItemType, LineStyle, SceneItem, SubnetShape};
pub use layer::{Layer, LayerKind};
pub use property::{Property, PropertyBits, PropertySet, keys};
