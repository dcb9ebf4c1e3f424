//! The ordered property store behind every scene item.
//!
//! Items carry their entire model state as a flat list of string
//! key/value pairs with display control bits. The list is what gets
//! serialized, so key names and bit values are pinned to the document
//! format and must not change.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Reserved property keys from the document format.
pub mod keys {
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Type";
    pub const ICON: &str = "Icon";
    pub const GUID: &str = "Guid";
    pub const TEXT: &str = "Text";
    pub const FONT_FAMILY: &str = "FontFamily";
    pub const FONT_SIZE: &str = "FontSize";
    pub const MARGIN_H: &str = "MarginH";
    pub const MARGIN_V: &str = "MarginV";
    pub const LEFT: &str = "Left";
    pub const TOP: &str = "Top";
    pub const WIDTH: &str = "Width";
    pub const HEIGHT: &str = "Height";
    pub const START_GUID: &str = "Connect1";
    pub const END_GUID: &str = "Connect2";
    pub const FOREGROUND: &str = "Foreground";
    pub const BACKGROUND: &str = "Background";
    pub const SELECT_COLOR: &str = "SelectColor";
    pub const LINE_WIDTH: &str = "LineWidth";
    pub const LINE_STYLE: &str = "LineStyle";
    pub const LOCKED: &str = "Locked";
    pub const SHAPE: &str = "Shape";

    /// Global (per document, not per item) properties.
    pub const GLOBAL_PREFIX: &str = "GLOBAL_";
    pub const MAP_NAME: &str = "GLOBAL_PicName";
    pub const SHOW_GRID: &str = "GLOBAL_ShowGrid";
}

/// Control bits governing where a property surfaces in the UI.
///
/// Serialized as a bare integer, so the bit values are part of the
/// document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBits(pub u32);

impl PropertyBits {
    pub const DISPLAYED_ON_CANVAS: PropertyBits = PropertyBits(0o1);
    pub const EDITABLE: PropertyBits = PropertyBits(0o2);
    pub const FEEDBACKABLE: PropertyBits = PropertyBits(0o4);
    pub const SHOW_IN_EDITOR: PropertyBits = PropertyBits(0o10);
    pub const NOT_DISPLAYABLE: PropertyBits = PropertyBits(0o20);

    /// All the usual features.
    pub const BASIC: PropertyBits = PropertyBits(0xFF);
    /// Everything except display on the canvas.
    pub const NOT_DISPLAYED_ON_CANVAS: PropertyBits = PropertyBits(0xFF ^ 0o1);
    pub const NOT_EDITABLE: PropertyBits =
        PropertyBits(Self::FEEDBACKABLE.0 | Self::SHOW_IN_EDITOR.0);
    /// Hidden and deprecated properties behave the same way: they show
    /// up nowhere but survive round trips.
    pub const HIDDEN: PropertyBits = PropertyBits(0);
    pub const DEPRECATED: PropertyBits = PropertyBits(0);

    pub fn contains(self, bits: PropertyBits) -> bool {
        (self.0 & bits.0) == bits.0
    }

    pub fn set(&mut self, bits: PropertyBits) {
        self.0 |= bits.0;
    }

    pub fn clear(&mut self, bits: PropertyBits) {
        self.0 &= !bits.0;
    }

    pub fn toggle(&mut self, bits: PropertyBits) {
        self.0 ^= bits.0;
    }
}

/// A single key/value pair with its control bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "ControlBits", default)]
    pub bits: PropertyBits,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>, bits: PropertyBits) -> Self {
        Self { key: key.into(), value: value.into(), bits }
    }

    /// Can this property ever appear on the canvas?
    pub fn displayable(&self) -> bool {
        !self.bits.contains(PropertyBits::NOT_DISPLAYABLE)
    }

    /// Is the property currently displayed on the canvas? The
    /// not-displayable bit always wins over the displayed bit.
    pub fn displayed_on_canvas(&self) -> bool {
        self.displayable() && self.bits.contains(PropertyBits::DISPLAYED_ON_CANVAS)
    }

    pub fn set_displayed_on_canvas(&mut self, displayed: bool) {
        if displayed {
            self.bits.set(PropertyBits::DISPLAYED_ON_CANVAS);
        } else {
            self.bits.clear(PropertyBits::DISPLAYED_ON_CANVAS);
        }
    }

    pub fn editable(&self) -> bool {
        self.bits.contains(PropertyBits::EDITABLE)
    }

    pub fn feedbackable(&self) -> bool {
        self.bits.contains(PropertyBits::FEEDBACKABLE)
    }

    pub fn show_in_editor(&self) -> bool {
        self.bits.contains(PropertyBits::SHOW_IN_EDITOR)
    }

    pub fn is_name(&self) -> bool {
        self.key == keys::NAME
    }

    pub fn is_locked(&self) -> bool {
        self.key == keys::LOCKED
    }
}

/// Display order: the name pinned to the top, the lock pinned to the
/// bottom, everything else lexicographic by key.
fn property_order(x: &Property, y: &Property) -> Ordering {
    match (x.is_name(), y.is_name()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => match (x.is_locked(), y.is_locked()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => x.key.cmp(&y.key),
        },
    }
}

/// An ordered, key-unique collection of properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    props: SmallVec<[Property; 8]>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.props.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.props.iter_mut()
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.props.iter().find(|p| p.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.props.iter_mut().find(|p| p.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|p| p.value.as_str())
    }

    pub fn value_f64(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(|v| v.trim().parse().ok())
    }

    /// Update an existing property's value. Returns false if no
    /// property with that key exists.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.get_mut(key) {
            Some(prop) => {
                prop.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Create a property, or overwrite value and bits if the key is
    /// already present. New keys re-sort the collection.
    pub fn create(&mut self, key: impl Into<String>, value: impl Into<String>, bits: PropertyBits) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(prop) => {
                prop.value = value.into();
                prop.bits = bits;
            }
            None => {
                self.props.push(Property::new(key, value, bits));
                self.sort();
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Property> {
        let index = self.props.iter().position(|p| p.key == key)?;
        Some(self.props.remove(index))
    }

    pub fn sort(&mut self) {
        self.props.sort_by(property_order);
    }

    /// Merge every property from `other`, overwriting on key collision.
    pub fn merge_from(&mut self, other: &PropertySet) {
        for prop in other.iter() {
            self.create(prop.key.clone(), prop.value.clone(), prop.bits);
        }
    }

    /// The item name, or "???" for an unnamed item.
    pub fn name(&self) -> &str {
        self.value(keys::NAME).unwrap_or("???")
    }

    /// A collection holding the map name is the document-global record
    /// rather than a per-item one.
    pub fn is_global(&self) -> bool {
        self.contains(keys::MAP_NAME)
    }

    /// Turn this collection into the document-global record.
    pub fn set_global(&mut self, map_name: &str, show_grid: bool) {
        self.create(keys::MAP_NAME, map_name, PropertyBits::HIDDEN);
        self.create(keys::SHOW_GRID, show_grid.to_string(), PropertyBits::HIDDEN);
    }
}

impl FromIterator<Property> for PropertySet {
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        let mut set = PropertySet { props: iter.into_iter().collect() };
        set.sort();
        set
    }
}
