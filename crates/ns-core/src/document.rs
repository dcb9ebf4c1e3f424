//! Document persistence: a flat JSON list of property records.
//!
//! One global record carries the map name and grid flag; every other
//! record is one item's property set. Items reference each other only
//! by GUID in this format, so loading is two-phase: create the items,
//! then resolve connector endpoints through a GUID lookup.

use thiserror::Error;

use crate::graph::SceneGraph;
use crate::item::ItemType;
use crate::property::{PropertySet, keys};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The per-document (as opposed to per-item) settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    /// Absent in documents saved before maps had names.
    pub map_name: Option<String>,
    pub show_grid: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self { map_name: None, show_grid: true }
    }
}

/// All records, global first, items in layer order: connectors,
/// subnets, nodes, annotations.
pub fn to_records(graph: &SceneGraph, map_name: &str, show_grid: bool) -> Vec<PropertySet> {
    let mut records = Vec::with_capacity(graph.len() + 1);

    let mut global = PropertySet::new();
    global.set_global(map_name, show_grid);
    records.push(global);

    for item in graph.all_items() {
        records.push(item.props().clone());
    }
    records
}

/// Serialize the scene to pretty-printed JSON. Connector bounds are
/// refreshed first so the document carries current geometry.
pub fn serialize(graph: &mut SceneGraph, map_name: &str, show_grid: bool) -> String {
    graph.refresh_connector_bounds();
    let records = to_records(graph, map_name, show_grid);
    match serde_json::to_string_pretty(&records) {
        Ok(json) => json,
        Err(err) => {
            log::error!("document serialization failed: {err}");
            String::new()
        }
    }
}

/// Replace the scene with the document in `json`.
///
/// The scene is cleared before parsing, so a malformed document leaves
/// it empty. Items are created in a fixed order (nodes, subnets,
/// connectors, annotations) so that connector endpoints can resolve. A
/// connector whose endpoint GUID resolves to nothing is dropped with a
/// warning; the rest of the document still loads.
pub fn load(graph: &mut SceneGraph, json: &str) -> Result<GlobalSettings, LoadError> {
    graph.clear();
    let records: Vec<PropertySet> = serde_json::from_str(json)?;

    let mut settings = GlobalSettings::default();
    let mut nodes = Vec::new();
    let mut subnets = Vec::new();
    let mut connectors = Vec::new();
    let mut texts = Vec::new();

    for record in records {
        if record.is_global() {
            settings.map_name = record.value(keys::MAP_NAME).map(str::to_owned);
            if let Some(flag) = record.value(keys::SHOW_GRID) {
                settings.show_grid = flag.trim().eq_ignore_ascii_case("true");
            }
            continue;
        }

        match record.value(keys::TYPE).map(ItemType::parse) {
            Some(Some(ItemType::Node)) => nodes.push(record),
            Some(Some(ItemType::NodeBox)) => subnets.push(record),
            Some(Some(ItemType::LineConnector)) => connectors.push(record),
            Some(Some(ItemType::Text)) => texts.push(record),
            Some(None) => {
                log::warn!(
                    "skipping record with unknown item type {:?}",
                    record.value(keys::TYPE).unwrap_or_default()
                );
            }
            None => log::warn!("skipping record with no item type"),
        }
    }

    for props in nodes {
        graph.add_record(ItemType::Node, props);
    }
    for props in subnets {
        graph.add_record(ItemType::NodeBox, props);
    }
    for props in connectors {
        let start = props.value(keys::START_GUID).and_then(|g| graph.from_guid(g));
        let end = props.value(keys::END_GUID).and_then(|g| graph.from_guid(g));
        match (start, end) {
            (Some(start), Some(end)) => {
                let id = graph.add_record(ItemType::LineConnector, props);
                if let Some(connector) = graph.item_mut(id) {
                    connector.start_item = Some(start);
                    connector.end_item = Some(end);
                }
            }
            _ => {
                log::warn!(
                    "dropping connector {:?}: endpoint guid did not resolve",
                    props.value(keys::GUID).unwrap_or_default()
                );
            }
        }
    }
    for props in texts {
        graph.add_record(ItemType::Text, props);
    }

    graph.recompute_all_memberships();
    Ok(settings)
}
