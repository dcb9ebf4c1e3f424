//! Selection bookkeeping on top of the hit tester.

use ns_core::geometry::Rect;
use ns_core::item::ItemId;
use ns_core::SceneGraph;
use ns_render::Hit;

use crate::input::Modifiers;

/// Apply a pointer-down hit to the selection.
///
/// No hit clears the selection. Hitting an already-selected item
/// changes nothing (so a drag of a multi-selection can start on any of
/// its members). Otherwise the item is selected, joining the existing
/// selection only when a modifier key is held.
pub fn update_selection(graph: &mut SceneGraph, hit: Option<Hit>, modifiers: Modifiers) -> Option<Hit> {
    let Some(hit) = hit else {
        unselect_all(graph);
        return None;
    };

    let already = graph.item(hit.id).is_some_and(|i| i.selected);
    if already {
        return Some(hit);
    }

    if !modifiers.any() {
        unselect_all(graph);
    }
    if let Some(item) = graph.item_mut(hit.id) {
        item.selected = true;
    }
    Some(hit)
}

/// Band selection: select everything fully inside the band. Connectors
/// are never band-selected; they follow their endpoints.
pub fn band_select(graph: &mut SceneGraph, band: &Rect, modifiers: Modifiers) -> Vec<ItemId> {
    if !modifiers.any() {
        unselect_all(graph);
    }

    let mut contained = Vec::new();
    contained.extend(graph.nodes.items_inside(band));
    contained.extend(graph.subnets.items_inside(band));
    contained.extend(graph.annotations.items_inside(band));

    for &id in &contained {
        if let Some(item) = graph.item_mut(id) {
            item.selected = true;
        }
    }
    contained
}

pub fn unselect_all(graph: &mut SceneGraph) {
    graph.nodes.unselect_all();
    graph.subnets.unselect_all();
    graph.annotations.unselect_all();
    graph.connectors.unselect_all();
}

pub fn select_all(graph: &mut SceneGraph) {
    graph.nodes.select_all();
    graph.subnets.select_all();
    graph.connectors.select_all();
    graph.annotations.select_all();
}

/// Selected items, subnets first so dragging moves containers before
/// their contents.
pub fn selected_items(graph: &SceneGraph) -> Vec<ItemId> {
    let mut items: Vec<ItemId> = graph.subnets.selected().map(|i| i.id()).collect();
    items.extend(graph.nodes.selected().map(|i| i.id()));
    items.extend(graph.connectors.selected().map(|i| i.id()));
    items.extend(graph.annotations.selected().map(|i| i.id()));
    items
}

pub fn any_selected(graph: &SceneGraph, skip_locked: bool) -> bool {
    graph
        .layers()
        .iter()
        .any(|layer| layer.selected().any(|i| !skip_locked || !i.locked()))
}
