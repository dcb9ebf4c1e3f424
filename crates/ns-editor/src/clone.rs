//! Duplicating the selection.

use std::collections::HashMap;

use ns_core::item::ItemId;
use ns_core::property::keys;
use ns_core::SceneGraph;

use crate::selection::selected_items;

/// Step, in drawing units, between successive duplicates.
const DUP_STEP: f64 = 30.0;

/// Duplicate everything selected.
///
/// A selected subnet brings all of its member nodes along, selected or
/// not, and members of a selected subnet are skipped on their own so
/// they are not copied twice. Connectors are never cloned directly: a
/// connection is re-established wherever both of its endpoints were
/// duplicated. Returns the new items.
///
/// `dup_count` cycles 0..16 and fans successive duplicates out around
/// the originals instead of piling them on one spot.
pub fn duplicate_selected(graph: &mut SceneGraph, dup_count: &mut u32) -> Vec<ItemId> {
    let mut items: Vec<ItemId> = selected_items(graph)
        .into_iter()
        .filter(|&id| graph.item(id).is_some_and(|i| !i.is_connector()))
        .collect();
    if items.is_empty() {
        return Vec::new();
    }

    // members of selected subnets get cloned with their subnet
    let carried: Vec<ItemId> = items
        .iter()
        .filter(|&&id| graph.item(id).is_some_and(|i| i.is_subnet()))
        .flat_map(|&subnet| {
            graph
                .nodes
                .iter()
                .filter(move |n| n.subnet == Some(subnet))
                .map(|n| n.id())
                .collect::<Vec<_>>()
        })
        .collect();
    items.retain(|id| !carried.contains(id));

    let (dx, dy) = offset(*dup_count);
    *dup_count = (*dup_count + 1) % 16;

    let mut clones: HashMap<ItemId, ItemId> = HashMap::new();
    let mut created = Vec::new();

    for id in items {
        let Some(copy) = graph.clone_item(id, dx, dy) else {
            continue;
        };
        clones.insert(id, copy);
        created.push(copy);

        // a subnet clones its members too, selected or not
        if graph.item(copy).is_some_and(|i| i.is_subnet()) {
            let members: Vec<ItemId> = graph
                .nodes
                .iter()
                .filter(|n| n.subnet == Some(id))
                .map(|n| n.id())
                .collect();
            for member in members {
                if let Some(member_copy) = graph.clone_item(member, dx, dy) {
                    clones.insert(member, member_copy);
                    created.push(member_copy);
                }
            }
        }
    }

    // re-establish connections between clone pairs
    let connectors: Vec<(ItemId, ItemId, String)> = graph
        .connectors
        .iter()
        .filter_map(|c| Some((c.start_item?, c.end_item?, c.foreground().to_owned())))
        .collect();
    for (start, end, color) in connectors {
        if let (Some(&new_start), Some(&new_end)) = (clones.get(&start), clones.get(&end))
            && let Some(connector) = graph.add_connector(new_start, new_end)
            && let Some(item) = graph.item_mut(connector)
        {
            item.props_mut().set(keys::FOREGROUND, &color);
            created.push(connector);
        }
    }

    graph.recompute_all_memberships();
    created
}

/// Fan duplicates out: 1..4 steps, flipping quadrants as the cycle
/// progresses.
fn offset(dup_count: u32) -> (f64, f64) {
    let sub_count = (1 + dup_count % 4) as f64;
    let xsign = if dup_count < 8 { 1.0 } else { -1.0 };
    let ysign = if (dup_count / 4) % 2 == 0 { 1.0 } else { -1.0 };
    (xsign * sub_count * DUP_STEP, ysign * sub_count * DUP_STEP)
}
