//! Painting the scene.
//!
//! The paint order is deliberate: connectors that run between two
//! subnets are drawn after the subnet bodies so they stay visible,
//! while ordinary connectors go underneath everything. Nodes and text
//! always draw on top of subnets.

use ns_core::geometry::Rect;
use ns_core::item::SceneItem;
use ns_core::property::keys;
use ns_core::{ItemType, LineStyle, SceneGraph, SubnetShape};

use crate::handles::{connector_handles, subnet_handles};
use crate::surface::{Font, Pen, Surface};

pub const GRID_COLOR: &str = "#efefef";
pub const ANNOTATION_COLOR: &str = "#444444";
pub const SELECTED_BORDER_COLOR: &str = "#ff0000";
pub const RESHAPE_FILL: &str = "rgba(95%,85%,85%,0.25)";
pub const RESHAPE_BORDER: &str = "#555555";

/// Vertical advance per annotation line, relative to the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy)]
pub struct PaintOptions {
    pub show_grid: bool,
    /// A drag is live; resize handles are skipped to keep redraw cheap.
    pub dragging: bool,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self { show_grid: true, dragging: false }
    }
}

/// Paint the whole scene in layer order.
pub fn paint_scene(surface: &mut dyn Surface, graph: &SceneGraph, options: &PaintOptions) {
    if options.show_grid {
        draw_grid(surface);
    }

    for connector in graph.connectors.iter().filter(|c| !connected_to_subnet(graph, c)) {
        draw_connector(surface, graph, connector);
    }
    for subnet in graph.subnets.iter() {
        draw_subnet(surface, subnet);
    }
    for connector in graph.connectors.iter().filter(|c| connected_to_subnet(graph, c)) {
        draw_connector(surface, graph, connector);
    }
    for node in graph.nodes.iter() {
        draw_node(surface, node);
    }
    for text in graph.annotations.iter() {
        draw_text_item(surface, text);
    }

    if !options.dragging {
        draw_selected_handles(surface, graph);
    }
}

/// Does this connector run between two subnets? Those draw above the
/// subnet bodies instead of below.
fn connected_to_subnet(graph: &SceneGraph, connector: &SceneItem) -> bool {
    let is_subnet = |id| graph.item(id).is_some_and(|i| i.is_subnet());
    connector.start_item.is_some_and(is_subnet) && connector.end_item.is_some_and(is_subnet)
}

/// The background grid, aiming for 1cm spacing on screen.
fn draw_grid(surface: &mut dyn Surface) {
    let del = 96.0 * surface.dpi() / 2.54;
    let scale = surface.scale();
    let delx = del / scale.x;
    let dely = del / scale.y;

    let width = surface.canvas_width();
    let height = surface.canvas_height();
    let pen = Pen::new(GRID_COLOR, 0.0);

    let nrow = (height / dely).ceil() as i64;
    for row in 1..=nrow {
        let y = dely * row as f64;
        surface.draw_line(0.0, y, width, y, &pen);
    }

    let ncol = (width / delx).ceil() as i64;
    for col in 1..=ncol {
        let x = delx * col as f64;
        surface.draw_line(x, 0.0, x, height, &pen);
    }
}

fn draw_connector(surface: &mut dyn Surface, graph: &SceneGraph, connector: &SceneItem) {
    let Some((start, end)) = graph.connector_endpoints(connector.id()) else {
        return;
    };
    if !start.x.is_finite() || !start.y.is_finite() || !end.x.is_finite() || !end.y.is_finite() {
        log::warn!("skipping connector {} with non-finite endpoints", connector.id());
        return;
    }

    let style = if connector.selected { LineStyle::Dashed } else { connector.line_style() };
    let pen = Pen::with_style(connector.foreground(), connector.line_width(), style);
    surface.draw_line(start.x, start.y, end.x, end.y, &pen);
}

fn draw_subnet(surface: &mut dyn Surface, subnet: &SceneItem) {
    let b = subnet.bounds();
    if !b.is_finite() {
        log::warn!("skipping subnet {} with non-finite bounds", subnet.id());
        return;
    }

    // a subnet mid-reshape paints as a washed-out preview
    let (fill, pen) = if subnet.reshaping {
        (RESHAPE_FILL, Pen::new(RESHAPE_BORDER, subnet.line_width()))
    } else {
        (
            subnet.background(),
            Pen::with_style(subnet.foreground(), subnet.line_width(), subnet.line_style()),
        )
    };

    match subnet.shape() {
        SubnetShape::Rectangle => surface.draw_rect(b, fill, &pen),
        SubnetShape::Ellipse => {
            surface.draw_ellipse(b.xc(), b.yc(), b.width / 2.0, b.height / 2.0, fill, &pen)
        }
        SubnetShape::Cloud => surface.draw_image(b, "cloud_Net"),
    }

    draw_subnet_name(surface, subnet);
    draw_properties_below(surface, subnet, Font::new("Roboto", 12.0));
    draw_selection_border(surface, subnet);
}

/// The subnet's name sits centered just above the top edge, with a
/// small lock glyph to its left when the subnet is locked.
fn draw_subnet_name(surface: &mut dyn Surface, subnet: &SceneItem) {
    let Some(name) = subnet.props().get(keys::NAME) else {
        return;
    };
    if !name.displayed_on_canvas() || name.value.trim().is_empty() {
        return;
    }

    let font = Font::new("Roboto", 12.0);
    let b = subnet.bounds();
    let width = surface.text_width(&name.value, &font);
    let y = b.y - 4.0;
    surface.draw_text(b.xc() - width / 2.0, y, &name.value, &font, ANNOTATION_COLOR);

    if subnet.locked() {
        let fheight = LINE_HEIGHT_FACTOR * font.size;
        let lock = Rect::new(b.xc() - width / 2.0 - 13.0, y - fheight + 4.0, 12.0, 12.0);
        surface.draw_image(lock, "black_lock");
    }
}

fn draw_node(surface: &mut dyn Surface, node: &SceneItem) {
    let b = node.bounds();
    if !b.is_finite() {
        log::warn!("skipping node {} with non-finite bounds", node.id());
        return;
    }
    if let Some(icon) = node.props().value(keys::ICON) {
        surface.draw_image(b, icon);
    }

    let font = Font::default();
    let fheight = LINE_HEIGHT_FACTOR * font.size;
    let mut y = b.bottom() + fheight + 1.0;

    if let Some(name) = node.props().get(keys::NAME)
        && name.displayed_on_canvas()
        && !name.value.trim().is_empty()
    {
        let width = surface.text_width(&name.value, &font);
        surface.draw_text(b.xc() - width / 2.0, y, &name.value, &font, ANNOTATION_COLOR);
        y += fheight + 1.0;
    }

    draw_displayed_values(surface, node, &font, y);
    draw_selection_border(surface, node);
}

/// Any other canvas-displayed property values stack below the item.
fn draw_properties_below(surface: &mut dyn Surface, item: &SceneItem, font: Font) {
    let fheight = LINE_HEIGHT_FACTOR * font.size;
    let y = item.bounds().bottom() + fheight + 1.0;
    draw_displayed_values(surface, item, &font, y);
}

fn draw_displayed_values(surface: &mut dyn Surface, item: &SceneItem, font: &Font, mut y: f64) {
    let xc = item.bounds().xc();
    let fheight = LINE_HEIGHT_FACTOR * font.size;

    let values: Vec<String> = item
        .props()
        .iter()
        .filter(|p| p.displayed_on_canvas() && !p.is_name())
        .map(|p| p.value.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect();

    for value in values {
        let width = surface.text_width(&value, font);
        surface.draw_text(xc - width / 2.0, y, &value, font, ANNOTATION_COLOR);
        y += fheight + 1.0;
    }
}

fn draw_text_item(surface: &mut dyn Surface, item: &SceneItem) {
    if !item.bounds().is_finite() {
        log::warn!("skipping text item {} with non-finite bounds", item.id());
        return;
    }
    let Some(text) = item.props().value(keys::TEXT) else {
        return;
    };
    let text = text.to_owned();

    let font = text_font(item);
    let margin_h = item.props().value_f64(keys::MARGIN_H).unwrap_or(2.0);
    let margin_v = item.props().value_f64(keys::MARGIN_V).unwrap_or(2.0);
    let gap = 0.2 * font.size;

    let b = size_text_bounds(surface, item);
    let x = b.x + margin_h;
    let mut y = b.y + margin_v;
    let color = item.foreground().to_owned();

    for line in text.split('\n') {
        y += font.size;
        surface.draw_text(x, y, line, &font, &color);
        y += gap;
    }

    draw_selection_border(surface, item);
}

fn text_font(item: &SceneItem) -> Font {
    Font::new(
        item.props().value(keys::FONT_FAMILY).unwrap_or("Roboto"),
        item.props().value_f64(keys::FONT_SIZE).unwrap_or(14.0),
    )
}

/// The rect a text item occupies: its anchor plus margins around the
/// measured text block.
pub fn size_text_bounds(surface: &dyn Surface, item: &SceneItem) -> Rect {
    let b = item.bounds();
    let Some(text) = item.props().value(keys::TEXT) else {
        return b;
    };

    let font = text_font(item);
    let margin_h = item.props().value_f64(keys::MARGIN_H).unwrap_or(2.0);
    let margin_v = item.props().value_f64(keys::MARGIN_V).unwrap_or(2.0);
    let gap = 0.2 * font.size;

    let lines: Vec<&str> = text.split('\n').collect();
    let max_width = lines
        .iter()
        .map(|line| surface.text_width(line, &font))
        .fold(0.0, f64::max);

    let width = 2.0 * margin_h + max_width;
    let height = 2.0 * margin_v + lines.len() as f64 * (font.size + gap);
    Rect::new(b.x, b.y, width, height)
}

/// Write the measured text rects back into the annotation items, so
/// hit testing and band selection see what was painted.
pub fn sync_text_bounds(surface: &dyn Surface, graph: &mut SceneGraph) {
    let sized: Vec<(ns_core::ItemId, Rect)> = graph
        .annotations
        .iter()
        .map(|item| (item.id(), size_text_bounds(surface, item)))
        .collect();
    for (id, bounds) in sized {
        if let Some(item) = graph.item_mut(id) {
            item.set_bounds(bounds);
        }
    }
}

fn draw_selection_border(surface: &mut dyn Surface, item: &SceneItem) {
    if item.selected || item.editing {
        let pen = Pen::new(SELECTED_BORDER_COLOR, 2.0);
        surface.draw_rect(item.bounds(), "none", &pen);
    }
}

/// Resize handles on selected subnets, reconnect handles on selected
/// connectors. Black outline, white fill.
fn draw_selected_handles(surface: &mut dyn Surface, graph: &SceneGraph) {
    let scale = surface.scale();
    let pen = Pen::new("black", 1.0);

    for subnet in graph.subnets.iter().filter(|s| s.selected && s.bounds().is_finite()) {
        for handle in subnet_handles(subnet, scale) {
            surface.draw_rect(handle, "white", &pen);
        }
    }

    for connector in graph.connectors.iter().filter(|c| c.selected) {
        if let Some((start, end)) = graph.connector_endpoints(connector.id())
            && start.x.is_finite()
            && start.y.is_finite()
            && end.x.is_finite()
            && end.y.is_finite()
        {
            for handle in connector_handles(start, end, scale) {
                surface.draw_rect(handle, "white", &pen);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use ns_core::geometry::Point;
    use ns_core::item::CONNECTOR_LINE_COLOR;
    use pretty_assertions::assert_eq;

    fn painted(graph: &SceneGraph, options: &PaintOptions) -> RecordingSurface {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        paint_scene(&mut surface, graph, options);
        surface
    }

    #[test]
    fn grid_covers_the_canvas_in_cm_steps() {
        let graph = SceneGraph::new();
        let surface = painted(&graph, &PaintOptions::default());
        // 800 / (96 / 2.54) = 21.2 columns, 600 / (96 / 2.54) = 15.9 rows
        assert_eq!(surface.lines().count(), 38);

        let surface = painted(&graph, &PaintOptions { show_grid: false, dragging: false });
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn subnet_connectors_paint_above_subnet_bodies() {
        let mut graph = SceneGraph::new();
        let left = graph.add_subnet(Rect::new(0.0, 0.0, 100.0, 100.0), SubnetShape::Rectangle);
        let right =
            graph.add_subnet(Rect::new(300.0, 0.0, 100.0, 100.0), SubnetShape::Rectangle);
        let node = graph.add_node(Point::new(200.0, 300.0), "router");
        graph.add_connector(left, right).unwrap();
        graph.add_connector(left, node).unwrap();

        let surface =
            painted(&graph, &PaintOptions { show_grid: false, dragging: false });

        let index_of = |pred: &dyn Fn(&DrawOp) -> bool| {
            surface.ops.iter().position(|op| pred(op)).unwrap()
        };
        let subnet_body = index_of(&|op| {
            matches!(op, DrawOp::Rect { color, .. } if color != GRID_COLOR)
        });
        let connector_lines: Vec<usize> = surface
            .ops
            .iter()
            .enumerate()
            .filter(|(_, op)| {
                matches!(op, DrawOp::Line { color, .. } if color == CONNECTOR_LINE_COLOR)
            })
            .map(|(i, _)| i)
            .collect();

        assert_eq!(connector_lines.len(), 2);
        // node connector below the subnets, subnet-to-subnet above
        assert!(connector_lines[0] < subnet_body);
        assert!(connector_lines[1] > subnet_body);
    }

    #[test]
    fn selected_connectors_go_dashed() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(Point::new(100.0, 100.0), "router");
        let b = graph.add_node(Point::new(400.0, 100.0), "switch");
        let connector = graph.add_connector(a, b).unwrap();
        graph.item_mut(connector).unwrap().selected = true;

        let surface = painted(&graph, &PaintOptions { show_grid: false, dragging: false });
        let dashed = surface.ops.iter().any(|op| {
            matches!(op, DrawOp::Line { style: LineStyle::Dashed, color, .. }
                if color == CONNECTOR_LINE_COLOR)
        });
        assert!(dashed);
    }

    #[test]
    fn handles_are_skipped_while_dragging() {
        let mut graph = SceneGraph::new();
        let subnet = graph.add_subnet(Rect::new(0.0, 0.0, 100.0, 100.0), SubnetShape::Rectangle);
        graph.item_mut(subnet).unwrap().selected = true;

        let options = PaintOptions { show_grid: false, dragging: false };
        let idle = painted(&graph, &options);
        let dragging =
            painted(&graph, &PaintOptions { show_grid: false, dragging: true });

        let handle_count = |s: &RecordingSurface| {
            s.ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Rect { fill, .. } if fill == "white"))
                .count()
        };
        assert_eq!(handle_count(&idle), 4);
        assert_eq!(handle_count(&dragging), 0);
    }

    #[test]
    fn text_bounds_follow_the_text() {
        let mut graph = SceneGraph::new();
        let id = graph.add_text(10.0, 31.0);
        graph
            .item_mut(id)
            .unwrap()
            .props_mut()
            .set(keys::TEXT, "one\nlonger line");

        let surface = RecordingSurface::new(800.0, 600.0);
        let bounds = size_text_bounds(&surface, graph.item(id).unwrap());
        // widest line is 11 chars at 6px, plus 2px margins each side
        assert_eq!(bounds.width, 70.0);
        // two lines of 14px plus 20% gap, plus margins
        assert_eq!(bounds.height, 2.0 * 2.0 + 2.0 * (14.0 + 2.8));

        sync_text_bounds(&surface, &mut graph);
        assert_eq!(graph.item(id).unwrap().bounds(), bounds);
    }

    #[test]
    fn non_finite_bounds_never_reach_the_surface() {
        let mut graph = SceneGraph::new();
        // a loaded document can carry literal "NaN"/"inf" geometry
        let node = graph.add_node(Point::new(100.0, 100.0), "router");
        graph.item_mut(node).unwrap().props_mut().set(keys::LEFT, "NaN");
        let subnet = graph.add_subnet(Rect::new(0.0, 0.0, 100.0, 100.0), SubnetShape::Rectangle);
        let subnet = graph.item_mut(subnet).unwrap();
        subnet.props_mut().set(keys::TOP, "inf");
        subnet.selected = true;
        let text = graph.add_text(10.0, 30.0);
        graph.item_mut(text).unwrap().props_mut().set(keys::WIDTH, "NaN");

        let surface = painted(&graph, &PaintOptions { show_grid: false, dragging: false });
        assert_eq!(surface.ops, vec![]);
    }

    #[test]
    fn cloud_subnets_paint_as_images() {
        let mut graph = SceneGraph::new();
        graph.add_subnet(Rect::new(0.0, 0.0, 200.0, 120.0), SubnetShape::Cloud);
        let surface = painted(&graph, &PaintOptions { show_grid: false, dragging: false });
        assert!(surface.ops.iter().any(|op| {
            matches!(op, DrawOp::Image { image_id, .. } if image_id == "cloud_Net")
        }));
    }
}
