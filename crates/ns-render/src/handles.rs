//! Resize and reconnect handle geometry, shared by the painter and the
//! hit tester. Handles are specified in screen pixels, so the rects
//! shrink as the canvas zooms in.

use ns_core::geometry::{Point, Rect};
use ns_core::item::{HANDLE_SIZE, SceneItem, SubnetShape};

use crate::surface::Scale;

/// The four resize handles of a subnet, indexed the way the reshape
/// math expects: 0 top-left, 1 top-right, 2 bottom-right, 3 bottom-left
/// for rectangles and clouds. Ellipses put them at the edge midpoints
/// (top, right, bottom, left) where the outline actually passes.
pub fn subnet_handles(item: &SceneItem, scale: Scale) -> [Rect; 4] {
    let b = item.bounds();
    let w = HANDLE_SIZE / scale.x;
    let h = HANDLE_SIZE / scale.y;

    match item.shape() {
        SubnetShape::Ellipse => [
            Rect::new(b.xc() - w / 2.0, b.y, w, h),
            Rect::new(b.right() - w, b.yc() - h / 2.0, w, h),
            Rect::new(b.xc() - w / 2.0, b.bottom() - h, w, h),
            Rect::new(b.x, b.yc() - h / 2.0, w, h),
        ],
        SubnetShape::Rectangle | SubnetShape::Cloud => [
            Rect::new(b.x, b.y, w, h),
            Rect::new(b.right() - w, b.y, w, h),
            Rect::new(b.right() - w, b.bottom() - h, w, h),
            Rect::new(b.x, b.bottom() - h, w, h),
        ],
    }
}

/// The two reconnect handles of a connector, sitting at 10% and 90% of
/// the way along the line.
pub fn connector_handles(start: Point, end: Point, scale: Scale) -> [Rect; 2] {
    let w = HANDLE_SIZE / scale.x;
    let h = HANDLE_SIZE / scale.y;

    let at = |t: f64| {
        let x = start.x + t * (end.x - start.x);
        let y = start.y + t * (end.y - start.y);
        Rect::new(x - w / 2.0, y - h / 2.0, w, h)
    };
    [at(0.1), at(0.9)]
}
