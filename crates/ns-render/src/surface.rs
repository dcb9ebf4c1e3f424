//! The drawing surface abstraction.
//!
//! The editor never talks to a real canvas; it paints through this
//! trait. A production backend forwards each call to the host canvas.
//! `RecordingSurface` is the headless backend used by tests: it keeps
//! every draw call so assertions can inspect exactly what was painted.

use ns_core::{LineStyle, Rect};

/// Per-axis zoom factors applied by the host canvas. Handle sizes and
/// proximity thresholds are specified in screen pixels, so world-space
/// code divides (or multiplies) by these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn mean(self) -> f64 {
        (self.x + self.y) / 2.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::IDENTITY
    }
}

/// Stroke settings for a single draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: String,
    pub width: f64,
    pub style: LineStyle,
}

impl Pen {
    pub fn new(color: &str, width: f64) -> Self {
        Self { color: color.to_owned(), width, style: LineStyle::Solid }
    }

    pub fn with_style(color: &str, width: f64, style: LineStyle) -> Self {
        Self { color: color.to_owned(), width, style }
    }
}

/// Font settings for text calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
}

impl Font {
    pub fn new(family: &str, size: f64) -> Self {
        Self { family: family.to_owned(), size }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("Roboto", 9.0)
    }
}

/// Everything the painter and the gesture previews need from a canvas.
///
/// The save/restore trio backs the rubberband and connector previews:
/// the canvas pixels are saved once when a gesture starts, and each
/// preview frame restores the stale region before drawing the new one.
pub trait Surface {
    fn canvas_width(&self) -> f64;
    fn canvas_height(&self) -> f64;

    fn scale(&self) -> Scale {
        Scale::IDENTITY
    }

    /// Host device pixel ratio, used to size the background grid.
    fn dpi(&self) -> f64 {
        1.0
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, pen: &Pen);
    fn draw_rect(&mut self, rect: Rect, fill: &str, pen: &Pen);
    fn draw_ellipse(&mut self, xc: f64, yc: f64, radx: f64, rady: f64, fill: &str, pen: &Pen);
    fn draw_arc(&mut self, xc: f64, yc: f64, radius: f64, start: f64, end: f64, pen: &Pen);
    fn draw_image(&mut self, rect: Rect, image_id: &str);
    /// `angle` is in radians, about the rect center.
    fn draw_rotated_image(&mut self, rect: Rect, image_id: &str, angle: f64);
    fn draw_text(&mut self, x: f64, y: f64, text: &str, font: &Font, color: &str);

    /// Measured width of `text` in drawing units.
    fn text_width(&self, text: &str, font: &Font) -> f64;

    fn save_background(&mut self);
    fn restore_background(&mut self);
    fn restore_region(&mut self, rect: Rect);

    /// Show a message to the user (e.g. "cannot connect an item to
    /// itself").
    fn alert(&mut self, message: &str);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line { x1: f64, y1: f64, x2: f64, y2: f64, color: String, width: f64, style: LineStyle },
    Rect { rect: Rect, fill: String, color: String, width: f64, style: LineStyle },
    Ellipse { xc: f64, yc: f64, radx: f64, rady: f64, fill: String, color: String },
    Arc { xc: f64, yc: f64, radius: f64, start: f64, end: f64, color: String },
    Image { rect: Rect, image_id: String },
    RotatedImage { rect: Rect, image_id: String, angle: f64 },
    Text { x: f64, y: f64, text: String, color: String },
    SaveBackground,
    RestoreBackground,
    RestoreRegion { rect: Rect },
}

/// A surface that draws nothing. For headless hosts that want the
/// scene model without a canvas.
#[derive(Debug, Clone, Copy)]
pub struct NullSurface {
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl NullSurface {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self { canvas_width, canvas_height }
    }
}

impl Surface for NullSurface {
    fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    fn draw_line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, _pen: &Pen) {}
    fn draw_rect(&mut self, _rect: Rect, _fill: &str, _pen: &Pen) {}
    fn draw_ellipse(&mut self, _xc: f64, _yc: f64, _rx: f64, _ry: f64, _fill: &str, _pen: &Pen) {}
    fn draw_arc(&mut self, _xc: f64, _yc: f64, _r: f64, _start: f64, _end: f64, _pen: &Pen) {}
    fn draw_image(&mut self, _rect: Rect, _image_id: &str) {}
    fn draw_rotated_image(&mut self, _rect: Rect, _image_id: &str, _angle: f64) {}
    fn draw_text(&mut self, _x: f64, _y: f64, _text: &str, _font: &Font, _color: &str) {}

    fn text_width(&self, _text: &str, _font: &Font) -> f64 {
        0.0
    }

    fn save_background(&mut self) {}
    fn restore_background(&mut self) {}
    fn restore_region(&mut self, _rect: Rect) {}
    fn alert(&mut self, _message: &str) {}
}

/// A surface that records instead of drawing.
#[derive(Debug)]
pub struct RecordingSurface {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub scale: Scale,
    pub dpi: f64,
    /// Width reported per character by `text_width`.
    pub char_width: f64,
    pub ops: Vec<DrawOp>,
    pub alerts: Vec<String>,
}

impl RecordingSurface {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            scale: Scale::IDENTITY,
            dpi: 1.0,
            char_width: 6.0,
            ops: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.alerts.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Image { .. }))
    }
}

impl Surface for RecordingSurface {
    fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    fn scale(&self) -> Scale {
        self.scale
    }

    fn dpi(&self) -> f64 {
        self.dpi
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, pen: &Pen) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: pen.color.clone(),
            width: pen.width,
            style: pen.style,
        });
    }

    fn draw_rect(&mut self, rect: Rect, fill: &str, pen: &Pen) {
        self.ops.push(DrawOp::Rect {
            rect,
            fill: fill.to_owned(),
            color: pen.color.clone(),
            width: pen.width,
            style: pen.style,
        });
    }

    fn draw_ellipse(&mut self, xc: f64, yc: f64, radx: f64, rady: f64, fill: &str, pen: &Pen) {
        self.ops.push(DrawOp::Ellipse {
            xc,
            yc,
            radx,
            rady,
            fill: fill.to_owned(),
            color: pen.color.clone(),
        });
    }

    fn draw_arc(&mut self, xc: f64, yc: f64, radius: f64, start: f64, end: f64, pen: &Pen) {
        self.ops.push(DrawOp::Arc { xc, yc, radius, start, end, color: pen.color.clone() });
    }

    fn draw_image(&mut self, rect: Rect, image_id: &str) {
        self.ops.push(DrawOp::Image { rect, image_id: image_id.to_owned() });
    }

    fn draw_rotated_image(&mut self, rect: Rect, image_id: &str, angle: f64) {
        self.ops.push(DrawOp::RotatedImage { rect, image_id: image_id.to_owned(), angle });
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, _font: &Font, color: &str) {
        self.ops.push(DrawOp::Text { x, y, text: text.to_owned(), color: color.to_owned() });
    }

    fn text_width(&self, text: &str, _font: &Font) -> f64 {
        self.char_width * text.chars().count() as f64
    }

    fn save_background(&mut self) {
        self.ops.push(DrawOp::SaveBackground);
    }

    fn restore_background(&mut self) {
        self.ops.push(DrawOp::RestoreBackground);
    }

    fn restore_region(&mut self, rect: Rect) {
        self.ops.push(DrawOp::RestoreRegion { rect });
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_owned());
    }
}
