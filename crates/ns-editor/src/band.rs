//! Rubberbanding: the live preview swept out for band selection and
//! subnet creation.
//!
//! The preview never touches the scene. The canvas pixels are saved
//! when the band starts; each frame restores the patch under the stale
//! preview and draws the new one. Ending the band restores the whole
//! background and hands back the start point.

use ns_core::geometry::{Point, Rect};
use ns_core::item::SubnetShape;
use ns_render::{Pen, Surface};

const TRANSCOLOR: [&str; 2] = ["rgba(95%,85%,85%,0.25)", "rgba(75%, 75%, 95%, 0.25)"];
const BORDCOLOR: [&str; 2] = ["#555555", "#4444EE"];

/// What shape the band previews as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandMode {
    Rectangle,
    Ellipse,
    Cloud,
}

impl From<SubnetShape> for BandMode {
    fn from(shape: SubnetShape) -> Self {
        match shape {
            SubnetShape::Rectangle => BandMode::Rectangle,
            SubnetShape::Ellipse => BandMode::Ellipse,
            SubnetShape::Cloud => BandMode::Cloud,
        }
    }
}

#[derive(Debug)]
pub struct BandGesture {
    mode: BandMode,
    start: Point,
    /// 0 = subnet preview colors (grey), 1 = selection band colors (blue).
    option: usize,
    /// Mouse-ups seen since the band started; the two-click subnet
    /// protocol ends the band on the second one.
    pub click_count: i32,
    dirty: Option<Rect>,
}

impl BandGesture {
    pub fn start(surface: &mut dyn Surface, mode: BandMode, at: Point, option: usize) -> Self {
        surface.save_background();
        Self { mode, start: at, option: option.min(1), click_count: 0, dirty: None }
    }

    pub fn start_point(&self) -> Point {
        self.start
    }

    /// The band rect swept from the start point to `to`.
    pub fn band(&self, to: Point) -> Rect {
        Rect::from_points(self.start, to)
    }

    pub fn update(&mut self, surface: &mut dyn Surface, to: Point) {
        if let Some(stale) = self.dirty {
            surface.restore_region(stale);
        }

        let width = to.x - self.start.x;
        let height = to.y - self.start.y;
        self.dirty = Some(Rect::new(
            self.start.x - 2.0,
            self.start.y - 2.0,
            width + 4.0,
            height + 4.0,
        ));

        let pen = Pen::new(BORDCOLOR[self.option], 1.0);
        let fill = TRANSCOLOR[self.option];
        match self.mode {
            BandMode::Rectangle => {
                surface.draw_rect(Rect::new(self.start.x, self.start.y, width, height), fill, &pen);
            }
            BandMode::Ellipse => {
                surface.draw_ellipse(
                    self.start.x + width / 2.0,
                    self.start.y + height / 2.0,
                    (width / 2.0).abs(),
                    (height / 2.0).abs(),
                    fill,
                    &pen,
                );
            }
            BandMode::Cloud => {
                surface.draw_image(
                    Rect::new(self.start.x, self.start.y, width, height),
                    "cloud_Net",
                );
            }
        }
    }

    /// Restore the saved background and return the start point.
    pub fn end(self, surface: &mut dyn Surface) -> Point {
        surface.restore_background();
        self.start
    }
}
