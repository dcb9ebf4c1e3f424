//! Geometry primitives: points, canonical rectangles, segment distance.
//!
//! Rectangles are kept in canonical form (non-negative width and height);
//! any constructor or setter that receives a negative extent flips the
//! origin instead. Everything downstream relies on that.

use serde::{Deserialize, Serialize};

/// A point in drawing (world) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// An axis-aligned rectangle in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut r = Rect::default();
        r.set(x, y, width, height);
        r
    }

    /// Rectangle spanning two opposite corners, in any order.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        Rect::new(
            p1.x.min(p2.x),
            p1.y.min(p2.y),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    /// Set all four parameters, restoring canonical form.
    pub fn set(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn xc(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn yc(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.xc(), self.yc())
    }

    /// Strict interior test; points on the edge do not count.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x && x < self.right() && y > self.y && y < self.bottom()
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }

    /// Does this rect fully contain another?
    pub fn contains_rect(&self, r: &Rect) -> bool {
        self.x <= r.x && self.right() >= r.right() && self.y <= r.y && self.bottom() >= r.bottom()
    }

    pub fn intersects(&self, r: &Rect) -> bool {
        if self.x > r.right() || r.x > self.right() {
            return false;
        }
        if self.y > r.bottom() || r.y > self.bottom() {
            return false;
        }
        true
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Grow (or shrink, with negative margins) about the center.
    pub fn grow(&mut self, dx: f64, dy: f64) {
        self.x -= dx;
        self.width += 2.0 * dx;
        self.y -= dy;
        self.height += 2.0 * dy;
    }

    /// Make this rect just big enough to contain both.
    pub fn union(&mut self, r: &Rect) {
        let left = self.x.min(r.x);
        let top = self.y.min(r.y);
        let right = self.right().max(r.right());
        let bottom = self.bottom().max(r.bottom());
        self.set(left, top, right - left, bottom - top);
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Result of dropping a perpendicular from a point onto a segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentHit {
    /// Distance to the segment. Beyond either end this is the distance
    /// to the nearer endpoint.
    pub distance: f64,
    /// Parameterization along the segment: 0 at `p0`, 1 at `p1`. May fall
    /// outside [0, 1] when the foot of the perpendicular misses the segment.
    pub t: f64,
    /// Foot of the perpendicular on the infinite line.
    pub intersect: Point,
}

/// Perpendicular distance from `wp` to the segment `p0 -> p1`.
pub fn perpendicular_distance(p0: Point, p1: Point, wp: Point) -> SegmentHit {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;

    let numerator = dx * (wp.x - p0.x) + dy * (wp.y - p0.y);
    let denominator = dx * dx + dy * dy;
    let t = numerator / denominator;
    let intersect = Point::new(p0.x + t * dx, p0.y + t * dy);

    let distance = if t < 0.0 {
        p0.distance(wp)
    } else if t > 1.0 {
        p1.distance(wp)
    } else {
        intersect.distance(wp)
    };

    SegmentHit { distance, t, intersect }
}
