//! Integer geometry primitives: points, bounding boxes and polygon area.

use nalgebra::Point2;

/// A contour vertex in pixel coordinates.
pub type Point = Point2<i32>;

/// Axis-aligned bounding box `(x, y, w, h)` in pixels.
///
/// Boxes derived from shapes follow the contour-finding convention, where a
/// single pixel has `w = h = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BoundingBox {
    /// Create a bounding box. Width and height must be non-negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        debug_assert!(w >= 0 && h >= 0, "negative box size {}x{}", w, h);
        Self { x, y, w, h }
    }

    /// Enclosing rectangle of a point set, or `None` for an empty set.
    ///
    /// Extents wider than `i32::MAX` are clamped to `i32::MAX`.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;

        let mut min_x = first.x;
        let mut max_x = first.x;
        let mut min_y = first.y;
        let mut max_y = first.y;

        for p in &points[1..] {
            if p.x < min_x { min_x = p.x; }
            if p.x > max_x { max_x = p.x; }
            if p.y < min_y { min_y = p.y; }
            if p.y > max_y { max_y = p.y; }
        }

        Some(Self::from_edges(min_x, min_y, max_x as i64 + 1, max_y as i64 + 1))
    }

    /// Box from a top-left corner and exclusive right/bottom edges.
    fn from_edges(x: i32, y: i32, right: i64, bottom: i64) -> Self {
        Self::new(x, y, clamp_extent(right - x as i64), clamp_extent(bottom - y as i64))
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Exact centre `(x + w/2, y + h/2)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        )
    }

    /// Centre truncated to integer pixel coordinates.
    pub fn integer_center(&self) -> Point {
        let (cx, cy) = self.center();
        Point::new(cx.trunc() as i32, cy.trunc() as i32)
    }

    /// Area of the rectangle intersection (0 when disjoint or only touching).
    pub fn intersection_area(&self, other: &BoundingBox) -> i64 {
        let inter_w = self.right().min(other.right()) - (self.x.max(other.x) as i64);
        let inter_h = self.bottom().min(other.bottom()) - (self.y.max(other.y) as i64);
        if inter_w <= 0 || inter_h <= 0 {
            return 0;
        }
        inter_w * inter_h
    }

    /// True if the projections overlap on both axes.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }

    /// True if all four edges of `other` lie strictly inside this box.
    pub fn strictly_contains(&self, other: &BoundingBox) -> bool {
        self.x < other.x
            && self.y < other.y
            && self.right() > other.right()
            && self.bottom() > other.bottom()
    }
}

#[inline]
fn clamp_extent(extent: i64) -> i32 {
    extent.min(i32::MAX as i64) as i32
}

/// Signed-area magnitude of a closed polygon (shoelace formula).
///
/// Matches what a contour-area primitive reports for the same vertex list.
pub fn contour_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area: i128 = 0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128;
    }

    (twice_area as f64 / 2.0).abs()
}
