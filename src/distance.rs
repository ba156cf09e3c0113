//! Directional nearest-extremity distance between bounding boxes.
//!
//! The same metric gates contour clustering and frame-to-frame matching.

use crate::geometry::BoundingBox;

/// Approximate gap between two boxes, measured between the extremities that
/// face each other.
///
/// The relative placement is read off the box centres:
///
/// - projections overlapping on both axes: `0.0`
/// - diagonal placement: minimum over five candidates from the near box to
///   the facing corner of the far box (facing corner, the two adjacent
///   corners and the two adjacent facing-edge midpoints)
/// - axial placement: distance between the midpoints of the facing edges
/// - coincident centres: `0.0`
///
/// This is a heuristic, not the exact rectangle gap. It is symmetric:
/// `directional_box_distance(a, b) == directional_box_distance(b, a)`.
pub fn directional_box_distance(a: &BoundingBox, b: &BoundingBox) -> f64 {
    if a.overlaps(b) {
        return 0.0;
    }

    // Canonical order: `near` is above `far`, or left of it on the same row.
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    let (near, far) = if ay > by || (ay == by && ax > bx) {
        (b, a)
    } else {
        (a, b)
    };

    let (nx, ny) = near.center();
    let (fx, fy) = far.center();
    let up = ny < fy;
    let left = nx < fx;
    let right = nx > fx;

    let x1 = near.x as f64;
    let y1 = near.y as f64;
    let w1 = near.w as f64;
    let h1 = near.h as f64;
    let x2 = far.x as f64;
    let y2 = far.y as f64;
    let w2 = far.w as f64;
    let h2 = far.h as f64;

    if up && left {
        // Target: top-left corner of `far`
        min_of(&[
            (x1 + w1 - x2).hypot(y1 + h1 - y2),
            (x1 - x2).hypot(y1 + h1 - y2),
            (x1 + w1 - x2).hypot(y1 - y2),
            (x1 + w1 / 2.0 - x2).hypot(y1 + h1 - y2),
            (x1 + w1 - x2).hypot(y1 + h1 / 2.0 - y2),
        ])
    } else if up && right {
        // Target: top-right corner of `far`
        min_of(&[
            (x1 - x2 - w2).hypot(y1 + h1 - y2),
            (x1 - x2 - w2).hypot(y1 - y2),
            (x1 + w1 - x2 - w2).hypot(y1 + h1 - y2),
            (x1 - x2 - w2).hypot(y1 + h1 / 2.0 - y2),
            (x1 + w1 / 2.0 - x2 - w2).hypot(y1 + h1 - y2),
        ])
    } else if up {
        // Bottom edge midpoint to top edge midpoint
        (x1 + w1 / 2.0 - x2 - w2 / 2.0).hypot(y1 + h1 - y2)
    } else if left {
        // Right edge midpoint to left edge midpoint
        (x1 + w1 - x2).hypot(y1 + h1 / 2.0 - y2 - h2 / 2.0)
    } else {
        0.0
    }
}

#[inline]
fn min_of(candidates: &[f64]) -> f64 {
    candidates.iter().copied().fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bbox(x: i32, y: i32, w: i32, h: i32) -> BoundingBox {
        BoundingBox::new(x, y, w, h)
    }

    #[test]
    fn test_overlapping_boxes_are_zero() {
        let a = bbox(0, 0, 50, 50);
        let b = bbox(40, 30, 50, 50);
        assert_eq!(directional_box_distance(&a, &b), 0.0);
        assert_eq!(directional_box_distance(&b, &a), 0.0);

        // Nested
        let inner = bbox(10, 10, 5, 5);
        assert_eq!(directional_box_distance(&a, &inner), 0.0);
    }

    #[test]
    fn test_identical_boxes_are_zero() {
        let a = bbox(10, 10, 20, 20);
        assert_eq!(directional_box_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_vertical_axial() {
        // Bottom mid (5, 10) to top mid (5, 30)
        let a = bbox(0, 0, 10, 10);
        let b = bbox(0, 30, 10, 10);
        assert_relative_eq!(directional_box_distance(&a, &b), 20.0);
        assert_relative_eq!(directional_box_distance(&b, &a), 20.0);
    }

    #[test]
    fn test_horizontal_axial() {
        // Right mid (10, 5) to left mid (25, 5)
        let a = bbox(0, 0, 10, 10);
        let b = bbox(25, 0, 10, 10);
        assert_relative_eq!(directional_box_distance(&a, &b), 15.0);
        assert_relative_eq!(directional_box_distance(&b, &a), 15.0);
    }

    #[test]
    fn test_axial_uses_edge_midpoints() {
        // Same centre column, different widths: midpoints stay aligned
        let a = bbox(0, 0, 40, 10);
        let b = bbox(10, 20, 20, 10);
        assert_relative_eq!(directional_box_distance(&a, &b), 10.0);
    }

    #[test]
    fn test_diagonal_corner_to_corner() {
        // Bottom-right (10, 10) to top-left (20, 20)
        let a = bbox(0, 0, 10, 10);
        let b = bbox(20, 20, 10, 10);
        assert_relative_eq!(directional_box_distance(&a, &b), 200f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_diagonal_up_right() {
        // `near` is above and to the right: bottom-left (30, 10) to top-right (20, 20)
        let a = bbox(30, 0, 10, 10);
        let b = bbox(10, 20, 10, 10);
        assert_relative_eq!(directional_box_distance(&a, &b), 200f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_diagonal_with_horizontal_overlap() {
        // x projections overlap but y projections do not
        let a = bbox(0, 0, 100, 10);
        let b = bbox(90, 30, 100, 10);
        assert_relative_eq!(directional_box_distance(&a, &b), 500f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_symmetry_over_grid() {
        let reference = [bbox(50, 50, 20, 30), bbox(0, 0, 1, 1), bbox(45, 80, 60, 5)];
        for r in &reference {
            for dx in (-80..=80).step_by(7) {
                for dy in (-80..=80).step_by(9) {
                    for &(w, h) in &[(1, 1), (10, 4), (25, 40)] {
                        let other = bbox(r.x + dx, r.y + dy, w, h);
                        let d1 = directional_box_distance(r, &other);
                        let d2 = directional_box_distance(&other, r);
                        assert_eq!(d1, d2, "asymmetric for {:?} vs {:?}", r, other);
                        assert!(d1 >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_overlap_implies_zero_over_grid() {
        let r = bbox(100, 100, 30, 20);
        for dx in -40..=40 {
            for dy in (-30..=30).step_by(3) {
                let other = bbox(r.x + dx, r.y + dy, 15, 12);
                if r.overlaps(&other) {
                    assert_eq!(directional_box_distance(&r, &other), 0.0);
                }
            }
        }
    }
}
