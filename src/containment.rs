//! Containment ("swallow") filter for redundant detections.
//!
//! A detection is swallowed when another detection of the same pass fully
//! encloses it, or is larger and covers most of it.

use crate::config::validate_ratio;
use crate::detection::Detection;
use crate::geometry::BoundingBox;
use crate::Result;

/// Removes detections nested in, or mostly covered by, another detection.
#[derive(Debug, Clone)]
pub struct ContainmentFilter {
    /// Covered fraction of the smaller box above which it is swallowed.
    area_ratio_threshold: f64,
}

impl ContainmentFilter {
    /// Create a filter. `area_ratio_threshold` must lie in `(0, 1]`.
    pub fn new(area_ratio_threshold: f64) -> Result<Self> {
        validate_ratio("swallow area ratio threshold", area_ratio_threshold)?;
        Ok(Self { area_ratio_threshold })
    }

    pub fn area_ratio_threshold(&self) -> f64 {
        self.area_ratio_threshold
    }

    /// Whether box `a` swallows box `b`.
    ///
    /// True if `b` is strictly nested inside `a`, or if `a` is larger than `b`
    /// and their intersection covers more than the threshold fraction of `b`.
    pub fn swallows(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        if a.strictly_contains(b) {
            return true;
        }
        if a.area() <= b.area() {
            return false;
        }

        let covered = a.intersection_area(b);
        if covered == 0 {
            return false;
        }
        covered as f64 / b.area() as f64 > self.area_ratio_threshold
    }

    /// Drop every detection swallowed by another one in `detections`.
    ///
    /// Every ordered pair is examined against the original list; a detection
    /// already marked is not examined again as the swallowed side, but can
    /// still swallow others. Survivors keep their input order.
    pub fn swallow(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let boxes: Vec<BoundingBox> = detections.iter().map(Detection::bounding_box).collect();
        let mut swallowed = vec![false; boxes.len()];

        for a in 0..boxes.len() {
            for b in 0..boxes.len() {
                if a == b || swallowed[b] {
                    continue;
                }
                if self.swallows(&boxes[a], &boxes[b]) {
                    log::trace!(
                        "'{}' detection {} swallowed by '{}' detection {}",
                        detections[b].label(),
                        b,
                        detections[a].label(),
                        a
                    );
                    swallowed[b] = true;
                }
            }
        }

        let removed = swallowed.iter().filter(|&&s| s).count();
        if removed > 0 {
            log::debug!("Swallowed {} of {} detections", removed, detections.len());
        }

        detections
            .into_iter()
            .zip(swallowed)
            .filter_map(|(detection, swallowed)| (!swallowed).then_some(detection))
            .collect()
    }
}
