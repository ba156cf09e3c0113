//! Same-frame clustering of fragmented contours.
//!
//! Segmentation noise often splits one physical object into several nearby
//! shapes of the same label. The clusterer repeatedly merges the closest pair
//! until no pair is closer than the resolution-scaled threshold.

use crate::config::{validate_threshold, Resolution};
use crate::detection::Detection;
use crate::distance::directional_box_distance;
use crate::geometry::BoundingBox;
use crate::matching::closest_pair;
use crate::Result;

/// Configuration for the contour clusterer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterConfig {
    /// Merge threshold in pixels at the calibration resolution.
    pub distance_threshold: f64,

    /// Frame resolution the clusterer runs at.
    pub resolution: Resolution,
}

impl ClusterConfig {
    pub fn new(distance_threshold: f64, resolution: Resolution) -> Self {
        Self {
            distance_threshold,
            resolution,
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::new(50.0, Resolution::default())
    }
}

/// Merges same-label detections whose boxes are close together.
#[derive(Debug, Clone)]
pub struct ContourClusterer {
    /// Effective merge threshold in pixels at the runtime resolution.
    threshold: f64,
}

impl ContourClusterer {
    /// Create a clusterer, scaling the threshold to the configured resolution.
    pub fn new(config: ClusterConfig) -> Result<Self> {
        config.resolution.validate()?;
        validate_threshold("cluster distance threshold", config.distance_threshold)?;

        let threshold = config.resolution.scale_distance(config.distance_threshold);
        log::debug!(
            "Contour clusterer: {} px at calibration -> {:.3} px at {}x{}",
            config.distance_threshold,
            threshold,
            config.resolution.width,
            config.resolution.height
        );

        Ok(Self { threshold })
    }

    /// Effective merge threshold in pixels.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Merge fragments until every remaining pair is at least `threshold` apart.
    ///
    /// All detections are expected to share one label; merged shapes keep the
    /// label of the lower-index detection. Each round scans every pair, so the
    /// total cost is O(n³) for n input shapes.
    pub fn cluster(&self, mut detections: Vec<Detection>) -> Vec<Detection> {
        let mut boxes: Vec<BoundingBox> = detections.iter().map(Detection::bounding_box).collect();

        while let Some((i, j, distance)) =
            closest_pair(boxes.len(), |i, j| directional_box_distance(&boxes[i], &boxes[j]))
        {
            if distance >= self.threshold {
                break;
            }

            let absorbed = detections.remove(j);
            boxes.remove(j);
            log::trace!(
                "Merging '{}' contours {} and {} (distance {:.2} < {:.2})",
                absorbed.label(),
                i,
                j,
                distance,
                self.threshold
            );
            detections[i].absorb(absorbed);
            boxes[i] = detections[i].bounding_box();
        }

        detections
    }
}
