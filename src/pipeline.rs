//! Per-frame identification and tracking pipeline.
//!
//! Takes the labelled shapes produced by an external segmentation step and
//! runs, in order:
//!
//! 1. label validation
//! 2. minimum-area gate
//! 3. per-label clustering, then same-label swallow (optional)
//! 4. global swallow across all labels (optional)
//! 5. tracker update

use crate::clustering::{ClusterConfig, ContourClusterer};
use crate::config::Config;
use crate::containment::ContainmentFilter;
use crate::labels::LabelSet;
use crate::tracker::{CorrectiveTracker, IdentityTracker, TrackRegistry};
use crate::{Detection, Error, Result};

/// Configuration for the identification pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Clustering threshold and resolution.
    pub cluster: ClusterConfig,

    /// Containment ratio for both swallow passes.
    pub swallow_area_ratio: f64,

    /// Minimum shape area in pixels at the calibration resolution.
    pub minimum_contour_area: f64,

    /// Run the containment filter within each label.
    pub swallow_same_label: bool,

    /// Run the containment filter across all labels.
    pub swallow_global: bool,

    /// Recognised labels, in processing order.
    pub labels: LabelSet,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Config::default().pipeline_config()
    }
}

/// Post-segmentation identification: filters, clusters and de-duplicates
/// one frame of labelled shapes.
#[derive(Debug, Clone)]
pub struct IdentificationPipeline {
    labels: LabelSet,
    clusterer: ContourClusterer,
    containment: ContainmentFilter,
    /// Area gate in pixels at the runtime resolution.
    minimum_area: f64,
    swallow_same_label: bool,
    swallow_global: bool,
}

impl IdentificationPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.labels.validate()?;
        if !config.minimum_contour_area.is_finite() || config.minimum_contour_area < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "minimum contour area must be a non-negative finite number, got {}",
                config.minimum_contour_area
            )));
        }

        let clusterer = ContourClusterer::new(config.cluster)?;
        let containment = ContainmentFilter::new(config.swallow_area_ratio)?;
        let minimum_area = config.cluster.resolution.scale_area(config.minimum_contour_area);

        Ok(Self {
            labels: config.labels,
            clusterer,
            containment,
            minimum_area,
            swallow_same_label: config.swallow_same_label,
            swallow_global: config.swallow_global,
        })
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Area gate in pixels at the runtime resolution.
    pub fn minimum_area(&self) -> f64 {
        self.minimum_area
    }

    pub fn clusterer(&self) -> &ContourClusterer {
        &self.clusterer
    }

    /// Run one frame of detections through the identification stages.
    ///
    /// Output is grouped by label in label-set order; within a label,
    /// survivors keep their relative input order.
    ///
    /// # Errors
    /// [`Error::UnknownLabel`] for a label outside the set.
    pub fn process(&self, detections: Vec<Detection>) -> Result<Vec<Detection>> {
        let total = detections.len();
        let mut by_label: Vec<Vec<Detection>> = vec![Vec::new(); self.labels.len()];

        for detection in detections {
            let index = self.labels.require(detection.label())?;
            if detection.area() > self.minimum_area {
                by_label[index].push(detection);
            }
        }

        let mut identified = Vec::with_capacity(total);
        for group in by_label {
            if group.is_empty() {
                continue;
            }
            let mut clustered = self.clusterer.cluster(group);
            if self.swallow_same_label {
                clustered = self.containment.swallow(clustered);
            }
            identified.extend(clustered);
        }

        if self.swallow_global {
            identified = self.containment.swallow(identified);
        }

        log::debug!("Identified {} objects from {} shapes", identified.len(), total);
        Ok(identified)
    }
}

/// Owns an identification pipeline and a tracker and runs complete frames.
pub struct FrameProcessor<T: IdentityTracker = CorrectiveTracker> {
    pipeline: IdentificationPipeline,
    tracker: T,
    frames_processed: u64,
}

impl FrameProcessor<CorrectiveTracker> {
    /// Build the pipeline and a corrective tracker from one configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let pipeline = IdentificationPipeline::new(config.pipeline_config())?;
        let tracker = CorrectiveTracker::new(config.tracker_config())?;
        Ok(Self::new(pipeline, tracker))
    }
}

impl<T: IdentityTracker> FrameProcessor<T> {
    pub fn new(pipeline: IdentificationPipeline, tracker: T) -> Self {
        Self {
            pipeline,
            tracker,
            frames_processed: 0,
        }
    }

    /// Identify and track one frame, returning the live entities.
    ///
    /// An invalid frame is rejected before the tracker sees it, so the
    /// registry is left untouched.
    pub fn process_frame(&mut self, detections: Vec<Detection>) -> Result<&TrackRegistry> {
        let identified = self.pipeline.process(detections)?;
        self.tracker.update(&identified);
        self.frames_processed += 1;

        log::trace!(
            "Frame {}: {} detections, {} live entities",
            self.frames_processed,
            identified.len(),
            self.tracker.entities().len()
        );
        Ok(self.tracker.entities())
    }

    pub fn entities(&self) -> &TrackRegistry {
        self.tracker.entities()
    }

    pub fn pipeline(&self) -> &IdentificationPipeline {
        &self.pipeline
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Number of frames passed to the tracker.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Resolution;
    use crate::geometry::BoundingBox;

    fn rect(x: i32, y: i32, w: i32, h: i32, label: &str) -> Detection {
        Detection::from_coords(
            &[(x, y), (x + w - 1, y), (x + w - 1, y + h - 1), (x, y + h - 1)],
            label,
        )
        .unwrap()
    }

    fn pipeline_config() -> PipelineConfig {
        PipelineConfig {
            cluster: ClusterConfig::new(20.0, Resolution::new(1280, 720)),
            swallow_area_ratio: 0.5,
            minimum_contour_area: 50.0,
            swallow_same_label: true,
            swallow_global: false,
            labels: LabelSet::colors(),
        }
    }

    #[test]
    fn test_new_scales_minimum_area() {
        let mut config = pipeline_config();
        config.cluster.resolution = Resolution::new(640, 360);
        let pipeline = IdentificationPipeline::new(config).unwrap();
        assert_eq!(pipeline.minimum_area(), 12.5);
        assert_eq!(pipeline.clusterer().threshold(), 10.0);
    }

    #[test]
    fn test_new_rejects_invalid() {
        let mut config = pipeline_config();
        config.minimum_contour_area = -1.0;
        assert!(IdentificationPipeline::new(config).is_err());

        let mut config = pipeline_config();
        config.swallow_area_ratio = 2.0;
        assert!(IdentificationPipeline::new(config).is_err());
    }

    #[test]
    fn test_unknown_label_rejected() {
        let pipeline = IdentificationPipeline::new(pipeline_config()).unwrap();
        let result = pipeline.process(vec![rect(0, 0, 20, 20, "plastic")]);
        assert!(matches!(result, Err(Error::UnknownLabel(l)) if l == "plastic"));
    }

    #[test]
    fn test_minimum_area_gate() {
        let pipeline = IdentificationPipeline::new(pipeline_config()).unwrap();
        // Polygon areas 49 and 64 against a gate of 50
        let small = Detection::from_coords(&[(0, 0), (7, 0), (7, 7), (0, 7)], "red").unwrap();
        let large = Detection::from_coords(&[(100, 100), (108, 100), (108, 108), (100, 108)], "red").unwrap();

        let result = pipeline.process(vec![small, large.clone()]).unwrap();
        assert_eq!(result, vec![large]);
    }

    #[test]
    fn test_groups_by_label_order() {
        let pipeline = IdentificationPipeline::new(pipeline_config()).unwrap();
        let blue = rect(0, 0, 20, 20, "blue");
        let red = rect(500, 0, 20, 20, "red");
        let green = rect(0, 500, 20, 20, "green");

        let result = pipeline.process(vec![blue.clone(), red.clone(), green.clone()]).unwrap();
        assert_eq!(result, vec![red, green, blue]);
    }

    #[test]
    fn test_clusters_within_label_only() {
        let pipeline = IdentificationPipeline::new(pipeline_config()).unwrap();
        // Two red fragments 10 px apart merge; the blue one next to them does not
        let result = pipeline
            .process(vec![
                rect(0, 0, 20, 20, "red"),
                rect(30, 0, 20, 20, "red"),
                rect(60, 0, 20, 20, "blue"),
            ])
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].label(), "red");
        assert_eq!(result[0].bounding_box(), BoundingBox::new(0, 0, 50, 20));
        assert_eq!(result[1].label(), "blue");
    }

    #[test]
    fn test_nested_same_label_collapses() {
        // Overlapping boxes are at distance 0, so clustering absorbs the inner
        // shape before the same-label swallow runs; the result is one shape
        // either way.
        let outer = rect(0, 0, 200, 200, "red");
        let inner = rect(90, 90, 20, 20, "red");

        for swallow_same_label in [true, false] {
            let mut config = pipeline_config();
            config.swallow_same_label = swallow_same_label;
            let pipeline = IdentificationPipeline::new(config).unwrap();

            let result = pipeline.process(vec![outer.clone(), inner.clone()]).unwrap();
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].bounding_box(), outer.bounding_box());
            assert_eq!(result[0].num_points(), 8);
        }
    }

    #[test]
    fn test_global_swallow_flag() {
        let outer = rect(0, 0, 200, 200, "red");
        let inner = rect(90, 90, 20, 20, "blue");

        let off = IdentificationPipeline::new(pipeline_config()).unwrap();
        assert_eq!(off.process(vec![outer.clone(), inner.clone()]).unwrap().len(), 2);

        let mut config = pipeline_config();
        config.swallow_global = true;
        let on = IdentificationPipeline::new(config).unwrap();
        assert_eq!(on.process(vec![outer.clone(), inner]).unwrap(), vec![outer]);
    }

    #[test]
    fn test_frame_processor_tracks() {
        let mut processor = FrameProcessor::from_config(&Config::default()).unwrap();

        for frame in 0..5 {
            let x = 100 + frame * 10;
            let entities = processor.process_frame(vec![rect(x, 100, 40, 40, "yellow")]).unwrap();
            assert_eq!(entities.len(), 1);
            assert!(entities.contains_key(&0));
        }

        assert_eq!(processor.frames_processed(), 5);
        assert_eq!(processor.entities()[&0].trail().len(), 5);
        assert_eq!(processor.tracker().total_entity_count(), 1);
    }

    #[test]
    fn test_frame_processor_invalid_frame_leaves_registry() {
        let mut processor = FrameProcessor::from_config(&Config::default()).unwrap();
        processor.process_frame(vec![rect(100, 100, 40, 40, "red")]).unwrap();

        let result = processor.process_frame(vec![rect(100, 100, 40, 40, "mauve")]);
        assert!(result.is_err());
        assert_eq!(processor.entities().len(), 1);
        assert_eq!(processor.frames_processed(), 1);
    }
}
