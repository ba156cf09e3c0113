//! Configuration loading and resolution scaling.
//!
//! Thresholds are calibrated in pixels at a reference resolution and scaled
//! once, at construction, to the resolution a component runs at.
//!
//! ```toml
//! [resolution]
//! width = 1280
//! height = 720
//!
//! [clustering]
//! distance_threshold = 50.0
//! swallow_area_ratio = 0.5
//!
//! [tracking]
//! distance_threshold = 150.0
//!
//! [identification]
//! minimum_contour_area = 400.0
//! swallow_same_label = true
//! swallow_global = false
//! labels = ["red", "green", "blue", "yellow", "purple", "orange"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::clustering::ClusterConfig;
use crate::labels::LabelSet;
use crate::pipeline::PipelineConfig;
use crate::tracker::TrackerConfig;
use crate::{Error, Result};

/// Average of width and height at the calibration resolution (1280x720).
pub const CALIBRATION_RESOLUTION_AVERAGE: f64 = 1000.0;

/// Pixel area of the calibration resolution.
pub const CALIBRATION_RESOLUTION_AREA: f64 = 1280.0 * 720.0;

/// Frame resolution, fixed for a component's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "resolution must have non-zero area, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Scale a distance calibrated at [`CALIBRATION_RESOLUTION_AVERAGE`]:
    /// `value * ((width + height) / 2) / 1000`.
    pub fn scale_distance(&self, value: f64) -> f64 {
        let average = (self.width as f64 + self.height as f64) / 2.0;
        value * average / CALIBRATION_RESOLUTION_AVERAGE
    }

    /// Scale an area calibrated at [`CALIBRATION_RESOLUTION_AREA`].
    pub fn scale_area(&self, value: f64) -> f64 {
        value * (self.width as f64 * self.height as f64) / CALIBRATION_RESOLUTION_AREA
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Reject non-finite or non-positive thresholds.
pub(crate) fn validate_threshold(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Reject ratios outside `(0, 1]`.
pub(crate) fn validate_ratio(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(Error::InvalidConfig(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Top-level configuration, one section per component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolution: Resolution,

    #[serde(default)]
    pub clustering: ClusteringSection,

    #[serde(default)]
    pub tracking: TrackingSection,

    #[serde(default)]
    pub identification: IdentificationSection,
}

/// Contour clustering and containment options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringSection {
    /// Merge gate, in pixels at the calibration resolution.
    #[serde(default = "default_cluster_distance")]
    pub distance_threshold: f64,

    /// Fraction of the smaller box that must be covered to swallow it.
    #[serde(default = "default_swallow_area_ratio")]
    pub swallow_area_ratio: f64,
}

/// Corrective tracker options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSection {
    /// Match gate, in pixels at the calibration resolution.
    #[serde(default = "default_track_distance")]
    pub distance_threshold: f64,
}

/// Post-segmentation identification options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationSection {
    /// Shapes must exceed this area (pixels at the calibration resolution).
    #[serde(default = "default_minimum_contour_area")]
    pub minimum_contour_area: f64,

    #[serde(default = "default_true")]
    pub swallow_same_label: bool,

    #[serde(default)]
    pub swallow_global: bool,

    #[serde(default)]
    pub labels: LabelSet,
}

fn default_cluster_distance() -> f64 {
    50.0
}

fn default_swallow_area_ratio() -> f64 {
    0.5
}

fn default_track_distance() -> f64 {
    150.0
}

fn default_minimum_contour_area() -> f64 {
    400.0
}

fn default_true() -> bool {
    true
}

impl Default for ClusteringSection {
    fn default() -> Self {
        Self {
            distance_threshold: default_cluster_distance(),
            swallow_area_ratio: default_swallow_area_ratio(),
        }
    }
}

impl Default for TrackingSection {
    fn default() -> Self {
        Self {
            distance_threshold: default_track_distance(),
        }
    }
}

impl Default for IdentificationSection {
    fn default() -> Self {
        Self {
            minimum_contour_area: default_minimum_contour_area(),
            swallow_same_label: true,
            swallow_global: false,
            labels: LabelSet::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded configuration from {} ({}x{}, {} labels)",
            path.display(),
            config.resolution.width,
            config.resolution.height,
            config.identification.labels.len()
        );
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.resolution.validate()?;
        validate_threshold("clustering.distance_threshold", self.clustering.distance_threshold)?;
        validate_ratio("clustering.swallow_area_ratio", self.clustering.swallow_area_ratio)?;
        validate_threshold("tracking.distance_threshold", self.tracking.distance_threshold)?;
        if !self.identification.minimum_contour_area.is_finite()
            || self.identification.minimum_contour_area < 0.0
        {
            return Err(Error::InvalidConfig(format!(
                "identification.minimum_contour_area must be a non-negative finite number, got {}",
                self.identification.minimum_contour_area
            )));
        }
        self.identification.labels.validate()
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig::new(self.clustering.distance_threshold, self.resolution)
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::new(self.tracking.distance_threshold, self.resolution)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            cluster: self.cluster_config(),
            swallow_area_ratio: self.clustering.swallow_area_ratio,
            minimum_contour_area: self.identification.minimum_contour_area,
            swallow_same_label: self.identification.swallow_same_label,
            swallow_global: self.identification.swallow_global,
            labels: self.identification.labels.clone(),
        }
    }
}
