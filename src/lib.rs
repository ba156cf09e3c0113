//! # contour-tracker
//!
//! Persistent identities for segmented contours across video frames.
//!
//! Upstream segmentation (colour thresholding, morphology, contour extraction)
//! tends to produce fragmented or duplicated shapes. This crate holds the
//! geometric decision layer that turns those noisy per-frame shapes into
//! stable tracks:
//!
//! - a direction-aware nearest-extremity distance between bounding boxes
//! - same-label contour clustering that merges fragments
//! - a containment ("swallow") filter for nested or mostly covered shapes
//! - a corrective tracker that carries identities from frame to frame
//!
//! ## Example
//!
//! ```rust
//! use contour_tracker::{Config, Detection, FrameProcessor};
//!
//! let config = Config::default();
//! let mut processor = FrameProcessor::from_config(&config).unwrap();
//!
//! let square = Detection::from_coords(&[(100, 100), (160, 100), (160, 160), (100, 160)], "red").unwrap();
//! let entities = processor.process_frame(vec![square]).unwrap();
//! assert_eq!(entities.len(), 1);
//! ```

pub mod geometry;
pub mod distance;
pub mod detection;
pub mod labels;
pub mod config;
pub mod matching;
pub mod clustering;
pub mod containment;
pub mod tracked_entity;
pub mod tracker;
pub mod pipeline;

// Re-exports for convenience
pub use geometry::{BoundingBox, Point};
pub use distance::directional_box_distance;
pub use detection::Detection;
pub use labels::LabelSet;
pub use config::{Config, Resolution};
pub use clustering::{ClusterConfig, ContourClusterer};
pub use containment::ContainmentFilter;
pub use tracked_entity::TrackedEntity;
pub use tracker::{CorrectiveTracker, IdentityTracker, TrackRegistry, TrackerConfig};
pub use pipeline::{FrameProcessor, IdentificationPipeline, PipelineConfig};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the contour-tracker library
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Invalid detection: {0}")]
        InvalidDetection(String),

        #[error("Unknown label: {0}")]
        UnknownLabel(String),

        #[error("Failed to parse configuration: {0}")]
        ConfigParse(#[from] toml::de::Error),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for contour-tracker operations
    pub type Result<T> = std::result::Result<T, Error>;
}
