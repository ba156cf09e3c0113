//! Detection struct for input to the clustering, containment and tracking stages.

use crate::geometry::{contour_area, BoundingBox, Point};
use crate::{Error, Result};

/// A labelled shape detected in the current frame.
///
/// Produced by the external segmentation step, consumed within the frame and
/// never persisted. Fields are private so every detection has passed
/// [`Detection::new`]: at least [`Detection::MIN_POINTS`] vertices and a
/// non-empty label.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Closed polygon vertices, in contour-finding order. Need not be convex.
    shape: Vec<Point>,

    /// Class label, drawn from the configured label set.
    label: String,

    /// Enclosing rectangle of `shape`.
    bounding_box: BoundingBox,
}

impl Detection {
    /// Minimum number of vertices in a valid shape.
    pub const MIN_POINTS: usize = 3;

    /// Create a new detection from a polygon and a label.
    ///
    /// # Arguments
    /// * `shape` - Polygon vertices (at least [`Self::MIN_POINTS`])
    /// * `label` - Class label
    pub fn new(shape: Vec<Point>, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if shape.len() < Self::MIN_POINTS {
            return Err(Error::InvalidDetection(format!(
                "shape labelled '{}' has {} points, need at least {}",
                label,
                shape.len(),
                Self::MIN_POINTS
            )));
        }
        if label.is_empty() {
            return Err(Error::InvalidDetection("label must not be empty".to_string()));
        }

        let bounding_box = BoundingBox::from_points(&shape)
            .ok_or_else(|| Error::InvalidDetection("shape has no points".to_string()))?;

        Ok(Self {
            shape,
            label,
            bounding_box,
        })
    }

    /// Create a detection from `(x, y)` coordinate pairs.
    pub fn from_coords(coords: &[(i32, i32)], label: impl Into<String>) -> Result<Self> {
        let shape = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Self::new(shape, label)
    }

    /// Polygon vertices.
    pub fn shape(&self) -> &[Point] {
        &self.shape
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the number of vertices in the shape.
    pub fn num_points(&self) -> usize {
        self.shape.len()
    }

    /// Axis-aligned enclosing rectangle of the shape.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Polygon area of the shape.
    pub fn area(&self) -> f64 {
        contour_area(&self.shape)
    }

    /// Append the vertices of `other` to this shape.
    ///
    /// No hull is computed: the merged shape is the plain concatenation of
    /// both point sequences, under this detection's label.
    pub(crate) fn absorb(&mut self, other: Detection) {
        self.bounding_box = self.bounding_box.union(&other.bounding_box);
        self.shape.extend(other.shape);
    }
}
