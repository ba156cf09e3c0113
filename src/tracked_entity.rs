//! TrackedEntity struct for identities maintained by the tracker.

use crate::geometry::{BoundingBox, Point};

/// One persistent identity spanning consecutive frames.
///
/// Entities are created and mutated only by the tracker that owns them;
/// callers get read-only access through the accessors below.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    /// Identifier, unique and never reused within one tracker.
    id: u64,

    /// Class label, fixed at creation.
    label: String,

    /// Bounding box from the most recent matched detection.
    bounding_box: BoundingBox,

    /// Integer centre of `bounding_box`.
    center: Point,

    /// Centre of every frame the entity was seen in, oldest first.
    trail: Vec<Point>,
}

impl TrackedEntity {
    pub(crate) fn new(id: u64, bounding_box: BoundingBox, label: impl Into<String>) -> Self {
        let center = bounding_box.integer_center();
        Self {
            id,
            label: label.into(),
            bounding_box,
            center,
            trail: vec![center],
        }
    }

    /// Move the entity to a newly matched box and extend its trail.
    pub(crate) fn update_position(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
        self.center = bounding_box.integer_center();
        self.trail.push(self.center);
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Full history of centres, one per frame the entity was seen.
    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    /// Number of frames the entity has been seen in.
    pub fn age(&self) -> usize {
        self.trail.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity() {
        let entity = TrackedEntity::new(3, BoundingBox::new(10, 20, 31, 11), "blue");

        assert_eq!(entity.id(), 3);
        assert_eq!(entity.label(), "blue");
        assert_eq!(entity.center(), Point::new(25, 25));
        assert_eq!(entity.trail(), &[Point::new(25, 25)]);
        assert_eq!(entity.age(), 1);
    }

    #[test]
    fn test_update_position_appends_trail() {
        let mut entity = TrackedEntity::new(0, BoundingBox::new(0, 0, 10, 10), "red");
        entity.update_position(BoundingBox::new(4, 0, 10, 10));
        entity.update_position(BoundingBox::new(8, 2, 10, 10));

        assert_eq!(entity.bounding_box(), &BoundingBox::new(8, 2, 10, 10));
        assert_eq!(entity.center(), Point::new(13, 7));
        assert_eq!(
            entity.trail(),
            &[Point::new(5, 5), Point::new(9, 5), Point::new(13, 7)]
        );
        // Label and id never change
        assert_eq!(entity.label(), "red");
        assert_eq!(entity.id(), 0);
    }
}
