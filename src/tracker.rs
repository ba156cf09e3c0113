//! Frame-to-frame identity assignment.

use std::collections::{BTreeMap, HashSet};

use crate::config::{validate_threshold, Resolution};
use crate::distance::directional_box_distance;
use crate::matching::nearest_below_threshold;
use crate::{Detection, Result, TrackedEntity};

/// Mapping from entity id to entity, iterated in creation order.
pub type TrackRegistry = BTreeMap<u64, TrackedEntity>;

/// Capability shared by identity trackers.
///
/// `update` is the single writer of the registry; `entities` hands out a
/// read-only view that cannot outlive the next `update`.
pub trait IdentityTracker {
    /// Consume one frame of detections.
    fn update(&mut self, detections: &[Detection]);

    /// Entities alive after the most recent update.
    fn entities(&self) -> &TrackRegistry;
}

/// Configuration for the corrective tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Match threshold in pixels at the calibration resolution.
    pub distance_threshold: f64,

    /// Frame resolution the tracker runs at.
    pub resolution: Resolution,
}

impl TrackerConfig {
    pub fn new(distance_threshold: f64, resolution: Resolution) -> Self {
        Self {
            distance_threshold,
            resolution,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(150.0, Resolution::default())
    }
}

/// Greedy nearest-neighbour tracker without occlusion memory.
///
/// Each detection, in input order, claims the closest same-label entity that
/// existed before the frame and is within the threshold. Unmatched detections
/// start new entities; entities not matched in a frame are destroyed at the
/// end of it.
#[derive(Debug, Clone)]
pub struct CorrectiveTracker {
    /// Tracker configuration.
    pub config: TrackerConfig,

    /// Effective match threshold in pixels at the runtime resolution.
    threshold: f64,

    /// Live entities.
    entities: TrackRegistry,

    /// Next id to assign.
    id_counter: u64,
}

impl CorrectiveTracker {
    /// Create a new tracker with the given configuration.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.resolution.validate()?;
        validate_threshold("track distance threshold", config.distance_threshold)?;

        let threshold = config.resolution.scale_distance(config.distance_threshold);
        log::debug!(
            "Corrective tracker: {} px at calibration -> {:.3} px at {}x{}",
            config.distance_threshold,
            threshold,
            config.resolution.width,
            config.resolution.height
        );

        Ok(Self {
            config,
            threshold,
            entities: TrackRegistry::new(),
            id_counter: 0,
        })
    }

    /// Effective match threshold in pixels.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Get an entity by id.
    pub fn entity(&self, id: u64) -> Option<&TrackedEntity> {
        self.entities.get(&id)
    }

    /// Owned copy of the registry, safe to keep across updates.
    pub fn snapshot(&self) -> TrackRegistry {
        self.entities.clone()
    }

    /// Get the total number of ids issued so far.
    pub fn total_entity_count(&self) -> u64 {
        self.id_counter
    }

    /// Get the current number of live entities.
    pub fn current_entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl IdentityTracker for CorrectiveTracker {
    fn update(&mut self, detections: &[Detection]) {
        // Ids at or above this value were created during this frame
        let first_new_id = self.id_counter;
        let mut seen: HashSet<u64> = HashSet::with_capacity(detections.len());

        for detection in detections {
            let bbox = detection.bounding_box();

            let candidates = self
                .entities
                .range(..first_new_id)
                .filter(|(id, entity)| entity.label() == detection.label() && !seen.contains(*id))
                .map(|(&id, entity)| (id, directional_box_distance(&bbox, entity.bounding_box())));

            match nearest_below_threshold(candidates, self.threshold) {
                Some((id, distance)) => {
                    if let Some(entity) = self.entities.get_mut(&id) {
                        entity.update_position(bbox);
                    }
                    seen.insert(id);
                    log::trace!("Matched '{}' detection to entity {} (distance {:.2})", detection.label(), id, distance);
                }
                None => {
                    let id = self.id_counter;
                    self.id_counter += 1;
                    self.entities.insert(id, TrackedEntity::new(id, bbox, detection.label()));
                    seen.insert(id);
                    log::debug!("Created entity {} ('{}') at {:?}", id, detection.label(), bbox);
                }
            }
        }

        // No grace period: anything not seen this frame is gone
        self.entities.retain(|id, entity| {
            let keep = seen.contains(id);
            if !keep {
                log::debug!("Destroyed entity {} ('{}') after {} frames", id, entity.label(), entity.age());
            }
            keep
        });
    }

    fn entities(&self) -> &TrackRegistry {
        &self.entities
    }
}
