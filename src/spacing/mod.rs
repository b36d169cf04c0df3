//! Planting quality classification from detection spacing.
//!
//! Consumes a full snapshot of georeferenced detections, removes duplicate
//! coordinates, and classifies every event by its label and by its distance
//! to the previous event.

mod classifier;
mod dedup;
mod distance;
mod gap;
mod result;
mod types;

pub use classifier::{SpacingClass, SpacingClassifier, SpacingThresholds};
pub use dedup::dedup_by_coordinates;
pub use distance::DistanceMetric;
pub use gap::interpolate_gap;
pub use result::{ClassificationResult, OverlapCluster};
pub use types::{
    Condition, CountBucket, DetectionEvent, EventId, MissedPoint, Status, StatusCounts,
};

use crate::error::Result;

/// Deduplicate and classify `events` in one call.
pub fn classify_planting_status(
    events: &[DetectionEvent],
    standard_spacing: f64,
    reference_latitude: f64,
) -> Result<ClassificationResult> {
    SpacingClassifier::new(standard_spacing, reference_latitude)?.classify(events)
}
