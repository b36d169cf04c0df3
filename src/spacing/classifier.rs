//! Single-pass spacing classifier.
//!
//! Walks the deduplicated event sequence once, comparing each event with its
//! predecessor:
//!
//! - closer than `S_min`: both events join an overlap cluster, and the
//!   predecessor's label count is withdrawn the first time it joins;
//! - farther than `S_max`: a missed slot is interpolated between them;
//! - otherwise: the event keeps its label classification.
//!
//! A cluster is counted once, when it closes. The first event is classified
//! from its label up front and re-checked against the second event after the
//! pass.

use super::{
    ClassificationResult, CountBucket, DetectionEvent, DistanceMetric, MissedPoint,
    OverlapCluster, Status, StatusCounts, dedup_by_coordinates, interpolate_gap,
};
use crate::config::{validate_latitude, validate_spacing};
use crate::constants::spacing::{MAX_FACTOR, MIN_FACTOR};
use crate::error::{Error, Result};
use tracing::debug;

/// How a distance between neighbours compares with the standard spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingClass {
    /// Strictly below `S_min`.
    Overlap,
    /// Within `[S_min, S_max]`, bounds inclusive.
    Normal,
    /// Strictly above `S_max`.
    Gap,
}

/// Spacing thresholds derived from the standard spacing `S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingThresholds {
    standard: f64,
    min: f64,
    max: f64,
}

impl SpacingThresholds {
    /// Derive `S_min = 0.4 S` and `S_max = 1.6 S`.
    pub fn new(standard_spacing: f64) -> Result<Self> {
        validate_spacing(standard_spacing)?;
        Ok(Self {
            standard: standard_spacing,
            min: MIN_FACTOR * standard_spacing,
            max: MAX_FACTOR * standard_spacing,
        })
    }

    /// Standard spacing `S`.
    pub const fn standard(&self) -> f64 {
        self.standard
    }

    /// Minimum acceptable spacing `S_min`.
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Maximum acceptable spacing `S_max`.
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Classify a neighbour distance. Both thresholds are strict.
    pub fn classify(&self, distance: f64) -> SpacingClass {
        if distance < self.min {
            SpacingClass::Overlap
        } else if distance > self.max {
            SpacingClass::Gap
        } else {
            SpacingClass::Normal
        }
    }
}

/// Classifies planting quality from event spacing.
#[derive(Debug, Clone, Copy)]
pub struct SpacingClassifier {
    thresholds: SpacingThresholds,
    metric: DistanceMetric,
}

impl SpacingClassifier {
    /// Create a classifier for a standard spacing and reference latitude.
    pub fn new(standard_spacing: f64, reference_latitude: f64) -> Result<Self> {
        validate_latitude(reference_latitude)?;
        Ok(Self {
            thresholds: SpacingThresholds::new(standard_spacing)?,
            metric: DistanceMetric::new(reference_latitude),
        })
    }

    /// Active thresholds.
    pub const fn thresholds(&self) -> &SpacingThresholds {
        &self.thresholds
    }

    /// Distance metric used between neighbours.
    pub const fn metric(&self) -> &DistanceMetric {
        &self.metric
    }

    /// Deduplicate `events` and classify the result.
    pub fn classify(&self, events: &[DetectionEvent]) -> Result<ClassificationResult> {
        self.classify_unique(dedup_by_coordinates(events))
    }

    /// Classify an already deduplicated sequence.
    pub fn classify_unique(&self, events: Vec<DetectionEvent>) -> Result<ClassificationResult> {
        if let Some(bad) = events
            .iter()
            .find(|e| !e.lat.is_finite() || !e.lon.is_finite())
        {
            return Err(Error::InvalidCoordinate {
                frame: bad.frame,
                lat: bad.lat,
                lon: bad.lon,
            });
        }

        if events.is_empty() {
            return Ok(ClassificationResult::empty());
        }

        let mut pass = Pass::new(&events, self);
        pass.run();
        let (event_statuses, counts, missed_points, clusters) = pass.finish();

        debug!(
            "Classified {} events: {} normal, {} root exposed, {} buried, {} overlap clusters, {} missing",
            events.len(),
            counts.normal,
            counts.root_exposed,
            counts.buried,
            counts.overlap,
            counts.missing
        );

        Ok(ClassificationResult::assemble(
            events,
            event_statuses,
            counts,
            missed_points,
            clusters,
        ))
    }

    fn distance(&self, a: &DetectionEvent, b: &DetectionEvent) -> f64 {
        self.metric.distance((a.lat, a.lon), (b.lat, b.lon))
    }
}

/// Open-cluster state threaded through the pass.
#[derive(Debug, Default)]
enum ClusterState {
    #[default]
    Idle,
    /// Member indices, in order.
    Open(Vec<usize>),
}

/// Per-event bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
struct Mark {
    /// Status implied by the label; `None` for unrecognised labels.
    label_status: Option<Status>,
    /// Whether the label status is currently counted.
    counted: bool,
    /// Whether the event belongs to an overlap cluster.
    overlapped: bool,
}

impl Mark {
    fn status(self) -> Option<Status> {
        self.label_status
            .map(|s| if self.overlapped { Status::Overlap } else { s })
    }
}

struct Pass<'a> {
    events: &'a [DetectionEvent],
    classifier: &'a SpacingClassifier,
    marks: Vec<Mark>,
    counts: StatusCounts,
    missed_points: Vec<MissedPoint>,
    clusters: Vec<Vec<usize>>,
    state: ClusterState,
}

impl<'a> Pass<'a> {
    fn new(events: &'a [DetectionEvent], classifier: &'a SpacingClassifier) -> Self {
        let marks = events
            .iter()
            .map(|e| Mark {
                label_status: e.label.status(),
                ..Mark::default()
            })
            .collect();

        Self {
            events,
            classifier,
            marks,
            counts: StatusCounts::default(),
            missed_points: Vec::new(),
            clusters: Vec::new(),
            state: ClusterState::Idle,
        }
    }

    fn run(&mut self) {
        let events = self.events;
        self.classify_by_label(0);

        for i in 1..events.len() {
            let prev = &events[i - 1];
            let curr = &events[i];
            let distance = self.classifier.distance(prev, curr);

            match self.classifier.thresholds.classify(distance) {
                SpacingClass::Overlap => self.join_cluster(i),
                SpacingClass::Gap => {
                    self.close_cluster();
                    self.missed_points.push(interpolate_gap(prev, curr));
                    self.counts.increment(CountBucket::Missing);
                    self.classify_by_label(i);
                }
                SpacingClass::Normal => {
                    self.close_cluster();
                    self.classify_by_label(i);
                }
            }
        }

        self.close_cluster();
        self.fix_up_first();
    }

    /// Count event `i` under its label status, if it has one.
    fn classify_by_label(&mut self, i: usize) {
        let mark = &mut self.marks[i];
        if let Some(status) = mark.label_status {
            mark.counted = true;
            self.counts.increment(status.into());
        }
    }

    /// Move event `i` into an overlap cluster.
    ///
    /// The label count is withdrawn only on the first transition.
    fn mark_overlap(&mut self, i: usize) {
        let mark = &mut self.marks[i];
        if mark.overlapped {
            return;
        }
        mark.overlapped = true;
        if mark.counted {
            mark.counted = false;
            if let Some(status) = mark.label_status {
                self.counts.decrement(status.into());
            }
        }
    }

    /// Pull events `i - 1` and `i` into the open cluster.
    fn join_cluster(&mut self, i: usize) {
        if let ClusterState::Open(members) = &mut self.state
            && members.last() == Some(&(i - 1))
        {
            members.push(i);
        } else {
            self.close_cluster();
            self.state = ClusterState::Open(vec![i - 1, i]);
        }
        self.mark_overlap(i - 1);
        self.mark_overlap(i);
    }

    /// Close the open cluster, counting it once.
    fn close_cluster(&mut self) {
        if let ClusterState::Open(members) = std::mem::take(&mut self.state) {
            self.counts.increment(CountBucket::Overlap);
            self.clusters.push(members);
        }
    }

    /// Re-check the first event against the second once the pass is done.
    fn fix_up_first(&mut self) {
        if self.events.len() < 2 || self.marks[0].overlapped {
            return;
        }

        let distance = self.classifier.distance(&self.events[0], &self.events[1]);
        if self.classifier.thresholds.classify(distance) != SpacingClass::Overlap {
            return;
        }

        if let Some(first) = self.clusters.first_mut()
            && first.first() == Some(&1)
        {
            first.insert(0, 0);
        } else {
            self.counts.increment(CountBucket::Overlap);
            self.clusters.insert(0, vec![0, 1]);
            self.mark_overlap(1);
        }
        self.mark_overlap(0);
    }

    fn finish(self) -> (Vec<Option<Status>>, StatusCounts, Vec<MissedPoint>, Vec<OverlapCluster>) {
        let statuses = self.marks.iter().map(|m| m.status()).collect();
        let clusters = self
            .clusters
            .iter()
            .map(|members| OverlapCluster::from_members(self.events, members))
            .collect();
        (statuses, self.counts, self.missed_points, clusters)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::spacing::METERS_PER_DEGREE;
    use crate::spacing::{Condition, EventId};

    const BASE_LAT: f64 = 24.64;
    const BASE_LON: f64 = 121.0;

    /// Events due north of a base point, positioned by cumulative metres.
    fn row(labels: &[Condition], steps: &[f64]) -> Vec<DetectionEvent> {
        assert_eq!(labels.len(), steps.len() + 1);
        let mut offset = 0.0;
        let mut events = Vec::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                offset += steps[i - 1];
            }
            events.push(DetectionEvent::new(
                label.clone(),
                i64::try_from(i).unwrap() * 10,
                BASE_LAT + offset / METERS_PER_DEGREE,
                BASE_LON,
            ));
        }
        events
    }

    fn seedlings(steps: &[f64]) -> Vec<DetectionEvent> {
        row(&vec![Condition::Seedling; steps.len() + 1], steps)
    }

    fn classifier(spacing: f64) -> SpacingClassifier {
        SpacingClassifier::new(spacing, BASE_LAT).unwrap()
    }

    #[test]
    fn test_thresholds_strict() {
        let t = SpacingThresholds::new(0.5).unwrap();
        assert_eq!(t.classify(t.min()), SpacingClass::Normal);
        assert_eq!(t.classify(t.max()), SpacingClass::Normal);
        assert_eq!(t.classify(t.min() - 1e-9), SpacingClass::Overlap);
        assert_eq!(t.classify(t.max() + 1e-9), SpacingClass::Gap);
    }

    #[test]
    fn test_invalid_spacing_rejected() {
        assert!(matches!(
            SpacingThresholds::new(0.0),
            Err(Error::InvalidSpacing { .. })
        ));
        assert!(SpacingThresholds::new(-1.0).is_err());
        assert!(SpacingThresholds::new(f64::NAN).is_err());
        assert!(SpacingThresholds::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_invalid_reference_latitude_rejected() {
        assert!(matches!(
            SpacingClassifier::new(0.5, 91.0),
            Err(Error::InvalidLatitude { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let result = classifier(0.5).classify(&[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(*result.counts(), StatusCounts::default());
        assert!(result.missed_points().is_empty());
    }

    #[test]
    fn test_single_event_classified_by_label() {
        let events = row(&[Condition::BuriedSeedling], &[]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.status(EventId(0)), Some(Status::Buried));
        assert_eq!(result.counts().buried, 1);
    }

    #[test]
    fn test_reference_scenario() {
        let events = seedlings(&[0.5, 0.1, 0.5, 1.0]);
        let result = classifier(0.5).classify(&events).unwrap();

        assert_eq!(
            *result.counts(),
            StatusCounts {
                normal: 3,
                root_exposed: 0,
                buried: 0,
                overlap: 1,
                missing: 1,
            }
        );
        assert_eq!(result.status(EventId(0)), Some(Status::Normal));
        assert_eq!(result.status(EventId(10)), Some(Status::Overlap));
        assert_eq!(result.status(EventId(20)), Some(Status::Overlap));
        assert_eq!(result.status(EventId(30)), Some(Status::Normal));
        assert_eq!(result.status(EventId(40)), Some(Status::Normal));

        let missed = result.missed_points();
        assert_eq!(missed.len(), 1);
        assert_eq!((missed[0].frame_prev, missed[0].frame_curr), (30, 40));
        assert_eq!(result.clusters()[0].frames, vec![10, 20]);
    }

    #[test]
    fn test_long_cluster_counted_once() {
        let events = seedlings(&[0.5, 0.1, 0.1, 0.1, 0.5]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.counts().overlap, 1);
        assert_eq!(result.counts().normal, 2);
        assert_eq!(result.clusters()[0].frames, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_separate_clusters_counted_separately() {
        let events = seedlings(&[0.1, 0.5, 0.1]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.counts().overlap, 2);
        assert_eq!(result.counts().normal, 0);
        assert_eq!(result.clusters().len(), 2);
    }

    #[test]
    fn test_first_pair_overlapping() {
        let labels = [Condition::Root, Condition::Seedling, Condition::Seedling];
        let events = row(&labels, &[0.05, 0.5]);
        let result = classifier(0.5).classify(&events).unwrap();

        assert_eq!(result.status(EventId(0)), Some(Status::Overlap));
        assert_eq!(result.status(EventId(10)), Some(Status::Overlap));
        assert_eq!(result.counts().root_exposed, 0);
        assert_eq!(result.counts().normal, 1);
        assert_eq!(result.counts().overlap, 1);
        assert_eq!(result.clusters()[0].frames, vec![0, 10]);
    }

    #[test]
    fn test_trailing_cluster_flushed() {
        let events = seedlings(&[0.5, 0.1]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.counts().overlap, 1);
        assert_eq!(result.counts().normal, 1);
    }

    #[test]
    fn test_gap_does_not_suppress_label() {
        let labels = [Condition::Seedling, Condition::BuriedSeedling];
        let events = row(&labels, &[2.0]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.counts().missing, 1);
        assert_eq!(result.counts().buried, 1);
        assert_eq!(result.status(EventId(10)), Some(Status::Buried));
    }

    #[test]
    fn test_gap_closes_cluster() {
        let events = seedlings(&[0.1, 3.0]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.counts().overlap, 1);
        assert_eq!(result.counts().missing, 1);
        assert_eq!(result.counts().normal, 1);
    }

    #[test]
    fn test_unknown_label_not_counted() {
        let labels = [
            Condition::Seedling,
            Condition::Unknown("Weed".to_string()),
            Condition::Seedling,
        ];
        let events = row(&labels, &[0.5, 0.5]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.status(EventId(10)), None);
        assert_eq!(result.counts().normal, 2);
        assert_eq!(result.statuses().len(), 2);
    }

    #[test]
    fn test_unknown_label_in_cluster_gets_no_status() {
        let labels = [
            Condition::Seedling,
            Condition::Unknown("Weed".to_string()),
            Condition::Seedling,
        ];
        let events = row(&labels, &[0.5, 0.1]);
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.status(EventId(10)), None);
        assert_eq!(result.status(EventId(20)), Some(Status::Overlap));
        assert_eq!(result.counts().overlap, 1);
        assert_eq!(result.counts().normal, 1);
    }

    #[test]
    fn test_duplicates_removed_before_classification() {
        let mut events = seedlings(&[0.5, 0.5]);
        events.insert(1, events[0].clone());
        let result = classifier(0.5).classify(&events).unwrap();
        assert_eq!(result.events().len(), 3);
        assert_eq!(result.counts().normal, 3);
        assert_eq!(result.counts().overlap, 0);
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let mut events = seedlings(&[0.5]);
        events[1].lon = f64::NAN;
        let result = classifier(0.5).classify(&events);
        assert!(matches!(
            result,
            Err(Error::InvalidCoordinate { frame: 10, .. })
        ));
    }

    #[test]
    fn test_repeated_runs_identical() {
        let events = seedlings(&[0.1, 0.7, 2.0, 0.05, 0.05, 0.5]);
        let c = classifier(0.5);
        assert_eq!(c.classify(&events).unwrap(), c.classify(&events).unwrap());
    }
}
