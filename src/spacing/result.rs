//! Immutable classification output.

use super::{DetectionEvent, EventId, MissedPoint, Status, StatusCounts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A maximal run of consecutive events closer than the minimum spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapCluster {
    /// Member frames in sequence order.
    pub frames: Vec<i64>,
    /// Mean latitude of the members.
    pub lat: f64,
    /// Mean longitude of the members.
    pub lon: f64,
}

impl OverlapCluster {
    /// Build a cluster from member indices into `events`.
    pub(crate) fn from_members(events: &[DetectionEvent], members: &[usize]) -> Self {
        let frames = members.iter().map(|&i| events[i].frame).collect();
        #[allow(clippy::cast_precision_loss)]
        let n = members.len().max(1) as f64;
        let lat = members.iter().map(|&i| events[i].lat).sum::<f64>() / n;
        let lon = members.iter().map(|&i| events[i].lon).sum::<f64>() / n;
        Self { frames, lat, lon }
    }

    /// Number of member events.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the cluster has no members (never produced by the classifier).
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Result of classifying one snapshot of the event log.
///
/// Produced fresh on every invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    events: Vec<DetectionEvent>,
    event_statuses: Vec<Option<Status>>,
    statuses: BTreeMap<EventId, Status>,
    counts: StatusCounts,
    missed_points: Vec<MissedPoint>,
    clusters: Vec<OverlapCluster>,
}

impl ClassificationResult {
    /// Result for an empty event log.
    pub fn empty() -> Self {
        Self::assemble(Vec::new(), Vec::new(), StatusCounts::default(), Vec::new(), Vec::new())
    }

    pub(crate) fn assemble(
        events: Vec<DetectionEvent>,
        event_statuses: Vec<Option<Status>>,
        counts: StatusCounts,
        missed_points: Vec<MissedPoint>,
        clusters: Vec<OverlapCluster>,
    ) -> Self {
        // Later events overwrite earlier ones that share a frame number.
        let statuses = events
            .iter()
            .zip(&event_statuses)
            .filter_map(|(event, status)| status.map(|s| (event.id(), s)))
            .collect();

        Self {
            events,
            event_statuses,
            statuses,
            counts,
            missed_points,
            clusters,
        }
    }

    /// Deduplicated events in sequence order.
    pub fn events(&self) -> &[DetectionEvent] {
        &self.events
    }

    /// Status per event identity.
    pub const fn statuses(&self) -> &BTreeMap<EventId, Status> {
        &self.statuses
    }

    /// Status of the event with the given identity.
    pub fn status(&self, id: EventId) -> Option<Status> {
        self.statuses.get(&id).copied()
    }

    /// Events paired with their status, in sequence order.
    pub fn classified_events(&self) -> impl Iterator<Item = (&DetectionEvent, Option<Status>)> {
        self.events.iter().zip(self.event_statuses.iter().copied())
    }

    /// Aggregate counts.
    pub const fn counts(&self) -> &StatusCounts {
        &self.counts
    }

    /// Interpolated missed planting slots.
    pub fn missed_points(&self) -> &[MissedPoint] {
        &self.missed_points
    }

    /// Overlap clusters in sequence order.
    pub fn clusters(&self) -> &[OverlapCluster] {
        &self.clusters
    }

    /// Whether no events were classified.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
