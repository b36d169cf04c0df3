//! Core data types for spacing classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Plant condition reported by the detector for a single crossing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Upright, properly transplanted seedling.
    Seedling,
    /// Seedling with exposed roots.
    Root,
    /// Seedling buried below the soil line.
    BuriedSeedling,
    /// Label the classifier does not recognise (raw text kept).
    Unknown(String),
}

impl Condition {
    /// Parse a detector label.
    ///
    /// Never fails: anything other than the three known labels becomes
    /// [`Condition::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Seedling" => Self::Seedling,
            "Root" => Self::Root,
            "Buried Seedling" => Self::BuriedSeedling,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Detector label text.
    pub fn label(&self) -> &str {
        match self {
            Self::Seedling => "Seedling",
            Self::Root => "Root",
            Self::BuriedSeedling => "Buried Seedling",
            Self::Unknown(raw) => raw,
        }
    }

    /// Status assigned from the label alone, before spacing is considered.
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::Seedling => Some(Status::Normal),
            Self::Root => Some(Status::RootExposed),
            Self::BuriedSeedling => Some(Status::Buried),
            Self::Unknown(_) => None,
        }
    }

    /// Whether the label maps to a status.
    pub const fn is_recognized(&self) -> bool {
        self.status().is_some()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Condition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// A single crossing of the counting line, georeferenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// Detected plant condition.
    pub label: Condition,
    /// Video frame number at the crossing.
    pub frame: i64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl DetectionEvent {
    /// Create a new event.
    pub const fn new(label: Condition, frame: i64, lat: f64, lon: f64) -> Self {
        Self {
            label,
            frame,
            lat,
            lon,
        }
    }

    /// Stable identity of this event.
    pub const fn id(&self) -> EventId {
        EventId(self.frame)
    }
}

/// Per-event identity derived from the frame number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seedling_{}", self.0)
    }
}

/// Quality classification of a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Properly planted at normal spacing.
    Normal,
    /// Root exposed.
    #[serde(rename = "Root Exposed")]
    RootExposed,
    /// Buried.
    Buried,
    /// Closer than the minimum spacing to a neighbour.
    Overlap,
}

impl Status {
    /// Human-readable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::RootExposed => "Root Exposed",
            Self::Buried => "Buried",
            Self::Overlap => "Overlap",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count bucket in a classification summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountBucket {
    /// Normal plantings.
    Normal,
    /// Root-exposed plantings.
    RootExposed,
    /// Buried plantings.
    Buried,
    /// Overlap clusters.
    Overlap,
    /// Missed planting slots.
    Missing,
}

impl CountBucket {
    /// All buckets in report order.
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::RootExposed,
        Self::Buried,
        Self::Overlap,
        Self::Missing,
    ];

    /// Human-readable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::RootExposed => "Root Exposed",
            Self::Buried => "Buried",
            Self::Overlap => "Overlap",
            Self::Missing => "Missing",
        }
    }
}

impl From<Status> for CountBucket {
    fn from(status: Status) -> Self {
        match status {
            Status::Normal => Self::Normal,
            Status::RootExposed => Self::RootExposed,
            Status::Buried => Self::Buried,
            Status::Overlap => Self::Overlap,
        }
    }
}

/// Aggregate counts over the five buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Normal plantings.
    pub normal: usize,
    /// Root-exposed plantings.
    pub root_exposed: usize,
    /// Buried plantings.
    pub buried: usize,
    /// Number of overlap clusters (not member events).
    pub overlap: usize,
    /// Number of missed planting slots.
    pub missing: usize,
}

impl StatusCounts {
    /// Value of a single bucket.
    pub const fn get(&self, bucket: CountBucket) -> usize {
        match bucket {
            CountBucket::Normal => self.normal,
            CountBucket::RootExposed => self.root_exposed,
            CountBucket::Buried => self.buried,
            CountBucket::Overlap => self.overlap,
            CountBucket::Missing => self.missing,
        }
    }

    /// Iterate `(bucket, count)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (CountBucket, usize)> + '_ {
        CountBucket::ALL.into_iter().map(|b| (b, self.get(b)))
    }

    fn slot(&mut self, bucket: CountBucket) -> &mut usize {
        match bucket {
            CountBucket::Normal => &mut self.normal,
            CountBucket::RootExposed => &mut self.root_exposed,
            CountBucket::Buried => &mut self.buried,
            CountBucket::Overlap => &mut self.overlap,
            CountBucket::Missing => &mut self.missing,
        }
    }

    pub(crate) fn increment(&mut self, bucket: CountBucket) {
        *self.slot(bucket) += 1;
    }

    /// Saturates at zero; callers only decrement buckets they incremented.
    pub(crate) fn decrement(&mut self, bucket: CountBucket) {
        let slot = self.slot(bucket);
        *slot = slot.saturating_sub(1);
    }
}

/// Interpolated location of a skipped planting slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissedPoint {
    /// Midpoint latitude.
    pub lat: f64,
    /// Midpoint longitude.
    pub lon: f64,
    /// Frame of the event before the gap.
    pub frame_prev: i64,
    /// Frame of the event after the gap.
    pub frame_curr: i64,
}
