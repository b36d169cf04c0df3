//! Attach GNSS positions to raw crossings.

use super::{FrameTimestamps, GnssTrack};
use crate::error::{Error, Result};
use crate::input::RawCrossing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// A crossing with its nearest GNSS fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// Detector label.
    #[serde(rename = "Label")]
    pub label: String,
    /// Frame number at the crossing.
    #[serde(rename = "Frame_Number")]
    pub frame: i64,
    /// Time of the matched GNSS fix.
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Latitude in degrees.
    #[serde(rename = "Latitude")]
    pub lat: f64,
    /// Longitude in degrees.
    #[serde(rename = "Longitude")]
    pub lon: f64,
    /// Ground speed in m/s.
    #[serde(rename = "Speed")]
    pub speed: f64,
    /// Course over ground in degrees.
    #[serde(rename = "Course")]
    pub course: f64,
}

/// Georeference crossings in order.
///
/// Repeated `(label, frame)` pairs are processed once. Crossings whose frame
/// has no timestamp, or when the track is empty, are skipped with a warning.
pub fn correlate(
    crossings: &[RawCrossing],
    timestamps: &FrameTimestamps,
    track: &GnssTrack,
) -> Vec<GeoRecord> {
    let mut seen = HashSet::with_capacity(crossings.len());
    let mut records = Vec::with_capacity(crossings.len());

    for crossing in crossings {
        if !seen.insert((crossing.label.as_str(), crossing.frame)) {
            debug!(
                "Skipping repeated crossing {} at frame {}",
                crossing.label, crossing.frame
            );
            continue;
        }

        let Some(time) = timestamps.get(crossing.frame) else {
            warn!("No timestamp for frame {}, skipping", crossing.frame);
            continue;
        };

        let Some(fix) = track.nearest(time) else {
            warn!("No GNSS fix near frame {}, skipping", crossing.frame);
            continue;
        };

        records.push(GeoRecord {
            label: crossing.label.clone(),
            frame: crossing.frame,
            timestamp: fix.time,
            lat: fix.lat,
            lon: fix.lon,
            speed: fix.speed,
            course: fix.course,
        });
    }

    records
}

/// Write georeferenced records as a crossing record CSV.
pub fn write_georeferenced(path: &Path, records: &[GeoRecord]) -> Result<()> {
    let to_error = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;
    if records.is_empty() {
        writer
            .write_record(crate::output::GEO_RECORD_HEADER)
            .map_err(to_error)?;
    }
    for record in records {
        writer.serialize(record).map_err(to_error)?;
    }
    writer.flush()?;
    Ok(())
}
