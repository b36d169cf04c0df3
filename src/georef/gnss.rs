//! GNSS track log and nearest-fix lookup.

use crate::error::{Error, Result};
use crate::utils::date::parse_timestamp;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct GnssRow {
    datetime: String,
    latitude: f64,
    longitude: f64,
    speed: f64,
    course: f64,
}

/// A single GNSS position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GnssFix {
    /// Fix time.
    pub time: DateTime<Utc>,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Ground speed in m/s.
    pub speed: f64,
    /// Course over ground in degrees.
    pub course: f64,
}

/// Time-ordered sequence of GNSS fixes.
#[derive(Debug, Clone, Default)]
pub struct GnssTrack {
    fixes: Vec<GnssFix>,
}

impl GnssTrack {
    /// Build a track, sorting fixes by time. Equal times keep input order.
    pub fn new(mut fixes: Vec<GnssFix>) -> Self {
        fixes.sort_by_key(|f| f.time);
        Self { fixes }
    }

    /// Fix closest in time to `time`. Ties resolve to the earlier fix.
    pub fn nearest(&self, time: DateTime<Utc>) -> Option<&GnssFix> {
        let idx = self.fixes.partition_point(|f| f.time < time);
        let before = idx.checked_sub(1).and_then(|i| self.fixes.get(i));
        let after = self.fixes.get(idx);

        match (before, after) {
            (Some(b), Some(a)) => {
                if gap(b.time, time) <= gap(a.time, time) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (b, a) => b.or(a),
        }
    }

    /// All fixes in time order.
    pub fn fixes(&self) -> &[GnssFix] {
        &self.fixes
    }

    /// Number of fixes.
    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    /// Whether the track has no fixes.
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

fn gap(a: DateTime<Utc>, b: DateTime<Utc>) -> TimeDelta {
    (a - b).abs()
}

/// Load a `datetime,latitude,longitude,speed,course` CSV.
pub fn load_gnss_track(path: &Path) -> Result<GnssTrack> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::InputRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut fixes = Vec::new();
    for (line_num, result) in reader.deserialize::<GnssRow>().enumerate() {
        let row = result.map_err(|e| Error::InvalidRecordFormat {
            message: format!("{} line {}: {e}", path.display(), line_num + 2),
        })?;
        fixes.push(GnssFix {
            time: parse_timestamp(&row.datetime)?,
            lat: row.latitude,
            lon: row.longitude,
            speed: row.speed,
            course: row.course,
        });
    }

    Ok(GnssTrack::new(fixes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, secs).unwrap()
    }

    fn fix(secs: u32, lat: f64) -> GnssFix {
        GnssFix {
            time: at(secs),
            lat,
            lon: 121.0,
            speed: 0.5,
            course: 90.0,
        }
    }

    #[test]
    fn test_nearest_between_fixes() {
        let track = GnssTrack::new(vec![fix(10, 1.0), fix(0, 0.0), fix(20, 2.0)]);
        assert_eq!(track.nearest(at(12)).unwrap().lat, 1.0);
        assert_eq!(track.nearest(at(16)).unwrap().lat, 2.0);
    }

    #[test]
    fn test_nearest_outside_range() {
        let track = GnssTrack::new(vec![fix(10, 1.0), fix(20, 2.0)]);
        assert_eq!(track.nearest(at(0)).unwrap().lat, 1.0);
        assert_eq!(track.nearest(at(50)).unwrap().lat, 2.0);
    }

    #[test]
    fn test_nearest_tie_prefers_earlier() {
        let track = GnssTrack::new(vec![fix(10, 1.0), fix(20, 2.0)]);
        assert_eq!(track.nearest(at(15)).unwrap().lat, 1.0);
    }

    #[test]
    fn test_nearest_empty_track() {
        assert!(GnssTrack::default().nearest(at(0)).is_none());
    }

    #[test]
    fn test_load_gnss_track() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "datetime,latitude,longitude,speed,course").unwrap();
        writeln!(file, "2024-03-01 08:00:02,24.64002,121.5,0.7,91.0").unwrap();
        writeln!(file, "2024-03-01 08:00:01,24.64001,121.5,0.6,90.0").unwrap();
        file.flush().unwrap();

        let track = load_gnss_track(file.path()).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.fixes()[0].speed, 0.6);
    }
}
