//! Frame timestamp log.

use crate::error::{Error, Result};
use crate::utils::date::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TimestampRow {
    frame_number: i64,
    timestamp: String,
}

/// Capture time of each video frame.
#[derive(Debug, Clone, Default)]
pub struct FrameTimestamps {
    by_frame: BTreeMap<i64, DateTime<Utc>>,
}

impl FrameTimestamps {
    /// Capture time of `frame`, if logged.
    pub fn get(&self, frame: i64) -> Option<DateTime<Utc>> {
        self.by_frame.get(&frame).copied()
    }

    /// Number of logged frames.
    pub fn len(&self) -> usize {
        self.by_frame.len()
    }

    /// Whether no frames are logged.
    pub fn is_empty(&self) -> bool {
        self.by_frame.is_empty()
    }
}

impl FromIterator<(i64, DateTime<Utc>)> for FrameTimestamps {
    fn from_iter<I: IntoIterator<Item = (i64, DateTime<Utc>)>>(iter: I) -> Self {
        Self {
            by_frame: iter.into_iter().collect(),
        }
    }
}

/// Load a `frame_number,timestamp` CSV.
///
/// The first entry wins if a frame appears more than once.
pub fn load_frame_timestamps(path: &Path) -> Result<FrameTimestamps> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::InputRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut by_frame = BTreeMap::new();
    for (line_num, result) in reader.deserialize::<TimestampRow>().enumerate() {
        let row = result.map_err(|e| Error::InvalidRecordFormat {
            message: format!("{} line {}: {e}", path.display(), line_num + 2),
        })?;
        let time = parse_timestamp(&row.timestamp)?;
        by_frame.entry(row.frame_number).or_insert(time);
    }

    Ok(FrameTimestamps { by_frame })
}
