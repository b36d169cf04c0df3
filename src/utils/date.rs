//! Timestamp parsing for frame and GNSS logs.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Naive layouts accepted when no offset is present. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Parse a timestamp from a frame or GNSS log.
///
/// Accepts RFC 3339 (including a trailing `Z`) and a few naive
/// `YYYY-MM-DD HH:MM:SS[.f]` layouts, which are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidTimestamp {
            value: value.to_string(),
        })
}
