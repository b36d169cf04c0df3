//! Crossing record parsing.
//!
//! Parses the crossing record CSV written by the line-crossing detector and
//! enriched by georeferencing. Uses the `csv` crate for robust parsing.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::constants::columns;
use crate::error::{Error, Result};
use crate::spacing::{Condition, DetectionEvent};

/// Internal record for georeferenced rows.
#[derive(Debug, Deserialize)]
struct GeoRow {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Frame_Number")]
    frame: i64,
    #[serde(rename = "Latitude")]
    lat: f64,
    #[serde(rename = "Longitude")]
    lon: f64,
}

/// Internal record for raw detector rows.
#[derive(Debug, Deserialize)]
struct CrossingRow {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Frame_Number")]
    frame: i64,
}

/// A crossing as written by the detector, before georeferencing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawCrossing {
    /// Detector label.
    pub label: String,
    /// Frame number at the crossing.
    pub frame: i64,
}

/// Read a whole crossing record file and parse its detection events.
///
/// The file is read into memory once so that parsing always sees one
/// consistent snapshot, even if the detector is appending concurrently.
pub fn parse_records_file(path: &Path) -> Result<Vec<DetectionEvent>> {
    let content = read_snapshot(path)?;
    parse_records_str(&content)
}

/// Parse georeferenced detection events from CSV text.
///
/// Requires `Label` and `Frame_Number` columns. Returns `Ok(vec![])` when the
/// text is empty, header-only, or not yet georeferenced (no `Latitude` /
/// `Longitude` columns). Additional columns such as `Timestamp`, `Speed` and
/// `Course` are ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidRecordFormat`] naming the file line when a value
/// cannot be parsed or a coordinate is not finite.
pub fn parse_records_str(content: &str) -> Result<Vec<DetectionEvent>> {
    let mut reader = reader_for(content);
    let headers = read_headers(&mut reader)?;

    if headers.is_empty() {
        return Ok(Vec::new());
    }
    require_columns(&headers, &[columns::LABEL, columns::FRAME])?;

    if !has_columns(&headers, &[columns::LATITUDE, columns::LONGITUDE]) {
        debug!("Crossing records have no coordinates yet, nothing to classify");
        return Ok(Vec::new());
    }

    let mut events = Vec::new();
    for (line_num, result) in reader.deserialize::<GeoRow>().enumerate() {
        let row = result.map_err(|e| Error::InvalidRecordFormat {
            message: format!("line {}: {e}", line_num + 2),
        })?;

        if !row.lat.is_finite() || !row.lon.is_finite() {
            return Err(Error::InvalidRecordFormat {
                message: format!(
                    "line {}: coordinates must be finite, got lat={}, lon={}",
                    line_num + 2,
                    row.lat,
                    row.lon
                ),
            });
        }

        events.push(DetectionEvent::new(
            Condition::from_label(&row.label),
            row.frame,
            row.lat,
            row.lon,
        ));
    }

    Ok(events)
}

/// Read raw `Label,Frame_Number` crossings from a file.
pub fn parse_crossings_file(path: &Path) -> Result<Vec<RawCrossing>> {
    let content = read_snapshot(path)?;
    parse_crossings_str(&content)
}

/// Parse raw crossings from CSV text. Extra columns are ignored.
pub fn parse_crossings_str(content: &str) -> Result<Vec<RawCrossing>> {
    let mut reader = reader_for(content);
    let headers = read_headers(&mut reader)?;

    if headers.is_empty() {
        return Ok(Vec::new());
    }
    require_columns(&headers, &[columns::LABEL, columns::FRAME])?;

    reader
        .deserialize::<CrossingRow>()
        .enumerate()
        .map(|(line_num, result)| {
            result
                .map(|row| RawCrossing {
                    label: row.label,
                    frame: row.frame,
                })
                .map_err(|e| Error::InvalidRecordFormat {
                    message: format!("line {}: {e}", line_num + 2),
                })
        })
        .collect()
}

fn read_snapshot(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::InputRead {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

fn reader_for(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes())
}

fn read_headers(reader: &mut csv::Reader<&[u8]>) -> Result<Vec<String>> {
    let headers = reader
        .headers()
        .map_err(|e| Error::InvalidRecordFormat {
            message: format!("line 1: {e}"),
        })?;
    Ok(headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .filter(|h| !h.is_empty())
        .collect())
}

fn has_columns(headers: &[String], required: &[&str]) -> bool {
    required.iter().all(|c| headers.iter().any(|h| h == c))
}

fn require_columns(headers: &[String], required: &[&str]) -> Result<()> {
    match required
        .iter()
        .find(|c| !headers.iter().any(|h| h == *c))
    {
        Some(missing) => Err(Error::InvalidRecordFormat {
            message: format!("missing required column '{missing}'"),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GEO_HEADER: &str = "Label,Frame_Number,Timestamp,Latitude,Longitude,Speed,Course";

    #[test]
    fn test_parse_georeferenced_rows() {
        let content = format!(
            "{GEO_HEADER}\n\
             Seedling,120,2024-03-01T08:00:01+00:00,24.6400010,121.5000000,0.8,90.0\n\
             Buried Seedling,135,2024-03-01T08:00:02+00:00,24.6400050,121.5000000,0.8,90.0\n"
        );
        let events = parse_records_str(&content).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].label, Condition::Seedling);
        assert_eq!(events[0].frame, 120);
        assert_eq!(events[1].label, Condition::BuriedSeedling);
        assert!((events[1].lat - 24.640_005).abs() < 1e-9);
    }

    #[test]
    fn test_minimal_columns() {
        let content = "Label,Frame_Number,Latitude,Longitude\nRoot,7,1.5,2.5\n";
        let events = parse_records_str(content).unwrap();
        assert_eq!(events, vec![DetectionEvent::new(Condition::Root, 7, 1.5, 2.5)]);
    }

    #[test]
    fn test_unknown_label_passed_through() {
        let content = "Label,Frame_Number,Latitude,Longitude\nWeed,7,1.5,2.5\n";
        let events = parse_records_str(content).unwrap();
        assert_eq!(events[0].label, Condition::Unknown("Weed".to_string()));
    }

    #[test]
    fn test_detector_header_only_is_empty() {
        let events = parse_records_str("Label,Frame_Number\n").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_not_georeferenced_is_empty() {
        let events = parse_records_str("Label,Frame_Number\nSeedling,12\nRoot,30\n").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_text_is_empty() {
        assert!(parse_records_str("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_label_column() {
        let result = parse_records_str("Frame_Number,Latitude,Longitude\n1,2.0,3.0\n");
        assert!(matches!(result, Err(Error::InvalidRecordFormat { .. })));
    }

    #[test]
    fn test_bad_number_names_line() {
        let content = "Label,Frame_Number,Latitude,Longitude\nSeedling,1,1.0,1.0\nSeedling,2,abc,1.0\n";
        let err = parse_records_str(content).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn test_nan_coordinate_rejected() {
        let content = "Label,Frame_Number,Latitude,Longitude\nSeedling,1,NaN,1.0\n";
        assert!(parse_records_str(content).is_err());
    }

    #[test]
    fn test_file_with_bom() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBF").unwrap();
        writeln!(file, "Label,Frame_Number,Latitude,Longitude").unwrap();
        writeln!(file, "Seedling,1,24.0,121.0").unwrap();
        file.flush().unwrap();

        let events = parse_records_file(file.path()).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = parse_records_file(Path::new("/nonexistent/crossing_records.csv"));
        assert!(matches!(result, Err(Error::InputRead { .. })));
    }

    #[test]
    fn test_parse_raw_crossings() {
        let crossings =
            parse_crossings_str("Label,Frame_Number\nSeedling,12\nBuried Seedling,30\n").unwrap();
        assert_eq!(crossings.len(), 2);
        assert_eq!(crossings[1].label, "Buried Seedling");
        assert_eq!(crossings[1].frame, 30);
    }

    #[test]
    fn test_raw_crossings_ignore_extra_columns() {
        let content = format!("{GEO_HEADER}\nRoot,5,2024-03-01T08:00:01Z,1.0,2.0,0.5,45.0\n");
        let crossings = parse_crossings_str(&content).unwrap();
        assert_eq!(crossings[0].frame, 5);
    }
}
