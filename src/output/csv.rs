//! CSV output format writer.

use crate::error::{Error, Result};
use crate::output::OutputWriter;
use crate::spacing::{ClassificationResult, DetectionEvent, Status};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Header of the per-event status file.
pub const STATUS_HEADER: [&str; 5] = ["Frame", "Label", "Latitude", "Longitude", "Status"];

/// Header of the missed point file.
pub const MISSING_HEADER: [&str; 4] = ["Latitude", "Longitude", "Frame_Prev", "Frame_Curr"];

/// Header of a georeferenced crossing record file.
pub const GEO_RECORD_HEADER: [&str; 7] = [
    "Label",
    "Frame_Number",
    "Timestamp",
    "Latitude",
    "Longitude",
    "Speed",
    "Course",
];

/// CSV writer producing a status file and a companion missed point file.
pub struct CsvStatusWriter {
    status: csv::Writer<File>,
    status_path: PathBuf,
    missing_path: PathBuf,
}

impl CsvStatusWriter {
    /// Create a new CSV writer. The missed point file is written by
    /// [`OutputWriter::write_summary`].
    pub fn new(status_path: &Path, missing_path: &Path) -> Result<Self> {
        let status = csv::Writer::from_path(status_path).map_err(|e| Error::CsvWrite {
            path: status_path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            status,
            status_path: status_path.to_path_buf(),
            missing_path: missing_path.to_path_buf(),
        })
    }

    fn status_error(&self, source: csv::Error) -> Error {
        Error::CsvWrite {
            path: self.status_path.clone(),
            source,
        }
    }
}

impl OutputWriter for CsvStatusWriter {
    fn write_header(&mut self) -> Result<()> {
        self.status
            .write_record(STATUS_HEADER)
            .map_err(|e| self.status_error(e))
    }

    fn write_event(&mut self, event: &DetectionEvent, status: Option<Status>) -> Result<()> {
        let record = [
            event.frame.to_string(),
            event.label.label().to_string(),
            event.lat.to_string(),
            event.lon.to_string(),
            status.map(Status::as_str).unwrap_or_default().to_string(),
        ];
        self.status
            .write_record(&record)
            .map_err(|e| self.status_error(e))
    }

    fn write_summary(&mut self, result: &ClassificationResult) -> Result<()> {
        let to_error = |e: csv::Error| Error::CsvWrite {
            path: self.missing_path.clone(),
            source: e,
        };

        let mut missing = csv::Writer::from_path(&self.missing_path).map_err(to_error)?;
        missing.write_record(MISSING_HEADER).map_err(to_error)?;
        for point in result.missed_points() {
            missing
                .write_record([
                    point.lat.to_string(),
                    point.lon.to_string(),
                    point.frame_prev.to_string(),
                    point.frame_curr.to_string(),
                ])
                .map_err(to_error)?;
        }
        missing.flush()?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.status.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::write_result;
    use crate::spacing::{Condition, classify_planting_status};
    use tempfile::tempdir;

    fn event(label: Condition, frame: i64, metres_north: f64) -> DetectionEvent {
        DetectionEvent::new(label, frame, 24.64 + metres_north / 111_000.0, 121.5)
    }

    #[test]
    fn test_csv_writer_writes_status_and_missing() {
        let dir = tempdir().unwrap();
        let status_path = dir.path().join("run.plantwatch.status.csv");
        let missing_path = dir.path().join("run.plantwatch.missing.csv");

        let events = vec![
            event(Condition::Seedling, 10, 0.0),
            event(Condition::Root, 20, 0.5),
            event(Condition::from_label("Weed"), 30, 1.0),
            event(Condition::Seedling, 40, 2.0),
        ];
        let result = classify_planting_status(&events, 0.5, 24.64).unwrap();

        let mut writer = CsvStatusWriter::new(&status_path, &missing_path).unwrap();
        write_result(&mut writer, &result).unwrap();

        let status = std::fs::read_to_string(&status_path).unwrap();
        let lines: Vec<&str> = status.lines().collect();
        assert_eq!(lines[0], "Frame,Label,Latitude,Longitude,Status");
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("20,Root,"));
        assert!(lines[2].ends_with(",Root Exposed"));
        assert!(lines[3].starts_with("30,Weed,"));
        assert!(lines[3].ends_with(','));

        let missing = std::fs::read_to_string(&missing_path).unwrap();
        let lines: Vec<&str> = missing.lines().collect();
        assert_eq!(lines[0], "Latitude,Longitude,Frame_Prev,Frame_Curr");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",30,40"));
    }

    #[test]
    fn test_csv_writer_empty_result_keeps_headers() {
        let dir = tempdir().unwrap();
        let status_path = dir.path().join("empty.status.csv");
        let missing_path = dir.path().join("empty.missing.csv");

        let mut writer = CsvStatusWriter::new(&status_path, &missing_path).unwrap();
        write_result(&mut writer, &ClassificationResult::empty()).unwrap();

        let status = std::fs::read_to_string(&status_path).unwrap();
        assert_eq!(status.trim_end(), "Frame,Label,Latitude,Longitude,Status");
        let missing = std::fs::read_to_string(&missing_path).unwrap();
        assert_eq!(missing.trim_end(), "Latitude,Longitude,Frame_Prev,Frame_Curr");
    }
}
