//! JSON report writer.

use crate::error::{Error, Result};
use crate::output::OutputWriter;
use crate::spacing::{
    ClassificationResult, DetectionEvent, MissedPoint, OverlapCluster, Status, StatusCounts,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// JSON report structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    /// Source crossing record file name.
    pub source_file: String,
    /// Analysis timestamp.
    pub analysis_date: DateTime<Utc>,
    /// Classification settings.
    pub settings: JsonSettings,
    /// Condition counts.
    pub counts: StatusCounts,
    /// Deduplicated events in sequence order.
    pub events: Vec<JsonEvent>,
    /// Interpolated missing plantings.
    pub missed_points: Vec<MissedPoint>,
    /// Overlap clusters with centroids.
    pub clusters: Vec<OverlapCluster>,
}

/// Classification settings for JSON output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JsonSettings {
    /// Standard spacing in metres.
    pub standard_spacing: f64,
    /// Reference latitude for the planar projection.
    pub reference_latitude: f64,
    /// Minimum spacing (overlap threshold).
    pub min_spacing: f64,
    /// Maximum spacing (gap threshold).
    pub max_spacing: f64,
}

/// Single event in JSON format.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEvent {
    /// Event identifier (`seedling_{frame}`).
    pub id: String,
    /// Frame number.
    pub frame: i64,
    /// Detector label.
    pub label: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Label status, absent for unrecognized labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

enum Target {
    File(PathBuf),
    Stdout,
}

/// Writer for JSON reports, to a file or stdout.
pub struct JsonReportWriter {
    target: Target,
    source_file: String,
    settings: JsonSettings,
    events: Vec<JsonEvent>,
    summary: Option<(StatusCounts, Vec<MissedPoint>, Vec<OverlapCluster>)>,
}

impl JsonReportWriter {
    /// Create a writer for a report file.
    pub fn new(output_path: &Path, source_file: &str, settings: JsonSettings) -> Self {
        Self::with_target(Target::File(output_path.to_path_buf()), source_file, settings)
    }

    /// Create a writer that prints the report to stdout.
    pub fn stdout(source_file: &str, settings: JsonSettings) -> Self {
        Self::with_target(Target::Stdout, source_file, settings)
    }

    fn with_target(target: Target, source_file: &str, settings: JsonSettings) -> Self {
        Self {
            target,
            source_file: source_file.to_string(),
            settings,
            events: Vec::new(),
            summary: None,
        }
    }

    fn build_report(&mut self) -> JsonReport {
        let (counts, missed_points, clusters) = self.summary.take().unwrap_or_default();
        JsonReport {
            source_file: self.source_file.clone(),
            analysis_date: Utc::now(),
            settings: self.settings,
            counts,
            events: std::mem::take(&mut self.events),
            missed_points,
            clusters,
        }
    }
}

impl OutputWriter for JsonReportWriter {
    fn write_header(&mut self) -> Result<()> {
        // Written at finalize
        Ok(())
    }

    fn write_event(&mut self, event: &DetectionEvent, status: Option<Status>) -> Result<()> {
        self.events.push(JsonEvent {
            id: event.id().to_string(),
            frame: event.frame,
            label: event.label.label().to_string(),
            lat: event.lat,
            lon: event.lon,
            status,
        });
        Ok(())
    }

    fn write_summary(&mut self, result: &ClassificationResult) -> Result<()> {
        self.summary = Some((
            *result.counts(),
            result.missed_points().to_vec(),
            result.clusters().to_vec(),
        ));
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let report = self.build_report();

        match &self.target {
            Target::File(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, &report).map_err(|e| {
                    Error::JsonWrite {
                        path: path.clone(),
                        source: e,
                    }
                })?;
                writer.flush()?;
            }
            Target::Stdout => {
                let json = serde_json::to_string_pretty(&report)
                    .map_err(|e| Error::JsonSerialize { source: e })?;
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}
