//! Single file processing pipeline.

use crate::config::OutputFormat;
use crate::error::{Error, Result};
use crate::input::parse_records_file;
use crate::output::{
    CsvStatusWriter, JsonReportWriter, JsonSettings, OutputWriter, write_result,
};
use crate::pipeline::{ProcessOptions, missing_path_for, output_path_for};
use crate::spacing::{ClassificationResult, SpacingClassifier, StatusCounts};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Classify a single crossing record file and write its reports.
pub fn process_file(
    input_path: &Path,
    output_dir: &Path,
    options: &ProcessOptions,
) -> Result<ProcessResult> {
    let start_time = Instant::now();

    info!("Processing: {}", input_path.display());

    let classifier = SpacingClassifier::new(options.standard_spacing, options.reference_latitude)?;
    let events = parse_records_file(input_path)?;
    debug!("Parsed {} crossing records", events.len());

    let result = classifier.classify(&events)?;
    info!(
        "Classified {} events ({} after deduplication)",
        events.len(),
        result.events().len()
    );

    let source_file = source_name(input_path);
    let settings = settings_for(&classifier);

    if options.stdout {
        let mut writer = JsonReportWriter::stdout(&source_file, settings);
        write_result(&mut writer, &result)?;
    } else {
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).map_err(|e| Error::OutputDirCreateFailed {
                path: output_dir.to_path_buf(),
                source: e,
            })?;
        }
        for format in &options.formats {
            write_output(input_path, output_dir, *format, &source_file, settings, &result)?;
        }
    }

    let duration_secs = start_time.elapsed().as_secs_f64();
    info!("Processed {} in {:.3}s", source_file, duration_secs);

    Ok(ProcessResult {
        events: result.events().len(),
        counts: *result.counts(),
        duration_secs,
        result,
    })
}

/// Threshold settings recorded in reports.
pub fn settings_for(classifier: &SpacingClassifier) -> JsonSettings {
    let thresholds = classifier.thresholds();
    JsonSettings {
        standard_spacing: thresholds.standard(),
        reference_latitude: classifier.metric().reference_latitude(),
        min_spacing: thresholds.min(),
        max_spacing: thresholds.max(),
    }
}

fn source_name(input_path: &Path) -> String {
    input_path.file_name().map_or_else(
        || input_path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Write a result to an output file.
fn write_output(
    input_path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    source_file: &str,
    settings: JsonSettings,
    result: &ClassificationResult,
) -> Result<()> {
    let output_path = output_path_for(input_path, output_dir, format);
    debug!("Writing {} output: {}", format, output_path.display());

    let mut writer: Box<dyn OutputWriter> = match format {
        OutputFormat::Csv => Box::new(CsvStatusWriter::new(
            &output_path,
            &missing_path_for(input_path, output_dir),
        )?),
        OutputFormat::Json => Box::new(JsonReportWriter::new(&output_path, source_file, settings)),
    };

    write_result(writer.as_mut(), result)
}

/// Result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Number of deduplicated events classified.
    pub events: usize,
    /// Condition counts.
    pub counts: StatusCounts,
    /// Processing duration in seconds.
    pub duration_secs: f64,
    /// Full classification result.
    pub result: ClassificationResult,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const RECORDS: &str = "\
Label,Frame_Number,Timestamp,Latitude,Longitude,Speed,Course
Seedling,10,2024-03-01T08:00:01Z,24.64,121.5,0.5,0
Root,20,2024-03-01T08:00:02Z,24.6400045,121.5,0.5,0
Seedling,30,2024-03-01T08:00:03Z,24.6400090,121.5,0.5,0
";

    fn options(formats: Vec<OutputFormat>) -> ProcessOptions {
        ProcessOptions {
            standard_spacing: 0.5,
            reference_latitude: 24.64,
            formats,
            stdout: false,
        }
    }

    #[test]
    fn test_process_file_writes_all_formats() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("run.csv");
        std::fs::write(&input, RECORDS).unwrap();
        let out_dir = dir.path().join("reports");

        let result = process_file(
            &input,
            &out_dir,
            &options(vec![OutputFormat::Csv, OutputFormat::Json]),
        )
        .unwrap();

        assert_eq!(result.events, 3);
        assert_eq!(result.counts.normal, 2);
        assert_eq!(result.counts.root_exposed, 1);
        assert!(out_dir.join("run.plantwatch.status.csv").exists());
        assert!(out_dir.join("run.plantwatch.missing.csv").exists());
        assert!(out_dir.join("run.plantwatch.json").exists());
    }

    #[test]
    fn test_process_file_missing_input() {
        let dir = tempdir().unwrap();
        let err = process_file(
            &dir.path().join("absent.csv"),
            dir.path(),
            &options(vec![OutputFormat::Csv]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InputRead { .. }));
    }

    #[test]
    fn test_process_file_invalid_spacing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("run.csv");
        std::fs::write(&input, RECORDS).unwrap();

        let mut opts = options(vec![OutputFormat::Csv]);
        opts.standard_spacing = -1.0;
        assert!(matches!(
            process_file(&input, dir.path(), &opts),
            Err(Error::InvalidSpacing { .. })
        ));
    }
}
