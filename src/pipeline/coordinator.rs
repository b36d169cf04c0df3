//! Pipeline coordination for file processing.

use crate::config::OutputFormat;
use crate::constants::output_extensions;
use crate::error::Result;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for processing a single file.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Standard spacing in metres.
    pub standard_spacing: f64,
    /// Reference latitude for the distance projection.
    pub reference_latitude: f64,
    /// Output formats to generate.
    pub formats: Vec<OutputFormat>,
    /// Print the JSON report to stdout instead of writing files.
    pub stdout: bool,
}

/// Result of checking whether a file should be processed.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// File should be processed.
    Process,
    /// Skip - output already exists.
    SkipExists,
}

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Get the primary output file path for a given format.
///
/// For CSV this is the status file; see [`missing_path_for`] for its
/// companion.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let extension = match format {
        OutputFormat::Csv => output_extensions::STATUS_CSV,
        OutputFormat::Json => output_extensions::JSON,
    };
    output_dir.join(format!("{}{extension}", stem_of(input)))
}

/// Path of the missed point CSV written alongside the status CSV.
pub fn missing_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!(
        "{}{}",
        stem_of(input),
        output_extensions::MISSING_CSV
    ))
}

fn stem_of(input: &Path) -> std::borrow::Cow<'_, str> {
    // Non-UTF-8 names are kept lossily rather than rejected
    input.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("output"),
        OsStr::to_string_lossy,
    )
}

/// Check if a file should be processed.
pub fn should_process(
    input: &Path,
    output_dir: &Path,
    formats: &[OutputFormat],
    force: bool,
) -> ProcessCheck {
    if !force {
        let all_exist = formats
            .iter()
            .all(|fmt| output_path_for(input, output_dir, *fmt).exists());
        if all_exist {
            return ProcessCheck::SkipExists;
        }
    }

    ProcessCheck::Process
}

/// Collect crossing record files from paths (files and directories).
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_record_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping non-CSV file: {}", path.display());
            }
        } else if path.is_dir() {
            collect_record_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect crossing record files from a directory.
fn collect_record_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_record_files_recursive(&path, files)?;
        } else if is_record_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file looks like a crossing record CSV and not one of our outputs.
fn is_record_file(path: &Path) -> bool {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new("csv")));
    let is_output = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().contains(".plantwatch."));
    is_csv && !is_output
}
