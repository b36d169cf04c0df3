//! CLI argument definitions.

use super::validators::{parse_interval_ms, parse_latitude, parse_spacing};
use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Transplanting quality monitor for georeferenced seedling detections.
#[derive(Debug, Parser)]
#[command(name = "plantwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Crossing record files or directories to classify.
    pub inputs: Vec<PathBuf>,

    /// Common options for classification.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Reclassify a crossing record file each time it changes.
    Watch {
        /// Crossing record file to watch.
        file: PathBuf,
        /// Poll interval in milliseconds.
        #[arg(long, value_parser = parse_interval_ms, env = "PLANTWATCH_INTERVAL_MS")]
        interval_ms: Option<u64>,
        /// Print an NDJSON notification for every new detection.
        #[arg(long)]
        emit_payloads: bool,
        /// Classify the current contents once and exit.
        #[arg(long)]
        once: bool,
    },
    /// Attach GNSS positions to raw line crossings.
    Georef {
        /// Raw crossing record file (`Label,Frame_Number`).
        crossings: PathBuf,
        /// Frame timestamp log (default from config, next to the crossings file).
        #[arg(long)]
        timestamps: Option<PathBuf>,
        /// GNSS track log (default from config, next to the crossings file).
        #[arg(long)]
        gnss: Option<PathBuf>,
        /// Output file (default: overwrite the crossings file).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for classification.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Standard spacing between plantings in metres.
    #[arg(short, long, value_parser = parse_spacing, env = "PLANTWATCH_SPACING", global = true)]
    pub spacing: Option<f64>,

    /// Reference latitude for the distance projection (-90.0 to 90.0).
    #[arg(long, value_parser = parse_latitude, env = "PLANTWATCH_REF_LAT", global = true)]
    pub ref_lat: Option<f64>,

    /// Output formats (comma-separated: csv,json).
    #[arg(short, long, value_delimiter = ',', env = "PLANTWATCH_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "PLANTWATCH_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the JSON report to stdout instead of writing files.
    #[arg(long, conflicts_with_all = ["output_dir", "format"])]
    pub stdout: bool,

    /// Reprocess files even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}
