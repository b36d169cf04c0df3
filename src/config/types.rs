//! Configuration type definitions.

use crate::constants::{georef, spacing, watch};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default classification settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Watch mode settings.
    #[serde(default)]
    pub watch: WatchConfig,

    /// Georeferencing input settings.
    #[serde(default)]
    pub georef: GeorefConfig,
}

/// Default classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Standard spacing between plantings, in metres.
    pub standard_spacing: f64,

    /// Reference latitude for the planar distance projection.
    pub reference_latitude: f64,

    /// Output formats.
    pub formats: Vec<OutputFormat>,

    /// Output directory (None = next to each input).
    pub output_dir: Option<PathBuf>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            standard_spacing: spacing::DEFAULT_STANDARD_SPACING,
            reference_latitude: spacing::DEFAULT_REFERENCE_LATITUDE,
            formats: vec![OutputFormat::Csv],
            output_dir: None,
        }
    }
}

/// Watch mode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Print an NDJSON notification for each new detection.
    pub emit_payloads: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: watch::DEFAULT_POLL_INTERVAL_MS,
            emit_payloads: false,
        }
    }
}

/// Georeferencing input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeorefConfig {
    /// Frame timestamp log.
    pub timestamps_file: PathBuf,

    /// GNSS track log.
    pub gnss_file: PathBuf,
}

impl Default for GeorefConfig {
    fn default() -> Self {
        Self {
            timestamps_file: PathBuf::from(georef::DEFAULT_TIMESTAMPS_FILE),
            gnss_file: PathBuf::from(georef::DEFAULT_GNSS_FILE),
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Per-event status CSV plus missed point CSV.
    Csv,
    /// Single JSON report.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
