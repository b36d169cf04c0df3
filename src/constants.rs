//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "plantwatch";

/// Spacing classification constants.
pub mod spacing {
    /// Default standard spacing between plantings, in metres.
    pub const DEFAULT_STANDARD_SPACING: f64 = 0.5;

    /// Default reference latitude for the planar projection.
    pub const DEFAULT_REFERENCE_LATITUDE: f64 = 24.64;

    /// Metres per degree used by the planar projection.
    pub const METERS_PER_DEGREE: f64 = 111_000.0;

    /// `S_min = MIN_FACTOR * S`.
    pub const MIN_FACTOR: f64 = 0.4;

    /// `S_max = MAX_FACTOR * S`.
    pub const MAX_FACTOR: f64 = 1.6;
}

/// Watch loop constants.
pub mod watch {
    /// Default poll interval in milliseconds.
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
}

/// Crossing record CSV column names.
pub mod columns {
    /// Detector label column.
    pub const LABEL: &str = "Label";
    /// Frame number column.
    pub const FRAME: &str = "Frame_Number";
    /// GNSS fix timestamp column.
    pub const TIMESTAMP: &str = "Timestamp";
    /// Latitude column.
    pub const LATITUDE: &str = "Latitude";
    /// Longitude column.
    pub const LONGITUDE: &str = "Longitude";
    /// Ground speed column.
    pub const SPEED: &str = "Speed";
    /// Course over ground column.
    pub const COURSE: &str = "Course";
}

/// Georeferencing input defaults.
pub mod georef {
    /// Default frame timestamp file name.
    pub const DEFAULT_TIMESTAMPS_FILE: &str = "frames_timestamps.csv";
    /// Default GNSS log file name.
    pub const DEFAULT_GNSS_FILE: &str = "GNSS.csv";
}

/// Output file extensions by format.
pub mod output_extensions {
    /// Per-event status CSV extension.
    pub const STATUS_CSV: &str = ".plantwatch.status.csv";
    /// Missed point CSV extension.
    pub const MISSING_CSV: &str = ".plantwatch.missing.csv";
    /// JSON report extension.
    pub const JSON: &str = ".plantwatch.json";
}

/// Notification payload constants.
pub mod payload {
    /// Envelope format version.
    pub const SPEC_VERSION: &str = "1.0";
    /// Notification state for a normal transplant.
    pub const NORMAL_TRANSPLANT: &str = "Normal_Transplant";
    /// Notification state for root exposure.
    pub const ROOT_EXPOSURE: &str = "Root_Exposure";
    /// Notification state for a buried seedling.
    pub const BURIED_SEEDLING: &str = "Buried_Seedling";
}
