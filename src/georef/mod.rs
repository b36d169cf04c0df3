//! Georeferencing of line crossings.
//!
//! The detector only knows the video frame of each crossing. Each frame is
//! mapped to its capture time through the frame timestamp log, and that time
//! is matched to the nearest fix in the GNSS log.

mod correlate;
mod gnss;
mod timestamps;

pub use correlate::{GeoRecord, correlate, write_georeferenced};
pub use gnss::{GnssFix, GnssTrack, load_gnss_track};
pub use timestamps::{FrameTimestamps, load_frame_timestamps};

use crate::error::Result;
use crate::input::parse_crossings_file;
use std::path::Path;
use tracing::info;

/// Summary of a georeferencing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeorefSummary {
    /// Raw crossings read.
    pub crossings: usize,
    /// Records written.
    pub written: usize,
}

/// Georeference a crossing file and write the enriched records to `output`.
pub fn georeference_file(
    crossings_path: &Path,
    timestamps_path: &Path,
    gnss_path: &Path,
    output: &Path,
) -> Result<GeorefSummary> {
    info!("Loading frame timestamps: {}", timestamps_path.display());
    let timestamps = load_frame_timestamps(timestamps_path)?;
    info!("Loading GNSS track: {}", gnss_path.display());
    let track = load_gnss_track(gnss_path)?;
    info!(
        "Loaded {} frame timestamps and {} GNSS fixes",
        timestamps.len(),
        track.len()
    );

    let crossings = parse_crossings_file(crossings_path)?;
    let records = correlate(&crossings, &timestamps, &track);
    write_georeferenced(output, &records)?;

    info!(
        "Georeferenced {} of {} crossings into {}",
        records.len(),
        crossings.len(),
        output.display()
    );

    Ok(GeorefSummary {
        crossings: crossings.len(),
        written: records.len(),
    })
}
