//! Output writer trait definition.

use crate::error::Result;
use crate::spacing::{ClassificationResult, DetectionEvent, Status};

/// Trait for writing classification results.
pub trait OutputWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single deduplicated event with its status, if it has one.
    fn write_event(&mut self, event: &DetectionEvent, status: Option<Status>) -> Result<()>;

    /// Write counts, missed points, and clusters.
    fn write_summary(&mut self, result: &ClassificationResult) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}

/// Drive `writer` through a complete result.
pub fn write_result(writer: &mut dyn OutputWriter, result: &ClassificationResult) -> Result<()> {
    writer.write_header()?;
    for (event, status) in result.classified_events() {
        writer.write_event(event, status)?;
    }
    writer.write_summary(result)?;
    writer.finalize()
}
