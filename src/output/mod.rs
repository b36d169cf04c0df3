//! Output format writers.

mod csv;
mod json;
pub mod notify;
pub mod progress;
mod summary;
mod writer;

pub use csv::{CsvStatusWriter, GEO_RECORD_HEADER, MISSING_HEADER, STATUS_HEADER};
pub use json::{JsonEvent, JsonReport, JsonReportWriter, JsonSettings};
pub use notify::{EventType, JsonEnvelope, StatePayload, emit_detections};
pub use summary::{format_summary, print_summary};
pub use writer::{OutputWriter, write_result};
