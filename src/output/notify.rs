//! Detection notifications for downstream visualisers.
//!
//! Each new event is emitted as one NDJSON line wrapped in a versioned
//! envelope, so consumers can follow a live run from stdout.

use crate::constants::payload;
use crate::error::{Error, Result};
use crate::spacing::{Condition, DetectionEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON envelope wrapping notification events.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct JsonEnvelope<T> {
    /// Envelope format version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: payload::SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A new detection was recorded.
    Detection,
}

/// Position and state of a single detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePayload {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Visualiser state name.
    pub state: String,
}

impl StatePayload {
    /// Build the payload for `event`.
    pub fn from_event(event: &DetectionEvent) -> Self {
        Self {
            lat: event.lat,
            lon: event.lon,
            state: state_name(&event.label).to_string(),
        }
    }
}

/// Visualiser state for a condition. Unknown labels pass through unchanged.
pub fn state_name(condition: &Condition) -> &str {
    match condition {
        Condition::Seedling => payload::NORMAL_TRANSPLANT,
        Condition::Root => payload::ROOT_EXPOSURE,
        Condition::BuriedSeedling => payload::BURIED_SEEDLING,
        Condition::Unknown(label) => label,
    }
}

/// Write one NDJSON detection line per event.
pub fn emit_detections<W: Write>(out: &mut W, events: &[DetectionEvent]) -> Result<()> {
    for event in events {
        let envelope = JsonEnvelope::new(EventType::Detection, StatePayload::from_event(event));
        let line =
            serde_json::to_string(&envelope).map_err(|e| Error::JsonSerialize { source: e })?;
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_state_mapping() {
        let cases = [
            ("Seedling", "Normal_Transplant"),
            ("Root", "Root_Exposure"),
            ("Buried Seedling", "Buried_Seedling"),
            ("Weed", "Weed"),
        ];
        for (label, state) in cases {
            assert_eq!(state_name(&Condition::from_label(label)), state);
        }
    }

    #[test]
    fn test_emit_detections_ndjson() {
        let events = vec![
            DetectionEvent::new(Condition::Seedling, 1, 24.64, 121.5),
            DetectionEvent::new(Condition::Root, 2, 24.65, 121.5),
        ];
        let mut out = Vec::new();
        emit_detections(&mut out, &events).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: JsonEnvelope<StatePayload> = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.spec_version, "1.0");
        assert_eq!(parsed.event, EventType::Detection);
        assert_eq!(parsed.payload.state, "Root_Exposure");
        assert!((parsed.payload.lat - 24.65).abs() < 1e-12);
    }

    #[test]
    fn test_envelope_event_serializes_snake_case() {
        let envelope = JsonEnvelope::new(
            EventType::Detection,
            StatePayload {
                lat: 0.0,
                lon: 0.0,
                state: "Weed".to_string(),
            },
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["event"], "detection");
        assert_eq!(value["payload"]["state"], "Weed");
    }
}
