//! Coordinate-based deduplication of detection events.

use super::DetectionEvent;
use std::collections::HashSet;

/// Remove events whose `(lat, lon)` pair was already seen.
///
/// The first occurrence wins and relative order is preserved. Label and
/// frame are not part of the comparison.
pub fn dedup_by_coordinates(events: &[DetectionEvent]) -> Vec<DetectionEvent> {
    let mut seen = HashSet::with_capacity(events.len());
    events
        .iter()
        .filter(|e| seen.insert(coordinate_key(e.lat, e.lon)))
        .cloned()
        .collect()
}

/// Exact-match key for a coordinate pair. `-0.0` and `0.0` compare equal.
fn coordinate_key(lat: f64, lon: f64) -> (u64, u64) {
    (normalize(lat).to_bits(), normalize(lon).to_bits())
}

fn normalize(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spacing::Condition;

    fn event(frame: i64, lat: f64, lon: f64) -> DetectionEvent {
        DetectionEvent::new(Condition::Seedling, frame, lat, lon)
    }

    #[test]
    fn test_first_occurrence_wins_and_order_kept() {
        let a = event(1, 24.0, 121.0);
        let b = event(2, 24.1, 121.0);
        let a_again = event(3, 24.0, 121.0);
        let c = event(4, 24.2, 121.0);

        let unique = dedup_by_coordinates(&[a.clone(), b.clone(), a_again, c.clone()]);
        assert_eq!(unique, vec![a, b, c]);
    }

    #[test]
    fn test_label_and_frame_ignored() {
        let first = DetectionEvent::new(Condition::Root, 10, 24.0, 121.0);
        let second = DetectionEvent::new(Condition::Seedling, 11, 24.0, 121.0);
        let unique = dedup_by_coordinates(&[first.clone(), second]);
        assert_eq!(unique, vec![first]);
    }

    #[test]
    fn test_same_frame_different_coordinates_kept() {
        let unique = dedup_by_coordinates(&[event(5, 24.0, 121.0), event(5, 24.0, 121.1)]);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_signed_zero_is_one_coordinate() {
        let unique = dedup_by_coordinates(&[event(1, 0.0, 0.0), event(2, -0.0, 0.0)]);
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn test_empty() {
        assert!(dedup_by_coordinates(&[]).is_empty());
    }
}
