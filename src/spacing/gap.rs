//! Missed planting slot interpolation.

use super::{DetectionEvent, MissedPoint};

/// Midpoint marker for an oversized gap between two consecutive events.
pub fn interpolate_gap(prev: &DetectionEvent, curr: &DetectionEvent) -> MissedPoint {
    MissedPoint {
        lat: f64::midpoint(prev.lat, curr.lat),
        lon: f64::midpoint(prev.lon, curr.lon),
        frame_prev: prev.frame,
        frame_curr: curr.frame,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::spacing::Condition;

    #[test]
    fn test_midpoint_and_frames() {
        let prev = DetectionEvent::new(Condition::Seedling, 30, 24.0, 121.0);
        let curr = DetectionEvent::new(Condition::Root, 45, 24.002, 121.004);
        let point = interpolate_gap(&prev, &curr);

        assert!((point.lat - 24.001).abs() < 1e-12);
        assert!((point.lon - 121.002).abs() < 1e-12);
        assert_eq!(point.frame_prev, 30);
        assert_eq!(point.frame_curr, 45);
    }
}
