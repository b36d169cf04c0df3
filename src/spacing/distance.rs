//! Local flat-earth distance between two coordinates.
//!
//! Points are projected onto a tangent plane scaled at a reference latitude.
//! Only valid over the extent of a single field row; accuracy degrades away
//! from the reference latitude and near the poles.

use crate::constants::spacing::METERS_PER_DEGREE;

/// Planar distance metric anchored at a reference latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceMetric {
    reference_latitude: f64,
    meters_per_deg_lat: f64,
    meters_per_deg_lon: f64,
}

impl DistanceMetric {
    /// Create a metric for the given reference latitude in degrees.
    pub fn new(reference_latitude: f64) -> Self {
        Self {
            reference_latitude,
            meters_per_deg_lat: METERS_PER_DEGREE,
            meters_per_deg_lon: METERS_PER_DEGREE * reference_latitude.to_radians().cos(),
        }
    }

    /// Reference latitude the projection is scaled at.
    pub const fn reference_latitude(&self) -> f64 {
        self.reference_latitude
    }

    /// Project a coordinate onto the local plane, returning `(x, y)`.
    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        (lon * self.meters_per_deg_lon, lat * self.meters_per_deg_lat)
    }

    /// Euclidean distance between two `(lat, lon)` points.
    pub fn distance(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let (x1, y1) = self.project(a.0, a.1);
        let (x2, y2) = self.project(b.0, b.1);
        (x2 - x1).hypot(y2 - y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let metric = DistanceMetric::new(24.64);
        assert!(metric.distance((24.64, 121.0), (24.64, 121.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_latitude_step_is_scale() {
        let metric = DistanceMetric::new(24.64);
        let d = metric.distance((24.0, 121.0), (24.001, 121.0));
        assert!((d - 111.0).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_longitude_shrinks_with_reference_latitude() {
        let equator = DistanceMetric::new(0.0);
        let north = DistanceMetric::new(60.0);
        let a = (0.0, 10.0);
        let b = (0.0, 10.001);
        let d_eq = equator.distance(a, b);
        let d_north = north.distance(a, b);
        assert!((d_eq - 111.0).abs() < 1e-6);
        assert!((d_north - 55.5).abs() < 1e-6, "got {d_north}");
    }

    #[test]
    fn test_symmetric() {
        let metric = DistanceMetric::new(24.64);
        let a = (24.6401, 121.5003);
        let b = (24.6405, 121.5001);
        assert!((metric.distance(a, b) - metric.distance(b, a)).abs() < 1e-12);
    }
}
