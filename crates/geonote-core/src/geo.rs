//! Geographic point and great-circle distance.
//!
//! PostGIS measures `geography` distances on the WGS 84 spheroid. The
//! haversine distance here uses the mean Earth radius; the two agree to within
//! about 0.5%, which is enough for the in-memory store and for sanity checks in
//! tests.

use serde::{Deserialize, Serialize};

use crate::defaults::{LATITUDE_MAX, LATITUDE_MIN, LONGITUDE_MAX, LONGITUDE_MIN};

/// Mean Earth radius in meters (IUGG).
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// A WGS 84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        latitude_in_range(self.latitude) && longitude_in_range(self.longitude)
    }

    /// Great-circle distance to `other`, in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_distance_m(self, other)
    }

    /// Whether `other` lies within `radius_m` meters, boundary included.
    pub fn within(&self, other: &GeoPoint, radius_m: f64) -> bool {
        self.distance_m(other) <= radius_m
    }
}

/// Latitude is finite and within [-90, 90].
pub fn latitude_in_range(latitude: f64) -> bool {
    (LATITUDE_MIN..=LATITUDE_MAX).contains(&latitude)
}

/// Longitude is finite and within [-180, 180].
pub fn longitude_in_range(longitude: f64) -> bool {
    (LONGITUDE_MIN..=LONGITUDE_MAX).contains(&longitude)
}

/// Haversine distance between two points, in meters.
pub fn haversine_distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // clamp guards asin against rounding just above 1.0
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(37.0, -122.0);
        assert_eq!(p.distance_m(&p), 0.0);
        assert!(p.within(&p, 0.0));
    }

    #[test]
    fn test_neighbouring_points_are_about_14m_apart() {
        let a = GeoPoint::new(37.0, -122.0);
        let b = GeoPoint::new(37.0001, -122.0001);
        let d = a.distance_m(&b);
        assert!((13.0..16.0).contains(&d), "distance was {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(51.5074, -0.1278);
        let b = GeoPoint::new(48.8566, 2.3522);
        assert!((a.distance_m(&b) - b.distance_m(&a)).abs() < 1e-6);
    }

    #[test]
    fn test_london_paris() {
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);
        let km = london.distance_m(&paris) / 1000.0;
        assert!((340.0..346.0).contains(&km), "distance was {} km", km);
    }

    #[test]
    fn test_antipodes_do_not_produce_nan() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = a.distance_m(&b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_MEAN_RADIUS_M).abs() < 1.0);
    }

    #[test]
    fn test_range_checks() {
        assert!(latitude_in_range(-90.0));
        assert!(latitude_in_range(90.0));
        assert!(!latitude_in_range(90.000001));
        assert!(!latitude_in_range(f64::NAN));
        assert!(longitude_in_range(-180.0));
        assert!(longitude_in_range(180.0));
        assert!(!longitude_in_range(-180.5));
        assert!(!longitude_in_range(f64::INFINITY));
    }

    #[test]
    fn test_point_validity() {
        assert!(GeoPoint::new(37.0, -122.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
    }
}
