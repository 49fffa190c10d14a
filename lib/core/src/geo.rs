//! Coordinates and great-circle distance.
//!
//! Distances are computed with the haversine formula on a spherical Earth
//! of mean radius [`EARTH_RADIUS_KM`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers spanned by one degree of latitude on the mean sphere
const KM_PER_DEGREE_LAT: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Widening applied to bounding boxes so rounding never drops a point on the circle
const BOX_MARGIN: f64 = 1.01;

/// A validated latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::validation(format!(
                "latitude must be within [-90, 90], got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::validation(format!(
                "longitude must be within [-180, 180], got {}",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Great-circle distance between two coordinates in kilometers
///
/// Symmetric in its arguments and zero for identical points.
#[inline]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    // Absolute deltas keep the result bit-identical under endpoint swap
    let dlat = (b.latitude - a.latitude).abs().to_radians();
    let dlon = (b.longitude - a.longitude).abs().to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Approximate lat/lon rectangle enclosing a search circle
///
/// Only used to narrow candidate retrieval. When `min_lon > max_lon` the box
/// wraps across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn around(origin: Coordinate, radius_km: f64) -> Self {
        let lat_delta = radius_km * BOX_MARGIN / KM_PER_DEGREE_LAT;
        let min_lat = (origin.latitude - lat_delta).max(-90.0);
        let max_lat = (origin.latitude + lat_delta).min(90.0);

        // The widest parallel inside the box decides the longitude span
        let widest = min_lat.abs().max(max_lat.abs());
        let cos_lat = widest.to_radians().cos();
        let full = Self::full_longitude(min_lat, max_lat);

        if cos_lat <= f64::EPSILON {
            return full;
        }

        let lon_delta = lat_delta / cos_lat;
        if lon_delta >= 180.0 {
            return full;
        }

        Self {
            min_lat,
            max_lat,
            min_lon: wrap_longitude(origin.longitude - lon_delta),
            max_lon: wrap_longitude(origin.longitude + lon_delta),
        }
    }

    fn full_longitude(min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon: -180.0,
            max_lon: 180.0,
        }
    }

    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        if point.latitude < self.min_lat || point.latitude > self.max_lat {
            return false;
        }
        if self.crosses_antimeridian() {
            point.longitude >= self.min_lon || point.longitude <= self.max_lon
        } else {
            point.longitude >= self.min_lon && point.longitude <= self.max_lon
        }
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinate_deserialize_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"latitude": 40.0, "longitude": -73.0}"#).unwrap();
        assert_eq!(ok, coord(40.0, -73.0));
        let bad = serde_json::from_str::<Coordinate>(r#"{"latitude": 95.0, "longitude": 0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_distance_known_value() {
        // Paris to London is roughly 343.5 km
        let paris = coord(48.8566, 2.3522);
        let london = coord(51.5074, -0.1278);
        let d = distance(paris, london);
        assert!((d - 343.5).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let d = distance(coord(40.0, -73.0), coord(41.0, -73.0));
        assert!((d - 111.19).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_distance_antipodal_is_finite() {
        let d = distance(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_box_contains_circle() {
        let origin = coord(40.0, -73.0);
        let bbox = BoundingBox::around(origin, 10.0);
        assert!(bbox.contains(origin));
        assert!(bbox.contains(coord(40.08, -73.0)));
        assert!(bbox.contains(coord(40.0, -72.89)));
        assert!(!bbox.contains(coord(40.2, -73.0)));
    }

    #[test]
    fn test_bounding_box_antimeridian() {
        let bbox = BoundingBox::around(coord(0.0, 179.95), 20.0);
        assert!(bbox.crosses_antimeridian());
        assert!(bbox.contains(coord(0.0, -179.95)));
        assert!(bbox.contains(coord(0.0, 179.9)));
        assert!(!bbox.contains(coord(0.0, 0.0)));
    }

    #[test]
    fn test_bounding_box_near_pole_spans_all_longitudes() {
        let bbox = BoundingBox::around(coord(89.99, 10.0), 50.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert!(bbox.contains(coord(89.8, -170.0)));
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0
        ) {
            let a = coord(lat1, lon1);
            let b = coord(lat2, lon2);
            prop_assert_eq!(distance(a, b), distance(b, a));
            prop_assert!(distance(a, b) >= 0.0);
        }

        #[test]
        fn prop_distance_to_self_is_zero(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let a = coord(lat, lon);
            prop_assert_eq!(distance(a, a), 0.0);
        }

        #[test]
        fn prop_bounding_box_encloses_radius(
            lat in -80.0f64..=80.0, lon in -180.0f64..=180.0,
            radius in 0.5f64..=200.0, bearing in 0.0f64..360.0
        ) {
            let origin = coord(lat, lon);
            // Walk the full radius along the bearing
            let d = radius / EARTH_RADIUS_KM;
            let brg = bearing.to_radians();
            let lat1 = lat.to_radians();
            let lon1 = lon.to_radians();
            let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * brg.cos()).asin();
            let lon2 = lon1 + (brg.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());
            let target = coord(lat2.to_degrees(), wrap_longitude(lon2.to_degrees()));
            prop_assert!(BoundingBox::around(origin, radius).contains(target));
        }
    }
}
