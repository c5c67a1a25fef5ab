//! Geographic coordinate module
//!
//! Provides a validated latitude/longitude point used for stops, vehicle
//! positions and traffic lookups, plus the small amount of spherical math the
//! rest of the crate needs (midpoints and great-circle distance).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Errors raised when a coordinate falls outside the WGS84 range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A point on the Earth's surface in decimal degrees.
///
/// Construct with [`GeoPoint::new`], which rejects out-of-range and NaN
/// values. Deserialized points are validated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint", into = "RawPoint")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Serialize, Deserialize)]
struct RawPoint {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = CoordError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lon)
    }
}

impl From<GeoPoint> for RawPoint {
    fn from(point: GeoPoint) -> Self {
        RawPoint {
            lat: point.lat,
            lon: point.lon,
        }
    }
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in degrees (-90.0 to 90.0)
    /// * `lon` - Longitude in degrees (-180.0 to 180.0)
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        // RangeInclusive::contains is false for NaN
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Builds a point from literal coordinates already known to be in range.
    pub(crate) const fn fixed(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Returns the point as a `(lat, lon)` tuple.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Arithmetic midpoint of two points.
    ///
    /// Good enough for the short intra-city legs this crate deals with; it is
    /// not the true great-circle midpoint.
    pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
        GeoPoint {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }

    /// Returns a copy shifted by the given offsets, clamped to the valid range.
    pub fn offset(&self, dlat: f64, dlon: f64) -> GeoPoint {
        GeoPoint {
            lat: (self.lat + dlat).clamp(MIN_LAT, MAX_LAT),
            lon: (self.lon + dlon).clamp(MIN_LON, MAX_LON),
        }
    }

    /// Great-circle distance to `other` in kilometres (haversine formula).
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

impl TryFrom<(f64, f64)> for GeoPoint {
    type Error = CoordError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        GeoPoint::new(lat, lon)
    }
}

/// Formats as `lat,lon`, the form the Directions API expects.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let point = GeoPoint::new(41.0652, 29.0062).unwrap();
        assert_eq!(point.lat(), 41.0652);
        assert_eq!(point.lon(), 29.0062);
        assert_eq!(point.as_tuple(), (41.0652, 29.0062));
    }

    #[test]
    fn test_invalid_latitude() {
        let result = GeoPoint::new(90.5, 0.0);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = GeoPoint::new(0.0, -180.1);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_midpoint() {
        let a = GeoPoint::new(41.0, 29.0).unwrap();
        let b = GeoPoint::new(42.0, 30.0).unwrap();
        let mid = a.midpoint(&b);
        assert!((mid.lat() - 41.5).abs() < 1e-9);
        assert!((mid.lon() - 29.5).abs() < 1e-9);
    }

    #[test]
    fn test_offset_is_clamped() {
        let p = GeoPoint::new(89.999, 179.999).unwrap();
        let shifted = p.offset(0.01, 0.01);
        assert_eq!(shifted.lat(), MAX_LAT);
        assert_eq!(shifted.lon(), MAX_LON);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Vadi Campus to ANK is roughly 4.1 km
        let vadi = GeoPoint::new(41.0652, 29.0062).unwrap();
        let ank = GeoPoint::new(41.0884, 29.0441).unwrap();
        let d = vadi.haversine_km(&ank);
        assert!((d - 4.1).abs() < 0.2, "distance was {}", d);
        assert!(vadi.haversine_km(&vadi).abs() < 1e-9);
    }

    #[test]
    fn test_display_format() {
        let p = GeoPoint::new(41.5, 29.25).unwrap();
        assert_eq!(p.to_string(), "41.5,29.25");
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let ok: GeoPoint = serde_json::from_str(r#"{"lat": 41.0, "lon": 29.0}"#).unwrap();
        assert_eq!(ok.lat(), 41.0);

        let bad = serde_json::from_str::<GeoPoint>(r#"{"lat": 141.0, "lon": 29.0}"#);
        assert!(bad.is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_haversine_symmetric(
                lat1 in -89.0..89.0_f64,
                lon1 in -179.0..179.0_f64,
                lat2 in -89.0..89.0_f64,
                lon2 in -179.0..179.0_f64,
            ) {
                let a = GeoPoint::new(lat1, lon1)?;
                let b = GeoPoint::new(lat2, lon2)?;
                let ab = a.haversine_km(&b);
                let ba = b.haversine_km(&a);
                prop_assert!(ab >= 0.0);
                prop_assert!((ab - ba).abs() < 1e-6, "{} != {}", ab, ba);
            }
        }
    }
}
