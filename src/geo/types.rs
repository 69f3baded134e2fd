//! Coordinate type definitions

use serde::Serialize;
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A validated geographic coordinate in degrees.
///
/// Construction rejects non-finite and out-of-range values, so a `GeoPoint`
/// held anywhere in the engine is always safe to feed into the math helpers.
/// Invalid transport data is turned away at this boundary and never stored;
/// deserialization goes through the raw wire types, not this struct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a validated coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Errors that can occur when constructing coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is non-finite or outside the valid range.
    #[error("Invalid latitude: {0} (must be finite and between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),

    /// Longitude is non-finite or outside the valid range.
    #[error("Invalid longitude: {0} (must be finite and between {MIN_LON} and {MAX_LON})")]
    InvalidLongitude(f64),

    /// Heading is non-finite.
    #[error("Invalid heading: {0} (must be finite)")]
    InvalidHeading(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let p = GeoPoint::new(12.9716, 77.5946).unwrap();
        assert_eq!(p.latitude, 12.9716);
        assert_eq!(p.longitude, 77.5946);
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert_eq!(
            GeoPoint::new(90.1, 0.0),
            Err(GeoError::InvalidLatitude(90.1))
        );
        assert_eq!(
            GeoPoint::new(-91.0, 0.0),
            Err(GeoError::InvalidLatitude(-91.0))
        );
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert_eq!(
            GeoPoint::new(0.0, 180.5),
            Err(GeoError::InvalidLongitude(180.5))
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert!(GeoPoint::new(MAX_LAT, MAX_LON).is_ok());
        assert!(GeoPoint::new(MIN_LAT, MIN_LON).is_ok());
    }
}
