//! Geodetic primitives shared by every tracking component.
//!
//! - [`types`] - Validated coordinate types and range constants
//! - [`math`] - Distance, bearing, and circular-angle helpers

pub mod math;
pub mod types;

pub use math::{
    angle_diff, bearing_degrees, distance_meters, lerp_angle, normalize_angle, EARTH_RADIUS_M,
};
pub use types::{GeoError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
