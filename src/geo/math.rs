//! Great-circle distance, bearing, and circular-angle helpers.
//!
//! All angles are degrees. Headings/bearings use the compass convention:
//! 0 = north, 90 = east, result range [0, 360).

use super::types::GeoPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates in meters.
///
/// Symmetric; returns 0 for coincident points.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `a` to `b` in degrees, range [0, 360).
///
/// Returns 0 for coincident points.
pub fn bearing_degrees(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    if y == 0.0 && x == 0.0 {
        return 0.0;
    }
    normalize_angle(y.atan2(x).to_degrees())
}

/// Normalize an angle into [0, 360).
pub fn normalize_angle(deg: f64) -> f64 {
    let wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let delta = normalize_angle(to) - normalize_angle(from);
    if delta > 180.0 {
        delta - 360.0
    } else if delta <= -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Shortest-path circular interpolation between two headings.
///
/// `t` is clamped to [0, 1]; the result is normalized into [0, 360).
pub fn lerp_angle(from: f64, to: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    normalize_angle(from + angle_diff(from, to) * t)
}
