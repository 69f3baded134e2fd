//! Precomputed geometry over a route path.
//!
//! [`RouteIndex`] is built once per route replacement and answers three
//! queries against the immutable path snapshot:
//!
//! - [`project`](RouteIndex::project) - nearest on-route point for an
//!   arbitrary coordinate ("snap")
//! - [`point_ahead`](RouteIndex::point_ahead) - walk forward along the
//!   path from a projection (heading lookahead)
//! - [`remaining_from`](RouteIndex::remaining_from) - distance from a
//!   projection to the end of the route
//!
//! Projection scans every segment and keeps the globally closest one. The
//! scan is O(n), acceptable for route paths in the hundreds of points.
//! Each segment is compared in a local planar frame (equirectangular about
//! the segment's latitude), which is accurate at street scale.

use crate::config::{MIN_DENOMINATOR, MIN_ROUTE_LENGTH_M};
use crate::geo::{distance_meters, GeoPoint, EARTH_RADIUS_M};

/// Result of projecting a coordinate onto the route.
#[derive(Debug, Clone, Copy)]
pub struct RouteProjection {
    /// Index of the closest segment (0-based; segment i spans points i..i+1).
    pub segment_index: usize,
    /// Parametric position along the segment, in [0, 1].
    pub t: f64,
    /// The projected on-route coordinate.
    pub point: GeoPoint,
    /// Great-circle distance from the query point to `point`, in meters.
    pub perpendicular_m: f64,
}

/// Precomputed per-segment and cumulative lengths over a route path.
#[derive(Debug, Clone)]
pub struct RouteIndex {
    points: Vec<GeoPoint>,
    /// Haversine length of segment i (points i..i+1).
    segment_lengths: Vec<f64>,
    /// Cumulative length from the start to point i.
    cumulative: Vec<f64>,
    /// Total path length, floored at [`MIN_ROUTE_LENGTH_M`].
    total_m: f64,
}

impl RouteIndex {
    /// Build the index from an ordered path. O(n).
    pub fn build(points: Vec<GeoPoint>) -> Self {
        let mut segment_lengths = Vec::with_capacity(points.len().saturating_sub(1));
        let mut cumulative = Vec::with_capacity(points.len());
        let mut running = 0.0;

        for (i, point) in points.iter().enumerate() {
            cumulative.push(running);
            if let Some(next) = points.get(i + 1) {
                let len = distance_meters(*point, *next);
                segment_lengths.push(len);
                running += len;
            }
        }

        Self {
            points,
            segment_lengths,
            cumulative,
            total_m: running.max(MIN_ROUTE_LENGTH_M),
        }
    }

    /// Total path length in meters, floored at 1 m.
    pub fn total_m(&self) -> f64 {
        self.total_m
    }

    /// Whether the path has enough points to support projection.
    pub fn is_projectable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Whether a replacement path shares this path's endpoints.
    ///
    /// Used to skip redundant rebuilds when the routing collaborator
    /// re-sends an equivalent path.
    pub fn endpoints_match(&self, path: &[GeoPoint], epsilon_m: f64) -> bool {
        match (
            self.points.first(),
            self.points.last(),
            path.first(),
            path.last(),
        ) {
            (Some(a0), Some(a1), Some(b0), Some(b1)) => {
                distance_meters(*a0, *b0) <= epsilon_m && distance_meters(*a1, *b1) <= epsilon_m
            }
            _ => false,
        }
    }

    /// Project a coordinate onto the route, keeping the globally closest
    /// segment. Returns `None` when the path has fewer than two points.
    pub fn project(&self, point: GeoPoint) -> Option<RouteProjection> {
        if !self.is_projectable() {
            return None;
        }

        let mut best: Option<RouteProjection> = None;

        for (i, window) in self.points.windows(2).enumerate() {
            let (a, b) = (window[0], window[1]);

            // Local planar frame in meters, origin at segment start.
            let lat_scale = ((a.latitude + b.latitude) / 2.0).to_radians().cos();
            let bx = (b.longitude - a.longitude).to_radians() * lat_scale * EARTH_RADIUS_M;
            let by = (b.latitude - a.latitude).to_radians() * EARTH_RADIUS_M;
            let px = (point.longitude - a.longitude).to_radians() * lat_scale * EARTH_RADIUS_M;
            let py = (point.latitude - a.latitude).to_radians() * EARTH_RADIUS_M;

            let seg_len_sq = bx * bx + by * by;
            let t = if seg_len_sq < MIN_DENOMINATOR {
                0.0
            } else {
                ((px * bx + py * by) / seg_len_sq).clamp(0.0, 1.0)
            };

            let projected = interpolate_on_segment(a, b, t);
            let perpendicular_m = distance_meters(point, projected);

            let closer = match &best {
                None => true,
                Some(current) => perpendicular_m < current.perpendicular_m,
            };
            if closer {
                best = Some(RouteProjection {
                    segment_index: i,
                    t,
                    point: projected,
                    perpendicular_m,
                });
            }
        }

        best
    }

    /// Walk forward along the path from a projected position by `meters`,
    /// crossing segment boundaries as needed.
    ///
    /// Returns the resulting coordinate and the updated (segment, t). A walk
    /// past the end of the path clamps to the final point.
    pub fn point_ahead(&self, segment_index: usize, t: f64, meters: f64) -> (GeoPoint, usize, f64) {
        if self.segment_lengths.is_empty() {
            let point = self.points.first().copied().unwrap_or(GeoPoint {
                latitude: 0.0,
                longitude: 0.0,
            });
            return (point, 0, 0.0);
        }

        let last_segment = self.segment_lengths.len() - 1;
        let mut segment = segment_index.min(last_segment);
        let mut t = t.clamp(0.0, 1.0);
        let mut remaining = meters.max(0.0);

        loop {
            let seg_len = self.segment_lengths[segment];
            let left_in_segment = seg_len * (1.0 - t);

            if remaining <= left_in_segment || segment == last_segment {
                let advanced_t = if seg_len < MIN_DENOMINATOR {
                    1.0
                } else {
                    (t + remaining / seg_len).min(1.0)
                };
                let point = interpolate_on_segment(
                    self.points[segment],
                    self.points[segment + 1],
                    advanced_t,
                );
                return (point, segment, advanced_t);
            }

            remaining -= left_in_segment;
            segment += 1;
            t = 0.0;
        }
    }

    /// Distance from a projected position to the end of the route:
    /// the distance from the projection to its segment's end point, plus
    /// the sum of all subsequent full segment lengths.
    pub fn remaining_from(&self, projection: &RouteProjection) -> f64 {
        if self.segment_lengths.is_empty() {
            return 0.0;
        }
        let segment = projection
            .segment_index
            .min(self.segment_lengths.len() - 1);
        let segment_end = self.points[segment + 1];
        let to_segment_end = distance_meters(projection.point, segment_end);

        let after_segment: f64 = self.segment_lengths.iter().skip(segment + 1).sum();
        to_segment_end + after_segment
    }
}

/// Linear interpolation between two route vertices.
///
/// Both endpoints are validated coordinates, so any point between them is
/// in range as well.
fn interpolate_on_segment(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    GeoPoint {
        latitude: a.latitude + (b.latitude - a.latitude) * t,
        longitude: a.longitude + (b.longitude - a.longitude) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    /// Equatorial three-point path, ~111 m per segment, ~222 m total.
    fn straight_path() -> Vec<GeoPoint> {
        vec![pt(0.0, 0.0), pt(0.0, 0.001), pt(0.0, 0.002)]
    }

    #[test]
    fn test_build_lengths() {
        let index = RouteIndex::build(straight_path());

        assert!(index.is_projectable());
        // Each segment is ~111 m, total ~222 m
        assert!((index.total_m() - 222.4).abs() < 1.0, "{}", index.total_m());
    }

    #[test]
    fn test_build_short_path_floors_total() {
        let index = RouteIndex::build(vec![pt(0.0, 0.0)]);

        assert!(!index.is_projectable());
        assert_eq!(index.total_m(), MIN_ROUTE_LENGTH_M);
        assert!(index.project(pt(0.0, 0.0005)).is_none());
    }

    #[test]
    fn test_project_midpoint_of_first_segment() {
        let index = RouteIndex::build(straight_path());

        let proj = index.project(pt(0.0, 0.0005)).unwrap();
        assert_eq!(proj.segment_index, 0);
        assert!((proj.t - 0.5).abs() < 0.01, "t = {}", proj.t);
        assert!(proj.perpendicular_m < 0.5, "perp = {}", proj.perpendicular_m);

        // Midpoint of segment 0 leaves half of segment 0 plus segment 1
        let remaining = index.remaining_from(&proj);
        assert!((remaining - 166.8).abs() < 2.0, "remaining = {remaining}");
    }

    #[test]
    fn test_project_vertex_gives_boundary_t() {
        let index = RouteIndex::build(straight_path());

        let proj = index.project(pt(0.0, 0.001)).unwrap();
        assert!(proj.t < 0.001 || proj.t > 0.999, "t = {}", proj.t);
        assert!(proj.perpendicular_m < 0.1);
    }

    #[test]
    fn test_project_t_clamped_and_distance_nonnegative() {
        let index = RouteIndex::build(straight_path());

        // Point beyond the end of the path
        let proj = index.project(pt(0.0, 0.005)).unwrap();
        assert!((0.0..=1.0).contains(&proj.t));
        assert!(proj.perpendicular_m >= 0.0);
        assert_eq!(proj.segment_index, 1);
        assert_eq!(proj.t, 1.0);
    }

    #[test]
    fn test_project_lateral_offset() {
        let index = RouteIndex::build(straight_path());

        // ~55 m north of the midpoint of segment 0
        let proj = index.project(pt(0.0005, 0.0005)).unwrap();
        assert_eq!(proj.segment_index, 0);
        assert!((proj.perpendicular_m - 55.6).abs() < 1.0);
        // Projection lands back on the path
        assert!(proj.point.latitude.abs() < 1e-9);
    }

    #[test]
    fn test_point_ahead_within_segment() {
        let index = RouteIndex::build(straight_path());

        let (point, segment, t) = index.point_ahead(0, 0.0, 55.0);
        assert_eq!(segment, 0);
        assert!((t - 0.494).abs() < 0.02, "t = {t}");
        assert!((point.longitude - 0.0005).abs() < 5e-5);
    }

    #[test]
    fn test_point_ahead_crosses_segment_boundary() {
        let index = RouteIndex::build(straight_path());

        // 150 m from the start lands ~39 m into segment 1
        let (point, segment, t) = index.point_ahead(0, 0.0, 150.0);
        assert_eq!(segment, 1);
        assert!(t > 0.3 && t < 0.4, "t = {t}");
        assert!(point.longitude > 0.001);
    }

    #[test]
    fn test_point_ahead_clamps_at_end() {
        let index = RouteIndex::build(straight_path());

        let (point, segment, t) = index.point_ahead(0, 0.0, 10_000.0);
        assert_eq!(segment, 1);
        assert_eq!(t, 1.0);
        assert!((point.longitude - 0.002).abs() < 1e-9);
    }

    #[test]
    fn test_remaining_from_end_is_zero() {
        let index = RouteIndex::build(straight_path());

        let proj = index.project(pt(0.0, 0.002)).unwrap();
        assert!(index.remaining_from(&proj) < 0.5);
    }

    #[test]
    fn test_endpoints_match() {
        let index = RouteIndex::build(straight_path());

        // Same endpoints, different interior
        let rerouted = vec![pt(0.0, 0.0), pt(0.0005, 0.001), pt(0.0, 0.002)];
        assert!(index.endpoints_match(&rerouted, 5.0));

        // Moved destination
        let extended = vec![pt(0.0, 0.0), pt(0.0, 0.003)];
        assert!(!index.endpoints_match(&extended, 5.0));

        assert!(!index.endpoints_match(&[], 5.0));
    }

    #[test]
    fn test_degenerate_segment_handled() {
        // Repeated vertex creates a zero-length segment
        let index = RouteIndex::build(vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(0.0, 0.001)]);

        let proj = index.project(pt(0.0, 0.0004)).unwrap();
        assert!((0.0..=1.0).contains(&proj.t));
        assert!(proj.perpendicular_m < 0.5);
    }
}
