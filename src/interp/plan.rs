//! Pure animation plan: position and heading over a bounded time window.

use std::time::{Duration, Instant};

use crate::geo::{lerp_angle, GeoPoint};

/// One interpolated motion sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Interpolated coordinate.
    pub point: GeoPoint,
    /// Interpolated heading in degrees, [0, 360).
    pub heading_deg: f64,
}

/// A scheduled glide from one emitted sample to a new target.
///
/// Latitude/longitude interpolate linearly; heading interpolates along the
/// shortest circular path. The `generation` records which update scheduled
/// the plan, letting the frame loop discard samples from superseded plans.
#[derive(Debug, Clone, Copy)]
pub struct AnimationPlan {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub from_heading_deg: f64,
    pub to_heading_deg: f64,
    pub started: Instant,
    pub duration: Duration,
    /// Generation token of the update that scheduled this plan.
    pub generation: u64,
}

impl AnimationPlan {
    /// Fraction of the plan elapsed at `now`, clamped to [0, 1].
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Whether the plan has fully elapsed at `now`.
    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Sample position and heading at `now`.
    pub fn sample(&self, now: Instant) -> MotionSample {
        let t = self.progress(now);
        MotionSample {
            point: GeoPoint {
                latitude: self.from.latitude + (self.to.latitude - self.from.latitude) * t,
                longitude: self.from.longitude + (self.to.longitude - self.from.longitude) * t,
            },
            heading_deg: lerp_angle(self.from_heading_deg, self.to_heading_deg, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn plan(started: Instant) -> AnimationPlan {
        AnimationPlan {
            from: pt(0.0, 0.0),
            to: pt(0.0, 0.001),
            from_heading_deg: 80.0,
            to_heading_deg: 100.0,
            started,
            duration: Duration::from_millis(1000),
            generation: 1,
        }
    }

    #[test]
    fn test_sample_at_start() {
        let started = Instant::now();
        let p = plan(started);

        let sample = p.sample(started);
        assert_eq!(sample.point, pt(0.0, 0.0));
        assert_eq!(sample.heading_deg, 80.0);
        assert!(!p.is_complete(started));
    }

    #[test]
    fn test_sample_midway() {
        let started = Instant::now();
        let p = plan(started);

        let sample = p.sample(started + Duration::from_millis(500));
        assert!((sample.point.longitude - 0.0005).abs() < 1e-9);
        assert!((sample.heading_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_clamps_past_end() {
        let started = Instant::now();
        let p = plan(started);

        let sample = p.sample(started + Duration::from_secs(10));
        assert_eq!(sample.point, pt(0.0, 0.001));
        assert_eq!(sample.heading_deg, 100.0);
        assert!(p.is_complete(started + Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let started = Instant::now();
        let mut p = plan(started);
        p.duration = Duration::ZERO;

        assert!(p.is_complete(started));
        assert_eq!(p.sample(started).point, pt(0.0, 0.001));
    }

    #[test]
    fn test_heading_wraps_through_north() {
        let started = Instant::now();
        let mut p = plan(started);
        p.from_heading_deg = 350.0;
        p.to_heading_deg = 10.0;

        let mid = p.sample(started + Duration::from_millis(500)).heading_deg;
        assert!(mid < 1.0 || mid > 359.0, "mid = {mid}");
    }
}
