//! Adaptive circular filter over the marker heading.

use std::time::Instant;

use crate::config::EngineConfig;
use crate::geo::{angle_diff, normalize_angle};

/// Blends the displayed heading toward each new raw bearing.
///
/// The blend factor grows with both the delta magnitude and the current
/// speed, so small jitter is damped hard while genuine rotation tracks
/// quickly. A delta past the sharp-turn threshold opens a short quick-rotate
/// window during which the blend is boosted, letting the marker sweep
/// through a turn instead of trailing it; the filter relaxes back to smooth
/// tracking once the window lapses.
#[derive(Debug)]
pub struct HeadingFilter {
    current_deg: Option<f64>,
    quick_rotate_until: Option<Instant>,
    base_blend: f64,
    delta_gain: f64,
    speed_gain: f64,
    max_blend: f64,
    fast_speed_mps: f64,
    quick_delta_deg: f64,
    quick_window: std::time::Duration,
    quick_blend: f64,
}

impl HeadingFilter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            current_deg: None,
            quick_rotate_until: None,
            base_blend: config.heading_base_blend,
            delta_gain: config.heading_delta_gain,
            speed_gain: config.heading_speed_gain,
            max_blend: config.heading_max_blend,
            fast_speed_mps: config.smoothing_fast_speed_mps,
            quick_delta_deg: config.quick_rotate_delta_deg,
            quick_window: config.quick_rotate_window(),
            quick_blend: config.quick_rotate_blend,
        }
    }

    /// Blend toward `raw_bearing_deg`, returning the smoothed heading.
    ///
    /// The first observation is adopted verbatim.
    pub fn smooth(&mut self, raw_bearing_deg: f64, speed_mps: f64, now: Instant) -> f64 {
        let raw = normalize_angle(raw_bearing_deg);

        let Some(previous) = self.current_deg else {
            self.current_deg = Some(raw);
            return raw;
        };

        let delta = angle_diff(previous, raw);

        if delta.abs() >= self.quick_delta_deg {
            self.quick_rotate_until = Some(now + self.quick_window);
        }

        let speed_factor = (speed_mps / self.fast_speed_mps).clamp(0.0, 1.0);
        let mut blend =
            self.base_blend + (delta.abs() / 180.0) * self.delta_gain + speed_factor * self.speed_gain;

        if let Some(until) = self.quick_rotate_until {
            if now < until {
                blend = blend.max(self.quick_blend);
            } else {
                self.quick_rotate_until = None;
            }
        }

        let blend = blend.min(self.max_blend);
        let smoothed = normalize_angle(previous + delta * blend);
        self.current_deg = Some(smoothed);
        smoothed
    }

    /// The current smoothed heading, if any observation has arrived.
    pub fn current_deg(&self) -> Option<f64> {
        self.current_deg
    }

    /// Forget the heading history.
    pub fn reset(&mut self) {
        self.current_deg = None;
        self.quick_rotate_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn filter() -> HeadingFilter {
        HeadingFilter::new(&EngineConfig::default())
    }

    #[test]
    fn test_first_observation_adopted() {
        let mut f = filter();
        let heading = f.smooth(273.0, 5.0, Instant::now());
        assert_eq!(heading, 273.0);
    }

    #[test]
    fn test_small_delta_damped() {
        let mut f = filter();
        let now = Instant::now();

        f.smooth(90.0, 5.0, now);
        let heading = f.smooth(100.0, 5.0, now + Duration::from_secs(1));

        // Only a fraction of the 10 degree delta is applied
        assert!(heading > 90.0 && heading < 95.0, "heading = {heading}");
    }

    #[test]
    fn test_sharp_turn_catches_up_fast() {
        let mut f = filter();
        let now = Instant::now();

        f.smooth(0.0, 8.0, now);
        // 90 degree turn opens the quick-rotate window
        let heading = f.smooth(90.0, 8.0, now + Duration::from_millis(100));
        assert!(heading > 70.0, "heading = {heading}");

        // Still inside the window: follow-up deltas stay boosted
        let heading = f.smooth(90.0, 8.0, now + Duration::from_millis(300));
        assert!(heading > 85.0, "heading = {heading}");
    }

    #[test]
    fn test_quick_window_relaxes() {
        let mut f = filter();
        let now = Instant::now();

        f.smooth(0.0, 5.0, now);
        f.smooth(90.0, 5.0, now + Duration::from_millis(100));

        // Past the window a small delta is damped again
        let before = f.current_deg().unwrap();
        let after = f.smooth(before + 10.0, 5.0, now + Duration::from_secs(5));
        assert!(after - before < 5.0, "delta applied = {}", after - before);
    }

    #[test]
    fn test_blend_crosses_north_shortest_path() {
        let mut f = filter();
        let now = Instant::now();

        f.smooth(350.0, 5.0, now);
        let heading = f.smooth(10.0, 5.0, now + Duration::from_secs(1));

        // Must rotate through 0, not backwards through 180
        assert!(heading > 350.0 || heading < 10.0, "heading = {heading}");
    }

    #[test]
    fn test_faster_speed_blends_harder() {
        let now = Instant::now();

        let mut slow = filter();
        slow.smooth(0.0, 1.0, now);
        let slow_result = slow.smooth(30.0, 1.0, now + Duration::from_secs(1));

        let mut fast = filter();
        fast.smooth(0.0, 14.0, now);
        let fast_result = fast.smooth(30.0, 14.0, now + Duration::from_secs(1));

        assert!(fast_result > slow_result, "{fast_result} vs {slow_result}");
    }

    #[test]
    fn test_reset() {
        let mut f = filter();
        f.smooth(120.0, 5.0, Instant::now());
        f.reset();
        assert!(f.current_deg().is_none());
    }
}
