//! Speed-adaptive spatial filter over raw position reports.

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::{EngineConfig, MIN_DENOMINATOR};
use crate::geo::{distance_meters, GeoPoint};

/// Bounded ring buffer of recent fixes with recency-weighted averaging.
///
/// The window capacity adapts to the instantaneous speed estimated from the
/// last two raw reports: above the fast threshold the window collapses to a
/// single sample (raw passthrough), above the medium threshold it holds two,
/// otherwise it grows to the slow-speed length. The output is a linearly
/// recency-weighted average, so later samples dominate.
#[derive(Debug)]
pub struct PositionFilter {
    window: VecDeque<GeoPoint>,
    last_raw: Option<(GeoPoint, Instant)>,
    /// Speed estimate from the last two raw reports, in m/s.
    speed_mps: Option<f64>,
    fast_speed_mps: f64,
    medium_speed_mps: f64,
    slow_window: usize,
}

impl PositionFilter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.smoothing_slow_window),
            last_raw: None,
            speed_mps: None,
            fast_speed_mps: config.smoothing_fast_speed_mps,
            medium_speed_mps: config.smoothing_medium_speed_mps,
            slow_window: config.smoothing_slow_window.max(1),
        }
    }

    /// Filter a raw fix, returning the smoothed coordinate.
    pub fn add_report(&mut self, point: GeoPoint, at: Instant) -> GeoPoint {
        if let Some((prev_point, prev_at)) = self.last_raw {
            let dt = at
                .checked_duration_since(prev_at)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0);
            if dt > MIN_DENOMINATOR {
                self.speed_mps = Some(distance_meters(prev_point, point) / dt);
            }
        }
        self.last_raw = Some((point, at));

        let capacity = self.capacity_for_speed();
        self.window.push_back(point);
        while self.window.len() > capacity {
            self.window.pop_front();
        }

        self.weighted_average()
    }

    /// The most recent speed estimate, if two reports have arrived.
    pub fn speed_mps(&self) -> Option<f64> {
        self.speed_mps
    }

    /// The most recent raw fix, if any.
    pub fn last_raw(&self) -> Option<GeoPoint> {
        self.last_raw.map(|(point, _)| point)
    }

    /// Clear all buffered samples and estimates.
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_raw = None;
        self.speed_mps = None;
    }

    fn capacity_for_speed(&self) -> usize {
        match self.speed_mps {
            Some(speed) if speed > self.fast_speed_mps => 1,
            Some(speed) if speed > self.medium_speed_mps => 2,
            _ => self.slow_window,
        }
    }

    fn weighted_average(&self) -> GeoPoint {
        let mut lat = 0.0;
        let mut lon = 0.0;
        let mut weight_sum = 0.0;

        for (i, point) in self.window.iter().enumerate() {
            let weight = (i + 1) as f64;
            lat += point.latitude * weight;
            lon += point.longitude * weight;
            weight_sum += weight;
        }

        // The window always holds the sample just pushed.
        GeoPoint {
            latitude: lat / weight_sum,
            longitude: lon / weight_sum,
        }
    }
}
