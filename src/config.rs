//! Configuration for the navigation engine.
//!
//! This module defines the tunable thresholds for:
//! - Motion interpolation (teleport, animation duration, frame cadence)
//! - Route snapping and off-route detection
//! - Position/heading smoothing
//! - ETA extrapolation and arrival radii
//!
//! All values have defaults tuned for urban driving profiles.

use std::time::Duration;

// ==================== Motion Interpolation Defaults ====================

/// Position changes larger than this are rendered instantly, never animated.
///
/// Covers transport reconnects, large GPS jumps, and ride-phase target
/// switches, where an animated glide would look implausible.
pub const DEFAULT_TELEPORT_THRESHOLD_M: f64 = 120.0;

/// Position changes smaller than this update heading only.
///
/// Sub-meter jitter is not worth an animation; the marker holds still.
pub const DEFAULT_MIN_ANIMATE_DISTANCE_M: f64 = 0.5;

/// Lower bound on animation duration in milliseconds.
pub const DEFAULT_MIN_ANIMATION_MS: u64 = 180;

/// Upper bound on animation duration in milliseconds.
///
/// A sparse report stream must not stretch a single glide past this,
/// or the marker lags visibly behind the vehicle.
pub const DEFAULT_MAX_ANIMATION_MS: u64 = 1400;

/// Interval between interpolation frames in milliseconds (~10 Hz).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;

// ==================== Route Snapping Defaults ====================

/// Maximum perpendicular distance for snapping a position onto the route.
///
/// Beyond this the raw interpolated point is rendered instead, so a vehicle
/// that is genuinely off-route is not "magnetized" onto the polyline.
pub const DEFAULT_SNAP_MAX_M: f64 = 30.0;

/// Endpoint tolerance for skipping a route index rebuild.
///
/// A replacement path whose endpoints are within this distance of the
/// current path is treated as the same route, preserving animation
/// continuity.
pub const DEFAULT_ROUTE_ENDPOINT_EPSILON_M: f64 = 5.0;

// ==================== Off-Route Detection Defaults ====================

/// Perpendicular distance beyond which a sample counts as off-route.
pub const DEFAULT_OFFROUTE_THRESHOLD_M: f64 = 60.0;

/// Consecutive off-route samples required before requesting a reroute.
///
/// A single noisy fix must never trigger a reroute.
pub const DEFAULT_OFFROUTE_GRACE_COUNT: u32 = 3;

// ==================== Arrival Defaults ====================

/// Arrival radius around the pickup point in meters.
pub const DEFAULT_ARRIVAL_RADIUS_PICKUP_M: f64 = 30.0;

/// Arrival radius around the drop-off point in meters.
///
/// Wider than pickup: drop-off pins are routinely placed across
/// multi-lane roads from where the vehicle actually stops.
pub const DEFAULT_ARRIVAL_RADIUS_DROP_M: f64 = 50.0;

// ==================== ETA Defaults ====================

/// Fallback speed in m/s when no reference ETA has been supplied (~30 km/h).
pub const DEFAULT_FALLBACK_SPEED_MPS: f64 = 8.33;

// ==================== Position Smoothing Defaults ====================

/// Speed above which raw reports are trusted unsmoothed (window of 1).
pub const DEFAULT_SMOOTHING_FAST_SPEED_MPS: f64 = 15.0;

/// Speed above which the smoothing window shrinks to 2 samples.
pub const DEFAULT_SMOOTHING_MEDIUM_SPEED_MPS: f64 = 6.0;

/// Smoothing window length at low speeds, where GPS noise dominates.
pub const DEFAULT_SMOOTHING_SLOW_WINDOW: usize = 5;

// ==================== Heading Smoothing Defaults ====================

/// Base blend factor applied to every heading update.
pub const DEFAULT_HEADING_BASE_BLEND: f64 = 0.15;

/// Additional blend per 180 degrees of heading delta.
pub const DEFAULT_HEADING_DELTA_GAIN: f64 = 0.45;

/// Additional blend at or above the fast-speed threshold.
pub const DEFAULT_HEADING_SPEED_GAIN: f64 = 0.25;

/// Upper bound on the heading blend factor.
pub const DEFAULT_HEADING_MAX_BLEND: f64 = 0.9;

/// How far ahead along the route to aim the heading, in meters.
///
/// When the vehicle is snapped onto the route and the transport did not
/// report a heading, the marker points at the route this far ahead instead
/// of at the noisy fix-to-fix bearing.
pub const DEFAULT_HEADING_LOOKAHEAD_M: f64 = 15.0;

/// Heading delta that triggers the quick-rotate window, in degrees.
pub const DEFAULT_QUICK_ROTATE_DELTA_DEG: f64 = 45.0;

/// Duration of the quick-rotate window in milliseconds.
pub const DEFAULT_QUICK_ROTATE_WINDOW_MS: u64 = 800;

/// Minimum blend factor while the quick-rotate window is active.
pub const DEFAULT_QUICK_ROTATE_BLEND: f64 = 0.85;

// ==================== Step Narration Defaults ====================

/// Minimum interval between unchanged-index step re-announcements.
pub const DEFAULT_STEP_REPEAT_THROTTLE_SECS: u64 = 3;

// ==================== Feed Staleness Defaults ====================

/// Silence on the report stream longer than this marks the feed stale.
pub const DEFAULT_FEED_STALE_AFTER_SECS: u64 = 10;

/// Interval between feed staleness checks in the runner.
pub const DEFAULT_STALENESS_CHECK_INTERVAL_SECS: u64 = 2;

// ==================== Numeric Guards ====================

/// Minimum denominator for every speed/ratio computation.
pub const MIN_DENOMINATOR: f64 = 1e-6;

/// Floor applied to total route length to avoid division by zero.
pub const MIN_ROUTE_LENGTH_M: f64 = 1.0;

/// Configuration for a [`NavigationEngine`](crate::engine::NavigationEngine).
///
/// Groups every tunable threshold of the tracking pipeline. The defaults
/// match the `DEFAULT_*` constants above; construct with `..Default::default()`
/// to override a subset.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // ==================== Motion Interpolation ====================
    /// Position changes larger than this snap instantly (no animation).
    pub teleport_threshold_m: f64,

    /// Position changes smaller than this update heading only.
    pub min_animate_distance_m: f64,

    /// Lower bound on animation duration in milliseconds.
    pub min_animation_ms: u64,

    /// Upper bound on animation duration in milliseconds.
    pub max_animation_ms: u64,

    /// Interval between interpolation frames in milliseconds.
    pub frame_interval_ms: u64,

    // ==================== Route Snapping ====================
    /// Maximum perpendicular distance for snapping onto the route.
    pub snap_max_m: f64,

    /// Endpoint tolerance for skipping a route index rebuild.
    pub route_endpoint_epsilon_m: f64,

    // ==================== Off-Route ====================
    /// Perpendicular distance beyond which a sample counts as off-route.
    pub offroute_threshold_m: f64,

    /// Consecutive off-route samples required before requesting a reroute.
    pub offroute_grace_count: u32,

    // ==================== Arrival ====================
    /// Arrival radius around the pickup point in meters.
    pub arrival_radius_pickup_m: f64,

    /// Arrival radius around the drop-off point in meters.
    pub arrival_radius_drop_m: f64,

    // ==================== ETA ====================
    /// Fallback speed in m/s when no reference ETA is available.
    pub fallback_speed_mps: f64,

    // ==================== Position Smoothing ====================
    /// Speed above which raw reports are trusted unsmoothed.
    pub smoothing_fast_speed_mps: f64,

    /// Speed above which the smoothing window shrinks to 2 samples.
    pub smoothing_medium_speed_mps: f64,

    /// Smoothing window length at low speeds.
    pub smoothing_slow_window: usize,

    // ==================== Heading Smoothing ====================
    /// Base blend factor applied to every heading update.
    pub heading_base_blend: f64,

    /// Additional blend per 180 degrees of heading delta.
    pub heading_delta_gain: f64,

    /// Additional blend at or above the fast-speed threshold.
    pub heading_speed_gain: f64,

    /// Upper bound on the heading blend factor.
    pub heading_max_blend: f64,

    /// How far ahead along the route to aim the heading, in meters.
    pub heading_lookahead_m: f64,

    /// Heading delta that triggers the quick-rotate window, in degrees.
    pub quick_rotate_delta_deg: f64,

    /// Duration of the quick-rotate window in milliseconds.
    pub quick_rotate_window_ms: u64,

    /// Minimum blend factor while the quick-rotate window is active.
    pub quick_rotate_blend: f64,

    // ==================== Step Narration ====================
    /// Minimum interval between unchanged-index step re-announcements.
    pub step_repeat_throttle_secs: u64,

    // ==================== Feed Staleness ====================
    /// Silence on the report stream longer than this marks the feed stale.
    pub feed_stale_after_secs: u64,

    /// Interval between feed staleness checks in the runner.
    pub staleness_check_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            teleport_threshold_m: DEFAULT_TELEPORT_THRESHOLD_M,
            min_animate_distance_m: DEFAULT_MIN_ANIMATE_DISTANCE_M,
            min_animation_ms: DEFAULT_MIN_ANIMATION_MS,
            max_animation_ms: DEFAULT_MAX_ANIMATION_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,

            snap_max_m: DEFAULT_SNAP_MAX_M,
            route_endpoint_epsilon_m: DEFAULT_ROUTE_ENDPOINT_EPSILON_M,

            offroute_threshold_m: DEFAULT_OFFROUTE_THRESHOLD_M,
            offroute_grace_count: DEFAULT_OFFROUTE_GRACE_COUNT,

            arrival_radius_pickup_m: DEFAULT_ARRIVAL_RADIUS_PICKUP_M,
            arrival_radius_drop_m: DEFAULT_ARRIVAL_RADIUS_DROP_M,

            fallback_speed_mps: DEFAULT_FALLBACK_SPEED_MPS,

            smoothing_fast_speed_mps: DEFAULT_SMOOTHING_FAST_SPEED_MPS,
            smoothing_medium_speed_mps: DEFAULT_SMOOTHING_MEDIUM_SPEED_MPS,
            smoothing_slow_window: DEFAULT_SMOOTHING_SLOW_WINDOW,

            heading_base_blend: DEFAULT_HEADING_BASE_BLEND,
            heading_delta_gain: DEFAULT_HEADING_DELTA_GAIN,
            heading_speed_gain: DEFAULT_HEADING_SPEED_GAIN,
            heading_max_blend: DEFAULT_HEADING_MAX_BLEND,
            heading_lookahead_m: DEFAULT_HEADING_LOOKAHEAD_M,
            quick_rotate_delta_deg: DEFAULT_QUICK_ROTATE_DELTA_DEG,
            quick_rotate_window_ms: DEFAULT_QUICK_ROTATE_WINDOW_MS,
            quick_rotate_blend: DEFAULT_QUICK_ROTATE_BLEND,

            step_repeat_throttle_secs: DEFAULT_STEP_REPEAT_THROTTLE_SECS,

            feed_stale_after_secs: DEFAULT_FEED_STALE_AFTER_SECS,
            staleness_check_interval_secs: DEFAULT_STALENESS_CHECK_INTERVAL_SECS,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the frame interval as a Duration.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Get the quick-rotate window as a Duration.
    pub fn quick_rotate_window(&self) -> Duration {
        Duration::from_millis(self.quick_rotate_window_ms)
    }

    /// Get the step re-announcement throttle as a Duration.
    pub fn step_repeat_throttle(&self) -> Duration {
        Duration::from_secs(self.step_repeat_throttle_secs)
    }

    /// Get the feed staleness threshold as a Duration.
    pub fn feed_stale_after(&self) -> Duration {
        Duration::from_secs(self.feed_stale_after_secs)
    }

    /// Get the staleness check interval as a Duration.
    pub fn staleness_check_interval(&self) -> Duration {
        Duration::from_secs(self.staleness_check_interval_secs)
    }

    /// Clamp a raw animation duration into the configured bounds.
    pub fn clamp_animation(&self, raw: Duration) -> Duration {
        let min = Duration::from_millis(self.min_animation_ms);
        let max = Duration::from_millis(self.max_animation_ms);
        raw.clamp(min, max)
    }
}
