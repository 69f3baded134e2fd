//! Progress state machine over the published position stream.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, MIN_DENOMINATOR};
use crate::geo::{distance_meters, GeoPoint};
use crate::route::{RouteIndex, RouteProjection, StepSequence};

/// Externally supplied ETA calibration: the routing provider's estimate for
/// the whole leg, used to derive an implied travel speed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReferenceEta {
    pub eta_minutes: f64,
    pub distance_km: f64,
}

impl ReferenceEta {
    /// Implied speed in m/s, or `None` when the reference is unusable
    /// (non-finite or non-positive values).
    pub fn implied_speed_mps(&self) -> Option<f64> {
        let eta_secs = self.eta_minutes * 60.0;
        let distance_m = self.distance_km * 1000.0;
        if !eta_secs.is_finite() || !distance_m.is_finite() || eta_secs <= MIN_DENOMINATOR {
            return None;
        }
        let speed = distance_m / eta_secs;
        (speed > MIN_DENOMINATOR).then_some(speed)
    }
}

/// Which arrival check is armed for the current ride phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalKind {
    Pickup,
    Drop,
}

/// Discrete progress notifications produced by a recompute.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The current maneuver step index advanced.
    StepChanged { index: usize },
    /// Unchanged step re-announced (throttled).
    StepReaffirmed { index: usize },
    /// The sample breached the off-route distance threshold.
    RouteDeviation { streak: u32, distance_m: f64 },
    /// The off-route streak reached the grace count.
    RerouteNeeded,
    /// The vehicle entered the pickup arrival radius (one-shot).
    ArrivedPickup,
    /// The vehicle entered the drop-off arrival radius (one-shot).
    ArrivedDrop,
}

/// Result of one progress recompute.
#[derive(Debug, Clone)]
pub struct ProgressOutcome {
    pub remaining_m: f64,
    pub eta_secs: f64,
    pub step_index: Option<usize>,
    pub offroute_streak: u32,
    pub events: Vec<ProgressEvent>,
}

/// Remaining distance, ETA, step matching, off-route streak, and arrival
/// detection for one tracked ride.
#[derive(Debug)]
pub struct ProgressTracker {
    steps: StepSequence,
    reference_speed_mps: Option<f64>,
    step_index: Option<usize>,
    last_step_announce: Option<Instant>,
    offroute_streak: u32,
    arrived_pickup: bool,
    arrived_drop: bool,
    fallback_speed_mps: f64,
    offroute_threshold_m: f64,
    offroute_grace: u32,
    arrival_radius_pickup_m: f64,
    arrival_radius_drop_m: f64,
    step_repeat_throttle: std::time::Duration,
}

impl ProgressTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            steps: StepSequence::default(),
            reference_speed_mps: None,
            step_index: None,
            last_step_announce: None,
            offroute_streak: 0,
            arrived_pickup: false,
            arrived_drop: false,
            fallback_speed_mps: config.fallback_speed_mps,
            offroute_threshold_m: config.offroute_threshold_m,
            offroute_grace: config.offroute_grace_count.max(1),
            arrival_radius_pickup_m: config.arrival_radius_pickup_m,
            arrival_radius_drop_m: config.arrival_radius_drop_m,
            step_repeat_throttle: config.step_repeat_throttle(),
        }
    }

    /// Install the step list for a new route snapshot.
    ///
    /// The step index may regress after this call; it never regresses
    /// otherwise.
    pub fn replace_steps(&mut self, steps: StepSequence) {
        self.steps = steps;
        self.step_index = None;
        self.last_step_announce = None;
        self.offroute_streak = 0;
    }

    /// Supply an ETA reference for speed calibration.
    ///
    /// An unusable reference (non-finite, zero) is ignored and the fallback
    /// speed stays in effect.
    pub fn set_reference_eta(&mut self, reference: ReferenceEta) {
        match reference.implied_speed_mps() {
            Some(speed) => {
                tracing::debug!(speed_mps = speed, "ETA reference speed calibrated");
                self.reference_speed_mps = Some(speed);
            }
            None => {
                tracing::warn!(
                    eta_minutes = reference.eta_minutes,
                    distance_km = reference.distance_km,
                    "Ignoring unusable ETA reference"
                );
            }
        }
    }

    /// Arm the arrival check for a phase entry, clearing its one-shot flag.
    pub fn arm_arrival(&mut self, kind: ArrivalKind) {
        match kind {
            ArrivalKind::Pickup => self.arrived_pickup = false,
            ArrivalKind::Drop => self.arrived_drop = false,
        }
    }

    /// Clear per-leg counters on a phase change (arrival flags persist).
    pub fn reset_leg(&mut self) {
        self.step_index = None;
        self.last_step_announce = None;
        self.offroute_streak = 0;
    }

    pub fn step_index(&self) -> Option<usize> {
        self.step_index
    }

    pub fn offroute_streak(&self) -> u32 {
        self.offroute_streak
    }

    pub fn arrived_pickup(&self) -> bool {
        self.arrived_pickup
    }

    pub fn arrived_drop(&self) -> bool {
        self.arrived_drop
    }

    pub fn step(&self, index: usize) -> Option<&crate::route::ManeuverStep> {
        self.steps.get(index)
    }

    /// The speed used for ETA extrapolation.
    pub fn effective_speed_mps(&self) -> f64 {
        self.reference_speed_mps
            .unwrap_or(self.fallback_speed_mps)
            .max(MIN_DENOMINATOR)
    }

    /// Recompute all progress facts for a published position sample.
    ///
    /// `projection` must come from `route` for the same `position`; both are
    /// absent when the active path has fewer than two points, in which case
    /// remaining distance falls back to the straight line toward
    /// `fallback_target` and route-dependent logic is disabled.
    pub fn recompute(
        &mut self,
        position: GeoPoint,
        route: Option<&RouteIndex>,
        projection: Option<&RouteProjection>,
        fallback_target: Option<GeoPoint>,
        armed_arrival: Option<(ArrivalKind, GeoPoint)>,
        now: Instant,
    ) -> ProgressOutcome {
        let mut events = Vec::new();

        let remaining_m = match (route, projection) {
            (Some(route), Some(projection)) => route.remaining_from(projection),
            _ => fallback_target
                .map(|target| distance_meters(position, target))
                .unwrap_or(0.0),
        };

        let eta_secs = (remaining_m / self.effective_speed_mps()).max(0.0);

        if let Some(route) = route {
            let traveled = (route.total_m() - remaining_m).max(0.0);
            self.match_step(traveled, now, &mut events);
        }

        if let Some(projection) = projection {
            self.check_offroute(projection, &mut events);
        }

        if let Some((kind, target)) = armed_arrival {
            self.check_arrival(kind, position, target, &mut events);
        }

        ProgressOutcome {
            remaining_m,
            eta_secs,
            step_index: self.step_index,
            offroute_streak: self.offroute_streak,
            events,
        }
    }

    fn match_step(&mut self, traveled_m: f64, now: Instant, events: &mut Vec<ProgressEvent>) {
        let Some(matched) = self.steps.index_for_traveled(traveled_m) else {
            return;
        };

        // Forward travel on one route never walks the instruction backwards;
        // regression is allowed only through replace_steps.
        let candidate = match self.step_index {
            Some(current) => matched.max(current),
            None => matched,
        };

        if self.step_index != Some(candidate) {
            self.step_index = Some(candidate);
            self.last_step_announce = Some(now);
            events.push(ProgressEvent::StepChanged { index: candidate });
            return;
        }

        let due = match self.last_step_announce {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.step_repeat_throttle,
        };
        if due {
            self.last_step_announce = Some(now);
            events.push(ProgressEvent::StepReaffirmed { index: candidate });
        }
    }

    fn check_offroute(&mut self, projection: &RouteProjection, events: &mut Vec<ProgressEvent>) {
        if projection.perpendicular_m > self.offroute_threshold_m {
            self.offroute_streak += 1;
            tracing::debug!(
                distance_m = projection.perpendicular_m,
                streak = self.offroute_streak,
                "Position beyond off-route threshold"
            );
            events.push(ProgressEvent::RouteDeviation {
                streak: self.offroute_streak,
                distance_m: projection.perpendicular_m,
            });

            if self.offroute_streak >= self.offroute_grace {
                tracing::info!("Off-route streak reached grace count, requesting reroute");
                events.push(ProgressEvent::RerouteNeeded);
                self.offroute_streak = 0;
            }
        } else {
            self.offroute_streak = 0;
        }
    }

    fn check_arrival(
        &mut self,
        kind: ArrivalKind,
        position: GeoPoint,
        target: GeoPoint,
        events: &mut Vec<ProgressEvent>,
    ) {
        let (fired, radius_m) = match kind {
            ArrivalKind::Pickup => (self.arrived_pickup, self.arrival_radius_pickup_m),
            ArrivalKind::Drop => (self.arrived_drop, self.arrival_radius_drop_m),
        };
        if fired {
            return;
        }
        if distance_meters(position, target) <= radius_m {
            match kind {
                ArrivalKind::Pickup => {
                    self.arrived_pickup = true;
                    events.push(ProgressEvent::ArrivedPickup);
                }
                ArrivalKind::Drop => {
                    self.arrived_drop = true;
                    events.push(ProgressEvent::ArrivedDrop);
                }
            }
            tracing::info!(?kind, "Arrival radius entered");
        }
    }
}
