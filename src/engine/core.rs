//! The navigation engine: one instance per tracked ride.

use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::EngineConfig;
use crate::geo::{bearing_degrees, distance_meters, GeoPoint};
use crate::interp::{MotionInterpolator, MotionSample};
use crate::progress::{ArrivalKind, ProgressEvent, ProgressTracker, ReferenceEta};
use crate::route::{ManeuverStep, RouteIndex, RouteProjection, StepSequence};
use crate::smoothing::{HeadingFilter, PositionFilter};

use super::events::NavigationEvent;
use super::state::{FeedStatus, NavigationState, RawPositionReport, RidePhase, TripPlan};

/// Orchestrates smoothing, interpolation, and progress tracking for one
/// ride, and publishes the derived [`NavigationState`].
///
/// All entry points are synchronous and non-blocking; frames are driven
/// externally (see [`EngineRunner`](crate::engine::EngineRunner)). Every
/// piece of mutable tracking state lives on this struct, owned by exactly
/// one ride, so no entry point needs a lock.
pub struct NavigationEngine {
    config: EngineConfig,
    trip: TripPlan,
    phase: RidePhase,
    route: Option<RouteIndex>,
    position_filter: PositionFilter,
    heading_filter: HeadingFilter,
    interpolator: MotionInterpolator,
    tracker: ProgressTracker,
    state: NavigationState,
    events_tx: broadcast::Sender<NavigationEvent>,
    last_report_at: Option<Instant>,
    stopped: bool,
}

impl NavigationEngine {
    /// Create an engine for a ride, publishing events into `events_tx`.
    ///
    /// Tracking starts in [`RidePhase::SearchingForRider`]; the ride-state
    /// collaborator drives subsequent transitions.
    pub fn new(
        config: EngineConfig,
        trip: TripPlan,
        events_tx: broadcast::Sender<NavigationEvent>,
    ) -> Self {
        let phase = RidePhase::SearchingForRider;
        Self {
            position_filter: PositionFilter::new(&config),
            heading_filter: HeadingFilter::new(&config),
            interpolator: MotionInterpolator::new(&config),
            tracker: ProgressTracker::new(&config),
            state: NavigationState::fresh(phase),
            config,
            trip,
            phase,
            route: None,
            events_tx,
            last_report_at: None,
            stopped: false,
        }
    }

    /// The latest published snapshot.
    pub fn state(&self) -> NavigationState {
        self.state.clone()
    }

    pub fn phase(&self) -> RidePhase {
        self.phase
    }

    pub fn feed_status(&self) -> FeedStatus {
        self.state.feed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Current generation token of the interpolator.
    pub fn generation(&self) -> u64 {
        self.interpolator.generation()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ingest one position report from the transport.
    ///
    /// Filters the fix, resolves the heading (server-reported heading takes
    /// precedence over the computed bearing), and either publishes
    /// immediately or schedules an animation toward the filtered target.
    pub fn on_position_report(&mut self, report: RawPositionReport) {
        if self.stopped {
            return;
        }
        let now = report.timestamp;
        self.last_report_at = Some(now);

        if self.state.feed != FeedStatus::Live {
            self.state.feed = FeedStatus::Live;
            tracing::info!("Position feed live");
            self.emit(NavigationEvent::FeedStatusChanged(FeedStatus::Live));
        }

        let previous_raw = self.position_filter.last_raw();
        let smoothed = self.position_filter.add_report(report.point, now);
        let speed_mps = self.position_filter.speed_mps().unwrap_or(0.0);

        // Server-reported heading wins; otherwise aim along the route just
        // ahead of the snapped position; otherwise fall back to the
        // fix-to-fix bearing.
        let raw_bearing = report
            .heading_deg
            .or_else(|| self.route_lookahead_bearing(smoothed))
            .or_else(|| {
                previous_raw.and_then(|previous| {
                    (distance_meters(previous, report.point) >= self.config.min_animate_distance_m)
                        .then(|| bearing_degrees(previous, report.point))
                })
            });
        let heading = match raw_bearing {
            Some(bearing) => self.heading_filter.smooth(bearing, speed_mps, now),
            None => self.heading_filter.current_deg().unwrap_or(0.0),
        };

        let outcome = self.interpolator.on_target(smoothed, heading, now);
        if let Some(sample) = outcome.immediate_sample() {
            self.publish(sample, now);
        }
    }

    /// Advance the in-flight animation, if any, and publish the frame.
    pub fn advance_frame(&mut self, now: Instant) {
        if self.stopped {
            return;
        }
        if let Some(sample) = self.interpolator.frame(now) {
            self.publish(sample, now);
        }
    }

    /// Install a new route path and step list, supplied wholesale.
    ///
    /// The index is rebuilt unless the new path's endpoints are within the
    /// configured epsilon of the current path's, in which case the re-sent
    /// route is ignored and animation continuity is preserved.
    pub fn on_route_replaced(&mut self, path: Vec<GeoPoint>, steps: Vec<ManeuverStep>) {
        if self.stopped {
            return;
        }

        if let Some(current) = &self.route {
            if current.endpoints_match(&path, self.config.route_endpoint_epsilon_m) {
                tracing::debug!(
                    point_count = path.len(),
                    "Route re-sent with matching endpoints, keeping current index"
                );
                self.emit(NavigationEvent::RouteReplaced {
                    point_count: path.len(),
                    rebuilt: false,
                });
                return;
            }
        }

        let point_count = path.len();
        tracing::info!(point_count, step_count = steps.len(), "Route replaced");
        self.route = Some(RouteIndex::build(path));
        self.tracker.replace_steps(StepSequence::new(steps));
        self.state = self.state.reset_carrying_motion(self.phase);
        self.emit(NavigationEvent::RouteReplaced {
            point_count,
            rebuilt: true,
        });
    }

    /// React to a ride-phase transition. Re-entering the current phase is a
    /// no-op, so a re-confirmed phase never disturbs a running animation.
    pub fn on_phase_changed(&mut self, phase: RidePhase) {
        if self.stopped || phase == self.phase {
            return;
        }

        tracing::info!(from = %self.phase, to = %phase, "Ride phase changed");
        self.phase = phase;
        // Window samples from the previous leg must not drag the new one;
        // heading and the animated position carry over untouched.
        self.position_filter.reset();
        self.tracker.reset_leg();
        if let Some(kind) = phase.armed_arrival() {
            self.tracker.arm_arrival(kind);
        }
        self.state = self.state.reset_carrying_motion(phase);
        self.emit(NavigationEvent::PhaseChanged(phase));
    }

    /// Supply a reference ETA for speed calibration.
    pub fn set_reference_eta(&mut self, reference: ReferenceEta) {
        if self.stopped {
            return;
        }
        self.tracker.set_reference_eta(reference);
    }

    /// Flip the feed to stale if no report arrived within the window.
    ///
    /// Called periodically by the runner; the published state freezes at its
    /// last known value.
    pub fn check_feed(&mut self, now: Instant) {
        if self.stopped || self.state.feed != FeedStatus::Live {
            return;
        }
        let Some(last) = self.last_report_at else {
            return;
        };
        if now.saturating_duration_since(last) > self.config.feed_stale_after() {
            self.state.feed = FeedStatus::Stale;
            tracing::warn!(
                silent_secs = now.saturating_duration_since(last).as_secs(),
                "Position feed stale, freezing at last known state"
            );
            self.emit(NavigationEvent::FeedStatusChanged(FeedStatus::Stale));
        }
    }

    /// Stop tracking: invalidate pending frames and refuse further input.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.interpolator.cancel();
        tracing::info!("Navigation engine stopped");
    }

    /// Publish one motion sample: snap to the route when close enough,
    /// recompute progress, update the snapshot, notify subscribers.
    fn publish(&mut self, sample: MotionSample, now: Instant) {
        let (coordinate, projection) = self.snap(sample.point);

        let route = self.route.as_ref().filter(|r| r.is_projectable());
        let armed = self.phase.armed_arrival().map(|kind| {
            let target = match kind {
                ArrivalKind::Pickup => self.trip.pickup,
                ArrivalKind::Drop => self.trip.dropoff,
            };
            (kind, target)
        });

        let outcome = self.tracker.recompute(
            coordinate,
            route,
            projection.as_ref(),
            self.phase.active_target(&self.trip),
            armed,
            now,
        );

        self.state.coordinate = Some(coordinate);
        self.state.heading_deg = sample.heading_deg;
        self.state.remaining_m = outcome.remaining_m;
        self.state.eta_secs = outcome.eta_secs;
        self.state.step_index = outcome.step_index;
        self.state.offroute_streak = outcome.offroute_streak;
        self.state.arrived_pickup = self.tracker.arrived_pickup();
        self.state.arrived_drop = self.tracker.arrived_drop();

        for event in outcome.events {
            let mapped = self.map_progress_event(event);
            self.emit(mapped);
        }
        self.emit(NavigationEvent::PositionUpdated(self.state.clone()));
    }

    /// Project onto the active route; render the snapped coordinate only
    /// when the vehicle is within the snap tolerance, so a genuinely
    /// off-route vehicle is not magnetized onto the polyline.
    fn snap(&self, point: GeoPoint) -> (GeoPoint, Option<RouteProjection>) {
        let Some(route) = self.route.as_ref().filter(|r| r.is_projectable()) else {
            return (point, None);
        };
        match route.project(point) {
            Some(projection) if projection.perpendicular_m <= self.config.snap_max_m => {
                (projection.point, Some(projection))
            }
            Some(projection) => (point, Some(projection)),
            None => (point, None),
        }
    }

    /// Bearing toward a point a short way ahead along the route, when the
    /// target sits within snap tolerance of it.
    fn route_lookahead_bearing(&self, target: GeoPoint) -> Option<f64> {
        let route = self.route.as_ref().filter(|r| r.is_projectable())?;
        let projection = route.project(target)?;
        if projection.perpendicular_m > self.config.snap_max_m {
            return None;
        }
        let (ahead, _, _) = route.point_ahead(
            projection.segment_index,
            projection.t,
            self.config.heading_lookahead_m,
        );
        (distance_meters(projection.point, ahead) >= self.config.min_animate_distance_m)
            .then(|| bearing_degrees(projection.point, ahead))
    }

    fn map_progress_event(&self, event: ProgressEvent) -> NavigationEvent {
        match event {
            ProgressEvent::StepChanged { index } => NavigationEvent::StepChanged {
                index,
                instruction: self.instruction_text(index),
            },
            ProgressEvent::StepReaffirmed { index } => NavigationEvent::StepReaffirmed {
                index,
                instruction: self.instruction_text(index),
            },
            ProgressEvent::RouteDeviation { streak, distance_m } => {
                NavigationEvent::RouteDeviation { streak, distance_m }
            }
            ProgressEvent::RerouteNeeded => NavigationEvent::RerouteNeeded,
            ProgressEvent::ArrivedPickup => NavigationEvent::ArrivedAtPickup,
            ProgressEvent::ArrivedDrop => NavigationEvent::ArrivedAtDrop,
        }
    }

    fn instruction_text(&self, index: usize) -> String {
        self.tracker
            .step(index)
            .map(|step| step.instruction.clone())
            .unwrap_or_default()
    }

    /// Best-effort publication: nobody listening is not an error.
    fn emit(&self, event: NavigationEvent) {
        let _ = self.events_tx.send(event);
    }
}
