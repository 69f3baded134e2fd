//! Provider traits and shared wrapper for the navigation engine.
//!
//! This module defines the public interface for consumers of tracking data:
//!
//! - [`NavigationProvider`] - Query API (pull)
//! - [`NavigationBroadcaster`] - Subscription API (push)
//! - [`SharedNavigationEngine`] - Thread-safe wrapper combining both

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::EngineConfig;
use crate::geo::GeoPoint;
use crate::progress::ReferenceEta;
use crate::route::ManeuverStep;

use super::core::NavigationEngine;
use super::events::NavigationEvent;
use super::state::{FeedStatus, NavigationState, RawPositionReport, RidePhase, TripPlan};

/// Trait for querying tracking state (pull API).
///
/// Provides synchronous access to the latest published snapshot. Renderers
/// that poll on their own cadence read through this instead of subscribing.
pub trait NavigationProvider: Send + Sync {
    /// The latest published snapshot.
    fn state(&self) -> NavigationState;

    /// Current ride phase.
    fn phase(&self) -> RidePhase;

    /// Whether position reports are arriving.
    fn feed_status(&self) -> FeedStatus;

    /// Whether any position has been published yet.
    fn has_position(&self) -> bool;
}

/// Trait for subscribing to engine notifications (push API).
pub trait NavigationBroadcaster: Send + Sync {
    /// Subscribe to navigation events.
    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent>;
}

/// Shared navigation engine - thread-safe wrapper for one tracked ride.
///
/// Combines [`NavigationProvider`] and [`NavigationBroadcaster`] into a
/// single cloneable handle shared between the transport adapter, the frame
/// runner, and UI consumers.
#[derive(Clone)]
pub struct SharedNavigationEngine {
    inner: Arc<RwLock<NavigationEngine>>,
    events_tx: broadcast::Sender<NavigationEvent>,
}

impl SharedNavigationEngine {
    /// Create an engine for a ride and wrap it for sharing.
    pub fn new(config: EngineConfig, trip: TripPlan) -> Self {
        let (events_tx, _) = broadcast::channel(256);
        let engine = NavigationEngine::new(config, trip, events_tx.clone());
        Self {
            inner: Arc::new(RwLock::new(engine)),
            events_tx,
        }
    }

    /// Ingest a validated position report.
    pub fn on_position_report(&self, report: RawPositionReport) {
        self.inner.write().unwrap().on_position_report(report);
    }

    /// Ingest a raw fix, validating at the boundary.
    ///
    /// An invalid fix is rejected with a warning and the published state is
    /// retained unchanged. Returns true when the fix was accepted.
    pub fn receive_fix(
        &self,
        latitude: f64,
        longitude: f64,
        heading_deg: Option<f64>,
        timestamp: Instant,
    ) -> bool {
        let report = GeoPoint::new(latitude, longitude)
            .and_then(|point| RawPositionReport::new(point, heading_deg, timestamp));
        match report {
            Ok(report) => {
                self.on_position_report(report);
                true
            }
            Err(error) => {
                tracing::warn!(%error, latitude, longitude, "Rejected invalid position fix");
                false
            }
        }
    }

    /// Install a new route path and step list.
    pub fn on_route_replaced(&self, path: Vec<GeoPoint>, steps: Vec<ManeuverStep>) {
        self.inner.write().unwrap().on_route_replaced(path, steps);
    }

    /// React to a ride-phase transition.
    pub fn on_phase_changed(&self, phase: RidePhase) {
        self.inner.write().unwrap().on_phase_changed(phase);
    }

    /// Supply a reference ETA for speed calibration.
    pub fn set_reference_eta(&self, reference: ReferenceEta) {
        self.inner.write().unwrap().set_reference_eta(reference);
    }

    /// Advance the in-flight animation, if any.
    pub fn advance_frame(&self, now: Instant) {
        self.inner.write().unwrap().advance_frame(now);
    }

    /// Run the feed staleness check.
    pub fn check_feed(&self, now: Instant) {
        self.inner.write().unwrap().check_feed(now);
    }

    /// Stop tracking.
    pub fn stop(&self) {
        self.inner.write().unwrap().stop();
    }

    /// Whether the engine has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.inner.read().unwrap().is_stopped()
    }

    /// Current generation token of the interpolator.
    pub fn generation(&self) -> u64 {
        self.inner.read().unwrap().generation()
    }

    /// Engine configuration snapshot.
    pub fn config(&self) -> EngineConfig {
        self.inner.read().unwrap().config().clone()
    }
}

impl NavigationProvider for SharedNavigationEngine {
    fn state(&self) -> NavigationState {
        self.inner.read().unwrap().state()
    }

    fn phase(&self) -> RidePhase {
        self.inner.read().unwrap().phase()
    }

    fn feed_status(&self) -> FeedStatus {
        self.inner.read().unwrap().feed_status()
    }

    fn has_position(&self) -> bool {
        self.inner.read().unwrap().state().coordinate.is_some()
    }
}

impl NavigationBroadcaster for SharedNavigationEngine {
    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn shared() -> SharedNavigationEngine {
        SharedNavigationEngine::new(
            EngineConfig::default(),
            TripPlan {
                pickup: pt(0.0, 0.0),
                dropoff: pt(0.0, 0.002),
            },
        )
    }

    #[test]
    fn test_shared_no_position_initially() {
        let engine = shared();

        assert!(!engine.has_position());
        assert_eq!(engine.phase(), RidePhase::SearchingForRider);
        assert_eq!(engine.feed_status(), FeedStatus::Stale);
    }

    #[test]
    fn test_receive_fix_accepts_valid() {
        let engine = shared();

        assert!(engine.receive_fix(0.0, 0.0005, Some(90.0), Instant::now()));
        assert!(engine.has_position());
        assert_eq!(engine.feed_status(), FeedStatus::Live);
    }

    #[test]
    fn test_receive_fix_rejects_invalid_and_retains_state() {
        let engine = shared();

        engine.receive_fix(0.0, 0.0005, None, Instant::now());
        let before = engine.state();

        assert!(!engine.receive_fix(f64::NAN, 0.0, None, Instant::now()));
        assert!(!engine.receive_fix(12.0, 181.0, None, Instant::now()));
        assert!(!engine.receive_fix(0.0, 0.001, Some(f64::INFINITY), Instant::now()));

        let after = engine.state();
        assert_eq!(after.coordinate, before.coordinate);
        assert_eq!(after.heading_deg, before.heading_deg);
    }

    #[test]
    fn test_subscribe_receives_events() {
        let engine = shared();
        let mut rx = engine.subscribe();

        engine.receive_fix(0.0, 0.0, None, Instant::now());

        let mut saw_position = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, NavigationEvent::PositionUpdated(_)) {
                saw_position = true;
            }
        }
        assert!(saw_position);
    }

    #[test]
    fn test_clone_shares_state() {
        let engine = shared();
        let clone = engine.clone();

        engine.receive_fix(0.0, 0.0005, None, Instant::now());
        assert!(clone.has_position());

        clone.stop();
        assert!(engine.is_stopped());
    }
}
