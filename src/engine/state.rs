//! Core state types for ride tracking.
//!
//! This module defines the types shared across the engine:
//!
//! - [`RidePhase`] - externally driven trip lifecycle stage
//! - [`TripPlan`] - pickup/drop-off targets for the tracked ride
//! - [`FeedStatus`] - is the transport delivering position reports?
//! - [`RawPositionReport`] - one validated fix from the transport
//! - [`NavigationState`] - the published snapshot consumers read

use std::time::Instant;

use serde::Serialize;

use crate::geo::{GeoError, GeoPoint};
use crate::progress::ArrivalKind;

/// Externally driven lifecycle stage of a trip.
///
/// The phase machine is owned by the ride-state collaborator; the engine
/// only reacts, and re-entering the current phase is a no-op. Each phase
/// selects the active navigation target and which arrival check is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RidePhase {
    /// No driver assigned yet; nothing to track.
    SearchingForRider,
    /// Driver heading to the pickup point.
    EnRouteToPickup,
    /// Driver holding at the pickup point.
    WaitingAtPickup,
    /// Rider identity confirmed, about to depart.
    Verified,
    /// Trip in progress toward the drop-off point.
    OnTrip,
    /// Trip finished; tracking stops.
    Completed,
}

impl RidePhase {
    /// The navigation target this phase steers toward, if any.
    pub fn active_target(&self, trip: &TripPlan) -> Option<GeoPoint> {
        match self {
            Self::EnRouteToPickup | Self::WaitingAtPickup | Self::Verified => Some(trip.pickup),
            Self::OnTrip => Some(trip.dropoff),
            Self::SearchingForRider | Self::Completed => None,
        }
    }

    /// Which arrival check runs during this phase.
    pub fn armed_arrival(&self) -> Option<ArrivalKind> {
        match self {
            Self::EnRouteToPickup => Some(ArrivalKind::Pickup),
            Self::OnTrip => Some(ArrivalKind::Drop),
            _ => None,
        }
    }
}

impl std::fmt::Display for RidePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SearchingForRider => "SearchingForRider",
            Self::EnRouteToPickup => "EnRouteToPickup",
            Self::WaitingAtPickup => "WaitingAtPickup",
            Self::Verified => "Verified",
            Self::OnTrip => "OnTrip",
            Self::Completed => "Completed",
        };
        write!(f, "{label}")
    }
}

/// Pickup and drop-off coordinates for the tracked ride.
#[derive(Debug, Clone, Copy)]
pub struct TripPlan {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
}

/// Whether position reports are currently arriving.
///
/// Independent of everything else in the snapshot: a stale feed freezes the
/// published state at its last known value, it never clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FeedStatus {
    /// Reports arriving within the staleness window.
    Live,
    /// No report for longer than the staleness window (or none yet).
    #[default]
    Stale,
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "Live"),
            Self::Stale => write!(f, "Stale"),
        }
    }
}

/// One validated position fix from the real-time transport.
///
/// Construction is the validation boundary: a report that exists always
/// carries a finite, in-range coordinate and a finite heading (when present).
/// Server-reported heading takes precedence over any computed bearing.
#[derive(Debug, Clone, Copy)]
pub struct RawPositionReport {
    pub point: GeoPoint,
    pub heading_deg: Option<f64>,
    pub timestamp: Instant,
}

impl RawPositionReport {
    pub fn new(
        point: GeoPoint,
        heading_deg: Option<f64>,
        timestamp: Instant,
    ) -> Result<Self, GeoError> {
        if let Some(heading) = heading_deg {
            if !heading.is_finite() {
                return Err(GeoError::InvalidHeading(heading));
            }
        }
        Ok(Self {
            point,
            heading_deg,
            timestamp,
        })
    }
}

/// The published navigation snapshot.
///
/// Owned exclusively by one engine per tracked ride. Reset wholesale on
/// route or phase changes (coordinate and heading carry over so a reset is
/// never a visual jump); never mutated piecewise by consumers.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationState {
    /// Latest rendered coordinate (`None` until the first report).
    pub coordinate: Option<GeoPoint>,
    /// Latest rendered heading in degrees, [0, 360).
    pub heading_deg: f64,
    /// Distance to the end of the active leg in meters.
    pub remaining_m: f64,
    /// Estimated seconds to the end of the active leg.
    pub eta_secs: f64,
    /// Index of the current maneuver step, if a step list is active.
    pub step_index: Option<usize>,
    /// Consecutive off-route samples so far.
    pub offroute_streak: u32,
    /// Pickup arrival fired (one-shot).
    pub arrived_pickup: bool,
    /// Drop-off arrival fired (one-shot).
    pub arrived_drop: bool,
    /// Current ride phase.
    pub phase: RidePhase,
    /// Whether reports are arriving.
    pub feed: FeedStatus,
}

impl NavigationState {
    /// A fresh snapshot for a phase, before any report.
    pub fn fresh(phase: RidePhase) -> Self {
        Self {
            coordinate: None,
            heading_deg: 0.0,
            remaining_m: 0.0,
            eta_secs: 0.0,
            step_index: None,
            offroute_streak: 0,
            arrived_pickup: false,
            arrived_drop: false,
            phase,
            feed: FeedStatus::Stale,
        }
    }

    /// Wholesale reset that carries motion continuity into a new phase or
    /// route: coordinate, heading, feed status, and fired arrivals persist;
    /// all derived progress is cleared for recomputation.
    pub fn reset_carrying_motion(&self, phase: RidePhase) -> Self {
        Self {
            coordinate: self.coordinate,
            heading_deg: self.heading_deg,
            arrived_pickup: self.arrived_pickup,
            arrived_drop: self.arrived_drop,
            feed: self.feed,
            ..Self::fresh(phase)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn trip() -> TripPlan {
        TripPlan {
            pickup: pt(12.97, 77.59),
            dropoff: pt(12.93, 77.62),
        }
    }

    #[test]
    fn test_phase_targets() {
        let trip = trip();

        assert_eq!(
            RidePhase::EnRouteToPickup.active_target(&trip),
            Some(trip.pickup)
        );
        assert_eq!(RidePhase::Verified.active_target(&trip), Some(trip.pickup));
        assert_eq!(RidePhase::OnTrip.active_target(&trip), Some(trip.dropoff));
        assert_eq!(RidePhase::SearchingForRider.active_target(&trip), None);
        assert_eq!(RidePhase::Completed.active_target(&trip), None);
    }

    #[test]
    fn test_phase_armed_arrival() {
        assert_eq!(
            RidePhase::EnRouteToPickup.armed_arrival(),
            Some(ArrivalKind::Pickup)
        );
        assert_eq!(RidePhase::OnTrip.armed_arrival(), Some(ArrivalKind::Drop));
        assert_eq!(RidePhase::WaitingAtPickup.armed_arrival(), None);
        assert_eq!(RidePhase::Completed.armed_arrival(), None);
    }

    #[test]
    fn test_report_rejects_non_finite_heading() {
        let result = RawPositionReport::new(pt(0.0, 0.0), Some(f64::NAN), Instant::now());
        assert!(result.is_err());

        let ok = RawPositionReport::new(pt(0.0, 0.0), Some(90.0), Instant::now());
        assert!(ok.is_ok());
    }

    #[test]
    fn test_fresh_state() {
        let state = NavigationState::fresh(RidePhase::EnRouteToPickup);

        assert!(state.coordinate.is_none());
        assert_eq!(state.phase, RidePhase::EnRouteToPickup);
        assert_eq!(state.feed, FeedStatus::Stale);
        assert!(!state.arrived_pickup);
    }

    #[test]
    fn test_reset_carries_motion_and_arrivals() {
        let mut state = NavigationState::fresh(RidePhase::EnRouteToPickup);
        state.coordinate = Some(pt(12.97, 77.59));
        state.heading_deg = 135.0;
        state.remaining_m = 900.0;
        state.step_index = Some(3);
        state.offroute_streak = 2;
        state.arrived_pickup = true;
        state.feed = FeedStatus::Live;

        let reset = state.reset_carrying_motion(RidePhase::OnTrip);

        assert_eq!(reset.coordinate, Some(pt(12.97, 77.59)));
        assert_eq!(reset.heading_deg, 135.0);
        assert_eq!(reset.phase, RidePhase::OnTrip);
        assert_eq!(reset.feed, FeedStatus::Live);
        assert!(reset.arrived_pickup);
        // Derived progress cleared
        assert_eq!(reset.remaining_m, 0.0);
        assert_eq!(reset.step_index, None);
        assert_eq!(reset.offroute_streak, 0);
    }

    #[test]
    fn test_display_impls() {
        assert_eq!(RidePhase::OnTrip.to_string(), "OnTrip");
        assert_eq!(FeedStatus::Live.to_string(), "Live");
        assert_eq!(FeedStatus::Stale.to_string(), "Stale");
    }
}
