//! Engine-published notifications.

use super::state::{FeedStatus, NavigationState, RidePhase};

/// Notifications broadcast to renderer/narration subscribers.
///
/// Publication is best-effort and one-way: a lagging or closed subscriber
/// never blocks or halts the engine.
#[derive(Debug, Clone)]
pub enum NavigationEvent {
    /// A new snapshot was published (every interpolation frame).
    PositionUpdated(NavigationState),
    /// The current maneuver step advanced. Narration speaks `instruction`.
    StepChanged { index: usize, instruction: String },
    /// Unchanged step re-announced, throttled for log/narration hygiene.
    StepReaffirmed { index: usize, instruction: String },
    /// A sample breached the off-route threshold.
    RouteDeviation { streak: u32, distance_m: f64 },
    /// Off-route streak exhausted its grace; the routing collaborator
    /// should fetch a fresh route.
    RerouteNeeded,
    /// Driver entered the pickup radius (one-shot per phase).
    ArrivedAtPickup,
    /// Vehicle entered the drop-off radius (one-shot per phase).
    ArrivedAtDrop,
    /// The ride phase changed.
    PhaseChanged(RidePhase),
    /// A route path was installed (`rebuilt` is false when an equivalent
    /// path was re-sent and the index was kept).
    RouteReplaced { point_count: usize, rebuilt: bool },
    /// The report feed went live or stale.
    FeedStatusChanged(FeedStatus),
}
