//! Route geometry: precomputed path index and maneuver steps.
//!
//! A route is an ordered coordinate path supplied wholesale by an external
//! routing collaborator. This module precomputes segment geometry once per
//! replacement ([`RouteIndex`]) and associates the ordered turn-by-turn
//! instruction list with that snapshot ([`StepSequence`]).

pub mod index;
pub mod steps;

pub use index::{RouteIndex, RouteProjection};
pub use steps::{ManeuverStep, StepSequence};
