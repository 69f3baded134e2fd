//! Frame-based motion interpolation with preemptive cancellation.
//!
//! Discrete position reports arrive every few seconds; the map renders at
//! interactive rates. This module turns each filtered report into a short
//! animation plan sampled at a fixed cadence, so the marker glides between
//! fixes instead of hopping.
//!
//! # Cancellation
//!
//! Every mutating call increments a monotonic generation token. The frame
//! loop checks the token on every sample; a plan scheduled by a superseded
//! update can never emit, so interleaved updates always converge on the
//! newest target (last-update-wins).
//!
//! - [`plan`] - pure animation plan and sample types
//! - [`interpolator`] - the stateful [`MotionInterpolator`]

pub mod interpolator;
pub mod plan;

pub use interpolator::{MotionInterpolator, UpdateOutcome};
pub use plan::{AnimationPlan, MotionSample};
