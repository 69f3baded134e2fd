//! Trip progress derivation: remaining distance, ETA, current step,
//! off-route detection, arrival detection.
//!
//! [`ProgressTracker`] is recomputed on every published position sample and
//! owns all per-ride progress counters (step index, off-route streak,
//! arrival one-shots). It never talks to collaborators directly; it returns
//! [`ProgressEvent`]s for the engine to publish.

pub mod tracker;

pub use tracker::{
    ArrivalKind, ProgressEvent, ProgressOutcome, ProgressTracker, ReferenceEta,
};
