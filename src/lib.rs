//! LiveTrack - live driver tracking for ride-hailing clients
//!
//! This library turns a sparse, noisy stream of an assigned driver's GPS
//! fixes into a smooth, continuously animated position and heading, plus
//! derived trip progress: remaining distance, ETA, the current turn-by-turn
//! instruction, off-route detection, and pickup/drop-off arrival.
//!
//! # High-Level API
//!
//! For most use cases, the [`engine`] module provides the full pipeline:
//!
//! ```ignore
//! use livetrack::config::EngineConfig;
//! use livetrack::engine::{EngineRunner, SharedNavigationEngine, TripPlan};
//!
//! let engine = SharedNavigationEngine::new(EngineConfig::default(), trip);
//! let handle = EngineRunner::new(engine.clone()).start(report_rx, cancel.clone());
//!
//! let mut events = engine.subscribe();
//! while let Ok(event) = events.recv().await {
//!     // Drive the map marker and voice narration
//! }
//! ```
//!
//! Map tiles, markers, voice synthesis, persistence, transport, and auth are
//! external collaborators: the engine computes *what* to show, never how it
//! is drawn or spoken.

pub mod config;
pub mod engine;
pub mod geo;
pub mod interp;
pub mod logging;
pub mod progress;
pub mod route;
pub mod smoothing;
pub mod time;
pub mod transport;

/// Version of the LiveTrack library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_geo_module_accessible() {
        let point = geo::GeoPoint::new(12.9716, 77.5946);
        assert!(point.is_ok());
    }
}
