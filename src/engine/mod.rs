//! Navigation Engine - live tracking for one ride.
//!
//! This module provides a **single source of truth** for the tracked
//! driver's animated position and trip progress, collapsing what would
//! otherwise be per-screen tracking logic into one engine per ride.
//!
//! # Architecture
//!
//! The engine sits between the real-time transport and the UI/narration
//! collaborators:
//!
//! - **Transport** → pushes raw GPS fixes (`RawPositionReport`)
//! - **Routing** → supplies route paths and step lists wholesale
//! - **Ride state** → drives phase transitions
//! - **Renderer / narration** → read [`NavigationState`] snapshots and
//!   subscribe to [`NavigationEvent`]s
//!
//! Each incoming fix is filtered ([`smoothing`](crate::smoothing)),
//! animated toward at a fixed cadence ([`interp`](crate::interp)), snapped
//! onto the active route when close enough, and folded into trip progress
//! ([`progress`](crate::progress)). The engine never renders or speaks;
//! publication is best-effort and one-way.
//!
//! # Usage
//!
//! ```ignore
//! use livetrack::config::EngineConfig;
//! use livetrack::engine::{EngineRunner, SharedNavigationEngine, TripPlan};
//!
//! let engine = SharedNavigationEngine::new(EngineConfig::default(), trip);
//! let runner = EngineRunner::new(engine.clone());
//! let handle = runner.start(report_rx, cancel_token.clone());
//!
//! // Query current state
//! let state = engine.state();
//!
//! // Subscribe to events
//! let mut rx = engine.subscribe();
//! while let Ok(event) = rx.recv().await {
//!     // Handle step changes, arrivals, reroute requests...
//! }
//! ```
//!
//! # Components
//!
//! - [`state`] - Core types: `NavigationState`, `RidePhase`, `TripPlan`, `FeedStatus`
//! - [`core`] - `NavigationEngine` with the synchronous orchestration logic
//! - [`events`] - `NavigationEvent` notifications
//! - [`shared`] - `NavigationProvider`/`NavigationBroadcaster` traits and the shared wrapper
//! - [`runner`] - `EngineRunner`, the async frame loop daemon

pub mod core;
pub mod events;
pub mod runner;
pub mod shared;
pub mod state;

pub use core::NavigationEngine;
pub use events::NavigationEvent;
pub use runner::EngineRunner;
pub use shared::{NavigationBroadcaster, NavigationProvider, SharedNavigationEngine};
pub use state::{FeedStatus, NavigationState, RawPositionReport, RidePhase, TripPlan};
