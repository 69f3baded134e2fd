//! Noise reduction for the incoming position stream.
//!
//! GPS fixes from a moving vehicle wander inside a several-meter noise band,
//! and a marker that follows them verbatim shivers on screen. This module
//! filters both channels of a report:
//!
//! - [`PositionFilter`] - speed-adaptive recency-weighted window over recent
//!   coordinates. Fast travel trusts raw fixes (noise is small relative to
//!   motion); slow travel averages harder.
//! - [`HeadingFilter`] - adaptive circular blend toward the raw bearing with
//!   a quick-rotate window, so the marker neither snaps on every fix nor
//!   lags through sharp turns.

pub mod heading;
pub mod position;

pub use heading::HeadingFilter;
pub use position::PositionFilter;
