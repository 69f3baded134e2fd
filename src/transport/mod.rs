//! Wire-format payloads from the real-time transport collaborator.
//!
//! The transport (socket, push channel) is out of scope; this module only
//! defines the serde shapes it delivers and their validated conversion into
//! engine types. Malformed payloads convert to [`TransportError`] at this
//! boundary and never reach the engine.

pub mod wire;

pub use wire::{TransportError, WirePositionReport, WireRoute, WireStep};
