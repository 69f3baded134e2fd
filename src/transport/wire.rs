//! Serde payload shapes and validated conversion into engine types.

use serde::Deserialize;
use thiserror::Error;

use crate::engine::RawPositionReport;
use crate::geo::{GeoError, GeoPoint};
use crate::route::ManeuverStep;
use crate::time::epoch_millis_to_instant;

/// Errors produced while converting wire payloads.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Coordinate failed validation.
    #[error("Invalid coordinate in payload: {0}")]
    Coordinate(#[from] GeoError),

    /// Timestamp predates the process start or cannot be represented.
    #[error("Unrepresentable timestamp: {0} ms since epoch")]
    Timestamp(u64),
}

/// One position fix as delivered by the transport.
///
/// ```json
/// {"latitude": 12.9716, "longitude": 77.5946, "heading": 84.0, "timestamp_ms": 1754300000000}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WirePositionReport {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub heading: Option<f64>,
    pub timestamp_ms: u64,
}

impl WirePositionReport {
    /// Validate and convert into an engine report.
    ///
    /// The epoch timestamp is mapped onto the monotonic clock so report age
    /// is preserved for staleness logic.
    pub fn into_report(self) -> Result<RawPositionReport, TransportError> {
        let point = GeoPoint::new(self.latitude, self.longitude)?;
        let timestamp = epoch_millis_to_instant(self.timestamp_ms)
            .ok_or(TransportError::Timestamp(self.timestamp_ms))?;
        RawPositionReport::new(point, self.heading, timestamp).map_err(TransportError::from)
    }
}

/// One maneuver step as delivered by the routing collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct WireStep {
    pub latitude: f64,
    pub longitude: f64,
    pub instruction: String,
    pub distance_m: f64,
    #[serde(default)]
    pub maneuver: Option<String>,
}

impl WireStep {
    pub fn into_step(self) -> Result<ManeuverStep, TransportError> {
        Ok(ManeuverStep {
            location: GeoPoint::new(self.latitude, self.longitude)?,
            instruction: self.instruction,
            distance_m: self.distance_m,
            maneuver: self.maneuver,
        })
    }
}

/// A route replacement payload: ordered path plus its step list.
#[derive(Debug, Clone, Deserialize)]
pub struct WireRoute {
    /// Ordered `[latitude, longitude]` pairs.
    pub path: Vec<[f64; 2]>,
    #[serde(default)]
    pub steps: Vec<WireStep>,
}

impl WireRoute {
    /// Validate and convert into engine path/step lists.
    ///
    /// The whole payload is rejected if any element is invalid; a partially
    /// applied route would desynchronize path and steps.
    pub fn into_route(self) -> Result<(Vec<GeoPoint>, Vec<ManeuverStep>), TransportError> {
        let path = self
            .path
            .into_iter()
            .map(|[latitude, longitude]| GeoPoint::new(latitude, longitude))
            .collect::<Result<Vec<_>, _>>()?;
        let steps = self
            .steps
            .into_iter()
            .map(WireStep::into_step)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((path, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn now_epoch_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    #[test]
    fn test_report_deserializes_and_converts() {
        let json = format!(
            r#"{{"latitude": 12.9716, "longitude": 77.5946, "heading": 84.0, "timestamp_ms": {}}}"#,
            now_epoch_ms()
        );
        let wire: WirePositionReport = serde_json::from_str(&json).unwrap();

        let report = wire.into_report().unwrap();
        assert_eq!(report.point, GeoPoint::new(12.9716, 77.5946).unwrap());
        assert_eq!(report.heading_deg, Some(84.0));
    }

    #[test]
    fn test_report_heading_optional() {
        let json = format!(
            r#"{{"latitude": 0.0, "longitude": 0.0, "timestamp_ms": {}}}"#,
            now_epoch_ms()
        );
        let wire: WirePositionReport = serde_json::from_str(&json).unwrap();

        let report = wire.into_report().unwrap();
        assert_eq!(report.heading_deg, None);
    }

    #[test]
    fn test_report_rejects_bad_coordinate() {
        let wire = WirePositionReport {
            latitude: 95.0,
            longitude: 0.0,
            heading: None,
            timestamp_ms: now_epoch_ms(),
        };
        assert!(matches!(
            wire.into_report(),
            Err(TransportError::Coordinate(_))
        ));
    }

    #[test]
    fn test_report_rejects_non_finite_heading() {
        let wire = WirePositionReport {
            latitude: 0.0,
            longitude: 0.0,
            heading: Some(f64::NAN),
            timestamp_ms: now_epoch_ms(),
        };
        assert!(wire.into_report().is_err());
    }

    #[test]
    fn test_route_converts_path_and_steps() {
        let json = r#"{
            "path": [[0.0, 0.0], [0.0, 0.001], [0.0, 0.002]],
            "steps": [
                {"latitude": 0.0, "longitude": 0.0, "instruction": "Head east", "distance_m": 111.0},
                {"latitude": 0.0, "longitude": 0.001, "instruction": "Arrive", "distance_m": 111.0, "maneuver": "arrive"}
            ]
        }"#;
        let wire: WireRoute = serde_json::from_str(json).unwrap();

        let (path, steps) = wire.into_route().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].maneuver.as_deref(), Some("arrive"));
    }

    #[test]
    fn test_route_rejects_any_invalid_point() {
        let wire = WireRoute {
            path: vec![[0.0, 0.0], [0.0, 200.0]],
            steps: Vec::new(),
        };
        assert!(wire.into_route().is_err());
    }
}
