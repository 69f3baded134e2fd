//! Turn-by-turn maneuver steps tied to a route snapshot.

use serde::Serialize;

use crate::geo::GeoPoint;

/// A single turn-by-turn instruction.
///
/// Steps arrive from the routing collaborator as an ordered list associated
/// 1:1 with a route path snapshot; they are replaced together with the path.
#[derive(Debug, Clone, Serialize)]
pub struct ManeuverStep {
    /// Where the maneuver happens.
    pub location: GeoPoint,
    /// Human-readable instruction text (spoken by the narration collaborator).
    pub instruction: String,
    /// Distance covered by this step in meters.
    pub distance_m: f64,
    /// Routing-provider maneuver tag ("turn-left", "roundabout", ...), if any.
    pub maneuver: Option<String>,
}

/// Ordered step list with traveled-distance matching.
#[derive(Debug, Clone, Default)]
pub struct StepSequence {
    steps: Vec<ManeuverStep>,
}

impl StepSequence {
    /// Create a sequence from the routing collaborator's ordered list.
    pub fn new(steps: Vec<ManeuverStep>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Get a step by index.
    pub fn get(&self, index: usize) -> Option<&ManeuverStep> {
        self.steps.get(index)
    }

    /// Find the step covering the given traveled distance.
    ///
    /// Walks the list accumulating per-step distances until the running sum
    /// reaches `traveled_m`; clamps to the last step once the sum is
    /// exhausted. Returns `None` for an empty sequence.
    pub fn index_for_traveled(&self, traveled_m: f64) -> Option<usize> {
        if self.steps.is_empty() {
            return None;
        }

        let traveled = traveled_m.max(0.0);
        let mut covered = 0.0;
        for (i, step) in self.steps.iter().enumerate() {
            covered += step.distance_m.max(0.0);
            if covered >= traveled {
                return Some(i);
            }
        }
        Some(self.steps.len() - 1)
    }
}
