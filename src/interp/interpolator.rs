//! Stateful interpolator: reports in, bounded animation plans out.

use std::time::{Duration, Instant};

use crate::config::{EngineConfig, MIN_DENOMINATOR};
use crate::geo::{distance_meters, GeoPoint};

use super::plan::{AnimationPlan, MotionSample};

/// How a target update was applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    /// First observation: state set immediately, no animation.
    Initial(MotionSample),
    /// Movement below the animate threshold: heading updated in place.
    HeadingOnly(MotionSample),
    /// Jump beyond the teleport threshold: snapped with zero frames.
    Teleport(MotionSample),
    /// Glide scheduled; frames will carry the marker to the target.
    Animating { duration: Duration },
}

impl UpdateOutcome {
    /// The sample to publish immediately, if the update produced one.
    pub fn immediate_sample(&self) -> Option<MotionSample> {
        match self {
            Self::Initial(s) | Self::HeadingOnly(s) | Self::Teleport(s) => Some(*s),
            Self::Animating { .. } => None,
        }
    }
}

/// Converts discrete filtered targets into continuous animated motion.
///
/// At most one plan is active at a time. Every mutating entry point
/// increments the generation token; [`frame`](Self::frame) refuses to emit
/// from a plan whose recorded generation is stale, which makes update
/// ordering strictly last-wins regardless of frame timing.
#[derive(Debug)]
pub struct MotionInterpolator {
    generation: u64,
    plan: Option<AnimationPlan>,
    last_emitted: Option<MotionSample>,
    last_report_at: Option<Instant>,
    teleport_threshold_m: f64,
    min_animate_distance_m: f64,
    min_animation: Duration,
    max_animation: Duration,
}

impl MotionInterpolator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            generation: 0,
            plan: None,
            last_emitted: None,
            last_report_at: None,
            teleport_threshold_m: config.teleport_threshold_m,
            min_animate_distance_m: config.min_animate_distance_m,
            min_animation: Duration::from_millis(config.min_animation_ms),
            max_animation: Duration::from_millis(config.max_animation_ms),
        }
    }

    /// Current generation token. Incremented by every mutating entry point.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an animation plan is currently in flight.
    pub fn is_animating(&self) -> bool {
        self.plan.is_some()
    }

    /// The last emitted sample, if any.
    pub fn last_emitted(&self) -> Option<MotionSample> {
        self.last_emitted
    }

    /// Apply a new filtered target, preempting any in-flight plan.
    pub fn on_target(
        &mut self,
        target: GeoPoint,
        heading_deg: f64,
        now: Instant,
    ) -> UpdateOutcome {
        self.generation += 1;

        let elapsed = self
            .last_report_at
            .and_then(|prev| now.checked_duration_since(prev))
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.last_report_at = Some(now);

        let Some(last) = self.last_emitted else {
            let sample = MotionSample {
                point: target,
                heading_deg,
            };
            self.plan = None;
            self.last_emitted = Some(sample);
            return UpdateOutcome::Initial(sample);
        };

        let distance = distance_meters(last.point, target);

        if distance < self.min_animate_distance_m {
            let sample = MotionSample {
                point: last.point,
                heading_deg,
            };
            self.plan = None;
            self.last_emitted = Some(sample);
            return UpdateOutcome::HeadingOnly(sample);
        }

        if distance > self.teleport_threshold_m {
            let sample = MotionSample {
                point: target,
                heading_deg,
            };
            self.plan = None;
            self.last_emitted = Some(sample);
            tracing::debug!(distance_m = distance, "Teleporting past animation threshold");
            return UpdateOutcome::Teleport(sample);
        }

        let speed_mps = distance / elapsed.max(MIN_DENOMINATOR);
        let raw_duration = Duration::from_secs_f64(distance / speed_mps.max(MIN_DENOMINATOR));
        let duration = raw_duration.clamp(self.min_animation, self.max_animation);

        self.plan = Some(AnimationPlan {
            from: last.point,
            to: target,
            from_heading_deg: last.heading_deg,
            to_heading_deg: heading_deg,
            started: now,
            duration,
            generation: self.generation,
        });

        UpdateOutcome::Animating { duration }
    }

    /// Sample the active plan at `now`.
    ///
    /// Returns `None` when no plan is in flight or the plan's generation is
    /// stale. A completed plan emits its final sample and is cleared.
    pub fn frame(&mut self, now: Instant) -> Option<MotionSample> {
        let plan = self.plan?;

        if plan.generation != self.generation {
            self.plan = None;
            return None;
        }

        let sample = plan.sample(now);
        if plan.is_complete(now) {
            self.plan = None;
        }
        self.last_emitted = Some(sample);
        Some(sample)
    }

    /// Abort any in-flight plan and invalidate pending frames.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.plan = None;
    }

    /// Cancel and forget all motion history.
    pub fn reset(&mut self) {
        self.cancel();
        self.last_emitted = None;
        self.last_report_at = None;
    }
}
