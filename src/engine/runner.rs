//! Async run loop driving the engine's frame cadence.
//!
//! The runner owns the only piece of the engine that spans time: a tokio
//! task that
//!
//! - receives position reports from the transport channel
//! - ticks the interpolation frame loop at the configured cadence
//! - runs the feed staleness check
//!
//! # Design Notes
//!
//! The run loop uses `tokio::select!` with biased polling:
//! 1. Cancellation (highest priority)
//! 2. Report reception
//! 3. Frame tick
//! 4. Staleness check interval
//!
//! Reports are applied in arrival order; the interpolator's generation token
//! makes the ordering strictly last-update-wins, so frames from a superseded
//! report can never overwrite newer state. Cancellation stops the engine,
//! which bumps the generation one final time - the only teardown required.

use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::shared::SharedNavigationEngine;
use super::state::RawPositionReport;

/// Frame loop daemon for one tracked ride.
pub struct EngineRunner {
    engine: SharedNavigationEngine,
}

impl EngineRunner {
    pub fn new(engine: SharedNavigationEngine) -> Self {
        Self { engine }
    }

    /// Start the run loop as an async task.
    pub fn start(
        self,
        report_rx: mpsc::Receiver<RawPositionReport>,
        cancellation_token: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run(report_rx, cancellation_token).await;
        })
    }

    async fn run(
        self,
        mut report_rx: mpsc::Receiver<RawPositionReport>,
        cancellation_token: CancellationToken,
    ) {
        let config = self.engine.config();
        tracing::info!(
            frame_interval_ms = config.frame_interval_ms,
            "Navigation engine runner started"
        );

        let mut frame_interval = tokio::time::interval(config.frame_interval());
        frame_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut staleness_interval = tokio::time::interval(config.staleness_check_interval());

        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => break,

                report = report_rx.recv() => {
                    let Some(report) = report else {
                        tracing::debug!("Report channel closed, stopping runner");
                        break;
                    };
                    self.engine.on_position_report(report);
                }

                _ = frame_interval.tick() => {
                    self.engine.advance_frame(Instant::now());
                }

                _ = staleness_interval.tick() => {
                    self.engine.check_feed(Instant::now());
                }
            }
        }

        self.engine.stop();
        tracing::info!("Navigation engine runner stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::shared::NavigationProvider;
    use crate::engine::state::TripPlan;
    use crate::geo::GeoPoint;
    use std::time::Duration;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn shared() -> SharedNavigationEngine {
        SharedNavigationEngine::new(
            EngineConfig::default(),
            TripPlan {
                pickup: pt(0.0, 0.0),
                dropoff: pt(0.0, 0.002),
            },
        )
    }

    #[tokio::test]
    async fn test_runner_applies_reports_and_frames() {
        let engine = shared();
        let (report_tx, report_rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let handle = EngineRunner::new(engine.clone()).start(report_rx, cancel.clone());

        let start = Instant::now();
        report_tx
            .send(RawPositionReport::new(pt(0.0, 0.0), None, start).unwrap())
            .await
            .unwrap();
        report_tx
            .send(
                RawPositionReport::new(pt(0.0, 0.0005), None, start + Duration::from_millis(200))
                    .unwrap(),
            )
            .await
            .unwrap();

        // Let the frame loop carry the short animation to completion
        tokio::time::sleep(Duration::from_millis(1200)).await;

        let coordinate = engine.state().coordinate.expect("position published");
        assert!(
            (coordinate.longitude - 0.0005).abs() < 1e-6,
            "did not converge: {coordinate}"
        );

        cancel.cancel();
        handle.await.unwrap();
        assert!(engine.is_stopped());
    }

    #[tokio::test]
    async fn test_cancellation_stops_promptly_and_bumps_generation() {
        let engine = shared();
        let (_report_tx, report_rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let handle = EngineRunner::new(engine.clone()).start(report_rx, cancel.clone());

        let generation = engine.generation();
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("runner should stop promptly")
            .unwrap();

        assert!(engine.is_stopped());
        assert!(engine.generation() > generation);
    }

    #[tokio::test]
    async fn test_closed_report_channel_stops_runner() {
        let engine = shared();
        let (report_tx, report_rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let handle = EngineRunner::new(engine.clone()).start(report_rx, cancel);

        drop(report_tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("runner should stop when the transport hangs up")
            .unwrap();
        assert!(engine.is_stopped());
    }
}
