//! Viewer loop orchestrator - coordinates session, sinks, and input.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use capture::FrameRecorder;
use contracts::{ViewFrame, ViewerBlueprint};
use display::DisplayRouter;
use observability::metrics;
use session::{DepthSession, GrabOutcome, SessionConfig};
use tracing::{debug, info, warn};

use super::input::KeyListener;
use super::stats::ViewerStats;

/// Viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// The viewer blueprint (CLI overrides already applied)
    pub blueprint: ViewerBlueprint,

    /// Render disparity through the color map
    pub colorize: bool,

    /// Maximum number of frames to view (None = unlimited)
    pub max_frames: Option<u64>,

    /// Viewer timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Record grabbed frames to this directory
    pub record_path: Option<PathBuf>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main viewer orchestrator
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    /// Create a new viewer with the given configuration
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Run the viewer loop to completion.
    ///
    /// One iteration per frame: grab, record, render the raw disparity,
    /// remove the floor, render the segmented disparity, route both views,
    /// then wait one frame interval for an exit key. The wait window is
    /// recomputed every iteration from the measured rate.
    pub async fn run(self, keys: &mut KeyListener) -> Result<ViewerStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Open the capture session; a failed start is fatal and nothing
        // below it runs
        let mode = blueprint.camera.mode;
        let session_config = SessionConfig::from_blueprint(blueprint);
        let mut session = DepthSession::new(session_config);
        session
            .start(mode)
            .context("Failed to start capture session")?;

        let mut router = DisplayRouter::from_configs(&blueprint.sinks)
            .context("Failed to configure display sinks")?;
        let active_sinks = router.sink_count();

        let mut recorder = match &self.config.record_path {
            Some(path) => {
                info!(path = %path.display(), "Recording session");
                Some(
                    FrameRecorder::create(path, &blueprint.camera)
                        .context("Failed to create frame recorder")?,
                )
            }
            None => None,
        };

        let has_depth = session.capture_mode().has_depth();
        if !has_depth {
            warn!(
                mode = %session.capture_mode(),
                "capture mode carries no depth stream, showing rectified images only"
            );
        }

        info!(
            mode = %session.capture_mode(),
            sinks = active_sinks,
            max_frames = ?self.config.max_frames,
            "Viewer running"
        );

        let mut stats = ViewerStats {
            active_sinks,
            ..Default::default()
        };
        let deadline = self.config.timeout.map(|t| start_time + t);

        loop {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    info!("Viewer timeout reached");
                    break;
                }
            }

            let grab_started = Instant::now();
            let outcome = session.grab().await.context("Frame grab failed")?;
            if outcome == GrabOutcome::EndOfStream {
                info!("Capture stream ended");
                break;
            }
            let grab_ms = grab_started.elapsed().as_secs_f64() * 1000.0;

            stats.frames_grabbed += 1;
            metrics::record_frame_grabbed(session.capture_mode());
            metrics::record_grab_latency_ms(grab_ms);

            // Record the as-captured frame, before any floor suppression
            if let (Some(recorder), Some(frame)) = (recorder.as_mut(), session.current()) {
                recorder.record(frame).context("Frame recording failed")?;
            }

            let (frame_id, timestamp) = session
                .current()
                .map(|f| (f.frame_id, f.timestamp))
                .unwrap_or_default();

            let mut floor = None;
            if has_depth {
                let raw = session
                    .disparity(self.config.colorize)
                    .context("Disparity rendering failed")?;
                route_view(
                    &mut router,
                    ViewFrame {
                        stream: "depth".to_string(),
                        frame_id,
                        timestamp,
                        image: raw,
                    },
                )
                .await;

                session.remove_floor().context("Floor removal failed")?;
                let coverage = session.segmentation_mask().map(|m| m.coverage());
                let inlier_ratio = session.floor_inlier_ratio();
                metrics::record_floor_fit(inlier_ratio, coverage);
                floor = inlier_ratio.zip(coverage);

                let segmented = session
                    .disparity(self.config.colorize)
                    .context("Disparity rendering failed")?;
                route_view(
                    &mut router,
                    ViewFrame {
                        stream: "segmented".to_string(),
                        frame_id,
                        timestamp,
                        image: segmented,
                    },
                )
                .await;
            }

            if let Some(left) = session.left() {
                let view = ViewFrame {
                    stream: "left".to_string(),
                    frame_id,
                    timestamp,
                    image: left.clone(),
                };
                route_view(&mut router, view).await;
            }

            let dropped = session.dropped();
            metrics::record_frame_dropped(dropped.saturating_sub(stats.frames_dropped));
            stats.frames_dropped = dropped;
            stats
                .session_stats
                .record_iteration(grab_ms, session.rate(), floor);
            stats.session_stats.set_dropped(dropped);

            if let Some(max) = self.config.max_frames {
                if stats.frames_grabbed >= max {
                    info!(frames = stats.frames_grabbed, "Reached max frames limit");
                    break;
                }
            }

            // One frame interval, derived from the measured rate
            let window = Duration::from_secs_f64(1.0 / session.rate());
            match keys.wait_key(window).await {
                Some(key) if KeyListener::is_exit_key(key) => {
                    info!(key, "Exit key pressed");
                    break;
                }
                Some(key) => debug!(key, "Ignoring key"),
                None => {}
            }
        }

        // Shutdown
        session.stop();
        router.flush().await;
        router.close().await;
        stats.sink_errors = router.write_errors();

        if let Some(recorder) = recorder {
            let recorded = recorder.finalize().context("Failed to finalize recording")?;
            info!(frames = recorded, "Recording finalized");
        }

        stats.duration = start_time.elapsed();

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            fps = format!("{:.2}", stats.fps()),
            "Viewer shutdown complete"
        );

        Ok(stats)
    }
}

/// Route one view frame and account for the per-sink outcomes.
async fn route_view(router: &mut DisplayRouter, frame: ViewFrame) {
    for (sink, ok) in router.route(&frame).await {
        metrics::record_frame_routed(&sink, ok);
    }
}
