//! DepthSession - the stateful sensor object the viewer polls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_channel::{bounded, Receiver, TrySendError};
use capture::{ReplayDepthSource, SyntheticDepthSource};
use contracts::{
    CameraConfig, CaptureMode, DepthFrame, FloorConfig, FrameCallback, FrameSource, ImageData,
    ReplayConfig, SceneConfig, SegmentationMask, SessionState, ViewerBlueprint, ViewerError,
};
use display::DisparityRenderer;
use segmentation::FloorDetector;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Session construction parameters, usually derived from a blueprint.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub floor: FloorConfig,
    pub replay: Option<ReplayConfig>,

    /// Intake channel depth; newest frame wins when full
    pub channel_capacity: usize,

    /// Upper bound on one grab call
    pub grab_timeout: Duration,
}

impl SessionConfig {
    pub fn from_blueprint(blueprint: &ViewerBlueprint) -> Self {
        Self {
            camera: blueprint.camera.clone(),
            scene: blueprint.scene.clone(),
            floor: blueprint.floor.clone(),
            replay: blueprint.replay.clone(),
            channel_capacity: 8,
            grab_timeout: Duration::from_secs(2),
        }
    }
}

/// Outcome of a successful [`DepthSession::grab`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOutcome {
    /// A frame is current and the stream is still live
    Frame,
    /// The source delivered its last frame and closed; the final frame
    /// stays current
    EndOfStream,
}

/// The current frame plus everything derived from it.
struct CurrentFrame {
    frame: DepthFrame,
    /// Decoded working depth buffer; floor removal mutates this copy,
    /// `frame` stays as captured
    depth: Option<Vec<u16>>,
    mask: Option<SegmentationMask>,
    inlier_ratio: Option<f64>,
}

/// Depth sensor session.
///
/// Lifecycle is {not-started -> running -> stopped}; every depth-state
/// operation checks it, so nothing is processed before a successful
/// [`start`](Self::start) or after [`stop`](Self::stop).
pub struct DepthSession {
    config: SessionConfig,
    state: SessionState,
    mode: CaptureMode,
    source: Option<Box<dyn FrameSource>>,
    rx: Option<Receiver<DepthFrame>>,
    dropped: Arc<AtomicU64>,
    current: Option<CurrentFrame>,
    rate: crate::RateTracker,
    detector: FloorDetector,
    renderer: DisparityRenderer,
}

impl DepthSession {
    pub fn new(config: SessionConfig) -> Self {
        let detector = FloorDetector::new(config.floor.clone(), config.camera.intrinsics);
        let renderer = DisparityRenderer::new(&config.camera);
        let rate = crate::RateTracker::new(config.camera.frequency_hz);
        Self {
            mode: config.camera.mode,
            config,
            state: SessionState::NotStarted,
            source: None,
            rx: None,
            dropped: Arc::new(AtomicU64::new(0)),
            current: None,
            rate,
            detector,
            renderer,
        }
    }

    /// Open the capture source and begin receiving frames.
    ///
    /// Failure leaves the session in `NotStarted` with nothing acquired;
    /// for the viewer process a failed start is terminal.
    pub fn start(&mut self, mode: CaptureMode) -> Result<(), ViewerError> {
        if self.state != SessionState::NotStarted {
            return Err(ViewerError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }

        let source: Box<dyn FrameSource> = match &self.config.replay {
            Some(replay) => {
                let source = ReplayDepthSource::open(replay)?;
                if source.capture_mode() != mode {
                    warn!(
                        requested = %mode,
                        recorded = %source.capture_mode(),
                        "replay session was recorded in a different mode"
                    );
                }
                Box::new(source)
            }
            None => {
                let mut camera = self.config.camera.clone();
                camera.mode = mode;
                Box::new(SyntheticDepthSource::new(camera, self.config.scene.clone()))
            }
        };
        self.mode = source.capture_mode();

        let (tx, rx) = bounded(self.config.channel_capacity);
        let intake_rx = rx.clone();
        let dropped = self.dropped.clone();
        let callback: FrameCallback = Arc::new(move |frame| {
            match tx.try_send(frame) {
                Ok(()) => {}
                Err(TrySendError::Full(frame)) => {
                    // Newest wins: evict the oldest queued frame, then retry
                    // once; a still-full channel drops the new frame instead
                    if intake_rx.try_recv().is_ok() {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    if tx.try_send(frame).is_err() {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(TrySendError::Closed(_)) => {}
            }
        });

        source.listen(callback);
        info!(source_id = %source.source_id(), mode = %self.mode, "session started");

        self.source = Some(source);
        self.rx = Some(rx);
        self.state = SessionState::Running;
        Ok(())
    }

    /// Advance to the next available frame, blocking up to the grab timeout.
    ///
    /// When more than one frame is queued, older ones are skipped so the
    /// viewer always works on the freshest data. A timeout with a previous
    /// frame in hand keeps that frame; a timeout before any frame arrived
    /// is an error. A source that finishes its stream (a non-looping
    /// replay) is reported as [`GrabOutcome::EndOfStream`] once a frame
    /// has been delivered, not as an error.
    pub async fn grab(&mut self) -> Result<GrabOutcome, ViewerError> {
        if self.state != SessionState::Running {
            return Err(ViewerError::InvalidState {
                operation: "grab",
                state: self.state,
            });
        }
        let Some(rx) = self.rx.as_ref() else {
            return Err(ViewerError::InvalidState {
                operation: "grab",
                state: self.state,
            });
        };

        match timeout(self.config.grab_timeout, rx.recv()).await {
            Ok(Ok(mut frame)) => {
                let mut skipped = 0u32;
                while let Ok(newer) = rx.try_recv() {
                    frame = newer;
                    skipped += 1;
                }
                if skipped > 0 {
                    debug!(skipped, "skipped stale frames");
                }

                self.rate.tick();

                let depth = match frame.decode_depth() {
                    Some(depth) => Some(depth),
                    None => {
                        if frame.depth_mm.is_some() {
                            warn!(
                                frame_id = frame.frame_id,
                                "depth plane length mismatch, treating frame as depthless"
                            );
                        }
                        None
                    }
                };

                self.current = Some(CurrentFrame {
                    frame,
                    depth,
                    mask: None,
                    inlier_ratio: None,
                });
                Ok(GrabOutcome::Frame)
            }
            Ok(Err(_closed)) => {
                // A closed intake after at least one frame is a finished
                // stream, not a failure
                if self.current.is_some() {
                    info!("capture stream ended");
                    return Ok(GrabOutcome::EndOfStream);
                }
                let source_id = self
                    .source
                    .as_ref()
                    .map(|s| s.source_id().to_string())
                    .unwrap_or_default();
                Err(ViewerError::CaptureClosed { source_id })
            }
            Err(_elapsed) => {
                let waited_ms = self.config.grab_timeout.as_millis() as u64;
                if self.current.is_some() {
                    warn!(waited_ms, "grab timed out, keeping previous frame");
                    Ok(GrabOutcome::Frame)
                } else {
                    Err(ViewerError::GrabTimeout { waited_ms })
                }
            }
        }
    }

    /// Detect the floor plane in the current depth buffer and zero it out.
    ///
    /// No-op (with a warning) when no plane passes the detector's gates.
    /// The as-captured frame is untouched; only the working depth buffer
    /// that feeds [`disparity`](Self::disparity) is modified.
    pub fn remove_floor(&mut self) -> Result<(), ViewerError> {
        if self.state != SessionState::Running {
            return Err(ViewerError::InvalidState {
                operation: "remove_floor",
                state: self.state,
            });
        }
        if !self.mode.has_depth() {
            return Err(ViewerError::DepthUnavailable {
                operation: "remove_floor",
                mode: self.mode,
            });
        }
        let Some(current) = self.current.as_mut() else {
            return Err(ViewerError::NoFrame {
                operation: "remove_floor",
            });
        };
        let Some(depth) = current.depth.as_mut() else {
            return Err(ViewerError::segmentation(
                "current frame carries no valid depth plane",
            ));
        };

        let (w, h) = (current.frame.width, current.frame.height);
        match self.detector.detect(depth, w, h)? {
            Some(floor) => {
                let mask = self.detector.mask(&floor, depth, w, h);
                let suppressed = self.detector.suppress(&mask, depth);
                debug!(
                    frame_id = current.frame.frame_id,
                    suppressed,
                    inlier_ratio = floor.inlier_ratio,
                    "floor removed"
                );
                current.mask = Some(mask);
                current.inlier_ratio = Some(floor.inlier_ratio);
            }
            None => {
                warn!(
                    frame_id = current.frame.frame_id,
                    "no floor plane detected in current frame"
                );
                current.mask = None;
                current.inlier_ratio = None;
            }
        }
        Ok(())
    }

    /// Floor mask from the last [`remove_floor`](Self::remove_floor) on the
    /// current frame.
    pub fn segmentation_mask(&self) -> Option<&SegmentationMask> {
        self.current.as_ref().and_then(|c| c.mask.as_ref())
    }

    /// Inlier ratio of the last successful floor fit on the current frame.
    pub fn floor_inlier_ratio(&self) -> Option<f64> {
        self.current.as_ref().and_then(|c| c.inlier_ratio)
    }

    /// Render the current depth buffer as an 8-bit disparity image.
    pub fn disparity(&self, colorize: bool) -> Result<ImageData, ViewerError> {
        if self.state != SessionState::Running {
            return Err(ViewerError::InvalidState {
                operation: "disparity",
                state: self.state,
            });
        }
        if !self.mode.has_depth() {
            return Err(ViewerError::DepthUnavailable {
                operation: "disparity",
                mode: self.mode,
            });
        }
        let Some(current) = self.current.as_ref() else {
            return Err(ViewerError::NoFrame {
                operation: "disparity",
            });
        };
        let Some(depth) = current.depth.as_ref() else {
            return Err(ViewerError::segmentation(
                "current frame carries no valid depth plane",
            ));
        };

        Ok(self
            .renderer
            .render(depth, current.frame.width, current.frame.height, colorize))
    }

    /// Left rectified image of the current frame, when the mode carries one.
    pub fn left(&self) -> Option<&ImageData> {
        self.current.as_ref().and_then(|c| c.frame.left.as_ref())
    }

    /// Measured acquisition rate in Hz, never below 1.0.
    pub fn rate(&self) -> f64 {
        self.rate.hz()
    }

    /// Stop the session and release the capture source. Idempotent.
    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            if let Some(source) = &self.source {
                source.stop();
            }
            info!("session stopped");
        }
        self.state = SessionState::Stopped;
    }

    /// The current frame as captured (floor removal does not touch it).
    pub fn current(&self) -> Option<&DepthFrame> {
        self.current.as_ref().map(|c| &c.frame)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn capture_mode(&self) -> CaptureMode {
        self.mode
    }

    /// Frames dropped at intake under backpressure
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for DepthSession {
    fn drop(&mut self) {
        if self.state == SessionState::Running {
            if let Some(source) = &self.source {
                source.stop();
            }
        }
    }
}
