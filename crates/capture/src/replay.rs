//! Replay source - plays back a recorded session from disk
//!
//! Reads the manifest + JSONL index written by `FrameRecorder` and replays
//! frames at original timestamp spacing scaled by the speed multiplier,
//! optionally looping.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use contracts::{
    CaptureMode, DepthFrame, FrameCallback, FrameSource, ReplayConfig, SourceId, ViewerError,
};
use tracing::{debug, info, warn};

use crate::format::{FrameRecord, RecordingManifest, INDEX_FILE, MANIFEST_FILE};

/// Replays a recorded capture session through the `FrameSource` interface.
pub struct ReplayDepthSource {
    source_id: SourceId,
    root: PathBuf,
    manifest: RecordingManifest,
    records: Vec<FrameRecord>,
    speed_multiplier: f64,
    loop_playback: bool,
    listening: Arc<AtomicBool>,
}

impl ReplayDepthSource {
    /// Open a recorded session directory.
    ///
    /// # Errors
    /// `CaptureOpen` when the manifest or index is missing, unreadable,
    /// or the index contains no usable frames.
    pub fn open(config: &ReplayConfig) -> Result<Self, ViewerError> {
        let root = config.path.clone();

        let manifest_raw = fs::read_to_string(root.join(MANIFEST_FILE)).map_err(|e| {
            ViewerError::capture_open(
                "replay",
                format!("cannot read {}: {e}", root.join(MANIFEST_FILE).display()),
            )
        })?;
        let manifest: RecordingManifest = serde_json::from_str(&manifest_raw)
            .map_err(|e| ViewerError::capture_open("replay", format!("bad manifest: {e}")))?;

        let index = File::open(root.join(INDEX_FILE)).map_err(|e| {
            ViewerError::capture_open(
                "replay",
                format!("cannot open {}: {e}", root.join(INDEX_FILE).display()),
            )
        })?;

        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(index).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<FrameRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(line = line_no + 1, error = %e, "skipping corrupt index line");
                }
            }
        }

        if records.is_empty() {
            return Err(ViewerError::capture_open(
                "replay",
                format!("no usable frames in {}", root.join(INDEX_FILE).display()),
            ));
        }

        info!(
            root = %root.display(),
            frames = records.len(),
            recorded_at = %manifest.created_at,
            "replay session opened"
        );

        Ok(Self {
            source_id: SourceId::from(manifest.source_id.clone()),
            root,
            manifest,
            records,
            speed_multiplier: config.speed_multiplier,
            loop_playback: config.loop_playback,
            listening: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Frame count of the opened session
    pub fn frame_count(&self) -> usize {
        self.records.len()
    }

    fn load_frame(
        root: &PathBuf,
        manifest: &RecordingManifest,
        source_id: &SourceId,
        record: &FrameRecord,
    ) -> Option<DepthFrame> {
        let depth_mm = match &record.depth_file {
            Some(rel) => match fs::read(root.join(rel)) {
                Ok(raw) => {
                    let expected = (manifest.width * manifest.height * 2) as usize;
                    if raw.len() != expected {
                        warn!(
                            frame_id = record.frame_id,
                            got = raw.len(),
                            expected,
                            "depth plane has wrong length, skipping frame"
                        );
                        return None;
                    }
                    Some(Bytes::from(raw))
                }
                Err(e) => {
                    warn!(frame_id = record.frame_id, error = %e, "missing depth plane, skipping frame");
                    return None;
                }
            },
            None => None,
        };

        Some(DepthFrame {
            source_id: source_id.clone(),
            frame_id: record.frame_id,
            timestamp: record.timestamp,
            width: manifest.width,
            height: manifest.height,
            depth_mm,
            left: None,
        })
    }
}

impl FrameSource for ReplayDepthSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    fn capture_mode(&self) -> CaptureMode {
        self.manifest.mode
    }

    fn listen(&self, callback: FrameCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let source_id = self.source_id.clone();
        let root = self.root.clone();
        let manifest = self.manifest.clone();
        let records = self.records.clone();
        let speed = self.speed_multiplier;
        let loop_playback = self.loop_playback;
        let listening = self.listening.clone();

        thread::spawn(move || {
            debug!(source_id = %source_id, frames = records.len(), speed, "replay started");

            'playback: loop {
                let mut prev_ts = records[0].timestamp;
                for record in &records {
                    if !listening.load(Ordering::Relaxed) {
                        break 'playback;
                    }

                    let gap = ((record.timestamp - prev_ts) / speed).max(0.0);
                    if gap > 0.0 {
                        thread::sleep(Duration::from_secs_f64(gap));
                    }
                    prev_ts = record.timestamp;

                    if let Some(frame) = Self::load_frame(&root, &manifest, &source_id, record) {
                        callback(frame);
                    }
                }

                if !loop_playback {
                    break;
                }
                debug!(source_id = %source_id, "replay looping");
            }

            listening.store(false, Ordering::SeqCst);
            debug!(source_id = %source_id, "replay finished");
        });
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}
