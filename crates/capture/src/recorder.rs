//! Session recorder - writes the on-disk format replayed by
//! `ReplayDepthSource`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{CameraConfig, DepthFrame, ViewerError};
use tracing::{debug, info};

use crate::format::{FrameRecord, RecordingManifest, DEPTH_DIR, INDEX_FILE, MANIFEST_FILE};

/// Writes a capture session to disk frame by frame.
///
/// The manifest is written on [`finalize`](Self::finalize) so it carries the
/// final frame count; an unfinalized directory is detectable by its missing
/// manifest.
pub struct FrameRecorder {
    root: PathBuf,
    index: BufWriter<File>,
    manifest: RecordingManifest,
}

impl FrameRecorder {
    /// Create a recorder rooted at `root`, creating directories as needed.
    pub fn create(root: &Path, camera: &CameraConfig) -> Result<Self, ViewerError> {
        fs::create_dir_all(root.join(DEPTH_DIR))?;
        let index = BufWriter::new(File::create(root.join(INDEX_FILE))?);

        let manifest = RecordingManifest {
            version: 1,
            created_at: chrono::Utc::now().to_rfc3339(),
            source_id: camera.id.to_string(),
            mode: camera.mode,
            width: camera.width,
            height: camera.height,
            frequency_hz: camera.frequency_hz,
            frame_count: 0,
        };

        debug!(root = %root.display(), "recorder created");

        Ok(Self {
            root: root.to_path_buf(),
            index,
            manifest,
        })
    }

    /// Append one frame: raw depth plane plus an index line.
    pub fn record(&mut self, frame: &DepthFrame) -> Result<(), ViewerError> {
        let depth_file = match &frame.depth_mm {
            Some(raw) => {
                let rel = format!("{DEPTH_DIR}/{}.bin", frame.frame_id);
                fs::write(self.root.join(&rel), raw)?;
                Some(rel)
            }
            None => None,
        };

        let record = FrameRecord {
            frame_id: frame.frame_id,
            timestamp: frame.timestamp,
            depth_file,
        };
        let line = serde_json::to_string(&record)
            .map_err(|e| ViewerError::Other(format!("index serialize error: {e}")))?;
        writeln!(self.index, "{line}")?;

        self.manifest.frame_count += 1;
        Ok(())
    }

    /// Flush the index and write the manifest. Returns the frame count.
    pub fn finalize(mut self) -> Result<u64, ViewerError> {
        self.index.flush()?;

        let manifest_json = serde_json::to_string_pretty(&self.manifest)
            .map_err(|e| ViewerError::Other(format!("manifest serialize error: {e}")))?;
        fs::write(self.root.join(MANIFEST_FILE), manifest_json)?;

        info!(
            root = %self.root.display(),
            frames = self.manifest.frame_count,
            "recording finalized"
        );
        Ok(self.manifest.frame_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn small_frame(frame_id: u64, timestamp: f64) -> DepthFrame {
        DepthFrame {
            source_id: "rec_test".into(),
            frame_id,
            timestamp,
            width: 2,
            height: 2,
            depth_mm: Some(Bytes::from(vec![0u8; 8])),
            left: None,
        }
    }

    #[test]
    fn test_record_and_finalize_layout() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CameraConfig {
            width: 2,
            height: 2,
            ..CameraConfig::default()
        };

        let mut recorder = FrameRecorder::create(dir.path(), &camera).unwrap();
        recorder.record(&small_frame(1, 0.0)).unwrap();
        recorder.record(&small_frame(2, 0.05)).unwrap();
        let count = recorder.finalize().unwrap();
        assert_eq!(count, 2);

        assert!(dir.path().join(MANIFEST_FILE).exists());
        assert!(dir.path().join(INDEX_FILE).exists());
        assert!(dir.path().join(DEPTH_DIR).join("1.bin").exists());
        assert!(dir.path().join(DEPTH_DIR).join("2.bin").exists());

        let manifest: RecordingManifest = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.frame_count, 2);
        assert_eq!(manifest.width, 2);
    }

    #[test]
    fn test_unfinalized_session_has_no_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CameraConfig::default();
        let mut recorder = FrameRecorder::create(dir.path(), &camera).unwrap();
        recorder.record(&small_frame(1, 0.0)).unwrap();
        drop(recorder);

        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }
}
