//! On-disk recording format shared by [`FrameRecorder`] and
//! [`ReplayDepthSource`].
//!
//! Layout of a recorded session directory:
//!
//! ```text
//! <root>/manifest.json       session metadata
//! <root>/frames.jsonl        one FrameRecord per line, capture order
//! <root>/depth/<frame_id>.bin raw little-endian u16 depth plane
//! ```
//!
//! [`FrameRecorder`]: crate::FrameRecorder
//! [`ReplayDepthSource`]: crate::ReplayDepthSource

use serde::{Deserialize, Serialize};

use contracts::CaptureMode;

/// Manifest file name inside a session directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Frame index file name (JSONL)
pub const INDEX_FILE: &str = "frames.jsonl";

/// Subdirectory holding raw depth planes
pub const DEPTH_DIR: &str = "depth";

/// Recorded session metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingManifest {
    /// Format version, currently 1
    pub version: u32,

    /// RFC 3339 creation timestamp
    pub created_at: String,

    /// Source the session was captured from
    pub source_id: String,

    /// Capture mode of the recorded session
    pub mode: CaptureMode,

    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Nominal acquisition rate at record time (Hz)
    pub frequency_hz: f64,

    /// Number of frames in the index
    pub frame_count: u64,
}

/// One line of the JSONL frame index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame id at capture time
    pub frame_id: u64,

    /// Capture timestamp, seconds since source start
    pub timestamp: f64,

    /// Depth plane file relative to the session root; absent in
    /// modes without a depth stream
    #[serde(default)]
    pub depth_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_jsonl_roundtrip() {
        let record = FrameRecord {
            frame_id: 12,
            timestamp: 0.4,
            depth_file: Some("depth/12.bin".to_string()),
        };
        let line = serde_json::to_string(&record).unwrap();
        let parsed: FrameRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.frame_id, 12);
        assert_eq!(parsed.depth_file.as_deref(), Some("depth/12.bin"));
    }

    #[test]
    fn test_record_without_depth_file() {
        let parsed: FrameRecord =
            serde_json::from_str(r#"{"frame_id": 1, "timestamp": 0.0}"#).unwrap();
        assert!(parsed.depth_file.is_none());
    }
}
