//! Capture mode and session lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector for which streams a capture source opens.
///
/// Modes without a depth stream cannot feed floor removal or disparity
/// rendering; the session rejects depth-dependent operations in those modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Depth stream only
    Depth,
    /// Depth plus left grayscale image (viewer default)
    #[default]
    DepthLeft,
    /// Depth plus both rectified images
    DepthLeftRight,
    /// Left image only
    Left,
    /// Both rectified images, no depth
    LeftRight,
}

impl CaptureMode {
    /// Whether this mode carries a depth stream
    pub fn has_depth(self) -> bool {
        matches!(self, Self::Depth | Self::DepthLeft | Self::DepthLeftRight)
    }

    /// Whether this mode carries the left image stream
    pub fn has_left(self) -> bool {
        !matches!(self, Self::Depth)
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Depth => "depth",
            Self::DepthLeft => "depth_left",
            Self::DepthLeftRight => "depth_left_right",
            Self::Left => "left",
            Self::LeftRight => "left_right",
        };
        f.write_str(s)
    }
}

/// Session lifecycle: not-started -> running -> stopped, no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_streams() {
        assert!(CaptureMode::Depth.has_depth());
        assert!(!CaptureMode::Depth.has_left());
        assert!(CaptureMode::DepthLeft.has_depth());
        assert!(CaptureMode::DepthLeft.has_left());
        assert!(!CaptureMode::LeftRight.has_depth());
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&CaptureMode::DepthLeft).unwrap();
        assert_eq!(json, "\"depth_left\"");
        let parsed: CaptureMode = serde_json::from_str("\"left_right\"").unwrap();
        assert_eq!(parsed, CaptureMode::LeftRight);
    }
}
