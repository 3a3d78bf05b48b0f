//! Pinhole camera intrinsics for the depth stream.

use serde::{Deserialize, Serialize};

/// Rectified pinhole model of the depth camera.
///
/// Camera frame convention: x right, y down, z forward (optical axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length in pixels, horizontal
    pub fx: f64,

    /// Focal length in pixels, vertical
    pub fy: f64,

    /// Principal point x, pixels
    pub cx: f64,

    /// Principal point y, pixels
    pub cy: f64,

    /// Stereo baseline in metres
    pub baseline_m: f64,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        // Typical 640x480 structured-light module
        Self {
            fx: 570.0,
            fy: 570.0,
            cx: 319.5,
            cy: 239.5,
            baseline_m: 0.06,
        }
    }
}

impl CameraIntrinsics {
    /// Stereo disparity in pixels for a given metric depth.
    ///
    /// Returns 0.0 for non-positive depth (invalid measurement).
    pub fn disparity_px(&self, depth_m: f64) -> f64 {
        if depth_m <= 0.0 {
            return 0.0;
        }
        self.fx * self.baseline_m / depth_m
    }

    /// Reproject pixel (u, v) with metric depth into the camera frame.
    pub fn unproject(&self, u: f64, v: f64, depth_m: f64) -> [f64; 3] {
        let x = (u - self.cx) * depth_m / self.fx;
        let y = (v - self.cy) * depth_m / self.fy;
        [x, y, depth_m]
    }
}
