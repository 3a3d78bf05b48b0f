//! Depth to displayable disparity conversion.

use bytes::Bytes;
use contracts::{CameraConfig, CameraIntrinsics, ImageData, ImageFormat};

/// Renders u16 depth buffers as 8-bit disparity visualizations.
///
/// Disparity is `fx * baseline / depth`, scaled so the configured nearest
/// depth saturates at 255. Invalid pixels (depth 0) render black in both
/// gray and color output.
pub struct DisparityRenderer {
    intrinsics: CameraIntrinsics,
    max_disparity_px: f64,
}

impl DisparityRenderer {
    pub fn new(camera: &CameraConfig) -> Self {
        let max_disparity_px = camera.intrinsics.disparity_px(camera.min_depth_m);
        Self {
            intrinsics: camera.intrinsics,
            max_disparity_px,
        }
    }

    /// Render a depth buffer. `colorize` selects jet RGB over plain gray.
    pub fn render(&self, depth: &[u16], width: u32, height: u32, colorize: bool) -> ImageData {
        let scaled = self.scale_to_u8(depth);

        if colorize {
            let mut rgb = Vec::with_capacity(scaled.len() * 3);
            for (i, &v) in scaled.iter().enumerate() {
                if depth[i] == 0 {
                    rgb.extend_from_slice(&[0, 0, 0]);
                } else {
                    rgb.extend_from_slice(&jet_color(v));
                }
            }
            ImageData {
                width,
                height,
                format: ImageFormat::Rgb8,
                data: Bytes::from(rgb),
            }
        } else {
            ImageData {
                width,
                height,
                format: ImageFormat::Gray8,
                data: Bytes::from(scaled),
            }
        }
    }

    fn scale_to_u8(&self, depth: &[u16]) -> Vec<u8> {
        depth
            .iter()
            .map(|&mm| {
                if mm == 0 {
                    return 0;
                }
                let disp = self.intrinsics.disparity_px(mm as f64 / 1000.0);
                ((disp / self.max_disparity_px) * 255.0).clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}

/// Classic 4-segment jet colormap.
pub fn jet_color(v: u8) -> [u8; 3] {
    let x = v as f64 / 255.0;
    let r = (1.5 - (4.0 * x - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * x - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * x - 1.0).abs()).clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}
