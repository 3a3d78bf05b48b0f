//! Depth image to camera-frame point reprojection.

use contracts::CameraIntrinsics;
use nalgebra::Point3;

/// Reproject valid depth pixels into camera-frame points (metres).
///
/// `depth` is row-major u16 millimetres, 0 meaning no return. `step`
/// subsamples the pixel grid in both directions; `step = 1` reprojects
/// everything.
pub fn reproject_depth(
    depth: &[u16],
    width: u32,
    height: u32,
    k: &CameraIntrinsics,
    step: u32,
) -> Vec<Point3<f64>> {
    let step = step.max(1) as usize;
    let (w, h) = (width as usize, height as usize);
    let mut points = Vec::with_capacity(w * h / (step * step) + 1);

    for v in (0..h).step_by(step) {
        for u in (0..w).step_by(step) {
            let mm = depth[v * w + u];
            if mm == 0 {
                continue;
            }
            let z = mm as f64 / 1000.0;
            let p = k.unproject(u as f64, v as f64, z);
            points.push(Point3::new(p[0], p[1], p[2]));
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pixels_skipped() {
        let k = CameraIntrinsics::default();
        let depth = vec![0u16, 1000, 0, 2000];
        let points = reproject_depth(&depth, 2, 2, &k, 1);
        assert_eq!(points.len(), 2);
        assert!((points[0].z - 1.0).abs() < 1e-9);
        assert!((points[1].z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_subsampling_reduces_points() {
        let k = CameraIntrinsics::default();
        let depth = vec![1000u16; 16];
        let full = reproject_depth(&depth, 4, 4, &k, 1);
        let quarter = reproject_depth(&depth, 4, 4, &k, 2);
        assert_eq!(full.len(), 16);
        assert_eq!(quarter.len(), 4);
    }
}
