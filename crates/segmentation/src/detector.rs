//! Floor detection: seeded RANSAC plane fit with a vertical-normal gate.

use bytes::Bytes;
use contracts::{CameraIntrinsics, FloorConfig, SegmentationMask, ViewerError};
use nalgebra::{Point3, Unit, Vector3};
use tracing::{debug, trace};

use crate::plane::Plane;
use crate::reproject::reproject_depth;

/// A detected floor plane with fit diagnostics.
#[derive(Debug, Clone)]
pub struct FloorPlane {
    /// The fitted plane, camera frame
    pub plane: Plane,

    /// Inlier fraction over the reprojected sample
    pub inlier_ratio: f64,

    /// RANSAC iterations actually run
    pub iterations: u32,
}

/// Floor-plane detector over depth images.
///
/// Deterministic for a fixed config seed. The normal gate is measured
/// against the camera's up axis (-y), so it must be wide enough to absorb
/// the mounting tilt.
pub struct FloorDetector {
    config: FloorConfig,
    intrinsics: CameraIntrinsics,
    up_axis: Unit<Vector3<f64>>,
}

impl FloorDetector {
    pub fn new(config: FloorConfig, intrinsics: CameraIntrinsics) -> Self {
        Self {
            config,
            intrinsics,
            // Camera frame is x right, y down, z forward
            up_axis: Unit::new_normalize(Vector3::new(0.0, -1.0, 0.0)),
        }
    }

    /// Detect the floor plane in a depth buffer.
    ///
    /// Returns `Ok(None)` when no plane passes the inlier-ratio and
    /// normal-angle gates (e.g. the camera sees no floor).
    ///
    /// # Errors
    /// `Segmentation` when the buffer length does not match the dimensions.
    pub fn detect(
        &self,
        depth: &[u16],
        width: u32,
        height: u32,
    ) -> Result<Option<FloorPlane>, ViewerError> {
        if depth.len() != (width * height) as usize {
            return Err(ViewerError::segmentation(format!(
                "depth buffer length {} does not match {}x{}",
                depth.len(),
                width,
                height
            )));
        }

        let points = reproject_depth(
            depth,
            width,
            height,
            &self.intrinsics,
            self.config.subsample_step,
        );
        if points.len() < 3 {
            trace!(points = points.len(), "too few valid points for a plane fit");
            return Ok(None);
        }

        let max_angle = self.config.max_normal_dev_deg.to_radians();
        let mut sampler = SampleRng::new(self.config.seed);
        let mut best: Option<(Plane, usize)> = None;

        for _ in 0..self.config.ransac_iterations {
            let a = &points[sampler.below(points.len())];
            let b = &points[sampler.below(points.len())];
            let c = &points[sampler.below(points.len())];
            let Some(candidate) = Plane::from_points(a, b, c) else {
                continue;
            };
            if candidate.normal_angle_to(&self.up_axis) > max_angle {
                continue;
            }

            let inliers = count_inliers(&candidate, &points, self.config.distance_threshold_m);
            if best.as_ref().map_or(true, |(_, n)| inliers > *n) {
                best = Some((candidate, inliers));
            }
        }

        let Some((plane, inliers)) = best else {
            debug!("no vertical-ish plane candidate survived");
            return Ok(None);
        };

        let inlier_ratio = inliers as f64 / points.len() as f64;
        if inlier_ratio < self.config.min_inlier_ratio {
            debug!(
                inlier_ratio,
                required = self.config.min_inlier_ratio,
                "best plane below inlier gate"
            );
            return Ok(None);
        }

        debug!(
            inlier_ratio,
            normal = ?plane.normal.into_inner(),
            "floor plane detected"
        );

        Ok(Some(FloorPlane {
            plane,
            inlier_ratio,
            iterations: self.config.ransac_iterations,
        }))
    }

    /// Rasterize the full-resolution inlier mask for a detected plane.
    pub fn mask(
        &self,
        floor: &FloorPlane,
        depth: &[u16],
        width: u32,
        height: u32,
    ) -> SegmentationMask {
        let (w, h) = (width as usize, height as usize);
        let mut data = vec![0u8; w * h];

        for v in 0..h {
            for u in 0..w {
                let mm = depth[v * w + u];
                if mm == 0 {
                    continue;
                }
                let p = self
                    .intrinsics
                    .unproject(u as f64, v as f64, mm as f64 / 1000.0);
                let point = Point3::new(p[0], p[1], p[2]);
                if floor.plane.distance(&point) <= self.config.distance_threshold_m {
                    data[v * w + u] = 255;
                }
            }
        }

        SegmentationMask {
            width,
            height,
            data: Bytes::from(data),
        }
    }

    /// Zero out masked depth pixels. Returns how many were suppressed.
    pub fn suppress(&self, mask: &SegmentationMask, depth: &mut [u16]) -> usize {
        let mut suppressed = 0;
        for (d, &m) in depth.iter_mut().zip(mask.data.iter()) {
            if m != 0 && *d != 0 {
                *d = 0;
                suppressed += 1;
            }
        }
        suppressed
    }
}

fn count_inliers(plane: &Plane, points: &[Point3<f64>], threshold: f64) -> usize {
    points
        .iter()
        .filter(|p| plane.distance(p) <= threshold)
        .count()
}

/// Xorshift64* index sampler, seed-stable across runs.
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn below(&mut self, n: usize) -> usize {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x.wrapping_mul(0x2545F4914F6CDD1D) % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depth image of a bare floor: camera at `cam_height`, pitched down
    /// by `tilt_deg`, same geometry the synthetic source uses.
    fn floor_depth(
        width: u32,
        height: u32,
        k: &CameraIntrinsics,
        cam_height: f64,
        tilt_deg: f64,
    ) -> Vec<u16> {
        let tilt = tilt_deg.to_radians();
        let up = [0.0, -tilt.cos(), -tilt.sin()];
        let (w, h) = (width as usize, height as usize);
        let mut depth = vec![0u16; w * h];
        for v in 0..h {
            for u in 0..w {
                let dx = (u as f64 - k.cx) / k.fx;
                let dy = (v as f64 - k.cy) / k.fy;
                let dot = up[0] * dx + up[1] * dy + up[2];
                if dot < -1e-6 {
                    let z = -cam_height / dot;
                    if z < 60.0 {
                        depth[v * w + u] = (z * 1000.0) as u16;
                    }
                }
            }
        }
        depth
    }

    fn test_intrinsics() -> CameraIntrinsics {
        CameraIntrinsics {
            fx: 64.0,
            fy: 64.0,
            cx: 31.5,
            cy: 23.5,
            baseline_m: 0.06,
        }
    }

    fn detector() -> FloorDetector {
        FloorDetector::new(FloorConfig::default(), test_intrinsics())
    }

    #[test]
    fn test_detects_tilted_floor() {
        let k = test_intrinsics();
        let depth = floor_depth(64, 48, &k, 1.2, 20.0);
        let floor = detector().detect(&depth, 64, 48).unwrap();
        let floor = floor.expect("floor should be detected");
        assert!(floor.inlier_ratio > 0.8, "ratio = {}", floor.inlier_ratio);

        // Normal deviates from camera-up by roughly the tilt angle
        let up = Unit::new_normalize(Vector3::new(0.0, -1.0, 0.0));
        let angle = floor.plane.normal_angle_to(&up).to_degrees();
        assert!((angle - 20.0).abs() < 5.0, "angle = {angle}");
    }

    #[test]
    fn test_rejects_frontal_wall() {
        // A frontal wall at constant z has a horizontal normal; the gate
        // must refuse it
        let depth = vec![2000u16; 64 * 48];
        let result = detector().detect(&depth, 64, 48).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_depth_yields_none() {
        let depth = vec![0u16; 64 * 48];
        assert!(detector().detect(&depth, 64, 48).unwrap().is_none());
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let depth = vec![0u16; 10];
        assert!(matches!(
            detector().detect(&depth, 64, 48),
            Err(ViewerError::Segmentation { .. })
        ));
    }

    #[test]
    fn test_mask_and_suppress_roundtrip() {
        let k = test_intrinsics();
        let det = detector();
        let mut depth = floor_depth(64, 48, &k, 1.2, 20.0);
        let valid_before = depth.iter().filter(|&&d| d > 0).count();

        let floor = det.detect(&depth, 64, 48).unwrap().unwrap();
        let mask = det.mask(&floor, &depth, 64, 48);
        assert!(mask.coverage() > 0.3);

        let suppressed = det.suppress(&mask, &mut depth);
        assert!(suppressed > 0);
        let valid_after = depth.iter().filter(|&&d| d > 0).count();
        assert_eq!(valid_before - suppressed, valid_after);
    }

    #[test]
    fn test_detection_deterministic() {
        let k = test_intrinsics();
        let depth = floor_depth(64, 48, &k, 1.0, 15.0);
        let det = detector();
        let a = det.detect(&depth, 64, 48).unwrap().unwrap();
        let b = det.detect(&depth, 64, 48).unwrap().unwrap();
        assert_eq!(a.plane, b.plane);
        assert_eq!(a.inlier_ratio, b.inlier_ratio);
    }
}
