//! Synthetic depth source
//!
//! Implements the `FrameSource` trait with a procedural scene: a ground
//! plane seen from a tilted camera, box obstacles standing on the floor,
//! seeded multiplicative noise. Used for development and testing without
//! camera hardware; the scene is deliberately floor-heavy so floor removal
//! has something real to bite on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use contracts::{
    CameraConfig, CaptureMode, DepthFrame, FrameCallback, FrameSource, ImageData, ImageFormat,
    SceneConfig, SourceId,
};
use tracing::{debug, trace};

use crate::rng::XorShift64;

/// Box obstacle standing on the floor, world coordinates:
/// x lateral, z horizontal distance from the camera.
#[derive(Debug, Clone, Copy)]
struct Obstacle {
    x_center: f64,
    z_front: f64,
    half_width: f64,
    height: f64,
}

/// Synthetic depth source
///
/// Generates frames at the configured frequency in a background thread and
/// hands them to the registered callback, matching how depth-camera SDKs
/// deliver data.
pub struct SyntheticDepthSource {
    source_id: SourceId,
    camera: CameraConfig,
    scene: SceneConfig,
    obstacles: Vec<Obstacle>,
    listening: Arc<AtomicBool>,
}

impl SyntheticDepthSource {
    /// Create a new synthetic source for the given camera and scene.
    pub fn new(camera: CameraConfig, scene: SceneConfig) -> Self {
        let obstacles = Self::place_obstacles(&camera, &scene);
        Self {
            source_id: camera.id.clone(),
            camera,
            scene,
            obstacles,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    fn place_obstacles(camera: &CameraConfig, scene: &SceneConfig) -> Vec<Obstacle> {
        let mut rng = XorShift64::new(scene.seed);
        (0..scene.obstacle_count)
            .map(|_| Obstacle {
                x_center: rng.range(-1.2, 1.2),
                z_front: rng.range(1.2, 0.55 * camera.max_depth_m),
                half_width: rng.range(0.15, 0.4),
                height: rng.range(0.3, 1.2),
            })
            .collect()
    }

    /// Render one frame of the scene.
    ///
    /// Rays are cast in the camera frame (x right, y down, z forward) with
    /// unnormalized direction (dx, dy, 1), so the ray parameter equals the
    /// camera-frame depth directly.
    fn render(
        camera: &CameraConfig,
        scene: &SceneConfig,
        obstacles: &[Obstacle],
        source_id: &SourceId,
        frame_id: u64,
        timestamp: f64,
    ) -> DepthFrame {
        let (w, h) = (camera.width as usize, camera.height as usize);
        let k = &camera.intrinsics;
        let tilt = scene.tilt_deg.to_radians();
        // World up and horizontal forward expressed in the camera frame
        let up = [0.0, -tilt.cos(), -tilt.sin()];
        let fwd = [0.0, -tilt.sin(), tilt.cos()];
        let cam_height = scene.camera_height_m;

        let mut noise_rng = XorShift64::new(scene.seed ^ frame_id.wrapping_mul(0x9E3779B97F4A7C15));
        let want_left = camera.mode.has_left();

        let mut depth_raw = vec![0u8; w * h * 2];
        let mut left_raw = if want_left { vec![0u8; w * h] } else { Vec::new() };

        for v in 0..h {
            let dy = (v as f64 - k.cy) / k.fy;
            for u in 0..w {
                let dx = (u as f64 - k.cx) / k.fx;
                let d = [dx, dy, 1.0];

                // Ground plane: up . p = -cam_height
                let up_dot = up[0] * d[0] + up[1] * d[1] + up[2] * d[2];
                let mut depth_m = if up_dot < -1e-6 {
                    -cam_height / up_dot
                } else {
                    f64::INFINITY
                };

                // Obstacle front faces: fwd . p = z_front
                let fwd_dot = fwd[0] * d[0] + fwd[1] * d[1] + fwd[2] * d[2];
                if fwd_dot > 1e-6 {
                    for obstacle in obstacles {
                        let s = obstacle.z_front / fwd_dot;
                        if s >= depth_m {
                            continue;
                        }
                        let lateral = s * dx;
                        let above_floor = cam_height + s * up_dot;
                        if (lateral - obstacle.x_center).abs() <= obstacle.half_width
                            && (0.0..=obstacle.height).contains(&above_floor)
                        {
                            depth_m = s;
                        }
                    }
                }

                if scene.noise > 0.0 && depth_m.is_finite() {
                    depth_m *= 1.0 + scene.noise * (2.0 * noise_rng.next_f64() - 1.0);
                }

                let idx = v * w + u;
                if (camera.min_depth_m..=camera.max_depth_m).contains(&depth_m) {
                    let mm = (depth_m * 1000.0).round().min(u16::MAX as f64) as u16;
                    depth_raw[idx * 2..idx * 2 + 2].copy_from_slice(&mm.to_le_bytes());
                    if want_left {
                        let shade = 40.0 + 180.0 * (1.0 - depth_m / camera.max_depth_m);
                        left_raw[idx] = shade.clamp(0.0, 255.0) as u8;
                    }
                }
                // else: no return, stays 0
            }
        }

        let left = want_left.then(|| ImageData {
            width: camera.width,
            height: camera.height,
            format: ImageFormat::Gray8,
            data: Bytes::from(left_raw),
        });

        DepthFrame {
            source_id: source_id.clone(),
            frame_id,
            timestamp,
            width: camera.width,
            height: camera.height,
            depth_mm: camera.mode.has_depth().then(|| Bytes::from(depth_raw)),
            left,
        }
    }
}

impl FrameSource for SyntheticDepthSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    fn capture_mode(&self) -> CaptureMode {
        self.camera.mode
    }

    fn listen(&self, callback: FrameCallback) {
        // Idempotent: if already listening, don't start again
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let source_id = self.source_id.clone();
        let camera = self.camera.clone();
        let scene = self.scene.clone();
        let obstacles = self.obstacles.clone();
        let listening = self.listening.clone();

        let interval = Duration::from_secs_f64(1.0 / camera.frequency_hz);

        thread::spawn(move || {
            let mut frame_id: u64 = 0;
            let start_time = std::time::Instant::now();

            debug!(
                source_id = %source_id,
                mode = %camera.mode,
                frequency_hz = camera.frequency_hz,
                obstacles = obstacles.len(),
                "synthetic source started"
            );

            while listening.load(Ordering::Relaxed) {
                frame_id += 1;
                let timestamp = start_time.elapsed().as_secs_f64();

                let frame = Self::render(
                    &camera, &scene, &obstacles, &source_id, frame_id, timestamp,
                );
                callback(frame);

                trace!(source_id = %source_id, frame_id, timestamp, "synthetic frame sent");

                thread::sleep(interval);
            }

            debug!(source_id = %source_id, "synthetic source stopped");
        });
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::CameraIntrinsics;
    use std::sync::atomic::AtomicU64;

    fn test_camera(width: u32, height: u32) -> CameraConfig {
        CameraConfig {
            width,
            height,
            frequency_hz: 100.0,
            intrinsics: CameraIntrinsics {
                fx: width as f64,
                fy: width as f64,
                cx: width as f64 / 2.0 - 0.5,
                cy: height as f64 / 2.0 - 0.5,
                baseline_m: 0.06,
            },
            ..CameraConfig::default()
        }
    }

    #[test]
    fn test_frames_flow_until_stop() {
        let source = SyntheticDepthSource::new(test_camera(64, 48), SceneConfig::default());

        let count = Arc::new(AtomicU64::new(0));
        let count_clone = count.clone();

        source.listen(Arc::new(move |frame| {
            assert_eq!(frame.source_id, "depth0");
            assert_eq!(frame.width, 64);
            assert!(frame.depth_mm.is_some());
            count_clone.fetch_add(1, Ordering::Relaxed);
        }));

        thread::sleep(Duration::from_millis(100));
        source.stop();

        assert!(count.load(Ordering::Relaxed) > 0);
        assert!(!source.is_listening());
    }

    #[test]
    fn test_idempotent_listen() {
        let source = SyntheticDepthSource::new(test_camera(32, 24), SceneConfig::default());

        let count = Arc::new(AtomicU64::new(0));
        let count1 = count.clone();
        let count2 = count.clone();

        source.listen(Arc::new(move |_| {
            count1.fetch_add(1, Ordering::Relaxed);
        }));

        // Second call should be ignored
        source.listen(Arc::new(move |_| {
            count2.fetch_add(1000, Ordering::Relaxed);
        }));

        thread::sleep(Duration::from_millis(60));
        source.stop();

        let final_count = count.load(Ordering::Relaxed);
        assert!(final_count > 0);
        assert!(final_count < 1000);
    }

    #[test]
    fn test_lower_image_is_mostly_floor() {
        // Tilted-down camera: bottom rows hit the ground plane, which must
        // be nearer than the far clip and farther than the near clip
        let camera = test_camera(64, 48);
        let scene = SceneConfig {
            obstacle_count: 0,
            noise: 0.0,
            ..SceneConfig::default()
        };
        let frame = SyntheticDepthSource::render(
            &camera,
            &scene,
            &[],
            &"t".into(),
            1,
            0.0,
        );
        let depth = frame.decode_depth().unwrap();

        let bottom_row = &depth[(47 * 64)..(48 * 64)];
        let valid = bottom_row.iter().filter(|&&d| d > 0).count();
        assert!(valid > 32, "bottom row should see the floor, got {valid} valid px");
    }

    #[test]
    fn test_obstacle_closer_than_floor_behind_it() {
        let camera = test_camera(64, 48);
        let scene = SceneConfig {
            noise: 0.0,
            ..SceneConfig::default()
        };
        let obstacle = Obstacle {
            x_center: 0.0,
            z_front: 1.5,
            half_width: 0.5,
            height: 1.0,
        };
        let frame = SyntheticDepthSource::render(
            &camera,
            &scene,
            &[obstacle],
            &"t".into(),
            1,
            0.0,
        );
        let depth = frame.decode_depth().unwrap();

        // Center pixel looks straight ahead into the obstacle
        let center = depth[24 * 64 + 32];
        assert!(center > 0);
        assert!(
            (center as f64 / 1000.0) < 2.0,
            "expected obstacle at ~1.5m, got {}mm",
            center
        );
    }

    #[test]
    fn test_render_deterministic_for_seed() {
        let camera = test_camera(32, 24);
        let scene = SceneConfig::default();
        let a = SyntheticDepthSource::render(&camera, &scene, &[], &"t".into(), 3, 0.1);
        let b = SyntheticDepthSource::render(&camera, &scene, &[], &"t".into(), 3, 0.1);
        assert_eq!(a.depth_mm, b.depth_mm);
    }
}
