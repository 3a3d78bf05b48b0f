//! ViewerBlueprint - Config Loader output
//!
//! Describes a complete viewer run: camera, synthetic scene, floor-removal
//! tuning, optional replay input, and display sink routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{CameraIntrinsics, CaptureMode, SourceId};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete viewer configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Depth camera settings
    #[serde(default)]
    pub camera: CameraConfig,

    /// Synthetic scene parameters (ignored when replaying)
    #[serde(default)]
    pub scene: SceneConfig,

    /// Floor detection / removal tuning
    #[serde(default)]
    pub floor: FloorConfig,

    /// Replay input; `None` means the synthetic source
    #[serde(default)]
    pub replay: Option<ReplayConfig>,

    /// Display sink routing
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

impl Default for ViewerBlueprint {
    fn default() -> Self {
        Self {
            version: ConfigVersion::V1,
            camera: CameraConfig::default(),
            scene: SceneConfig::default(),
            floor: FloorConfig::default(),
            replay: None,
            sinks: default_sinks(),
        }
    }
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![SinkConfig {
        name: "console".to_string(),
        kind: SinkKind::Log,
        params: HashMap::new(),
    }]
}

/// Depth camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Source identifier carried on every frame
    #[serde(default = "default_camera_id")]
    pub id: SourceId,

    /// Which streams to open
    #[serde(default)]
    pub mode: CaptureMode,

    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Nominal acquisition rate (Hz)
    #[serde(default = "default_frequency")]
    pub frequency_hz: f64,

    /// Pinhole model of the depth stream
    #[serde(default)]
    pub intrinsics: CameraIntrinsics,

    /// Nearest measurable depth; disparity at this depth saturates the
    /// 8-bit visualization scale
    #[serde(default = "default_min_depth")]
    pub min_depth_m: f64,

    /// Far clip; beyond this depth reads as no-return (0)
    #[serde(default = "default_max_depth")]
    pub max_depth_m: f64,
}

fn default_camera_id() -> SourceId {
    SourceId::new("depth0")
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_frequency() -> f64 {
    30.0
}

fn default_min_depth() -> f64 {
    0.35
}

fn default_max_depth() -> f64 {
    8.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            id: default_camera_id(),
            mode: CaptureMode::default(),
            width: default_width(),
            height: default_height(),
            frequency_hz: default_frequency(),
            intrinsics: CameraIntrinsics::default(),
            min_depth_m: default_min_depth(),
            max_depth_m: default_max_depth(),
        }
    }
}

/// Synthetic scene parameters
///
/// The generator renders a ground plane seen from a camera mounted at
/// `camera_height_m`, pitched down by `tilt_deg`, with seeded box obstacles
/// standing on the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Camera height above the floor (metres)
    #[serde(default = "default_camera_height")]
    pub camera_height_m: f64,

    /// Downward pitch of the optical axis (degrees)
    #[serde(default = "default_tilt")]
    pub tilt_deg: f64,

    /// Number of box obstacles on the floor
    #[serde(default = "default_obstacles")]
    pub obstacle_count: u32,

    /// Multiplicative depth noise amplitude (fraction of depth)
    #[serde(default = "default_noise")]
    pub noise: f64,

    /// RNG seed for obstacle placement and noise
    #[serde(default = "default_scene_seed")]
    pub seed: u64,
}

fn default_camera_height() -> f64 {
    1.2
}

fn default_tilt() -> f64 {
    20.0
}

fn default_obstacles() -> u32 {
    4
}

fn default_noise() -> f64 {
    0.01
}

fn default_scene_seed() -> u64 {
    7
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera_height_m: default_camera_height(),
            tilt_deg: default_tilt(),
            obstacle_count: default_obstacles(),
            noise: default_noise(),
            seed: default_scene_seed(),
        }
    }
}

/// Floor detection / removal tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorConfig {
    /// RANSAC iterations per detection
    #[serde(default = "default_iterations")]
    pub ransac_iterations: u32,

    /// Point-to-plane inlier distance (metres)
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold_m: f64,

    /// Max deviation of the plane normal from vertical (degrees)
    #[serde(default = "default_normal_dev")]
    pub max_normal_dev_deg: f64,

    /// Pixel stride when reprojecting depth for the fit
    #[serde(default = "default_subsample")]
    pub subsample_step: u32,

    /// Minimum inlier fraction for a plane to qualify as the floor
    #[serde(default = "default_min_inliers")]
    pub min_inlier_ratio: f64,

    /// RANSAC sampling seed (deterministic fits)
    #[serde(default = "default_floor_seed")]
    pub seed: u64,
}

fn default_iterations() -> u32 {
    64
}

fn default_distance_threshold() -> f64 {
    0.04
}

fn default_normal_dev() -> f64 {
    // Must absorb the camera tilt: the gate is measured against the
    // camera's own up axis, not world up
    40.0
}

fn default_subsample() -> u32 {
    4
}

fn default_min_inliers() -> f64 {
    0.15
}

fn default_floor_seed() -> u64 {
    1
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            ransac_iterations: default_iterations(),
            distance_threshold_m: default_distance_threshold(),
            max_normal_dev_deg: default_normal_dev(),
            subsample_step: default_subsample(),
            min_inlier_ratio: default_min_inliers(),
            seed: default_floor_seed(),
        }
    }
}

/// Replay input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Recorded session directory (manifest.json + frames.jsonl + planes)
    pub path: PathBuf,

    /// Playback speed multiplier (1.0 = original spacing)
    #[serde(default = "default_speed")]
    pub speed_multiplier: f64,

    /// Restart from the first frame when the recording ends
    #[serde(default)]
    pub loop_playback: bool,
}

fn default_speed() -> f64 {
    1.0
}

/// Display sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Unique sink name
    pub name: String,

    /// Sink implementation selector
    pub kind: SinkKind,

    /// Kind-specific parameters (e.g. `base_path` for file sinks)
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// PNG snapshots per stream, optional replay-compatible recording
    File,
    /// Tracing summaries only
    Log,
}
