//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    camera: CameraInfo,
    input: InputInfo,
    floor: FloorInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct CameraInfo {
    id: String,
    mode: String,
    width: u32,
    height: u32,
    frequency_hz: f64,
    min_depth_m: f64,
    max_depth_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    intrinsics: Option<IntrinsicsInfo>,
}

#[derive(Serialize)]
struct IntrinsicsInfo {
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    baseline_m: f64,
}

#[derive(Serialize)]
struct InputInfo {
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    replay_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<SceneInfo>,
}

#[derive(Serialize)]
struct SceneInfo {
    camera_height_m: f64,
    tilt_deg: f64,
    obstacle_count: u32,
    seed: u64,
}

#[derive(Serialize)]
struct FloorInfo {
    ransac_iterations: u32,
    distance_threshold_m: f64,
    max_normal_dev_deg: f64,
    min_inlier_ratio: f64,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    kind: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::ViewerBlueprint, args: &InfoArgs) -> ConfigInfo {
    let intrinsics = if args.intrinsics {
        let i = &blueprint.camera.intrinsics;
        Some(IntrinsicsInfo {
            fx: i.fx,
            fy: i.fy,
            cx: i.cx,
            cy: i.cy,
            baseline_m: i.baseline_m,
        })
    } else {
        None
    };

    let input = match &blueprint.replay {
        Some(replay) => InputInfo {
            kind: "replay".to_string(),
            replay_path: Some(replay.path.display().to_string()),
            scene: None,
        },
        None => InputInfo {
            kind: "synthetic".to_string(),
            replay_path: None,
            scene: Some(SceneInfo {
                camera_height_m: blueprint.scene.camera_height_m,
                tilt_deg: blueprint.scene.tilt_deg,
                obstacle_count: blueprint.scene.obstacle_count,
                seed: blueprint.scene.seed,
            }),
        },
    };

    let sinks = if args.sinks {
        blueprint
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                kind: format!("{:?}", s.kind),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        camera: CameraInfo {
            id: blueprint.camera.id.to_string(),
            mode: blueprint.camera.mode.to_string(),
            width: blueprint.camera.width,
            height: blueprint.camera.height,
            frequency_hz: blueprint.camera.frequency_hz,
            min_depth_m: blueprint.camera.min_depth_m,
            max_depth_m: blueprint.camera.max_depth_m,
            intrinsics,
        },
        input,
        floor: FloorInfo {
            ransac_iterations: blueprint.floor.ransac_iterations,
            distance_threshold_m: blueprint.floor.distance_threshold_m,
            max_normal_dev_deg: blueprint.floor.max_normal_dev_deg,
            min_inlier_ratio: blueprint.floor.min_inlier_ratio,
        },
        sinks,
    }
}

fn print_config_info(blueprint: &contracts::ViewerBlueprint, args: &InfoArgs) {
    println!("=== Depthview Configuration ===\n");

    println!("Camera");
    println!("  ├─ Version: {:?}", blueprint.version);
    println!("  ├─ Id: {}", blueprint.camera.id);
    println!("  ├─ Mode: {}", blueprint.camera.mode);
    println!(
        "  ├─ Resolution: {}x{} @ {} Hz",
        blueprint.camera.width, blueprint.camera.height, blueprint.camera.frequency_hz
    );
    println!(
        "  └─ Depth range: {:.2}m - {:.2}m",
        blueprint.camera.min_depth_m, blueprint.camera.max_depth_m
    );

    if args.intrinsics {
        let i = &blueprint.camera.intrinsics;
        println!("\nIntrinsics");
        println!("  ├─ fx/fy: {:.1} / {:.1}", i.fx, i.fy);
        println!("  ├─ cx/cy: {:.1} / {:.1}", i.cx, i.cy);
        println!("  └─ Baseline: {:.3}m", i.baseline_m);
    }

    match &blueprint.replay {
        Some(replay) => {
            println!("\nInput: replay");
            println!("  ├─ Path: {}", replay.path.display());
            println!("  ├─ Speed: {}x", replay.speed_multiplier);
            println!("  └─ Loop: {}", replay.loop_playback);
        }
        None => {
            println!("\nInput: synthetic scene");
            println!("  ├─ Camera height: {:.2}m", blueprint.scene.camera_height_m);
            println!("  ├─ Tilt: {:.1} deg", blueprint.scene.tilt_deg);
            println!("  ├─ Obstacles: {}", blueprint.scene.obstacle_count);
            println!("  └─ Seed: {}", blueprint.scene.seed);
        }
    }

    println!("\nFloor removal");
    println!("  ├─ Iterations: {}", blueprint.floor.ransac_iterations);
    println!(
        "  ├─ Distance threshold: {:.0}mm",
        blueprint.floor.distance_threshold_m * 1000.0
    );
    println!(
        "  ├─ Max normal deviation: {:.1} deg",
        blueprint.floor.max_normal_dev_deg
    );
    println!(
        "  └─ Min inlier ratio: {:.0}%",
        blueprint.floor.min_inlier_ratio * 100.0
    );

    if args.sinks && !blueprint.sinks.is_empty() {
        println!("\nSinks ({})", blueprint.sinks.len());
        for (i, sink) in blueprint.sinks.iter().enumerate() {
            let is_last = i == blueprint.sinks.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!("  {} {} ({:?})", prefix, sink.name, sink.kind);
        }
    }

    println!();
}
