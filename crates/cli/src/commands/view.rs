//! `view` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::ViewArgs;
use crate::viewer::{KeyListener, Viewer, ViewerConfig};

/// Execute the `view` command
pub async fn run_view(args: &ViewArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // A missing config file is fine: the defaults describe a complete
    // synthetic session
    let mut blueprint = if args.config.exists() {
        config_loader::ConfigLoader::load_from_path(&args.config)
            .with_context(|| format!("Failed to load config from {}", args.config.display()))?
    } else {
        info!(
            config = %args.config.display(),
            "Configuration file not found, using defaults"
        );
        contracts::ViewerBlueprint::default()
    };

    // Apply CLI overrides
    if let Some(mode) = args.mode {
        let mode: contracts::CaptureMode = mode.into();
        info!(mode = %mode, "Overriding capture mode from CLI");
        blueprint.camera.mode = mode;
    }
    if let Some(rate) = args.rate {
        anyhow::ensure!(rate > 0.0, "--rate must be positive");
        info!(rate_hz = rate, "Overriding capture rate from CLI");
        blueprint.camera.frequency_hz = rate;
    }
    if let Some(ref path) = args.replay {
        info!(path = %path.display(), "Replaying recorded session from CLI");
        blueprint.replay = Some(contracts::ReplayConfig {
            path: path.clone(),
            speed_multiplier: args.replay_speed,
            loop_playback: args.replay_loop,
        });
    }

    info!(
        camera = %blueprint.camera.id,
        mode = %blueprint.camera.mode,
        rate_hz = blueprint.camera.frequency_hz,
        replay = blueprint.replay.is_some(),
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build viewer configuration
    let viewer_config = ViewerConfig {
        blueprint,
        colorize: !args.grayscale,
        max_frames: if args.max_frames == 0 {
            None
        } else {
            Some(args.max_frames)
        },
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        record_path: args.record.clone(),
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Key input from stdin: ESC or 'q' exits the loop
    let mut keys = KeyListener::spawn();

    let viewer = Viewer::new(viewer_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting viewer...");

    tokio::select! {
        result = viewer.run(&mut keys) => {
            match result {
                Ok(stats) => {
                    info!(
                        frames = stats.frames_grabbed,
                        duration_secs = stats.duration.as_secs_f64(),
                        fps = format!("{:.2}", stats.fps()),
                        "Viewer completed"
                    );
                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Viewer execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping viewer...");
        }
    }

    info!("Depthview finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::ViewerBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Camera:");
    println!("  Id: {}", blueprint.camera.id);
    println!("  Mode: {}", blueprint.camera.mode);
    println!(
        "  Resolution: {}x{} @ {} Hz",
        blueprint.camera.width, blueprint.camera.height, blueprint.camera.frequency_hz
    );
    println!(
        "  Depth range: {:.2}m - {:.2}m",
        blueprint.camera.min_depth_m, blueprint.camera.max_depth_m
    );

    match &blueprint.replay {
        Some(replay) => {
            println!("\nInput: replay from {}", replay.path.display());
            println!(
                "  Speed: {}x, loop: {}",
                replay.speed_multiplier, replay.loop_playback
            );
        }
        None => {
            println!("\nInput: synthetic scene");
            println!(
                "  Camera height {:.2}m, tilt {:.1} deg, {} obstacles",
                blueprint.scene.camera_height_m,
                blueprint.scene.tilt_deg,
                blueprint.scene.obstacle_count
            );
        }
    }

    println!("\nFloor removal:");
    println!(
        "  {} iterations, {:.0}mm threshold, min inliers {:.0}%",
        blueprint.floor.ransac_iterations,
        blueprint.floor.distance_threshold_m * 1000.0,
        blueprint.floor.min_inlier_ratio * 100.0
    );

    if !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!("  - {} ({:?})", sink.name, sink.kind);
        }
    }

    println!();
}
