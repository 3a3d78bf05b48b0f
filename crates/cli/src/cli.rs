//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::CaptureMode;
use std::path::PathBuf;

/// Depthview - depth camera viewer with floor segmentation
#[derive(Parser, Debug)]
#[command(
    name = "depthview",
    author,
    version,
    about = "Depth camera viewer with floor segmentation",
    long_about = "A polling depth viewer.\n\n\
                  Opens a capture session (synthetic scene or recorded replay), grabs \n\
                  frames at the sensor rate, removes the detected floor plane, and \n\
                  routes raw and segmented disparity views to configured sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "DEPTHVIEW_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "DEPTHVIEW_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the viewer loop
    View(ViewArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `view` command
#[derive(Parser, Debug, Clone)]
pub struct ViewArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "DEPTHVIEW_CONFIG")]
    pub config: PathBuf,

    /// Override capture mode from configuration
    #[arg(long, value_enum, env = "DEPTHVIEW_MODE")]
    pub mode: Option<CaptureModeArg>,

    /// Override nominal capture rate in Hz from configuration
    #[arg(long, env = "DEPTHVIEW_RATE")]
    pub rate: Option<f64>,

    /// Render disparity in grayscale instead of the color map
    #[arg(long)]
    pub grayscale: bool,

    /// Maximum number of frames to view (0 = unlimited)
    #[arg(long, default_value = "0", env = "DEPTHVIEW_MAX_FRAMES")]
    pub max_frames: u64,

    /// Viewer timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "DEPTHVIEW_TIMEOUT")]
    pub timeout: u64,

    /// Record grabbed frames to this directory
    #[arg(long, env = "DEPTHVIEW_RECORD")]
    pub record: Option<PathBuf>,

    /// Replay a recorded session instead of the synthetic scene
    #[arg(long, env = "DEPTHVIEW_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Replay speed multiplier (1.0 = original speed)
    #[arg(long, default_value = "1.0")]
    pub replay_speed: f64,

    /// Loop replay when finished
    #[arg(long)]
    pub replay_loop: bool,

    /// Validate configuration and exit without running the viewer
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "DEPTHVIEW_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show camera intrinsics
    #[arg(long)]
    pub intrinsics: bool,

    /// Show sink configuration
    #[arg(long)]
    pub sinks: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

/// Capture mode selection
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CaptureModeArg {
    /// Depth stream only
    Depth,
    /// Depth plus left rectified image
    DepthLeft,
    /// Depth plus both rectified images
    DepthLeftRight,
    /// Left rectified image only
    Left,
    /// Both rectified images, no depth
    LeftRight,
}

impl From<CaptureModeArg> for CaptureMode {
    fn from(arg: CaptureModeArg) -> Self {
        match arg {
            CaptureModeArg::Depth => CaptureMode::Depth,
            CaptureModeArg::DepthLeft => CaptureMode::DepthLeft,
            CaptureModeArg::DepthLeftRight => CaptureMode::DepthLeftRight,
            CaptureModeArg::Left => CaptureMode::Left,
            CaptureModeArg::LeftRight => CaptureMode::LeftRight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_defaults() {
        let cli = Cli::try_parse_from(["depthview", "view"]).unwrap();
        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.config, PathBuf::from("config.toml"));
                assert_eq!(args.max_frames, 0);
                assert!(!args.grayscale);
                assert!(args.mode.is_none());
                assert!(args.replay.is_none());
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_mode_override_parses() {
        let cli =
            Cli::try_parse_from(["depthview", "view", "--mode", "depth-left-right"]).unwrap();
        match cli.command {
            Commands::View(args) => {
                let mode: CaptureMode = args.mode.unwrap().into();
                assert_eq!(mode, CaptureMode::DepthLeftRight);
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["depthview", "-q", "-v", "view"]).is_err());
    }

    #[test]
    fn test_validate_json_flag() {
        let cli = Cli::try_parse_from(["depthview", "validate", "--json"]).unwrap();
        match cli.command {
            Commands::Validate(args) => assert!(args.json),
            _ => panic!("expected validate command"),
        }
    }
}
