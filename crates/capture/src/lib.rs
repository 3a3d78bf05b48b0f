//! # Capture
//!
//! `FrameSource` implementations and the recording format.
//!
//! - [`SyntheticDepthSource`]: procedural depth scene (ground plane plus box
//!   obstacles) produced from a background thread at a configured rate.
//!   Development and testing without camera hardware.
//! - [`ReplayDepthSource`]: plays back a recorded session from disk at
//!   original timestamp spacing.
//! - [`FrameRecorder`]: writes sessions the replay source can read.
//!
//! A real sensor binding would implement `contracts::FrameSource` alongside
//! these.

mod format;
mod recorder;
mod replay;
mod rng;
mod synthetic;

pub use format::{FrameRecord, RecordingManifest, DEPTH_DIR, INDEX_FILE, MANIFEST_FILE};
pub use recorder::FrameRecorder;
pub use replay::ReplayDepthSource;
pub use synthetic::SyntheticDepthSource;
