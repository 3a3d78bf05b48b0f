//! Viewer loop orchestration module.

mod input;
mod orchestrator;
mod stats;

pub use input::KeyListener;
pub use orchestrator::{Viewer, ViewerConfig};
pub use stats::ViewerStats;
