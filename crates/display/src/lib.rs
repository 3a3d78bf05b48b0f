//! # Display
//!
//! Disparity visualization and view-frame routing.
//!
//! Views are named streams ("depth", "segmented", "left") fanned out by
//! [`DisplayRouter`] to headless sinks (PNG files, log lines). Rendering
//! depth to a displayable disparity image lives in [`DisparityRenderer`].

mod render;
mod router;
mod sinks;

pub use render::{jet_color, DisparityRenderer};
pub use router::DisplayRouter;
pub use sinks::{AnySink, FileSink, FileSinkConfig, LogSink};
