//! # Contracts
//!
//! Frozen interface contracts shared by every depthview crate: inter-module
//! data structures and traits. Business crates may only depend on this crate,
//! reverse dependencies are prohibited.
//!
//! ## Time model
//! - Frame timestamps are seconds since source start (f64), the primary clock
//! - `frame_id` is strictly increasing per source, used for ordering/diagnostics

mod blueprint;
mod error;
mod frame;
mod frame_source;
mod intrinsics;
mod mode;
mod sink;
mod source_id;

pub use blueprint::*;
pub use error::*;
pub use frame::*;
pub use frame_source::{FrameCallback, FrameSource};
pub use intrinsics::CameraIntrinsics;
pub use mode::{CaptureMode, SessionState};
pub use sink::*;
pub use source_id::SourceId;
