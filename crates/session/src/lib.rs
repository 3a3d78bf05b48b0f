//! # Session
//!
//! The depth-sensor session: the stateful object a viewer polls.
//!
//! Responsibilities:
//! - Open a capture source (synthetic or replay) for a capture mode
//! - Intake frames over a bounded channel, newest wins under backpressure
//! - Hold the current frame and its decoded depth buffer
//! - Floor removal and disparity rendering over the current frame
//! - Measured acquisition rate for loop pacing
//!
//! ## Usage example
//!
//! ```ignore
//! use session::DepthSession;
//! use contracts::CaptureMode;
//!
//! let mut session = DepthSession::new(config);
//! session.start(CaptureMode::DepthLeft)?;
//! loop {
//!     session.grab().await?;
//!     let raw = session.disparity(true)?;
//!     session.remove_floor()?;
//!     let segmented = session.disparity(true)?;
//!     // display, pace by 1000 / session.rate() ms, break on escape
//! }
//! session.stop();
//! ```

mod rate;
mod session;

pub use rate::RateTracker;
pub use session::{DepthSession, GrabOutcome, SessionConfig};
