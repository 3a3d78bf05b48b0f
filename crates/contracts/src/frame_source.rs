//! FrameSource trait - capture source abstraction
//!
//! Defines a unified interface for depth frame producers, decoupling the
//! session from concrete capture implementations. The synthetic generator and
//! the file replay source implement the same interface; a hardware binding
//! would attach at this seam.

use std::sync::Arc;

use crate::{CaptureMode, DepthFrame, SourceId};

/// Frame callback type
///
/// When a source produces a frame, it hands a `DepthFrame` to this callback.
/// Uses `Arc` to allow callback sharing across multiple contexts.
pub type FrameCallback = Arc<dyn Fn(DepthFrame) + Send + Sync>;

/// Depth frame producer trait
///
/// Sources deliver frames through a registered callback from their own
/// thread, matching how depth-camera SDKs invoke user callbacks.
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn FrameSource> = build_source(&blueprint)?;
/// source.listen(Arc::new(|frame| {
///     println!("frame {} at {:.3}s", frame.frame_id, frame.timestamp);
/// }));
/// // ... consume frames ...
/// source.stop();
/// ```
pub trait FrameSource: Send + Sync {
    /// Get source ID
    fn source_id(&self) -> &SourceId;

    /// Which streams this source produces
    fn capture_mode(&self) -> CaptureMode;

    /// Register the frame callback and begin producing.
    ///
    /// If already listening, repeated calls are idempotent (a second
    /// callback is not registered).
    fn listen(&self, callback: FrameCallback);

    /// Stop producing frames and release the underlying resources.
    fn stop(&self);

    /// Check if currently producing
    fn is_listening(&self) -> bool;
}
