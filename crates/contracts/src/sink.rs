//! FrameSink trait - display output interface
//!
//! Defines the abstract interface for view sinks.

use crate::{ViewFrame, ViewerError};

/// Display output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(FrameSink: Send)]
pub trait LocalFrameSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one rendered view frame
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, frame: &ViewFrame) -> Result<(), ViewerError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ViewerError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ViewerError>;
}
