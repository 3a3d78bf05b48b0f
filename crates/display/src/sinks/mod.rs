//! Sink implementations.

mod file;
mod log;

pub use file::{FileSink, FileSinkConfig};
pub use log::LogSink;

use contracts::{FrameSink, ViewFrame, ViewerError};

/// Enum dispatch over the sink implementations.
///
/// `FrameSink` is not object-safe (async methods), so the router holds
/// this instead of trait objects.
pub enum AnySink {
    File(FileSink),
    Log(LogSink),
}

impl AnySink {
    pub fn name(&self) -> &str {
        match self {
            Self::File(s) => s.name(),
            Self::Log(s) => s.name(),
        }
    }

    pub async fn write(&mut self, frame: &ViewFrame) -> Result<(), ViewerError> {
        match self {
            Self::File(s) => s.write(frame).await,
            Self::Log(s) => s.write(frame).await,
        }
    }

    pub async fn flush(&mut self) -> Result<(), ViewerError> {
        match self {
            Self::File(s) => s.flush().await,
            Self::Log(s) => s.flush().await,
        }
    }

    pub async fn close(&mut self) -> Result<(), ViewerError> {
        match self {
            Self::File(s) => s.close().await,
            Self::Log(s) => s.close().await,
        }
    }
}
