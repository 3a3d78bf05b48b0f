//! LogSink - logs view frame summaries via tracing

use contracts::{FrameSink, ViewFrame, ViewerError};
use tracing::{info, instrument};

/// Sink that logs frame summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl FrameSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.frame_id)
    )]
    async fn write(&mut self, frame: &ViewFrame) -> Result<(), ViewerError> {
        info!(
            sink = %self.name,
            stream = %frame.stream,
            frame_id = frame.frame_id,
            timestamp = frame.timestamp,
            width = frame.image.width,
            height = frame.image.height,
            format = ?frame.image.format,
            "view frame"
        );
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ViewerError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ViewerError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
