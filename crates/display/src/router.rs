//! DisplayRouter - fans each view frame out to every configured sink.
//!
//! A failing sink is logged and skipped; one broken output must not stall
//! the viewer loop.

use contracts::{SinkConfig, SinkKind, ViewFrame, ViewerError};
use tracing::{debug, warn};

use crate::sinks::{AnySink, FileSink, LogSink};

/// Owns the sink set for a viewer run.
pub struct DisplayRouter {
    sinks: Vec<AnySink>,
    write_errors: u64,
}

impl DisplayRouter {
    /// Build the sink set from validated configuration.
    pub fn from_configs(configs: &[SinkConfig]) -> Result<Self, ViewerError> {
        let mut sinks = Vec::with_capacity(configs.len());
        for config in configs {
            let sink = match config.kind {
                SinkKind::File => AnySink::File(FileSink::from_params(
                    config.name.clone(),
                    &config.params,
                )?),
                SinkKind::Log => AnySink::Log(LogSink::new(config.name.clone())),
            };
            debug!(sink = %config.name, kind = ?config.kind, "sink registered");
            sinks.push(sink);
        }
        Ok(Self {
            sinks,
            write_errors: 0,
        })
    }

    /// Write one frame to all sinks, isolating per-sink failures.
    ///
    /// Returns the outcome per sink so callers can account for routing.
    pub async fn route(&mut self, frame: &ViewFrame) -> Vec<(String, bool)> {
        let mut outcomes = Vec::with_capacity(self.sinks.len());
        for sink in &mut self.sinks {
            match sink.write(frame).await {
                Ok(()) => outcomes.push((sink.name().to_string(), true)),
                Err(e) => {
                    self.write_errors += 1;
                    warn!(sink = sink.name(), error = %e, "sink write failed");
                    outcomes.push((sink.name().to_string(), false));
                }
            }
        }
        outcomes
    }

    /// Flush all sinks.
    pub async fn flush(&mut self) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.flush().await {
                warn!(sink = sink.name(), error = %e, "sink flush failed");
            }
        }
    }

    /// Close all sinks.
    pub async fn close(&mut self) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.close().await {
                warn!(sink = sink.name(), error = %e, "sink close failed");
            }
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Writes that failed since construction
    pub fn write_errors(&self) -> u64 {
        self.write_errors
    }
}
