//! Layered error definitions
//!
//! Categorized by source: config / capture / session / segmentation / sink

use thiserror::Error;

use crate::{CaptureMode, SessionState};

/// Unified error type
#[derive(Debug, Error)]
pub enum ViewerError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Capture Errors =====
    /// Capture source failed to open
    #[error("capture source '{source_id}' failed to open: {message}")]
    CaptureOpen { source_id: String, message: String },

    /// Capture source went away mid-session
    #[error("capture source '{source_id}' closed unexpectedly")]
    CaptureClosed { source_id: String },

    // ===== Session Errors =====
    /// Operation called in the wrong lifecycle state
    #[error("'{operation}' cannot run while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// No frame arrived within the grab timeout
    #[error("no frame received within {waited_ms}ms")]
    GrabTimeout { waited_ms: u64 },

    /// Depth-state operation before the first successful grab
    #[error("'{operation}' called before any frame was grabbed")]
    NoFrame { operation: &'static str },

    /// Depth-dependent operation in a mode without a depth stream
    #[error("'{operation}' needs a depth stream, capture mode is {mode}")]
    DepthUnavailable {
        operation: &'static str,
        mode: CaptureMode,
    },

    // ===== Segmentation Errors =====
    /// Plane fitting failed on degenerate geometry
    #[error("segmentation error: {message}")]
    Segmentation { message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ViewerError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create capture open error
    pub fn capture_open(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CaptureOpen {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create segmentation error
    pub fn segmentation(message: impl Into<String>) -> Self {
        Self::Segmentation {
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
