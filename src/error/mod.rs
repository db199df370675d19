//! Error handling module for SegCut

use thiserror::Error;

/// Main error type for SegCut operations
#[derive(Error, Debug)]
pub enum SegCutError {
    /// Operation called with input it is undefined on (overlapping segments
    /// passed to chaptering, ambiguous multi-video-stream smart cut, ...)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// No keyframe located even after the widened retry window
    #[error("No keyframe found near {time:.3}s (searched up to ±{window:.0}s)")]
    NoKeyframeFound { time: f64, window: f64 },

    /// Cooperative abort while a probe was in flight
    #[error("Probe cancelled")]
    Cancelled,

    /// The probe process could not be spawned
    #[error("Failed to launch probe process: {0}")]
    ProbeUnavailable(#[from] std::io::Error),

    /// The probe process ran but reported failure
    #[error("Probe process failed: {message}")]
    ProbeFailed { message: String },

    /// The probe process produced output we could not parse
    #[error("Failed to parse probe output: {0}")]
    ProbeOutput(#[from] serde_json::Error),
}

impl SegCutError {
    /// Convenience constructor for invalid-input errors
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SegCutError::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type alias for SegCut operations
pub type SegCutResult<T> = std::result::Result<T, SegCutError>;
