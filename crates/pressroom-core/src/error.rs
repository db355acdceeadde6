//! Errors surfaced at the pipeline boundary.
//!
//! Everything the presentation layer sees is one of these variants plus a
//! human-readable message. None of them is fatal: the user can always retry
//! by repeating the action.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Pipeline-level error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rejected before any decode was attempted. User-correctable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Decoding, drawing or encoding failed on input that looked valid.
    #[error("Encoding failed: {0}")]
    EncodingFailure(String),

    /// A background operation did not finish in time.
    #[error("Operation timed out after {millis} ms")]
    Timeout { millis: u64 },
}

impl PipelineError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PipelineError::InvalidInput(_))
    }

    pub fn is_encoding_failure(&self) -> bool {
        matches!(self, PipelineError::EncodingFailure(_))
    }
}

impl From<DecodeError> for PipelineError {
    fn from(err: DecodeError) -> Self {
        if err.is_validation() {
            PipelineError::InvalidInput(err.to_string())
        } else {
            PipelineError::EncodingFailure(err.to_string())
        }
    }
}

impl From<EncodeError> for PipelineError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::UnsupportedFormat(_) | EncodeError::InvalidQuality(_) => {
                PipelineError::InvalidInput(err.to_string())
            }
            EncodeError::InvalidDimensions { .. } | EncodeError::EncodingFailed { .. } => {
                PipelineError::EncodingFailure(err.to_string())
            }
        }
    }
}
