//! Pipeline configuration.
//!
//! Every field has a default, so a partial object (from JSON or a JS
//! options bag) is enough to configure the pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encode::{EncodingRequest, OutputFormat, Quality};

/// Largest accepted source file: 50 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Deadline for a single decode or encode run.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Initial position of the quality slider.
pub const DEFAULT_QUALITY_PERCENT: u8 = 80;

/// How long a transient error message stays visible.
pub const ERROR_TOAST_MS: u64 = 3_000;

/// Tunables for [`CompressionPipeline`](crate::CompressionPipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Sources larger than this are rejected before decoding.
    pub max_input_bytes: u64,
    /// Deadline for async decode/encode runs, in milliseconds.
    pub timeout_ms: u64,
    /// Format used when the presentation layer has no selection.
    pub default_format: OutputFormat,
    /// Initial quality on the 0-100 slider scale.
    pub default_quality_percent: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_format: OutputFormat::Jpeg,
            default_quality_percent: DEFAULT_QUALITY_PERCENT,
        }
    }
}

impl PipelineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The request the presentation layer starts out with.
    pub fn default_request(&self) -> EncodingRequest {
        EncodingRequest::new(
            self.default_format,
            Quality::from_percent(self.default_quality_percent),
        )
    }
}
