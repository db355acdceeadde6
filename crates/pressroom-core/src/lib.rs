//! Pressroom Core - Image recompression library
//!
//! This crate provides the core of Pressroom: validating a user-selected
//! image, re-encoding it at native resolution under a chosen format and
//! quality, and reporting how much smaller (or larger) the result is.
//!
//! # Module Structure
//!
//! - `decode` - Source validation, rasterization, EXIF orientation
//! - `encode` - Output format/quality and surface encoding
//! - `pipeline` - `CompressionPipeline` tying decode and encode together
//! - `stats` - Before/after size statistics
//! - `session` - Single-image session state with stale-result guarding
//! - `display` - Strings and file names for the presentation layer
//! - `runtime` - Async wrappers with timeouts (feature `runtime`)

pub mod config;
pub mod decode;
pub mod display;
pub mod encode;
pub mod error;
pub mod pipeline;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod session;
pub mod stats;

#[cfg(test)]
mod test_helpers;

pub use config::{PipelineConfig, DEFAULT_MAX_INPUT_BYTES, ERROR_TOAST_MS};
pub use decode::SourceImage;
pub use display::{
    download_file_name, format_dimensions, format_file_size, format_quality, format_ratio,
};
pub use encode::{EncodingRequest, OutputFormat, Quality};
pub use error::PipelineError;
pub use pipeline::{CompressionPipeline, EncodedResult};
pub use session::{Completion, CompressionSession, Download, PendingCompression, SessionPhase};
pub use stats::{compute_statistics, Stats};
