//! Stateless pipeline WASM bindings.
//!
//! These wrap `pressroom_core::CompressionPipeline` with the default
//! configuration. Pages that keep an image across several compress clicks
//! should use `JsCompressionSession` instead.
//!
//! # Example
//!
//! ```typescript
//! import { decode_and_measure, compress, compute_statistics } from '@pressroom/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const source = decode_and_measure(bytes, file.type);
//! const result = compress(bytes, file.type, 'webp', 80);
//! const stats = compute_statistics(source.byte_length, result.byte_length);
//! console.log(`Saved ${stats.saved_label} (${stats.ratio_label})`);
//! ```

use crate::to_js_error;
use crate::types::{JsEncodedResult, JsSourceImage, JsStats};
use pressroom_core::{CompressionPipeline, EncodingRequest, OutputFormat, PipelineError, Quality};
use wasm_bindgen::prelude::*;

/// Validate a file and read its pixel dimensions.
///
/// # Errors
///
/// Fails with an "Invalid input" message when `media_type` is not `image/*`
/// or the file is empty or over 50 MiB. Those checks never decode. Fails
/// with an "Encoding failed" message when the bytes cannot be decoded.
#[wasm_bindgen]
pub fn decode_and_measure(bytes: Vec<u8>, media_type: &str) -> Result<JsSourceImage, JsValue> {
    CompressionPipeline::default()
        .decode_and_measure(bytes, media_type)
        .map(|source| JsSourceImage::from(&source))
        .map_err(to_js_error)
}

/// Validate, decode and re-encode a file in one call.
///
/// # Arguments
///
/// * `bytes` - The original file bytes
/// * `media_type` - Declared type of the file (`File.type`)
/// * `format` - "jpeg", "png" or "webp"; `undefined` means "jpeg"
/// * `quality_percent` - Slider value 0-100 (only JPEG uses it)
#[wasm_bindgen]
pub fn compress(
    bytes: Vec<u8>,
    media_type: &str,
    format: Option<String>,
    quality_percent: u8,
) -> Result<JsEncodedResult, JsValue> {
    let request = EncodingRequest::from_settings(format.as_deref(), quality_percent)
        .map_err(|e| to_js_error(e.into()))?;
    let pipeline = CompressionPipeline::default();
    let source = pipeline
        .decode_and_measure(bytes, media_type)
        .map_err(to_js_error)?;

    pipeline
        .compress(&source, &request)
        .map(JsEncodedResult::from)
        .map_err(to_js_error)
}

/// Before/after statistics from the two byte sizes.
///
/// Sizes are JavaScript numbers; fractional parts are truncated.
///
/// # Errors
///
/// Fails with an "Invalid input" message when `original_bytes` is below 1
/// or either size is negative or NaN.
#[wasm_bindgen]
pub fn compute_statistics(
    original_bytes: f64,
    compressed_bytes: f64,
) -> Result<JsStats, JsValue> {
    if original_bytes.is_nan() || original_bytes < 1.0 {
        return Err(to_js_error(PipelineError::InvalidInput(format!(
            "original size must be at least 1 byte, got {original_bytes}"
        ))));
    }
    if compressed_bytes.is_nan() || compressed_bytes < 0.0 {
        return Err(to_js_error(PipelineError::InvalidInput(format!(
            "compressed size must not be negative, got {compressed_bytes}"
        ))));
    }

    Ok(pressroom_core::compute_statistics(original_bytes as u64, compressed_bytes as u64).into())
}

/// Human-readable size, e.g. `format_file_size(1536) === "1.5 KB"`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    pressroom_core::format_file_size(bytes as i64)
}

/// Name to save a compressed file under:
/// `{base}_compressed_{quality}%.{format}`.
#[wasm_bindgen]
pub fn download_file_name(
    original_name: &str,
    quality_percent: u8,
    format: Option<String>,
) -> Result<String, JsValue> {
    let format =
        OutputFormat::from_selection(format.as_deref()).map_err(|e| to_js_error(e.into()))?;
    Ok(pressroom_core::download_file_name(
        original_name,
        Quality::from_percent(quality_percent),
        format,
    ))
}
