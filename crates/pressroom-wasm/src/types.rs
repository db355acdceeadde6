//! WASM-compatible wrapper types for pipeline data.
//!
//! Byte counts are exposed as `f64` so they arrive in JavaScript as plain
//! numbers rather than `BigInt`. Every type also carries the display
//! strings the page renders, so the page does no arithmetic of its own.

use pressroom_core::{
    format_dimensions, format_file_size, format_quality, format_ratio, EncodedResult,
    SourceImage, Stats,
};
use wasm_bindgen::prelude::*;

/// A validated and measured source image.
#[wasm_bindgen]
pub struct JsSourceImage {
    width: u32,
    height: u32,
    byte_length: u64,
    media_type: String,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Original file size in bytes
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> f64 {
        self.byte_length as f64
    }

    #[wasm_bindgen(getter)]
    pub fn media_type(&self) -> String {
        self.media_type.clone()
    }

    /// File size for display, e.g. "1.91 MB"
    #[wasm_bindgen(getter)]
    pub fn size_label(&self) -> String {
        format_file_size(self.byte_length as i64)
    }

    /// Dimensions for display, e.g. "1000 x 800"
    #[wasm_bindgen(getter)]
    pub fn dimensions_label(&self) -> String {
        format_dimensions(self.width, self.height)
    }
}

impl From<&SourceImage> for JsSourceImage {
    fn from(source: &SourceImage) -> Self {
        Self {
            width: source.width(),
            height: source.height(),
            byte_length: source.byte_length(),
            media_type: source.media_type().to_string(),
        }
    }
}

/// A re-encoded image.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `bytes()` copies them into a
/// `Uint8Array`; prefer a session's object URL for previews.
#[wasm_bindgen]
pub struct JsEncodedResult {
    result: EncodedResult,
}

#[wasm_bindgen]
impl JsEncodedResult {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.result.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.result.height()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> f64 {
        self.result.byte_length() as f64
    }

    /// Output format name ("jpeg", "png" or "webp")
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.result.format().name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.result.format().mime_type().to_string()
    }

    /// Quality on the 0-100 slider scale
    #[wasm_bindgen(getter)]
    pub fn quality_percent(&self) -> u8 {
        self.result.quality().percent()
    }

    /// Quality for display, e.g. "80%"
    #[wasm_bindgen(getter)]
    pub fn quality_label(&self) -> String {
        format_quality(self.result.quality())
    }

    #[wasm_bindgen(getter)]
    pub fn size_label(&self) -> String {
        format_file_size(self.result.byte_length() as i64)
    }

    #[wasm_bindgen(getter)]
    pub fn dimensions_label(&self) -> String {
        format_dimensions(self.result.width(), self.result.height())
    }

    /// Returns the encoded file as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.result.bytes().to_vec()
    }
}

impl From<EncodedResult> for JsEncodedResult {
    fn from(result: EncodedResult) -> Self {
        Self { result }
    }
}

/// Before/after statistics.
#[wasm_bindgen]
pub struct JsStats {
    stats: Stats,
}

#[wasm_bindgen]
impl JsStats {
    #[wasm_bindgen(getter)]
    pub fn original_bytes(&self) -> f64 {
        self.stats.original_bytes as f64
    }

    #[wasm_bindgen(getter)]
    pub fn compressed_bytes(&self) -> f64 {
        self.stats.compressed_bytes as f64
    }

    /// Size reduction in percent, one decimal place. Negative if the output grew.
    #[wasm_bindgen(getter)]
    pub fn compression_ratio_percent(&self) -> f64 {
        self.stats.compression_ratio_percent
    }

    /// Bytes saved. Negative if the output grew.
    #[wasm_bindgen(getter)]
    pub fn bytes_saved(&self) -> f64 {
        self.stats.bytes_saved as f64
    }

    /// Ratio for display, e.g. "75.0%"
    #[wasm_bindgen(getter)]
    pub fn ratio_label(&self) -> String {
        format_ratio(self.stats.compression_ratio_percent)
    }

    /// Bytes saved for display, e.g. "1.43 MB"
    #[wasm_bindgen(getter)]
    pub fn saved_label(&self) -> String {
        format_file_size(self.stats.bytes_saved)
    }
}

impl From<Stats> for JsStats {
    fn from(stats: Stats) -> Self {
        Self { stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::compute_statistics;

    #[test]
    fn test_js_stats_labels() {
        let stats = JsStats::from(compute_statistics(2_000_000, 500_000));
        assert_eq!(stats.original_bytes(), 2_000_000.0);
        assert_eq!(stats.bytes_saved(), 1_500_000.0);
        assert_eq!(stats.ratio_label(), "75.0%");
        assert_eq!(stats.saved_label(), "1.43 MB");
    }

    #[test]
    fn test_js_stats_growth() {
        let stats = JsStats::from(compute_statistics(1024, 3072));
        assert_eq!(stats.bytes_saved(), -2048.0);
        assert_eq!(stats.compression_ratio_percent(), -200.0);
        assert_eq!(stats.saved_label(), "-2 KB");
    }
}
