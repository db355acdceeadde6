//! Display strings and download naming for the presentation layer.

use crate::encode::{OutputFormat, Quality};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Base name used when a file name has nothing before its extension.
const FALLBACK_BASE_NAME: &str = "image";

/// Human-readable byte size using 1024-based units.
///
/// Up to two decimals are shown, with trailing zeros dropped: `1536` is
/// `"1.5 KB"`. Negative sizes (an output that grew) keep their sign.
pub fn format_file_size(bytes: i64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let magnitude = bytes.unsigned_abs();
    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && magnitude >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = format!("{:.2}", magnitude as f64 / scale as f64);
    let value = value.trim_end_matches('0').trim_end_matches('.');
    let sign = if bytes < 0 { "-" } else { "" };

    format!("{sign}{value} {}", SIZE_UNITS[unit])
}

/// Pixel dimensions as `"W x H"`.
pub fn format_dimensions(width: u32, height: u32) -> String {
    format!("{width} x {height}")
}

/// Compression ratio as `"12.3%"`.
pub fn format_ratio(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Quality slider label, e.g. `"80%"`.
pub fn format_quality(quality: Quality) -> String {
    format!("{}%", quality.percent())
}

/// Download name: `{base}_compressed_{quality}%.{format}`.
///
/// The base is the original name up to its last `.`. A name without an
/// extension is used whole.
pub fn download_file_name(original_name: &str, quality: Quality, format: OutputFormat) -> String {
    let base = original_name
        .rsplit_once('.')
        .map_or(original_name, |(base, _)| base);
    let base = if base.is_empty() {
        FALLBACK_BASE_NAME
    } else {
        base
    };

    format!("{base}_compressed_{}%.{}", quality.percent(), format.name())
}
