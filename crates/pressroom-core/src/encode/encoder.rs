//! Surface encoding for JPEG, PNG and WebP.
//!
//! This module encodes an RGBA8 surface using the `image` crate's encoders.
//! JPEG passes the quality straight to its encoder. The pure-Rust WebP
//! encoder is lossless only, so below full quality the RGB channels are
//! quantized first and the encoder gets a more compressible surface. PNG
//! ignores the quality.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use thiserror::Error;

use super::{EncodingRequest, OutputFormat};

/// Errors that can occur while encoding a surface.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The requested format name is not one of the supported formats.
    #[error("Unsupported output format: \"{0}\"")]
    UnsupportedFormat(String),

    /// The quality value is not a finite number.
    #[error("Invalid quality: {0} is not a finite number")]
    InvalidQuality(f32),

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {reason}")]
    EncodingFailed { format: OutputFormat, reason: String },
}

/// Encode an RGBA8 surface under the requested format and quality.
///
/// The output always has the surface's dimensions. Pixel data is only
/// altered where the target format cannot carry it (JPEG has no alpha).
pub fn encode_surface(surface: &RgbaImage, request: &EncodingRequest) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    let format = request.format;
    let failed = |e: image::ImageError| EncodeError::EncodingFailed {
        format,
        reason: e.to_string(),
    };

    match format {
        OutputFormat::Jpeg => {
            let rgb = flatten_onto_black(surface);
            JpegEncoder::new_with_quality(&mut buffer, request.quality.jpeg_quality())
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(failed)?;
        }
        OutputFormat::Png => {
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive)
                .write_image(surface.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(failed)?;
        }
        OutputFormat::Webp => {
            let percent = request.quality.percent();
            let quantized;
            let pixels = if percent < 100 {
                let mut copy = surface.clone();
                quantize_rgb(&mut copy, percent);
                quantized = copy;
                &quantized
            } else {
                surface
            };
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(failed)?;
        }
    }

    Ok(buffer.into_inner())
}

/// Snap each RGB channel of an RGBA8 buffer to one of a reduced set of
/// levels. Alpha is untouched.
fn quantize_rgb(data: &mut [u8], percent: u8) {
    let levels = webp_levels(percent);
    if levels >= 256 {
        return;
    }
    let step = 255.0 / f32::from(levels - 1);
    for pixel in data.chunks_exact_mut(4) {
        for channel in pixel.iter_mut().take(3) {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Levels per channel for a 0-100 quality. Quadratic, so high qualities
/// stay close to the source and low ones collapse to a few levels.
fn webp_levels(percent: u8) -> u16 {
    if percent >= 100 {
        return 256;
    }
    let normalized = f32::from(percent.max(1)) / 100.0;
    (2.0 + normalized * normalized * 254.0).round().clamp(2.0, 256.0) as u16
}

/// Composite an RGBA surface over opaque black.
///
/// A canvas stores premultiplied color, so exporting to a format without
/// alpha leaves transparent regions black. This reproduces that.
fn flatten_onto_black(surface: &RgbaImage) -> RgbImage {
    let (width, height) = surface.dimensions();
    let mut out = Vec::with_capacity((width as usize) * (height as usize) * 3);

    for px in surface.pixels() {
        let [r, g, b, a] = px.0;
        let alpha = u16::from(a);
        out.push(((u16::from(r) * alpha + 127) / 255) as u8);
        out.push(((u16::from(g) * alpha + 127) / 255) as u8);
        out.push(((u16::from(b) * alpha + 127) / 255) as u8);
    }

    // Length is width * height * 3 by construction
    RgbImage::from_raw(width, height, out).unwrap_or_else(|| RgbImage::new(width, height))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
