//! The compression pipeline: measure a source, re-encode it, report stats.
//!
//! The pipeline is stateless apart from its configuration. Session state
//! lives in [`CompressionSession`](crate::CompressionSession).

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::decode::{rasterize, validate_source, SourceImage};
use crate::encode::{encode_surface, EncodingRequest, OutputFormat, Quality};
use crate::error::PipelineError;
use crate::stats::{compute_statistics, Stats};

/// Output of a single compression run.
///
/// Width and height always equal the source's: the pipeline re-encodes,
/// it never resizes.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedResult {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    format: OutputFormat,
    quality: Quality,
}

impl EncodedResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }
}

/// Decodes, measures and re-encodes images.
#[derive(Debug, Clone, Default)]
pub struct CompressionPipeline {
    config: PipelineConfig,
}

impl CompressionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate a user-selected file and read its pixel dimensions.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the declared media type is not `image/*`, or the
    /// file is empty or larger than the configured limit. These checks run
    /// before any decode. `EncodingFailure` when the bytes cannot be decoded.
    pub fn decode_and_measure(
        &self,
        bytes: Vec<u8>,
        media_type: &str,
    ) -> Result<SourceImage, PipelineError> {
        validate_source(&bytes, media_type, self.config.max_input_bytes)?;

        let surface = rasterize(&bytes)?;
        let (width, height) = surface.dimensions();
        debug!(
            media_type,
            byte_length = bytes.len(),
            width,
            height,
            "measured source image"
        );

        Ok(SourceImage::new(bytes, media_type.to_string(), width, height))
    }

    /// Re-encode a source under the requested format and quality.
    ///
    /// The source is drawn onto an RGBA8 surface at native resolution and
    /// that surface is encoded. Output larger than the input is not an error.
    ///
    /// # Errors
    ///
    /// `EncodingFailure` if the source cannot be rasterized or the encoder
    /// fails. No partial output is produced.
    pub fn compress(
        &self,
        source: &SourceImage,
        request: &EncodingRequest,
    ) -> Result<EncodedResult, PipelineError> {
        let surface = rasterize(source.bytes())?;
        let (width, height) = surface.dimensions();

        if (width, height) != (source.width(), source.height()) {
            return Err(PipelineError::EncodingFailure(format!(
                "source rasterized at {width}x{height}, expected {}x{}",
                source.width(),
                source.height()
            )));
        }

        let bytes = encode_surface(&surface, request)?;
        info!(
            format = %request.format,
            quality = request.quality.percent(),
            original = source.byte_length(),
            compressed = bytes.len(),
            "compressed image"
        );

        Ok(EncodedResult {
            bytes,
            width,
            height,
            format: request.format,
            quality: request.quality,
        })
    }

    /// Before/after statistics for a compression run.
    pub fn compute_statistics(&self, source: &SourceImage, result: &EncodedResult) -> Stats {
        compute_statistics(source.byte_length(), result.byte_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        gradient_rgb, jpeg_bytes, noise_rgb, png_bytes, with_exif_orientation,
    };

    fn pipeline() -> CompressionPipeline {
        CompressionPipeline::default()
    }

    fn request(format: OutputFormat, percent: u8) -> EncodingRequest {
        EncodingRequest::new(format, Quality::from_percent(percent))
    }

    #[test]
    fn test_decode_and_measure_png() {
        let bytes = png_bytes(&gradient_rgb(40, 30));
        let len = bytes.len() as u64;

        let source = pipeline().decode_and_measure(bytes, "image/png").unwrap();
        assert_eq!((source.width(), source.height()), (40, 30));
        assert_eq!(source.byte_length(), len);
        assert_eq!(source.media_type(), "image/png");
    }

    #[test]
    fn test_declared_type_need_not_match_container() {
        // Only the family is checked; the container is sniffed from bytes
        let bytes = jpeg_bytes(&gradient_rgb(12, 12));
        let source = pipeline().decode_and_measure(bytes, "image/png").unwrap();
        assert_eq!(source.width(), 12);
    }

    #[test]
    fn test_text_plain_rejected_before_decode() {
        // Valid image bytes, wrong declared type
        let bytes = png_bytes(&gradient_rgb(4, 4));
        let err = pipeline().decode_and_measure(bytes, "text/plain").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_oversized_rejected_without_decode() {
        let config = PipelineConfig {
            max_input_bytes: 16,
            ..Default::default()
        };
        // Garbage bytes: a decode attempt would report EncodingFailure instead
        let err = CompressionPipeline::new(config)
            .decode_and_measure(vec![0u8; 17], "image/jpeg")
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_default_limit_is_50_mib() {
        let err = pipeline()
            .decode_and_measure(vec![0u8; 50 * 1024 * 1024 + 1], "image/png")
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_undecodable_bytes_fail_with_encoding_failure() {
        let err = pipeline()
            .decode_and_measure(vec![1, 2, 3, 4, 5], "image/png")
            .unwrap_err();
        assert!(err.is_encoding_failure());
    }

    #[test]
    fn test_compress_preserves_dimensions_for_all_formats() {
        let p = pipeline();
        let source = p
            .decode_and_measure(png_bytes(&gradient_rgb(50, 20)), "image/png")
            .unwrap();

        for format in OutputFormat::ALL {
            let result = p.compress(&source, &request(format, 60)).unwrap();
            assert_eq!((result.width(), result.height()), (50, 20));
            assert_eq!(result.format(), format);
            assert_eq!(result.quality().percent(), 60);
        }
    }

    #[test]
    fn test_compress_twice_is_identical() {
        let p = pipeline();
        let source = p
            .decode_and_measure(png_bytes(&noise_rgb(30, 30, 7)), "image/png")
            .unwrap();
        let req = request(OutputFormat::Jpeg, 75);

        let first = p.compress(&source, &req).unwrap();
        let second = p.compress(&source, &req).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            p.compute_statistics(&source, &first),
            p.compute_statistics(&source, &second)
        );
    }

    #[test]
    fn test_quality_extremes_do_not_error_and_are_monotonic() {
        let p = pipeline();
        let source = p
            .decode_and_measure(png_bytes(&gradient_rgb(64, 64)), "image/png")
            .unwrap();

        for format in [OutputFormat::Jpeg, OutputFormat::Webp] {
            let low = p.compress(&source, &request(format, 0)).unwrap();
            let high = p.compress(&source, &request(format, 100)).unwrap();
            assert!(low.byte_length() <= high.byte_length(), "{format}");
        }
    }

    #[test]
    fn test_exif_rotation_applies_to_measure_and_output() {
        let p = pipeline();
        let original = with_exif_orientation(&jpeg_bytes(&gradient_rgb(40, 20)), 6);

        let source = p.decode_and_measure(original, "image/jpeg").unwrap();
        assert_eq!((source.width(), source.height()), (20, 40));

        for format in OutputFormat::ALL {
            let result = p.compress(&source, &request(format, 80)).unwrap();
            assert_eq!((result.width(), result.height()), (20, 40), "{format}");

            let decoded = image::load_from_memory(result.bytes()).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (20, 40), "{format}");
        }
    }

    #[test]
    fn test_larger_output_is_not_an_error() {
        // Noise re-encoded losslessly tends to outgrow the JPEG it came from
        let p = pipeline();
        let original = jpeg_bytes(&noise_rgb(24, 24, 3));
        let source = p.decode_and_measure(original, "image/jpeg").unwrap();

        let result = p.compress(&source, &request(OutputFormat::Png, 100)).unwrap();
        let stats = p.compute_statistics(&source, &result);
        assert_eq!(
            stats.bytes_saved,
            source.byte_length() as i64 - result.byte_length() as i64
        );
    }

    #[test]
    fn test_end_to_end_png_to_jpeg() {
        let p = pipeline();
        let original = png_bytes(&noise_rgb(1000, 800, 42));
        let source = p.decode_and_measure(original, "image/png").unwrap();
        assert_eq!((source.width(), source.height()), (1000, 800));

        let result = p.compress(&source, &request(OutputFormat::Jpeg, 80)).unwrap();
        assert_eq!((result.width(), result.height()), (1000, 800));

        let stats = p.compute_statistics(&source, &result);
        let original_bytes = source.byte_length();
        let compressed_bytes = result.byte_length();
        assert_eq!(stats.bytes_saved, original_bytes as i64 - compressed_bytes as i64);

        let percent =
            (original_bytes as f64 - compressed_bytes as f64) / original_bytes as f64 * 100.0;
        let expected = (percent * 10.0).round() / 10.0;
        assert_eq!(stats.compression_ratio_percent, expected);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
