//! Output format and quality settings for a compression request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EncodeError;

/// Target container for re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG. The only format where quality changes the output.
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
    /// Lossless WebP.
    Webp,
}

impl OutputFormat {
    /// All supported formats, in selection order.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Webp];

    /// Selection name, also used as the download file extension.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// MIME type of the encoded output.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }

    /// Resolve a format selection from the presentation layer.
    ///
    /// No selection falls back to JPEG. An explicit selection that is not a
    /// supported format is an error rather than a silent substitution.
    pub fn from_selection(selection: Option<&str>) -> Result<Self, EncodeError> {
        match selection.map(str::trim) {
            None | Some("") => Ok(OutputFormat::default()),
            Some(name) => name.parse(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let name = normalized.strip_prefix("image/").unwrap_or(&normalized);
        match name {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            _ => Err(EncodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lossy-encoding strength as a fraction in `[0, 1]`.
///
/// Higher values preserve more fidelity and produce larger output.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(f32);

impl Quality {
    /// Highest fidelity.
    pub const MAX: Quality = Quality(1.0);
    /// Smallest output.
    pub const MIN: Quality = Quality(0.0);

    /// Create a quality from a fraction.
    ///
    /// Finite values outside `[0, 1]` are clamped. NaN and infinities are
    /// rejected.
    pub fn new(fraction: f32) -> Result<Self, EncodeError> {
        if !fraction.is_finite() {
            return Err(EncodeError::InvalidQuality(fraction));
        }
        Ok(Quality(fraction.clamp(0.0, 1.0)))
    }

    /// Create a quality from a 0-100 slider value. Values above 100 clamp.
    pub fn from_percent(percent: u8) -> Self {
        Quality(f32::from(percent.min(100)) / 100.0)
    }

    /// The fraction in `[0, 1]`.
    pub fn fraction(self) -> f32 {
        self.0
    }

    /// The quality on the 0-100 slider scale.
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }

    /// JPEG encoder quality (1-100). A fraction of zero maps to 1, the
    /// lowest setting the encoder accepts.
    pub fn jpeg_quality(self) -> u8 {
        self.percent().clamp(1, 100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::from_percent(80)
    }
}

impl TryFrom<f32> for Quality {
    type Error = EncodeError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for f32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// A single compression invocation: what to encode to, and how hard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EncodingRequest {
    pub format: OutputFormat,
    pub quality: Quality,
}

impl EncodingRequest {
    pub fn new(format: OutputFormat, quality: Quality) -> Self {
        Self { format, quality }
    }

    /// Build a request from raw presentation-layer settings: an optional
    /// format selection and a 0-100 slider value.
    pub fn from_settings(selection: Option<&str>, quality_percent: u8) -> Result<Self, EncodeError> {
        Ok(Self {
            format: OutputFormat::from_selection(selection)?,
            quality: Quality::from_percent(quality_percent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_and_mime_types() {
        for format in OutputFormat::ALL {
            assert_eq!(format.mime_type(), format!("image/{}", format.name()));
        }
    }

    #[test]
    fn test_format_parse_aliases() {
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("image/webp".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert_eq!(" png ".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
    }

    #[test]
    fn test_format_selection_defaults_to_jpeg() {
        assert_eq!(OutputFormat::from_selection(None).unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_selection(Some("")).unwrap(), OutputFormat::Jpeg);
    }

    #[test]
    fn test_format_selection_unknown_fails_fast() {
        let result = OutputFormat::from_selection(Some("gif"));
        assert!(matches!(result, Err(EncodeError::UnsupportedFormat(name)) if name == "gif"));
    }

    #[test]
    fn test_quality_clamps_finite_values() {
        assert_eq!(Quality::new(-0.5).unwrap(), Quality::MIN);
        assert_eq!(Quality::new(1.7).unwrap(), Quality::MAX);
        assert_eq!(Quality::new(0.42).unwrap().fraction(), 0.42);
    }

    #[test]
    fn test_quality_rejects_non_finite() {
        assert!(matches!(Quality::new(f32::NAN), Err(EncodeError::InvalidQuality(_))));
        assert!(matches!(
            Quality::new(f32::INFINITY),
            Err(EncodeError::InvalidQuality(_))
        ));
    }

    #[test]
    fn test_quality_percent_conversions() {
        assert_eq!(Quality::from_percent(80).fraction(), 0.8);
        assert_eq!(Quality::from_percent(80).percent(), 80);
        assert_eq!(Quality::from_percent(250).percent(), 100);
        assert_eq!(Quality::from_percent(0).jpeg_quality(), 1);
        assert_eq!(Quality::MAX.jpeg_quality(), 100);
    }

    #[test]
    fn test_request_from_settings() {
        let request = EncodingRequest::from_settings(Some("webp"), 55).unwrap();
        assert_eq!(request.format, OutputFormat::Webp);
        assert_eq!(request.quality.percent(), 55);

        let request = EncodingRequest::from_settings(None, 80).unwrap();
        assert_eq!(request.format, OutputFormat::Jpeg);

        assert!(EncodingRequest::from_settings(Some("tiff"), 80).is_err());
    }

    #[test]
    fn test_request_deserializes_from_json() {
        let request: EncodingRequest =
            serde_json::from_str(r#"{"format":"png","quality":0.3}"#).unwrap();
        assert_eq!(request.format, OutputFormat::Png);
        assert_eq!(request.quality.percent(), 30);

        let bad = serde_json::from_str::<EncodingRequest>(r#"{"format":"bmp","quality":0.3}"#);
        assert!(bad.is_err());
    }
}
