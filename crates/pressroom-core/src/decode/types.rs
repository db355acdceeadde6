//! Core types for image decoding.

use thiserror::Error;

/// Media type family every accepted source must belong to.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The declared media type is not in the `image/*` family.
    #[error("Not an image: declared media type is \"{0}\"")]
    NotAnImage(String),

    /// The source contains no bytes.
    #[error("Image file is empty")]
    Empty,

    /// The source exceeds the configured byte limit.
    #[error("Image is {actual} bytes, larger than the {limit} byte limit")]
    TooLarge { actual: u64, limit: u64 },

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

impl DecodeError {
    /// Whether this error was raised by local validation, before any decode
    /// was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DecodeError::NotAnImage(_) | DecodeError::Empty | DecodeError::TooLarge { .. }
        )
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A user-selected image that passed validation and was measured.
///
/// Immutable once loaded. The raw bytes are kept so the image can be
/// re-rasterized for every compression attempt.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    media_type: String,
    width: u32,
    height: u32,
}

impl SourceImage {
    pub(crate) fn new(bytes: Vec<u8>, media_type: String, width: u32, height: u32) -> Self {
        Self {
            bytes,
            media_type,
            width,
            height,
        }
    }

    /// Raw file bytes as selected by the user.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Size of the original file in bytes.
    pub fn byte_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Width in pixels, after orientation correction.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, after orientation correction.
    pub fn height(&self) -> u32 {
        self.height
    }
}
