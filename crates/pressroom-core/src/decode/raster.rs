//! Source validation and rasterization with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader, RgbaImage};

use super::{DecodeError, Orientation, IMAGE_MEDIA_PREFIX};

/// Check a candidate source without decoding it.
///
/// The media type is checked first, then the size. Byte content is never
/// inspected here.
pub fn validate_source(bytes: &[u8], media_type: &str, max_bytes: u64) -> Result<(), DecodeError> {
    if !media_type.starts_with(IMAGE_MEDIA_PREFIX) {
        return Err(DecodeError::NotAnImage(media_type.to_string()));
    }

    let actual = bytes.len() as u64;
    if actual == 0 {
        return Err(DecodeError::Empty);
    }
    if actual > max_bytes {
        return Err(DecodeError::TooLarge {
            actual,
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Decode image bytes into an RGBA8 surface at native resolution.
///
/// EXIF orientation is applied, matching how a browser draws the image
/// onto a canvas. The container format is sniffed from the bytes; the
/// declared media type plays no part here.
pub fn rasterize(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;

    Ok(apply_orientation(img, orientation).into_rgba8())
}

/// EXIF orientation of the image, `Normal` when absent or unreadable.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
