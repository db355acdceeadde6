//! Image decoding for Pressroom.
//!
//! This module provides functionality for:
//! - Validating a user-selected source (media type family, byte limit)
//! - Rasterizing any supported container into an RGBA8 surface
//! - Applying EXIF orientation the way a browser canvas does
//!
//! Validation never looks at byte content, so a file with the wrong
//! declared type is rejected before any decode is attempted.

mod raster;
mod types;

pub use raster::{rasterize, validate_source};
pub use types::{DecodeError, Orientation, SourceImage, IMAGE_MEDIA_PREFIX};
