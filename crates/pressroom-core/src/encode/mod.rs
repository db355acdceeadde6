//! Image encoding for Pressroom.
//!
//! This module provides functionality for:
//! - Describing a compression request (output format and quality)
//! - Encoding an RGBA8 surface to JPEG, PNG or WebP
//!
//! # Examples
//!
//! ```ignore
//! use pressroom_core::encode::{encode_surface, EncodingRequest, OutputFormat, Quality};
//!
//! let surface = image::RgbaImage::new(100, 100);
//! let request = EncodingRequest::new(OutputFormat::Jpeg, Quality::from_percent(80));
//! let jpeg_bytes = encode_surface(&surface, &request).unwrap();
//! ```

mod encoder;
mod format;

pub use encoder::{encode_surface, EncodeError};
pub use format::{EncodingRequest, OutputFormat, Quality};
