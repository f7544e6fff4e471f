//! Rendered buffer encoding for export.
//!
//! Turns a [`RenderedBuffer`] into the encoded payload the media library
//! accepts. Encoding settings are fixed per mime type; there is no
//! user-tunable compression.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::RenderedBuffer;

/// Fixed JPEG export quality.
const JPEG_QUALITY: u8 = 90;

/// Errors that can occur during export encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The requested mime type is not an exportable image format.
    #[error("Unsupported mime type: {0}")]
    UnsupportedMime(String),

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the stated dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The underlying encoder failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output formats supported by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeType {
    #[default]
    Jpeg,
    Png,
}

impl MimeType {
    /// The canonical mime string, as sent to the media library.
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
        }
    }

    /// Parse a mime string from the presentation layer.
    pub fn from_mime(mime: &str) -> Result<Self, EncodeError> {
        match mime {
            "image/jpeg" | "image/jpg" => Ok(MimeType::Jpeg),
            "image/png" => Ok(MimeType::Png),
            other => Err(EncodeError::UnsupportedMime(other.to_string())),
        }
    }
}

/// An encoded image payload ready for upload.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// The encoded file bytes.
    pub bytes: Vec<u8>,
    /// The format the bytes are encoded in.
    pub mime: MimeType,
    /// Pixel width of the encoded image.
    pub width: u32,
    /// Pixel height of the encoded image.
    pub height: u32,
}

/// Encode a rendered buffer into a persistable image payload.
///
/// Pure and synchronous given a ready buffer. JPEG uses a fixed quality of
/// 90; PNG uses the encoder's default compression.
///
/// # Errors
///
/// Returns `InvalidDimensions`/`InvalidPixelData` for malformed buffers and
/// `EncodingFailed` if the codec itself errors.
pub fn encode(buffer: &RenderedBuffer, mime: MimeType) -> Result<EncodedImage, EncodeError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let expected = (buffer.width as usize) * (buffer.height as usize) * 3;
    if buffer.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    let mut out = Cursor::new(Vec::new());
    let result = match mime {
        MimeType::Jpeg => JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).write_image(
            &buffer.pixels,
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgb8,
        ),
        MimeType::Png => PngEncoder::new(&mut out).write_image(
            &buffer.pixels,
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(EncodedImage {
        bytes: out.into_inner(),
        mime,
        width: buffer.width,
        height: buffer.height,
    })
}
