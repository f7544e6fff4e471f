//! WASM-compatible wrapper types for image data.
//!
//! These types wrap the core Retouch types with a JavaScript-friendly
//! surface, handling the copies between WASM and JavaScript memory.

use retouch_core::decode::SourceImage;
use retouch_core::encode::EncodedImage;
use retouch_core::render::RenderedBuffer;
use wasm_bindgen::prelude::*;

/// A decoded source image held in WASM memory.
///
/// Pixel data lives in WASM memory; `pixels()` copies it out as a
/// `Uint8Array`. `free()` may be called to release the memory eagerly, but
/// wasm-bindgen's finalizer handles cleanup either way.
#[wasm_bindgen]
pub struct JsSourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Create a source image from dimensions and RGB pixel data
    /// (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsSourceImage {
        JsSourceImage {
            width,
            height,
            pixels,
        }
    }

    /// Image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGB pixel data, copied out of WASM memory.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsSourceImage {
    pub(crate) fn from_source(img: SourceImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core SourceImage. Clones the pixel data.
    pub(crate) fn to_source(&self) -> SourceImage {
        SourceImage::new(self.width, self.height, self.pixels.clone())
    }
}

/// One rendered frame at target resolution, ready to paint onto a canvas.
#[wasm_bindgen]
pub struct JsRenderedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRenderedImage {
    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB pixel data, copied out of WASM memory.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsRenderedImage {
    pub(crate) fn from_buffer(buffer: &RenderedBuffer) -> Self {
        Self {
            width: buffer.width,
            height: buffer.height,
            pixels: buffer.pixels.clone(),
        }
    }
}

/// An encoded export payload (bytes + mime + dimensions), the unit handed
/// to the media library upload call on the JavaScript side.
#[wasm_bindgen]
pub struct JsEncodedImage {
    bytes: Vec<u8>,
    mime: String,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// Encoded file bytes as a Uint8Array (copies out of WASM memory).
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.bytes[..])
    }

    /// Encoded byte length
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Mime type string, e.g. "image/jpeg"
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.mime.clone()
    }

    /// Pixel width of the encoded image
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height of the encoded image
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl JsEncodedImage {
    pub(crate) fn from_encoded(img: EncodedImage) -> Self {
        Self {
            bytes: img.bytes,
            mime: img.mime.as_str().to_string(),
            width: img.width,
            height: img.height,
        }
    }
}
