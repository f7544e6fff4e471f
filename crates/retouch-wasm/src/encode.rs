//! Image encoding WASM bindings.
//!
//! Exposes the core export encoder to JavaScript for worker-side use. The
//! in-editor save flow normally goes through `JsEditor.export`, which
//! renders and encodes in one call; this standalone binding covers encoding
//! pixels the worker already holds.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@retouch/wasm';
//!
//! const payload = encode_image(pixels, width, height, "image/jpeg");
//! await uploadToLibrary(payload.bytes(), payload.mime);
//! ```

use crate::types::JsEncodedImage;
use retouch_core::encode::{encode, MimeType};
use retouch_core::render::RenderedBuffer;
use wasm_bindgen::prelude::*;

/// Encode RGB pixel data into an export payload.
///
/// `mime` is "image/jpeg" or "image/png". Encoder settings are fixed per
/// format (JPEG quality 90); there is no compression knob.
///
/// # Errors
///
/// Returns an error for an unsupported mime type, zero dimensions, or a
/// pixel buffer whose length doesn't match width * height * 3.
#[wasm_bindgen]
pub fn encode_image(
    pixels: &[u8],
    width: u32,
    height: u32,
    mime: &str,
) -> Result<JsEncodedImage, JsValue> {
    let mime = MimeType::from_mime(mime).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let buffer = RenderedBuffer {
        width,
        height,
        pixels: pixels.to_vec(),
    };
    encode(&buffer, mime)
        .map(JsEncodedImage::from_encoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
