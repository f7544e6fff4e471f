//! Image decoding WASM bindings.
//!
//! Exposes the core decode path to JavaScript. The worker fetches the
//! image bytes (media library URL or file drop) and hands them here; the
//! result feeds `JsEditor.finish_load`.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@retouch/wasm';
//!
//! const bytes = new Uint8Array(await response.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsSourceImage;
use retouch_core::decode;
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes into a source image.
///
/// EXIF orientation correction is applied, so camera JPEGs come out
/// upright and the reported dimensions are the display dimensions.
///
/// # Errors
///
/// Returns an error if the bytes are not a recognized image format or the
/// file is corrupted/truncated. This is the only decode failure the UI
/// surfaces to the user.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
