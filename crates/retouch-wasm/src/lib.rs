//! Retouch WASM - WebAssembly bindings for the Retouch editing pipeline
//!
//! This crate exposes the retouch-core functionality to the
//! JavaScript/TypeScript presentation layer.
//!
//! # Module Structure
//!
//! - `session` - The `JsEditor` facade: load lifecycle, crop tool, resize
//!   fields, filter sliders, background removal, render and export
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Standalone image decoding binding
//! - `encode` - Standalone export encoding binding
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor, decode_image } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsEditor();
//! const token = editor.begin_load();
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! editor.finish_load(token, image);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod session;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use encode::encode_image;
pub use session::{JsEditor, JsLoadToken};
pub use types::{JsEncodedImage, JsRenderedImage, JsSourceImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
