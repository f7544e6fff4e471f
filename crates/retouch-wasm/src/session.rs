//! The editor facade: the one stateful object the UI talks to.
//!
//! `JsEditor` bundles the core [`Editor`] (session lifecycle + stale-load
//! guard), a [`Renderer`] (memoized render), and the [`CropTool`] state
//! machine. The TypeScript side wires UI events straight onto these
//! methods:
//!
//! ```typescript
//! const editor = new JsEditor();
//!
//! // Selecting an image: decode happens in the worker, the token guards
//! // against the user picking another image before this one resolves.
//! const token = editor.begin_load();
//! const image = decode_image(bytes);
//! if (editor.finish_load(token, image)) paint(editor.render());
//!
//! // Slider input
//! editor.set_filter("brightness", 150);
//! paint(editor.render());
//!
//! // Save As New
//! const payload = editor.export("image/jpeg");
//! await mediaLibrary.upload(payload, true);
//! ```

use retouch_core::encode::MimeType;
use retouch_core::geometry::{AspectRatioPreset, Axis, CropRect, Point};
use retouch_core::interaction::CropTool;
use retouch_core::render::Renderer;
use retouch_core::session::{EditSession, Editor, LoadToken};
use retouch_core::FilterKind;
use wasm_bindgen::prelude::*;

use crate::types::{JsEncodedImage, JsRenderedImage, JsSourceImage};

/// Opaque handle for one in-flight source load.
#[wasm_bindgen]
pub struct JsLoadToken {
    inner: LoadToken,
}

/// The stateful editor facade exposed to the presentation layer.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsEditor {
    editor: Editor,
    renderer: Renderer,
    crop_tool: CropTool,
}

#[wasm_bindgen]
impl JsEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsEditor {
        JsEditor::default()
    }

    /// Whether an image is currently loaded and editable.
    #[wasm_bindgen(getter)]
    pub fn has_session(&self) -> bool {
        self.editor.has_session()
    }

    // ===== Load lifecycle =====

    /// Start loading a new image, superseding any load still in flight.
    pub fn begin_load(&mut self) -> JsLoadToken {
        JsLoadToken {
            inner: self.editor.begin_load(),
        }
    }

    /// Deliver a decoded image for the given load.
    ///
    /// Returns `true` if the image became the session's source. A stale
    /// token (the user already picked a different image) returns `false`
    /// and the result is dropped - that is normal control flow, not an
    /// error.
    pub fn finish_load(&mut self, token: &JsLoadToken, image: &JsSourceImage) -> bool {
        let applied = self.editor.finish_load(token.inner, image.to_source());
        if applied {
            self.renderer.invalidate();
            self.crop_tool.cancel();
        } else {
            web_sys::console::warn_1(&"retouch: discarding superseded decode result".into());
        }
        applied
    }

    /// Deliver a decode failure for the given load.
    ///
    /// Returns the user-facing message when the failure belongs to the
    /// current load; stale failures return `undefined` and are swallowed.
    pub fn fail_load(&mut self, token: &JsLoadToken, message: &str) -> Option<String> {
        use retouch_core::decode::DecodeError;
        let surfaced = self
            .editor
            .fail_load(token.inner, DecodeError::CorruptedFile(message.to_string()));
        if surfaced.is_some() {
            self.renderer.invalidate();
            self.crop_tool.cancel();
        }
        surfaced.map(|e| e.to_string())
    }

    /// Leave the editor, destroying the session.
    pub fn close(&mut self) {
        self.editor.close();
        self.renderer.invalidate();
        self.crop_tool.cancel();
    }

    // ===== Resize fields =====

    /// Width-field edit. With the aspect lock on, height follows the
    /// source's native ratio.
    pub fn set_width(&mut self, value: u32) -> Result<(), JsValue> {
        self.session_mut()?.resize_axis(Axis::Width, value);
        Ok(())
    }

    /// Height-field edit. With the aspect lock on, width follows the
    /// source's native ratio.
    pub fn set_height(&mut self, value: u32) -> Result<(), JsValue> {
        self.session_mut()?.resize_axis(Axis::Height, value);
        Ok(())
    }

    /// Toggle the aspect-ratio lock for resize edits.
    pub fn set_aspect_locked(&mut self, locked: bool) -> Result<(), JsValue> {
        self.session_mut()?.set_aspect_locked(locked);
        Ok(())
    }

    // ===== Filters =====

    /// Filter-slider edit. `name` is one of "brightness", "contrast",
    /// "saturation", "blur". Out-of-range values are clamped, not rejected.
    pub fn set_filter(&mut self, name: &str, value: f32) -> Result<(), JsValue> {
        let kind = FilterKind::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown filter: {name}")))?;
        self.session_mut()?.set_filter(kind, value);
        Ok(())
    }

    // ===== Crop =====

    /// Set the crop rectangle directly (source-pixel coordinates).
    pub fn set_crop(&mut self, x: u32, y: u32, w: u32, h: u32) -> Result<(), JsValue> {
        self.session_mut()?.set_crop(Some(CropRect::new(x, y, w, h)));
        Ok(())
    }

    /// Clear the crop back to the full source extent.
    pub fn clear_crop(&mut self) -> Result<(), JsValue> {
        self.session_mut()?.set_crop(None);
        Ok(())
    }

    /// Apply a named aspect preset ("free", "1:1", "4:3", "16:9", "3:2")
    /// as a centered, maximum-size crop.
    pub fn apply_aspect_preset(&mut self, name: &str) -> Result<(), JsValue> {
        let preset = AspectRatioPreset::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown aspect preset: {name}")))?;
        let session = self.session_mut()?;
        let rect = preset.centered_rect(session.source_bounds());
        session.set_crop(Some(rect));
        Ok(())
    }

    // ===== Crop-tool pointer events =====

    /// Pointer-down with the crop tool active: start a drag gesture.
    pub fn crop_pointer_down(&mut self, x: f64, y: f64) {
        self.crop_tool.pointer_down(Point::new(x, y));
    }

    /// Pointer-move while dragging: returns the live candidate rect (or
    /// `null`) for the selection overlay. Preview only - nothing commits.
    pub fn crop_pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let Some(session) = self.editor.session() else {
            return Ok(JsValue::NULL);
        };
        let candidate = self.crop_tool.pointer_move(Point::new(x, y), session);
        serde_wasm_bindgen::to_value(&candidate).map_err(JsValue::from)
    }

    /// Pointer-up: commit the selection, or cancel it when the drag was
    /// degenerate. Returns whether a crop was committed.
    pub fn crop_pointer_up(&mut self, x: f64, y: f64) -> bool {
        let Some(session) = self.editor.session_mut() else {
            self.crop_tool.cancel();
            return false;
        };
        self.crop_tool
            .pointer_up(Point::new(x, y), session)
            .is_some()
    }

    /// Deactivate the crop tool, abandoning any in-progress gesture.
    pub fn crop_cancel(&mut self) {
        self.crop_tool.cancel();
    }

    // ===== Background removal =====

    /// Mark the long-running transform in flight. Fails fast if one is
    /// already running; the UI disables the button on error.
    pub fn begin_processing(&mut self) -> Result<(), JsValue> {
        self.session_mut()?
            .begin_processing()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deliver the transform result. Returns `false` (and drops the
    /// result) when the transform was cancelled or the session replaced.
    pub fn finish_processing(&mut self, image: &JsSourceImage) -> bool {
        let Some(session) = self.editor.session_mut() else {
            return false;
        };
        session.finish_processing(image.to_source())
    }

    /// Cancel the in-flight transform without applying anything.
    pub fn end_processing(&mut self) {
        if let Some(session) = self.editor.session_mut() {
            session.end_processing();
        }
    }

    /// Whether a long-running transform is in flight.
    #[wasm_bindgen(getter)]
    pub fn is_processing(&self) -> bool {
        self.editor
            .session()
            .map(EditSession::is_processing)
            .unwrap_or(false)
    }

    // ===== State =====

    /// Restore the just-loaded state (crop, size, filters).
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.session_mut()?.reset();
        Ok(())
    }

    /// The current state snapshot as a plain JS object - the undo unit the
    /// presentation layer stacks. `null` without a session.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        match self.editor.session() {
            Some(session) => {
                serde_wasm_bindgen::to_value(&session.snapshot()).map_err(JsValue::from)
            }
            None => Ok(JsValue::NULL),
        }
    }

    // ===== Output =====

    /// Render the current state. Re-renders only when something relevant
    /// changed; otherwise the memoized frame is returned (cheap re-paints
    /// on zoom).
    pub fn render(&mut self) -> Result<JsRenderedImage, JsValue> {
        let session = self
            .editor
            .session()
            .ok_or_else(|| JsValue::from_str("no image loaded"))?;
        let buffer = self
            .renderer
            .render(session.source(), &session.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsRenderedImage::from_buffer(buffer))
    }

    /// Render and encode the current state for upload.
    /// `mime` is "image/jpeg" or "image/png".
    pub fn export(&mut self, mime: &str) -> Result<JsEncodedImage, JsValue> {
        let mime = MimeType::from_mime(mime).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session = self
            .editor
            .session()
            .ok_or_else(|| JsValue::from_str("no image loaded"))?;
        let buffer = self
            .renderer
            .render(session.source(), &session.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        retouch_core::encode::encode(buffer, mime)
            .map(JsEncodedImage::from_encoded)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsEditor {
    fn session_mut(&mut self) -> Result<&mut EditSession, JsValue> {
        self.editor
            .session_mut()
            .ok_or_else(|| JsValue::from_str("no image loaded"))
    }
}
