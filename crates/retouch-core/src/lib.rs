//! Retouch Core - Image editing pipeline
//!
//! This crate provides the editing engine behind the Retouch media editor:
//! decoding a source image, cropping and resizing it, applying a fixed filter
//! chain, and encoding the result for upload to the media library.
//!
//! The crate is sans-IO: fetching image bytes and calling the remote media
//! library are jobs for the host (the WASM bindings and the UI behind them).
//! Everything here is a synchronous, deterministic computation over immutable
//! snapshots.

pub mod decode;
pub mod encode;
pub mod filters;
pub mod geometry;
pub mod interaction;
pub mod media;
pub mod render;
pub mod session;

pub use decode::{decode, DecodeError, Orientation, SourceImage};
pub use encode::{encode, EncodeError, EncodedImage, MimeType};
pub use filters::{apply_chain, to_render_instruction, FilterChainSpec, FilterOp};
pub use geometry::{
    compute_resize, rect_from_drag, AspectRatioPreset, Axis, CropRect, Point, TargetDimensions,
};
pub use interaction::CropTool;
pub use media::{save_to_library, MediaError, MediaItem, MediaLibrary, SaveError};
pub use render::{render, RenderError, RenderedBuffer, Renderer};
pub use session::{EditSession, Editor, LoadToken, SessionError, Snapshot};

/// Filter adjustments for an edit session.
///
/// Brightness, contrast, and saturation are percentages where 100 means
/// "leave the image alone". Blur is in coarse slider units where 0 is off;
/// the renderer divides by 10 to get the gaussian sigma, mapping the 0-20
/// slider range onto 0-2.0 render units.
///
/// The field order here is irrelevant to rendering: the pipeline order is
/// fixed by [`filters::to_render_instruction`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterParams {
    /// Brightness (0 to 200, 100 = identity)
    pub brightness: f32,
    /// Contrast (0 to 200, 100 = identity)
    pub contrast: f32,
    /// Saturation (0 to 200, 100 = identity)
    pub saturation: f32,
    /// Blur (0 to 20, 0 = identity)
    pub blur: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
        }
    }
}

impl FilterParams {
    /// Create a new FilterParams at identity values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their identity defaults
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Read the value of one named filter.
    pub fn get(&self, kind: FilterKind) -> f32 {
        match kind {
            FilterKind::Brightness => self.brightness,
            FilterKind::Contrast => self.contrast,
            FilterKind::Saturation => self.saturation,
            FilterKind::Blur => self.blur,
        }
    }

    /// Set one named filter, clamping the value into the filter's range.
    ///
    /// Out-of-range input is never an error; it is clamped silently.
    pub fn set(&mut self, kind: FilterKind, value: f32) {
        let (lo, hi) = kind.range();
        let value = value.clamp(lo, hi);
        match kind {
            FilterKind::Brightness => self.brightness = value,
            FilterKind::Contrast => self.contrast = value,
            FilterKind::Saturation => self.saturation = value,
            FilterKind::Blur => self.blur = value,
        }
    }
}

/// Names of the four adjustable filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Brightness,
    Contrast,
    Saturation,
    Blur,
}

impl FilterKind {
    /// Inclusive slider range for this filter.
    pub fn range(self) -> (f32, f32) {
        match self {
            FilterKind::Brightness | FilterKind::Contrast | FilterKind::Saturation => (0.0, 200.0),
            FilterKind::Blur => (0.0, 20.0),
        }
    }

    /// The value at which this filter does nothing.
    pub fn identity(self) -> f32 {
        match self {
            FilterKind::Brightness | FilterKind::Contrast | FilterKind::Saturation => 100.0,
            FilterKind::Blur => 0.0,
        }
    }

    /// Parse a filter name as used by the presentation layer.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brightness" => Some(FilterKind::Brightness),
            "contrast" => Some(FilterKind::Contrast),
            "saturation" => Some(FilterKind::Saturation),
            "blur" => Some(FilterKind::Blur),
            _ => None,
        }
    }
}
