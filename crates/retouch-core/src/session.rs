//! The edit session: the owning aggregate for an image under edit.
//!
//! [`EditSession`] holds the decoded source, the crop rectangle, the target
//! dimensions, and the filter parameters, and mediates every mutation. All
//! setters clamp rather than fail. [`Editor`] owns the session lifecycle
//! across image selections and enforces the stale-decode guard: a decode
//! that resolves after being superseded is silently discarded.
//!
//! Asynchrony lives with the host. Decodes and long-running transforms are
//! delivered back into the session through token/flag-guarded completion
//! calls, which keeps the single-flight and staleness contracts enforceable
//! here and testable without an event loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{DecodeError, SourceImage};
use crate::geometry::{compute_resize, Axis, CropRect, TargetDimensions};
use crate::{FilterKind, FilterParams};

/// Errors surfaced by session mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A long-running transform is already in flight for this session.
    #[error("A long-running transform is already in progress")]
    AlreadyProcessing,
}

/// Immutable capture of session state: the renderer input and the
/// presentation layer's undo unit.
///
/// Snapshots compare equal exactly when a render would produce identical
/// output, so snapshot inequality is the render-cache invalidation signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Crop sub-rectangle; `None` means the full source extent.
    pub crop: Option<CropRect>,
    /// Final output size.
    pub dims: TargetDimensions,
    /// Filter slider values.
    pub filters: FilterParams,
    /// Which load produced the session's source.
    pub source_generation: u64,
    /// Bumped when a transform (background removal) swaps the source pixels.
    pub source_revision: u32,
}

/// The aggregate owning one image under edit.
#[derive(Debug)]
pub struct EditSession {
    source: SourceImage,
    source_generation: u64,
    source_revision: u32,
    crop: Option<CropRect>,
    dims: TargetDimensions,
    filters: FilterParams,
    processing: bool,
}

impl EditSession {
    /// Create a session around a freshly decoded source.
    ///
    /// Target dimensions start at the source's natural size with the aspect
    /// lock engaged; crop is absent; filters are identity.
    pub fn new(source: SourceImage, generation: u64) -> Self {
        let dims = TargetDimensions::of_source(source.width, source.height);
        Self {
            source,
            source_generation: generation,
            source_revision: 0,
            crop: None,
            dims,
            filters: FilterParams::default(),
            processing: false,
        }
    }

    /// The decoded source pixels.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// Crop coordinate bounds, i.e. the source's (width, height).
    pub fn source_bounds(&self) -> (u32, u32) {
        self.source.bounds()
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    pub fn target_dimensions(&self) -> TargetDimensions {
        self.dims
    }

    pub fn filters(&self) -> FilterParams {
        self.filters
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Set or clear the crop rectangle.
    ///
    /// Rects are clamped into the source bounds; a cleared crop means the
    /// full extent. Degenerate selections never reach this method - the
    /// interaction controller cancels them.
    pub fn set_crop(&mut self, rect: Option<CropRect>) {
        self.crop = rect.map(|r| r.clamped_to(self.source.bounds()));
    }

    /// Replace the target dimensions wholesale, clamping both axes to >= 1.
    pub fn set_target_dimensions(&mut self, dims: TargetDimensions) {
        self.dims = dims.clamped();
    }

    /// Edit a single dimension field.
    ///
    /// With the aspect lock engaged the other axis follows the SOURCE
    /// image's native ratio (not the crop's).
    pub fn resize_axis(&mut self, axis: Axis, value: u32) {
        self.dims = compute_resize(self.dims, axis, value, self.source.aspect_ratio());
    }

    pub fn set_aspect_locked(&mut self, locked: bool) {
        self.dims.aspect_locked = locked;
    }

    /// Set one filter slider, clamping into the filter's range.
    pub fn set_filter(&mut self, kind: FilterKind, value: f32) {
        self.filters.set(kind, value);
    }

    /// Mark a long-running transform (e.g. background removal) in flight.
    ///
    /// At most one may be in flight per session; a second start attempt
    /// fails fast rather than queuing.
    pub fn begin_processing(&mut self) -> Result<(), SessionError> {
        if self.processing {
            return Err(SessionError::AlreadyProcessing);
        }
        self.processing = true;
        Ok(())
    }

    /// Deliver a finished transform result.
    ///
    /// Swaps in the new source pixels and clears the in-flight flag. If no
    /// transform is in flight (it was cancelled, or this result is a
    /// leftover from a previous state) the result is silently discarded and
    /// `false` is returned.
    pub fn finish_processing(&mut self, result: SourceImage) -> bool {
        if !self.processing {
            return false;
        }
        self.processing = false;
        self.source_revision += 1;
        // The transform may change dimensions; keep the crop inside them.
        self.crop = self.crop.map(|r| r.clamped_to(result.bounds()));
        self.source = result;
        true
    }

    /// Clear the in-flight flag without applying a result (cancellation or
    /// collaborator failure).
    pub fn end_processing(&mut self) {
        self.processing = false;
    }

    /// Capture the current state for rendering / undo.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            crop: self.crop,
            dims: self.dims,
            filters: self.filters,
            source_generation: self.source_generation,
            source_revision: self.source_revision,
        }
    }

    /// Restore the just-loaded state: no crop, source-sized output with the
    /// aspect lock engaged, identity filters.
    pub fn reset(&mut self) {
        self.crop = None;
        self.dims = TargetDimensions::of_source(self.source.width, self.source.height);
        self.filters = FilterParams::default();
    }
}

/// Opaque handle identifying one source-load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    generation: u64,
}

/// Owns the session lifecycle across image selections.
///
/// Selecting an image starts a decode on the host side; the host calls
/// [`Editor::begin_load`] first and hands the token back with the result.
/// Starting a new load supersedes any in-flight one: a superseded result is
/// discarded no matter when it arrives.
#[derive(Debug, Default)]
pub struct Editor {
    session: Option<EditSession>,
    load_generation: u64,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Start loading a new source image, superseding any in-flight load.
    pub fn begin_load(&mut self) -> LoadToken {
        self.load_generation += 1;
        LoadToken {
            generation: self.load_generation,
        }
    }

    /// Deliver a finished decode.
    ///
    /// Installs a fresh session (replacing any previous one) when the token
    /// is still current. A stale token means the load was superseded: the
    /// result is dropped and `false` returned, never an error.
    pub fn finish_load(&mut self, token: LoadToken, source: SourceImage) -> bool {
        if token.generation != self.load_generation {
            return false;
        }
        self.session = Some(EditSession::new(source, token.generation));
        true
    }

    /// Deliver a failed decode.
    ///
    /// For a current load the previous session is destroyed (the user has
    /// navigated away from it) and the error is handed back for the caller
    /// to surface. Stale failures are swallowed entirely.
    pub fn fail_load(&mut self, token: LoadToken, error: DecodeError) -> Option<DecodeError> {
        if token.generation != self.load_generation {
            return None;
        }
        self.session = None;
        Some(error)
    }

    /// Destroy the session (leaving the editor).
    pub fn close(&mut self) {
        self.session = None;
    }
}
