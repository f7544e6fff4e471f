//! The deterministic render pipeline.
//!
//! [`render`] turns a `(source, snapshot)` pair into output pixels. The
//! pipeline order is fixed and significant:
//!
//! 1. Extract the crop sub-region (full extent when none)
//! 2. Resample to the target dimensions (bilinear)
//! 3. Apply the compiled filter chain
//!
//! Crop runs before resize, and resize before filters, so filter intensity
//! is independent of both the crop choice and the output resolution. The
//! same input pair always yields byte-identical output; there are no
//! partial-render states.

use thiserror::Error;

use crate::decode::SourceImage;
use crate::filters::{apply_chain, to_render_instruction};
use crate::geometry::CropRect;
use crate::session::Snapshot;

/// Errors from the render pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The working buffer stopped matching its stated dimensions. Internal
    /// invariant; seeing this means a bug upstream, not bad user input.
    #[error("Pixel buffer does not match image dimensions")]
    InvalidPixelBuffer,
}

/// Pixel output of one render pass, at target resolution.
///
/// Derived and ephemeral: recomputed wholesale from session state, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBuffer {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

/// Render a session snapshot against its source image.
///
/// Deterministic pure function of its inputs. The source is decoded by
/// construction (a session cannot exist without one), so the only failure
/// mode is an internal buffer invariant violation.
pub fn render(source: &SourceImage, snapshot: &Snapshot) -> Result<RenderedBuffer, RenderError> {
    let (width, height, pixels) = match snapshot.crop {
        Some(rect) if !rect.is_full(source.bounds()) => extract_region(source, rect),
        _ => (source.width, source.height, source.pixels.clone()),
    };

    let dims = snapshot.dims;
    let mut pixels = resample(pixels, width, height, dims.width, dims.height)?;

    let chain = to_render_instruction(&snapshot.filters);
    apply_chain(&mut pixels, dims.width, dims.height, &chain);

    Ok(RenderedBuffer {
        width: dims.width,
        height: dims.height,
        pixels,
    })
}

/// Copy a crop sub-region out of the source, row by row.
///
/// The rect is already clamped into bounds by the session setter.
fn extract_region(source: &SourceImage, rect: CropRect) -> (u32, u32, Vec<u8>) {
    let rect = rect.clamped_to(source.bounds());
    let mut output = vec![0u8; (rect.w * rect.h * 3) as usize];

    let row_bytes = (rect.w * 3) as usize;
    for y in 0..rect.h {
        let src_start = (((rect.y + y) * source.width + rect.x) * 3) as usize;
        let dst_start = (y * rect.w * 3) as usize;
        output[dst_start..dst_start + row_bytes]
            .copy_from_slice(&source.pixels[src_start..src_start + row_bytes]);
    }

    (rect.w, rect.h, output)
}

/// Resample pixels to the target size with bilinear interpolation.
///
/// One fixed filter for preview and export alike: determinism requires the
/// same snapshot to always produce the same bytes. Skipped entirely when
/// the dimensions already match.
fn resample(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    target_width: u32,
    target_height: u32,
) -> Result<Vec<u8>, RenderError> {
    if width == target_width && height == target_height {
        return Ok(pixels);
    }

    let img = image::RgbImage::from_raw(width, height, pixels)
        .ok_or(RenderError::InvalidPixelBuffer)?;
    let resized = image::imageops::resize(
        &img,
        target_width,
        target_height,
        image::imageops::FilterType::Triangle,
    );
    Ok(resized.into_raw())
}

/// Renders snapshots, memoizing the last result.
///
/// The memo only serves re-paints where nothing relevant changed (zoom,
/// panel toggles); any snapshot difference - including a new source
/// generation - recomputes from scratch.
#[derive(Debug, Default)]
pub struct Renderer {
    cached: Option<(Snapshot, RenderedBuffer)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render, reusing the previous buffer when the snapshot is unchanged.
    pub fn render(
        &mut self,
        source: &SourceImage,
        snapshot: &Snapshot,
    ) -> Result<&RenderedBuffer, RenderError> {
        if let Some((cached_snapshot, buffer)) = self.cached.take() {
            if cached_snapshot == *snapshot {
                let (_, buffer) = self.cached.insert((cached_snapshot, buffer));
                return Ok(buffer);
            }
        }

        let buffer = render(source, snapshot)?;
        let (_, buffer) = self.cached.insert((snapshot.clone(), buffer));
        Ok(buffer)
    }

    /// Drop the memoized buffer (e.g. when the session is closed).
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
