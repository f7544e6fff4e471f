//! The fixed filter chain.
//!
//! [`FilterParams`] values compile into an ordered chain of render
//! instructions via [`to_render_instruction`], and [`apply_chain`] executes
//! that chain over an RGB buffer.
//!
//! ## Chain Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturate
//! 4. Blur
//!
//! The order is fixed and significant: the three pointwise value transforms
//! must run before the spatial blur, otherwise they would operate on
//! already-blurred values and produce edge artifacts. Identity parameters
//! compile to an empty chain, and an empty chain leaves the buffer
//! byte-identical - a required property of the pipeline, not an
//! optimization.

use crate::FilterParams;

/// ITU-R BT.709 coefficients, shared by the saturation step.
const LUMINANCE_R: f32 = 0.2126;
const LUMINANCE_G: f32 = 0.7152;
const LUMINANCE_B: f32 = 0.0722;

/// Stored blur units are 10x coarser than gaussian sigma units.
const BLUR_UNIT_DIVISOR: f32 = 10.0;

/// One step of the compiled filter chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// Multiply every channel by the factor. 1.0 = identity.
    Brightness(f32),
    /// Scale each channel's distance from mid-gray. 1.0 = identity.
    Contrast(f32),
    /// Scale each channel's distance from the pixel's luminance. 1.0 = identity.
    Saturate(f32),
    /// Gaussian blur with the given sigma, applied after all pointwise steps.
    Blur(f32),
}

/// The compiled, fixed-order instruction for one render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterChainSpec {
    steps: Vec<FilterOp>,
}

impl FilterChainSpec {
    /// The chain's steps, in application order.
    pub fn steps(&self) -> &[FilterOp] {
        &self.steps
    }

    /// True if applying this chain changes nothing.
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    fn has_pointwise_steps(&self) -> bool {
        self.steps
            .iter()
            .any(|step| !matches!(step, FilterOp::Blur(_)))
    }

    fn blur_sigma(&self) -> Option<f32> {
        self.steps.iter().find_map(|step| match step {
            FilterOp::Blur(sigma) => Some(*sigma),
            _ => None,
        })
    }
}

/// Compile filter parameters into the fixed-order render chain.
///
/// Identity-valued parameters are omitted, so fully-default params produce
/// an empty chain. Blur magnitude is converted from slider units to sigma
/// (divided by 10), mapping the 0-20 slider range onto 0-2.0 render units.
pub fn to_render_instruction(params: &FilterParams) -> FilterChainSpec {
    let mut steps = Vec::new();
    if params.brightness != 100.0 {
        steps.push(FilterOp::Brightness(params.brightness / 100.0));
    }
    if params.contrast != 100.0 {
        steps.push(FilterOp::Contrast(params.contrast / 100.0));
    }
    if params.saturation != 100.0 {
        steps.push(FilterOp::Saturate(params.saturation / 100.0));
    }
    if params.blur != 0.0 {
        steps.push(FilterOp::Blur(params.blur / BLUR_UNIT_DIVISOR));
    }
    FilterChainSpec { steps }
}

/// Apply a compiled chain to RGB pixel data in place.
///
/// `pixels` is 3 bytes per pixel, row-major, `width * height * 3` long.
/// Pointwise steps run in a single normalized-float pass per pixel; the
/// blur, if any, runs last over the adjusted values.
pub fn apply_chain(pixels: &mut Vec<u8>, width: u32, height: u32, chain: &FilterChainSpec) {
    if chain.is_identity() {
        return;
    }

    if chain.has_pointwise_steps() {
        for chunk in pixels.chunks_exact_mut(3) {
            let mut r = chunk[0] as f32 / 255.0;
            let mut g = chunk[1] as f32 / 255.0;
            let mut b = chunk[2] as f32 / 255.0;

            for step in chain.steps() {
                match *step {
                    FilterOp::Brightness(factor) => {
                        (r, g, b) = apply_brightness(r, g, b, factor);
                    }
                    FilterOp::Contrast(factor) => {
                        (r, g, b) = apply_contrast(r, g, b, factor);
                    }
                    FilterOp::Saturate(factor) => {
                        (r, g, b) = apply_saturate(r, g, b, factor);
                    }
                    FilterOp::Blur(_) => {}
                }
            }

            chunk[0] = (r.clamp(0.0, 1.0) * 255.0).round() as u8;
            chunk[1] = (g.clamp(0.0, 1.0) * 255.0).round() as u8;
            chunk[2] = (b.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }

    if let Some(sigma) = chain.blur_sigma() {
        let expected = (width as usize) * (height as usize) * 3;
        debug_assert_eq!(pixels.len(), expected, "Pixel buffer size mismatch");
        if pixels.len() == expected {
            if let Some(img) = image::RgbImage::from_raw(width, height, std::mem::take(pixels)) {
                *pixels = image::imageops::blur(&img, sigma).into_raw();
            }
        }
    }
}

/// Multiply all channels. Matches CSS `brightness(p%)` with factor = p/100.
#[inline]
fn apply_brightness(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    (r * factor, g * factor, b * factor)
}

/// Scale distance from mid-gray. Matches CSS `contrast(p%)`.
#[inline]
fn apply_contrast(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    let midpoint = 0.5;
    (
        (r - midpoint) * factor + midpoint,
        (g - midpoint) * factor + midpoint,
        (b - midpoint) * factor + midpoint,
    )
}

/// Luminance-anchored saturation. Matches CSS `saturate(p%)` semantics:
/// factor 0 collapses to grayscale, factor > 1 pushes channels apart.
#[inline]
fn apply_saturate(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    let gray = LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b;
    (
        gray + (r - gray) * factor,
        gray + (g - gray) * factor,
        gray + (b - gray) * factor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(r: u8, g: u8, b: u8) -> Vec<u8> {
        vec![r, g, b]
    }

    fn apply(pixels: &[u8], width: u32, height: u32, params: &FilterParams) -> Vec<u8> {
        let mut result = pixels.to_vec();
        let chain = to_render_instruction(params);
        apply_chain(&mut result, width, height, &chain);
        result
    }

    // ===== Chain Compilation Tests =====

    #[test]
    fn test_identity_params_compile_to_empty_chain() {
        let chain = to_render_instruction(&FilterParams::default());
        assert!(chain.is_identity());
        assert!(chain.steps().is_empty());
    }

    #[test]
    fn test_chain_order_is_fixed() {
        let params = FilterParams {
            brightness: 150.0,
            contrast: 80.0,
            saturation: 120.0,
            blur: 5.0,
        };
        let chain = to_render_instruction(&params);

        assert_eq!(
            chain.steps(),
            &[
                FilterOp::Brightness(1.5),
                FilterOp::Contrast(0.8),
                FilterOp::Saturate(1.2),
                FilterOp::Blur(0.5),
            ]
        );
    }

    #[test]
    fn test_partial_params_skip_identity_steps() {
        let params = FilterParams {
            blur: 10.0,
            ..FilterParams::default()
        };
        let chain = to_render_instruction(&params);

        assert_eq!(chain.steps(), &[FilterOp::Blur(1.0)]);
        assert!(!chain.has_pointwise_steps());
    }

    #[test]
    fn test_blur_unit_conversion() {
        let params = FilterParams {
            blur: 20.0,
            ..FilterParams::default()
        };
        let chain = to_render_instruction(&params);
        assert_eq!(chain.blur_sigma(), Some(2.0));
    }

    // ===== Identity Tests =====

    #[test]
    fn test_identity_chain_is_byte_identical() {
        let pixels: Vec<u8> = (0..=255).flat_map(|v| [v, 255 - v, v / 2]).collect();
        let result = apply(&pixels, 16, 16, &FilterParams::default());
        assert_eq!(result, pixels);
    }

    // ===== Brightness Tests =====

    #[test]
    fn test_brightness_increase_on_gray() {
        let params = FilterParams {
            brightness: 150.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(128, 128, 128), 1, 1, &params);
        // 128/255 * 1.5 * 255 = 192
        assert_eq!(result, pixel(192, 192, 192));
    }

    #[test]
    fn test_brightness_zero_is_black() {
        let params = FilterParams {
            brightness: 0.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(200, 100, 50), 1, 1, &params);
        assert_eq!(result, pixel(0, 0, 0));
    }

    #[test]
    fn test_brightness_clips_at_white() {
        let params = FilterParams {
            brightness: 200.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(200, 200, 200), 1, 1, &params);
        assert_eq!(result, pixel(255, 255, 255));
    }

    // ===== Contrast Tests =====

    #[test]
    fn test_contrast_increase_spreads_values() {
        let params = FilterParams {
            contrast: 200.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(64, 128, 192), 1, 1, &params);

        assert!(result[0] < 64, "dark channel should get darker");
        assert!((result[1] as i32 - 128).abs() < 5, "midpoint should hold");
        assert!(result[2] > 192, "bright channel should get brighter");
    }

    #[test]
    fn test_contrast_zero_is_flat_gray() {
        let params = FilterParams {
            contrast: 0.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(10, 128, 250), 1, 1, &params);
        assert_eq!(result, pixel(128, 128, 128));
    }

    // ===== Saturation Tests =====

    #[test]
    fn test_saturation_zero_is_grayscale() {
        let params = FilterParams {
            saturation: 0.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(200, 128, 100), 1, 1, &params);
        assert_eq!(result[0], result[1]);
        assert_eq!(result[1], result[2]);
    }

    #[test]
    fn test_saturation_boost_widens_channel_spread() {
        let params = FilterParams {
            saturation: 150.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(200, 128, 100), 1, 1, &params);

        let before = 200i32 - 100;
        let after = result[0] as i32 - result[2] as i32;
        assert!(after > before, "spread should widen: {} -> {}", before, after);
    }

    #[test]
    fn test_saturation_leaves_gray_untouched() {
        let params = FilterParams {
            saturation: 200.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(128, 128, 128), 1, 1, &params);
        assert_eq!(result, pixel(128, 128, 128));
    }

    // ===== Blur Tests =====

    #[test]
    fn test_blur_preserves_dimensions_and_flat_color() {
        let params = FilterParams {
            blur: 10.0,
            ..FilterParams::default()
        };
        let pixels = vec![77u8; 8 * 8 * 3];
        let result = apply(&pixels, 8, 8, &params);

        assert_eq!(result.len(), pixels.len());
        // A uniform image blurs to itself (within rounding).
        for value in &result {
            assert!((*value as i32 - 77).abs() <= 1);
        }
    }

    #[test]
    fn test_blur_smooths_an_edge() {
        // Left half black, right half white.
        let width = 8u32;
        let mut pixels = Vec::new();
        for _y in 0..8 {
            for x in 0..width {
                let v = if x < 4 { 0u8 } else { 255u8 };
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        let params = FilterParams {
            blur: 15.0,
            ..FilterParams::default()
        };
        let result = apply(&pixels, width, 8, &params);

        // The pixel just left of the edge (row 0, x=3) picks up energy
        // from the bright side.
        let idx = 3 * 3;
        assert!(result[idx] > 0, "edge should bleed under blur");
    }

    // ===== Combined Tests =====

    #[test]
    fn test_pointwise_steps_compose_in_order() {
        // brightness then contrast is not the same as contrast then
        // brightness; verify the chain matches the spec order by computing
        // the expected value by hand.
        let params = FilterParams {
            brightness: 150.0,
            contrast: 150.0,
            ..FilterParams::default()
        };
        let result = apply(&pixel(100, 100, 100), 1, 1, &params);

        let v = 100.0 / 255.0;
        let bright = v * 1.5;
        let contrasted: f32 = (bright - 0.5) * 1.5 + 0.5;
        let expected = (contrasted.clamp(0.0, 1.0) * 255.0_f32).round() as u8;
        assert_eq!(result[0], expected);
    }

    #[test]
    fn test_extreme_values_stay_in_range() {
        let params = FilterParams {
            brightness: 200.0,
            contrast: 200.0,
            saturation: 200.0,
            blur: 20.0,
        };
        let pixels: Vec<u8> = (0..4 * 4).flat_map(|i| [(i * 17) as u8, 0, 255]).collect();
        let result = apply(&pixels, 4, 4, &params);
        assert_eq!(result.len(), pixels.len());
    }

    #[test]
    fn test_incomplete_pixel_ignored() {
        // 4 bytes = 1 complete pixel + 1 byte remainder; the remainder is
        // out of contract but must not be touched by pointwise steps.
        let mut pixels = vec![128, 128, 128, 64];
        let chain = to_render_instruction(&FilterParams {
            brightness: 200.0,
            ..FilterParams::default()
        });
        apply_chain(&mut pixels, 1, 1, &chain);
        assert_eq!(pixels[0], 255);
        assert_eq!(pixels[3], 64);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
