//! Crop rectangle construction from drag gestures and ratio presets.

use serde::{Deserialize, Serialize};

/// A point in source-pixel coordinates.
///
/// Drag points come straight from pointer events mapped onto the image, so
/// they are fractional and may lie outside the image bounds mid-gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A crop rectangle in source-pixel coordinates.
///
/// Invariants: `w >= 1`, `h >= 1`, and the rect lies inside the source
/// bounds it was built against. A zero-area rect never exists; degenerate
/// selections are represented as "no rect" by the producers in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Clamp this rect into `bounds` (width, height), keeping at least one
    /// pixel in each dimension. Used when a stored crop must survive a
    /// source swap (e.g. after background removal changes the image).
    pub fn clamped_to(self, bounds: (u32, u32)) -> CropRect {
        let (bw, bh) = (bounds.0.max(1), bounds.1.max(1));
        let x = self.x.min(bw - 1);
        let y = self.y.min(bh - 1);
        CropRect {
            x,
            y,
            w: self.w.clamp(1, bw - x),
            h: self.h.clamp(1, bh - y),
        }
    }

    /// True if the rect covers the full `bounds` extent.
    pub fn is_full(&self, bounds: (u32, u32)) -> bool {
        self.x == 0 && self.y == 0 && self.w == bounds.0 && self.h == bounds.1
    }
}

/// Normalize a drag gesture into a crop rectangle.
///
/// The two corners may be given in any order and may fall outside the
/// image; the result is clamped into `bounds` (width, height) and snapped
/// to the pixel grid.
///
/// Returns `None` for a degenerate drag (zero width or height after
/// clamping). Callers must treat that as "selection cancelled", not as a
/// valid crop.
pub fn rect_from_drag(start: Point, end: Point, bounds: (u32, u32)) -> Option<CropRect> {
    let (bw, bh) = (bounds.0 as f64, bounds.1 as f64);

    let x0 = start.x.min(end.x).clamp(0.0, bw);
    let x1 = start.x.max(end.x).clamp(0.0, bw);
    let y0 = start.y.min(end.y).clamp(0.0, bh);
    let y1 = start.y.max(end.y).clamp(0.0, bh);

    let x = x0.round() as u32;
    let y = y0.round() as u32;
    let w = (x1.round() as u32).saturating_sub(x);
    let h = (y1.round() as u32).saturating_sub(y);

    if w == 0 || h == 0 {
        return None;
    }
    Some(CropRect { x, y, w, h })
}

/// Named aspect-ratio presets offered by the crop tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatioPreset {
    /// No ratio constraint; the preset rect is the full extent.
    #[default]
    Free,
    /// 1:1
    Square,
    /// 4:3
    FourThirds,
    /// 16:9
    SixteenNine,
    /// 3:2
    ThreeTwo,
}

impl AspectRatioPreset {
    /// The width:height ratio, or `None` for [`AspectRatioPreset::Free`].
    pub fn ratio(self) -> Option<(u32, u32)> {
        match self {
            AspectRatioPreset::Free => None,
            AspectRatioPreset::Square => Some((1, 1)),
            AspectRatioPreset::FourThirds => Some((4, 3)),
            AspectRatioPreset::SixteenNine => Some((16, 9)),
            AspectRatioPreset::ThreeTwo => Some((3, 2)),
        }
    }

    /// Parse a preset name as used by the presentation layer ("1:1", "16:9", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "free" => Some(AspectRatioPreset::Free),
            "1:1" => Some(AspectRatioPreset::Square),
            "4:3" => Some(AspectRatioPreset::FourThirds),
            "16:9" => Some(AspectRatioPreset::SixteenNine),
            "3:2" => Some(AspectRatioPreset::ThreeTwo),
            _ => None,
        }
    }

    /// The largest centered rect of this ratio within `bounds`.
    ///
    /// `Free` returns the full extent. The result is snapped to the pixel
    /// grid and never exceeds the bounds.
    pub fn centered_rect(self, bounds: (u32, u32)) -> CropRect {
        let (bw, bh) = (bounds.0.max(1), bounds.1.max(1));
        let Some((rw, rh)) = self.ratio() else {
            return CropRect::new(0, 0, bw, bh);
        };

        // Decide which axis limits the rect, then derive the other.
        let (w, h) = if (bw as u64) * (rh as u64) <= (bh as u64) * (rw as u64) {
            let h = ((bw as f64) * (rh as f64) / (rw as f64)).round() as u32;
            (bw, h.clamp(1, bh))
        } else {
            let w = ((bh as f64) * (rw as f64) / (rh as f64)).round() as u32;
            (w.clamp(1, bw), bh)
        };

        CropRect::new((bw - w) / 2, (bh - h) / 2, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: (u32, u32) = (800, 600);

    #[test]
    fn test_drag_any_corner_order() {
        let a = Point::new(100.0, 50.0);
        let b = Point::new(300.0, 250.0);

        let forward = rect_from_drag(a, b, BOUNDS).unwrap();
        let backward = rect_from_drag(b, a, BOUNDS).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward, CropRect::new(100, 50, 200, 200));
    }

    #[test]
    fn test_drag_clamps_to_bounds() {
        let rect = rect_from_drag(
            Point::new(-50.0, -20.0),
            Point::new(900.0, 700.0),
            BOUNDS,
        )
        .unwrap();

        assert_eq!(rect, CropRect::new(0, 0, 800, 600));
    }

    #[test]
    fn test_degenerate_drag_is_cancelled() {
        let p = Point::new(100.0, 100.0);
        assert_eq!(rect_from_drag(p, p, BOUNDS), None);

        // Zero width, non-zero height
        assert_eq!(
            rect_from_drag(Point::new(100.0, 50.0), Point::new(100.0, 200.0), BOUNDS),
            None
        );
    }

    #[test]
    fn test_drag_entirely_outside_bounds_is_cancelled() {
        // Both corners clamp onto the same edge, collapsing the rect.
        let rect = rect_from_drag(Point::new(-100.0, 50.0), Point::new(-10.0, 200.0), BOUNDS);
        assert_eq!(rect, None);
    }

    #[test]
    fn test_subpixel_drag_is_cancelled() {
        let rect = rect_from_drag(
            Point::new(100.1, 100.1),
            Point::new(100.3, 100.3),
            BOUNDS,
        );
        assert_eq!(rect, None);
    }

    #[test]
    fn test_clamped_to_shrinks_out_of_bounds_rect() {
        let rect = CropRect::new(700, 500, 200, 200).clamped_to(BOUNDS);
        assert_eq!(rect, CropRect::new(700, 500, 100, 100));
    }

    #[test]
    fn test_clamped_to_moves_origin_inside() {
        let rect = CropRect::new(1000, 1000, 50, 50).clamped_to(BOUNDS);
        assert!(rect.x < 800 && rect.y < 600);
        assert!(rect.w >= 1 && rect.h >= 1);
        assert!(rect.right() <= 800 && rect.bottom() <= 600);
    }

    #[test]
    fn test_is_full() {
        assert!(CropRect::new(0, 0, 800, 600).is_full(BOUNDS));
        assert!(!CropRect::new(0, 0, 800, 599).is_full(BOUNDS));
        assert!(!CropRect::new(1, 0, 799, 600).is_full(BOUNDS));
    }

    #[test]
    fn test_preset_free_is_full_extent() {
        let rect = AspectRatioPreset::Free.centered_rect(BOUNDS);
        assert!(rect.is_full(BOUNDS));
    }

    #[test]
    fn test_preset_square_in_landscape() {
        let rect = AspectRatioPreset::Square.centered_rect(BOUNDS);
        assert_eq!(rect, CropRect::new(100, 0, 600, 600));
    }

    #[test]
    fn test_preset_square_in_portrait() {
        let rect = AspectRatioPreset::Square.centered_rect((600, 800));
        assert_eq!(rect, CropRect::new(0, 100, 600, 600));
    }

    #[test]
    fn test_preset_sixteen_nine() {
        let rect = AspectRatioPreset::SixteenNine.centered_rect(BOUNDS);
        // 800 wide -> 450 tall, centered vertically
        assert_eq!(rect, CropRect::new(0, 75, 800, 450));
    }

    #[test]
    fn test_preset_matching_ratio_fills_bounds() {
        let rect = AspectRatioPreset::FourThirds.centered_rect(BOUNDS);
        assert!(rect.is_full(BOUNDS));
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(
            AspectRatioPreset::from_name("16:9"),
            Some(AspectRatioPreset::SixteenNine)
        );
        assert_eq!(
            AspectRatioPreset::from_name("free"),
            Some(AspectRatioPreset::Free)
        );
        assert_eq!(AspectRatioPreset::from_name("2:1"), None);
    }

    #[test]
    fn test_preset_tiny_bounds() {
        let rect = AspectRatioPreset::SixteenNine.centered_rect((3, 3));
        assert!(rect.w >= 1 && rect.h >= 1);
        assert!(rect.right() <= 3 && rect.bottom() <= 3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
