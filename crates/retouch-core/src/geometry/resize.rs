//! Aspect-ratio-preserving resize math.

use serde::{Deserialize, Serialize};

/// The output size of the edit pipeline, after any crop.
///
/// When `aspect_locked` is set, editing one axis recomputes the other from
/// the SOURCE image's native aspect ratio - deliberately not the crop's
/// ratio, matching the editor's original behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDimensions {
    /// Output width in pixels (>= 1).
    pub width: u32,
    /// Output height in pixels (>= 1).
    pub height: u32,
    /// Whether axis edits keep the source aspect ratio.
    pub aspect_locked: bool,
}

impl TargetDimensions {
    /// Dimensions matching a source image, with the lock engaged.
    pub fn of_source(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            aspect_locked: true,
        }
    }

    /// Copy with both axes clamped to at least one pixel.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            ..self
        }
    }
}

/// Which dimension field an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Height,
}

/// Apply a single-axis dimension edit.
///
/// With the lock engaged, the other axis is derived from `source_aspect`
/// (the source's native width/height ratio), rounded to the nearest pixel
/// and kept at least 1. Without the lock only the edited axis changes.
/// A zero `value` is clamped to 1; there are no error conditions.
pub fn compute_resize(
    dims: TargetDimensions,
    axis: Axis,
    value: u32,
    source_aspect: f64,
) -> TargetDimensions {
    let value = value.max(1);
    let mut next = dims;
    match axis {
        Axis::Width => {
            next.width = value;
            if dims.aspect_locked {
                next.height = ((value as f64 / source_aspect).round() as u32).max(1);
            }
        }
        Axis::Height => {
            next.height = value;
            if dims.aspect_locked {
                next.width = ((value as f64 * source_aspect).round() as u32).max(1);
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECT_4_3: f64 = 800.0 / 600.0;

    #[test]
    fn test_locked_width_edit_derives_height() {
        let dims = TargetDimensions::of_source(800, 600);
        let next = compute_resize(dims, Axis::Width, 400, ASPECT_4_3);

        assert_eq!(next.width, 400);
        assert_eq!(next.height, 300);
        assert!(next.aspect_locked);
    }

    #[test]
    fn test_locked_height_edit_derives_width() {
        let dims = TargetDimensions::of_source(800, 600);
        let next = compute_resize(dims, Axis::Height, 150, ASPECT_4_3);

        assert_eq!(next.width, 200);
        assert_eq!(next.height, 150);
    }

    #[test]
    fn test_unlocked_edit_touches_one_axis() {
        let mut dims = TargetDimensions::of_source(800, 600);
        dims.aspect_locked = false;

        let next = compute_resize(dims, Axis::Width, 1234, ASPECT_4_3);
        assert_eq!(next.width, 1234);
        assert_eq!(next.height, 600);
    }

    #[test]
    fn test_zero_value_clamps_to_one() {
        let dims = TargetDimensions::of_source(800, 600);
        let next = compute_resize(dims, Axis::Width, 0, ASPECT_4_3);

        assert_eq!(next.width, 1);
        assert_eq!(next.height, 1); // round(1 / 1.333) = 1
    }

    #[test]
    fn test_derived_axis_never_collapses() {
        // Very wide aspect: a small height edit still keeps width >= 1,
        // and a width edit of 1 on a tall aspect keeps height >= 1.
        let dims = TargetDimensions::of_source(4000, 10);
        let next = compute_resize(dims, Axis::Width, 1, 400.0);
        assert_eq!(next.height, 1);

        let dims = TargetDimensions::of_source(10, 4000);
        let next = compute_resize(dims, Axis::Height, 1, 0.0025);
        assert_eq!(next.width, 1);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 500 / (800/600) = 375 exactly; 333 / 1.333.. = 249.75 -> 250
        let dims = TargetDimensions::of_source(800, 600);
        assert_eq!(compute_resize(dims, Axis::Width, 500, ASPECT_4_3).height, 375);
        assert_eq!(compute_resize(dims, Axis::Width, 333, ASPECT_4_3).height, 250);
    }

    #[test]
    fn test_of_source_clamps() {
        let dims = TargetDimensions::of_source(0, 600);
        assert_eq!(dims.width, 1);
        assert_eq!(dims.height, 600);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
