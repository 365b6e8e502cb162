//! Size Fitter - aspect-preserving scale under a cap
//!
//! The reference dimension fixes the height; the width follows the intrinsic
//! aspect ratio unless it would exceed the cap, in which case the width is
//! pinned to the cap and the height follows instead.

use serde::Serialize;

use crate::layout::SlotGroup;

/// Real-valued output size. Rounding happens at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedSize {
    pub width: f64,
    pub height: f64,
}

impl FittedSize {
    /// Whole-pixel size for resampling, never smaller than 1x1.
    pub fn to_pixels(self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Callers must ensure `intrinsic_height != 0`.
pub fn fit(
    intrinsic_width: f64,
    intrinsic_height: f64,
    reference_dimension: f64,
    max_orthogonal_size: f64,
) -> FittedSize {
    let aspect = intrinsic_width / intrinsic_height;
    let width = reference_dimension * aspect;

    if width > max_orthogonal_size {
        FittedSize {
            width: max_orthogonal_size,
            height: max_orthogonal_size / aspect,
        }
    } else {
        FittedSize {
            width,
            height: reference_dimension,
        }
    }
}

/// Fit a source of the given pixel size to a slot group.
pub fn fit_to_group(width: u32, height: u32, group: &SlotGroup) -> FittedSize {
    fit(
        width as f64,
        height as f64,
        group.reference_dimension,
        group.max_orthogonal_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LARGE_SLOTS, SMALL_SLOTS};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_square_large_group() {
        let s = fit(500.0, 500.0, 100.0, 163.0);
        assert_eq!(s, FittedSize { width: 100.0, height: 100.0 });
    }

    #[test]
    fn test_wide_falls_back_to_cap() {
        let s = fit(300.0, 100.0, 100.0, 163.0);
        assert!((s.width - 163.0).abs() < EPS);
        assert!((s.height - 163.0 / 3.0).abs() < EPS);
        assert!((s.height - 54.333).abs() < 1e-3);
    }

    #[test]
    fn test_exactly_at_cap_keeps_reference_branch() {
        let s = fit(300.0, 200.0, 100.0, 150.0);
        assert_eq!(s, FittedSize { width: 150.0, height: 100.0 });
    }

    #[test]
    fn test_tall_source() {
        let s = fit(50.0, 200.0, 100.0, 163.0);
        assert_eq!(s.height, 100.0);
        assert!((s.width - 25.0).abs() < EPS);
    }

    #[test]
    fn test_aspect_preserved_in_both_branches() {
        let ratios = [0.1, 0.5, 1.0, 1.05, 1.1, 1.5, 1.7, 2.5, 10.0];
        for group in [LARGE_SLOTS, SMALL_SLOTS] {
            for r in ratios {
                let s = fit(r, 1.0, group.reference_dimension, group.max_orthogonal_size);
                assert!((s.aspect() - r).abs() < 1e-9, "ratio {r}");
                assert!(s.width <= group.max_orthogonal_size + EPS);
                if r * group.reference_dimension <= group.max_orthogonal_size {
                    assert_eq!(s.height, group.reference_dimension);
                } else {
                    assert_eq!(s.width, group.max_orthogonal_size);
                }
            }
        }
    }

    #[test]
    fn test_small_group_wide_logo() {
        let s = fit_to_group(400, 200, &SMALL_SLOTS);
        assert_eq!(s.width, 64.0);
        assert!((s.height - 32.0).abs() < EPS);
    }

    #[test]
    fn test_to_pixels_rounds_and_clamps() {
        let s = FittedSize { width: 163.0, height: 54.333 };
        assert_eq!(s.to_pixels(), (163, 54));
        let thin = FittedSize { width: 163.0, height: 0.2 };
        assert_eq!(thin.to_pixels(), (163, 1));
    }
}
