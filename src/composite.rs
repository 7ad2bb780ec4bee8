//! # Compositor
//!
//! Draws the scaled left image over the disparity visualisation with a given opacity.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{GrayImage, Luma};

use crate::error::*;
use crate::scaling::Dimensions;

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Blend `overlay` on top of `base` with alpha `opacity`.
///
/// An opacity of `0.0` returns `base` unchanged and `1.0` returns `overlay` unchanged; values
/// outside `0.0..=1.0` are clamped. Both rasters must have the same dimensions, anything else
/// means the caller skipped the scaling step and is reported as [`Error::DimensionMismatch`].
pub fn composite(base: &GrayImage, overlay: &GrayImage, opacity: f32) -> Result<GrayImage> {
    let expected = Dimensions::of(base);
    let found = Dimensions::of(overlay);
    if expected != found {
        return Err(Error::DimensionMismatch { expected, found });
    }

    let alpha = if opacity.is_nan() { 0.0 } else { opacity.max(0.0).min(1.0) };

    Ok(GrayImage::from_fn(expected.width, expected.height, |x, y| {
        let b = f32::from(base.get_pixel(x, y)[0]);
        let o = f32::from(overlay.get_pixel(x, y)[0]);
        let val = o * alpha + b * (1.0 - alpha);
        Luma([val.round().max(0.0).min(255.0) as u8])
    }))
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 13 + y * 7) % 256) as u8]))
    }

    fn checker(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([if (x + y) % 2 == 0 { 255 } else { 3 }])
        })
    }

    #[test]
    fn zero_opacity_is_pure_disparity() {
        let disp = gradient(31, 17);
        let left = checker(31, 17);
        assert_eq!(composite(&disp, &left, 0.0).unwrap(), disp);
    }

    #[test]
    fn full_opacity_is_pure_left() {
        let disp = gradient(31, 17);
        let left = checker(31, 17);
        assert_eq!(composite(&disp, &left, 1.0).unwrap(), left);
    }

    #[test]
    fn half_opacity_averages() {
        let disp = GrayImage::from_pixel(2, 2, Luma([100]));
        let left = GrayImage::from_pixel(2, 2, Luma([200]));
        let out = composite(&disp, &left, 0.5).unwrap();
        assert!(out.pixels().all(|p| p[0] == 150));
    }

    #[test]
    fn out_of_range_opacity_is_clamped() {
        let disp = gradient(4, 4);
        let left = checker(4, 4);
        assert_eq!(composite(&disp, &left, 3.0).unwrap(), left);
        assert_eq!(composite(&disp, &left, -1.0).unwrap(), disp);
    }

    #[test]
    fn output_matches_disparity_dimensions() {
        let out = composite(&gradient(9, 5), &checker(9, 5), 0.3).unwrap();
        assert_eq!(Dimensions::of(&out), Dimensions::new(9, 5));
    }

    #[test]
    fn mismatched_dimensions_are_an_error() {
        let result = composite(&gradient(9, 5), &checker(5, 9), 0.3);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
