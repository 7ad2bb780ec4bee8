//! # Scaling planner
//!
//! Works out the single size both images of a pair are resized to before matching. The stereo
//! matcher needs equal-sized inputs, so the narrower image is taken as the reference and both are
//! resized to the reference scaled by the scaling factor.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::fmt;

use image::{imageops::FilterType, GrayImage};
use log::debug;
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions of an existing raster.
    pub fn of(image: &GrayImage) -> Self {
        Self::new(image.width(), image.height())
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Compute the target size shared by both images.
///
/// The image with the smaller width is the reference; when the widths are equal the second image
/// is used. Each reference dimension is multiplied by `scaling_factor / 100` and truncated.
pub fn compute_target_size(a: Dimensions, b: Dimensions, scaling_factor: u32) -> Dimensions {
    let reference = if a.width < b.width { a } else { b };

    let scale = |dim: u32| (u64::from(dim) * u64::from(scaling_factor) / 100) as u32;
    let target = Dimensions::new(scale(reference.width), scale(reference.height));

    debug!(
        "Target size {} from {} and {} at {}%",
        target, a, b, scaling_factor
    );

    target
}

/// Resize a raster to the target size.
///
/// Returns a copy untouched when the raster already has the target size.
pub fn resize_to(image: &GrayImage, target: Dimensions) -> GrayImage {
    if Dimensions::of(image) == target {
        return image.clone();
    }

    image::imageops::resize(image, target.width, target.height, FilterType::Triangle)
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrower_image_is_reference() {
        let left = Dimensions::new(640, 480);
        let right = Dimensions::new(800, 600);

        assert_eq!(compute_target_size(left, right, 50), Dimensions::new(320, 240));
        assert_eq!(compute_target_size(right, left, 50), Dimensions::new(320, 240));
    }

    #[test]
    fn full_scale_is_identity() {
        let left = Dimensions::new(4000, 3000);
        let right = Dimensions::new(4000, 2999);

        // Equal widths fall back to the second image
        assert_eq!(compute_target_size(left, right, 100), Dimensions::new(4000, 2999));
    }

    #[test]
    fn truncates_instead_of_rounding() {
        let dims = Dimensions::new(99, 19);
        assert_eq!(compute_target_size(dims, dims, 10), Dimensions::new(9, 1));
    }

    #[test]
    fn reference_height_is_used_even_if_taller() {
        let narrow_tall = Dimensions::new(300, 900);
        let wide_short = Dimensions::new(400, 100);
        assert_eq!(
            compute_target_size(narrow_tall, wide_short, 20),
            Dimensions::new(60, 180)
        );
    }

    #[test]
    fn resize_hits_target() {
        let image = GrayImage::from_pixel(64, 48, image::Luma([90]));
        let resized = resize_to(&image, Dimensions::new(13, 7));
        assert_eq!(Dimensions::of(&resized), Dimensions::new(13, 7));
        assert!(resized.pixels().all(|p| p[0] == 90));
    }
}
