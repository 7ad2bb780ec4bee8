//! # General disparity objects
//!
//! This module provides generic disparity traits and structures for use by different algorithms.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{GrayImage, ImageBuffer, Luma};
use serde::{Deserialize, Serialize};

use crate::error::*;
use crate::scaling::Dimensions;

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Single channel floating point image.
pub type GrayFloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A generic floating point disparity map.
///
/// Pixels for which no disparity could be computed hold a negative value.
pub struct DisparityMap {
    data: GrayFloatImage
}

/// A pair of equally sized grayscale images.
pub struct StereoPair {
    left: GrayImage,
    right: GrayImage
}

/// Parameters shared by all matching algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Number of disparity levels searched, starting at zero.
    pub num_disparities: u32,
    /// Side length of the square matching window. Must be odd.
    pub block_size: u32
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait DisparityAlgorithm {
    /// Compute the disparity map of the given stereo pair.
    ///
    /// Callers must make sure `params.block_size` fits inside the pair.
    fn compute(&mut self, pair: &StereoPair, params: &MatchParams) -> Result<DisparityMap>;
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl DisparityMap {
    /// Create a new map with every pixel marked invalid.
    pub fn new(width: u32, height: u32) -> Self {
        DisparityMap {
            data: GrayFloatImage::from_pixel(width, height, Luma([-1.0]))
        }
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data.get_pixel(x, y)[0]
    }

    pub fn put(&mut self, x: u32, y: u32, val: f32) {
        self.data.put_pixel(x, y, Luma([val]))
    }

    /// Converts the image into a Luma8 image, clamping raw disparities to `0..=255`.
    pub fn to_luma(&self) -> GrayImage {
        self.to_luma_with(1.0)
    }

    /// Converts the image to a GrayImage where `max` maps to 255.
    ///
    /// Scaling by a fixed maximum, such as the number of disparities searched, keeps brightness
    /// comparable between renders.
    pub fn to_luma_scaled(&self, max: f32) -> GrayImage {
        if max <= 0.0 {
            return self.to_luma();
        }
        self.to_luma_with(255.0 / max)
    }

    fn to_luma_with(&self, mult: f32) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            let mut val = self.get(x, y) * mult;

            if val < 0.0 {
                val = 0.0;
            }
            else if val > 255.0 {
                val = 255.0;
            }

            Luma([val.round() as u8])
        })
    }
}

impl StereoPair {
    /// Build a pair, checking both images share the same dimensions.
    pub fn new(left: GrayImage, right: GrayImage) -> Result<Self> {
        let expected = Dimensions::of(&left);
        let found = Dimensions::of(&right);

        if expected != found {
            return Err(Error::DimensionMismatch { expected, found });
        }

        Ok(Self { left, right })
    }

    pub fn left(&self) -> &GrayImage {
        &self.left
    }

    pub fn right(&self) -> &GrayImage {
        &self.right
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.left)
    }

    /// Take the pair apart, returning `(left, right)`.
    pub fn into_parts(self) -> (GrayImage, GrayImage) {
        (self.left, self.right)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_pair_is_rejected() {
        let result = StereoPair::new(GrayImage::new(10, 10), GrayImage::new(10, 11));
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn invalid_pixels_render_black() {
        let map = DisparityMap::new(3, 2);
        assert!(map.to_luma().pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn scaled_maps_max_to_white() {
        let mut map = DisparityMap::new(2, 1);
        map.put(0, 0, 32.0);
        map.put(1, 0, 64.0);

        let luma = map.to_luma_scaled(64.0);
        assert_eq!(luma.get_pixel(0, 0)[0], 128);
        assert_eq!(luma.get_pixel(1, 0)[0], 255);
    }
}
