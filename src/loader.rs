//! # Image loading
//!
//! The pipeline reads images through the [`ImageLoader`] trait so the decoding backend can be
//! swapped out, for example for an in-memory store in tests.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

use image::GrayImage;
use log::debug;

use crate::error::*;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// File extensions accepted for left and right images, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait ImageLoader {
    /// Load the image at `path` as 8-bit grayscale.
    fn load(&self, path: &Path) -> Result<GrayImage>;
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Loads images from the filesystem with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Whether the path carries one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl ImageLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<GrayImage> {
        if !is_supported_image(path) {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let img = image::open(path).map_err(|source| {
            debug!("Could not decode {}: {}", path.display(), source);
            Error::DecodeFailed { path: path.to_path_buf(), source }
        })?;

        debug!("Loaded {} ({}x{})", path.display(), img.width(), img.height());

        Ok(img.to_luma8())
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
