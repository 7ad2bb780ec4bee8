//! # Error standards
//! 
//! This module provides a standardised error enum and result type for this crate.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::PathBuf;

use crate::scaling::Dimensions;

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Standard result type used in the disparity tuner crate.
pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Fewer than two images have been chosen.
    #[error("Fewer than two images chosen")]
    NotReady,

    /// The kernel does not fit inside the scaled images.
    #[error("Kernel size {kernel} exceeds the scaled image size {width}x{height}")]
    InfeasibleKernel {
        kernel: u32,
        width: u32,
        height: u32
    },

    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    /// The file does not carry one of the accepted image extensions.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to decode image {path}: {source}")]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError
    },

    /// Two rasters that must share dimensions did not. This is a bug in the caller, not a user
    /// error.
    #[error("Raster dimensions do not match: expected {expected}, found {found}")]
    DimensionMismatch {
        expected: Dimensions,
        found: Dimensions
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error)
}
