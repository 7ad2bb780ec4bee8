//! # Disparity Tuner
//!
//! This crate provides the rendering core of an interactive stereo disparity tuner: a bounded
//! parameter store, planning of a shared working size for a left/right image pair, a feasibility
//! gate for the matching kernel, block matching, and compositing of the left image over the
//! disparity map. [`pipeline::RenderPipeline`] ties these together behind a single event API that
//! any UI toolkit can drive.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod block_match;
pub mod composite;
pub mod config;
mod disparity;
mod error;
pub mod feasibility;
pub mod loader;
pub mod params;
pub mod pipeline;
pub mod scaling;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::block_match::BlockMatcher;
    pub use crate::config::{ParameterConfig, TunerConfig};
    pub use crate::disparity::{DisparityAlgorithm, DisparityMap, MatchParams, StereoPair};
    pub use crate::loader::{FileLoader, ImageLoader};
    pub use crate::params::{Direction, ParameterKind, ParameterStore, SnapRule};
    pub use crate::pipeline::{Event, PipelineState, RenderPipeline, RenderResult, Side};
    pub use crate::scaling::Dimensions;
}
