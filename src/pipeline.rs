//! # Render pipeline
//!
//! The stateful coordinator of the tuner. It owns the parameter store and the two image slots,
//! accepts UI [`Event`]s and answers each one with at most one synchronous render attempt:
//!
//! load both images -> compute target size -> feasibility gate -> resize -> match -> composite
//!
//! A render attempt either fully succeeds and replaces the displayed composite, or is abandoned
//! and leaves the previous composite in place.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use image::GrayImage;
use log::{debug, error, info, warn};

use crate::block_match::BlockMatcher;
use crate::composite::composite;
use crate::config::TunerConfig;
use crate::disparity::{DisparityAlgorithm, MatchParams, StereoPair};
use crate::error::*;
use crate::feasibility;
use crate::loader::{FileLoader, ImageLoader};
use crate::params::{Direction, ParameterKind, ParameterStore};
use crate::scaling::{self, Dimensions};

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Title of the warning raised when the kernel does not fit the scaled images.
pub const WARNING_TITLE: &str = "IMAGE NOT UPDATED";

/// Body of the warning raised when the kernel does not fit the scaled images.
pub const WARNING_MESSAGE: &str =
    "Kernel size exceeds image Height or Width. Reduce the kernel size.";

/// Slot label shown before a file has been chosen.
pub const NO_IMAGE_TEXT: &str = "No image chosen";

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// Which image of the stereo pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right
}

/// Lifecycle of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Fewer than two images chosen.
    NoImages,
    /// Both images chosen, nothing rendered yet.
    Ready,
    /// The last render attempt produced a composite.
    Rendered,
    /// The last render attempt was rejected by the feasibility gate.
    Warned
}

/// Inbound UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Single step on a parameter, e.g. an arrow key on a slider.
    ParameterStepped {
        parameter: ParameterKind,
        direction: Direction
    },
    /// Page step on a parameter.
    ParameterPaged {
        parameter: ParameterKind,
        direction: Direction
    },
    /// The user let go of a parameter control.
    ParameterReleased {
        parameter: ParameterKind
    },
    FileChosen {
        side: Side,
        path: PathBuf
    }
}

/// Outcome of a render attempt.
#[derive(Debug)]
pub enum RenderResult {
    /// A new composite of the given size is available from [`RenderPipeline::composite`].
    Rendered(Dimensions),
    /// Nothing was attempted. The reason is always [`Error::NotReady`].
    Skipped(Error),
    /// The kernel does not fit the scaled images. The previous composite is kept.
    Warning(Warning),
    /// The attempt was abandoned. The previous composite is kept.
    Failed(Error)
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// User facing warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub title: &'static str,
    pub message: &'static str,
    pub kernel_size: u32,
    pub target: Dimensions
}

/// One of the two image slots.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    side: Side,
    path: Option<PathBuf>
}

pub struct RenderPipeline<L = FileLoader, D = BlockMatcher> {
    params: ParameterStore,
    left: ImageSlot,
    right: ImageSlot,
    state: PipelineState,
    composite: Option<GrayImage>,
    loader: L,
    engine: D
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl RenderResult {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderResult::Rendered(_))
    }
}

impl Warning {
    fn kernel_too_large(kernel_size: u32, target: Dimensions) -> Self {
        Self {
            title: WARNING_TITLE,
            message: WARNING_MESSAGE,
            kernel_size,
            target
        }
    }
}

impl ImageSlot {
    fn new(side: Side) -> Self {
        Self { side, path: None }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.path.is_some()
    }

    /// The chosen path, or [`NO_IMAGE_TEXT`].
    pub fn label_text(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => NO_IMAGE_TEXT.to_string()
        }
    }
}

impl RenderPipeline<FileLoader, BlockMatcher> {
    /// Create a pipeline reading files from disk and matching with a [`BlockMatcher`].
    pub fn new(config: &TunerConfig) -> Result<Self> {
        Ok(Self::with_components(
            ParameterStore::new(config)?,
            FileLoader,
            BlockMatcher::new()
        ))
    }
}

impl<L: ImageLoader, D: DisparityAlgorithm> RenderPipeline<L, D> {
    pub fn with_components(params: ParameterStore, loader: L, engine: D) -> Self {
        Self {
            params,
            left: ImageSlot::new(Side::Left),
            right: ImageSlot::new(Side::Right),
            state: PipelineState::NoImages,
            composite: None,
            loader,
            engine
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    pub fn slot(&self, side: Side) -> &ImageSlot {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right
        }
    }

    /// The composite currently on display, if any render has succeeded.
    pub fn composite(&self) -> Option<&GrayImage> {
        self.composite.as_ref()
    }

    /// Dispatch a UI event. Every event triggers exactly one render attempt.
    pub fn handle(&mut self, event: Event) -> RenderResult {
        match event {
            Event::ParameterStepped { parameter, direction } => self.step(parameter, direction),
            Event::ParameterPaged { parameter, direction } => self.page(parameter, direction),
            Event::ParameterReleased { parameter } => self.release(parameter),
            Event::FileChosen { side, path } => self.choose_file(side, path)
        }
    }

    pub fn step(&mut self, parameter: ParameterKind, direction: Direction) -> RenderResult {
        self.params.step(parameter, direction);
        self.render()
    }

    pub fn page(&mut self, parameter: ParameterKind, direction: Direction) -> RenderResult {
        self.params.page(parameter, direction);
        self.render()
    }

    /// Snap the parameter now the interaction is over, then re-render.
    pub fn release(&mut self, parameter: ParameterKind) -> RenderResult {
        self.params.snap(parameter);
        self.render()
    }

    /// Fill or replace an image slot, then re-render.
    pub fn choose_file<P: Into<PathBuf>>(&mut self, side: Side, path: P) -> RenderResult {
        let path = path.into();
        debug!("{:?} image chosen: {}", side, path.display());

        match side {
            Side::Left => self.left.path = Some(path),
            Side::Right => self.right.path = Some(path)
        }

        if self.state == PipelineState::NoImages && self.left.is_set() && self.right.is_set() {
            self.state = PipelineState::Ready;
        }

        self.render()
    }

    /// Attempt a render with the current parameters and images.
    pub fn render(&mut self) -> RenderResult {
        if self.state == PipelineState::NoImages {
            debug!("Render skipped: {}", Error::NotReady);
            return RenderResult::Skipped(Error::NotReady);
        }

        match self.try_render() {
            Ok(composite) => {
                let dims = Dimensions::of(&composite);
                info!("Rendered {} composite", dims);
                self.composite = Some(composite);
                self.state = PipelineState::Rendered;
                RenderResult::Rendered(dims)
            },
            Err(Error::InfeasibleKernel { kernel, width, height }) => {
                warn!("{}: {}", WARNING_TITLE, WARNING_MESSAGE);
                self.state = PipelineState::Warned;
                RenderResult::Warning(
                    Warning::kernel_too_large(kernel, Dimensions::new(width, height))
                )
            },
            Err(e) => {
                match e {
                    Error::DimensionMismatch { .. } => {
                        error!("Pipeline invariant violated: {}", e)
                    },
                    _ => error!("Render failed: {}", e)
                }
                RenderResult::Failed(e)
            }
        }
    }

    fn try_render(&mut self) -> Result<GrayImage> {
        let left_path = self.left.path.as_deref().ok_or(Error::NotReady)?;
        let right_path = self.right.path.as_deref().ok_or(Error::NotReady)?;

        // ---- LOAD ----

        let left = self.loader.load(left_path)?;
        let right = self.loader.load(right_path)?;

        // ---- PLAN ----

        let target = scaling::compute_target_size(
            Dimensions::of(&left),
            Dimensions::of(&right),
            self.params.scaling_factor()
        );
        feasibility::ensure_feasible(target, self.params.kernel_size())?;

        // ---- MATCH ----

        let pair = StereoPair::new(
            scaling::resize_to(&left, target),
            scaling::resize_to(&right, target)
        )?;

        let match_params = MatchParams {
            num_disparities: self.params.disparities(),
            block_size: self.params.kernel_size()
        };
        let disp_map = self.engine.compute(&pair, &match_params)?;
        let disp = disp_map.to_luma_scaled(match_params.num_disparities as f32);

        // ---- COMPOSITE ----

        let (left_scaled, _) = pair.into_parts();
        composite(&disp, &left_scaled, self.params.opacity_fraction())
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
