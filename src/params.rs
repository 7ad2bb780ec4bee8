//! # Parameter store
//!
//! Holds the current value of each tunable parameter. Values move freely inside their range while
//! the user is interacting (`step`, `page`, `set`) and are normalised by `snap` once the
//! interaction ends.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ParameterConfig, TunerConfig};
use crate::error::*;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// The four tunable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Disparities,
    KernelSize,
    Opacity,
    ScalingFactor
}

/// Normalisation applied to a parameter when an interaction finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapRule {
    /// Round to the nearest multiple of the nominal step.
    RoundToNearest,
    /// Bump even values up by one.
    ForceOdd,
    /// Bump values up to the next multiple of the nominal step.
    IncrementToMultiple
}

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A bounded integer parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    kind: ParameterKind,
    config: ParameterConfig,
    value: u32
}

/// The full set of parameters driving a render.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    disparities: Parameter,
    kernel_size: Parameter,
    opacity: Parameter,
    scaling_factor: Parameter
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl ParameterKind {
    pub const ALL: [ParameterKind; 4] = [
        ParameterKind::Disparities,
        ParameterKind::KernelSize,
        ParameterKind::Opacity,
        ParameterKind::ScalingFactor
    ];
}

impl SnapRule {
    /// Apply the rule to a raw value. The result is not clamped.
    pub fn apply(self, value: u32, step: u32) -> u32 {
        match self {
            SnapRule::RoundToNearest => ((value + step / 2) / step) * step,
            SnapRule::ForceOdd => {
                if value % 2 == 0 {
                    value + 1
                }
                else {
                    value
                }
            },
            SnapRule::IncrementToMultiple => {
                let rem = value % step;
                if rem == 0 {
                    value
                }
                else {
                    value + (step - rem)
                }
            }
        }
    }

    /// Whether the value is already in snapped form.
    pub fn is_satisfied(self, value: u32, step: u32) -> bool {
        match self {
            SnapRule::ForceOdd => value % 2 == 1,
            SnapRule::RoundToNearest | SnapRule::IncrementToMultiple => value % step == 0
        }
    }
}

impl Parameter {
    fn new(kind: ParameterKind, config: ParameterConfig) -> Self {
        let value = config.default;
        Self { kind, config, value }
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn min(&self) -> u32 {
        self.config.min
    }

    pub fn max(&self) -> u32 {
        self.config.max
    }

    pub fn nominal_step(&self) -> u32 {
        self.config.nominal_step
    }

    pub fn snap_rule(&self) -> SnapRule {
        self.config.snap_rule
    }

    /// Whether the current value already satisfies the snap rule.
    pub fn is_snapped(&self) -> bool {
        self.config.snap_rule.is_satisfied(self.value, self.config.nominal_step)
    }

    /// Label text for display, e.g. `"Kernel Size: 15"`.
    ///
    /// Opacity is shown as a fraction (`"Opacity: 0.5"`) since that is the alpha actually applied.
    pub fn label_text(&self) -> String {
        match self.kind {
            ParameterKind::Opacity => format!(
                "{}: {:?}", self.config.label, f64::from(self.value) / 100.0
            ),
            _ => format!("{}: {}", self.config.label, self.value)
        }
    }

    fn clamp(&self, value: u32) -> u32 {
        value.max(self.config.min).min(self.config.max)
    }

    fn offset(&mut self, amount: u32, direction: Direction) -> u32 {
        let raw = match direction {
            Direction::Up => self.value.saturating_add(amount),
            Direction::Down => self.value.saturating_sub(amount)
        };
        self.value = self.clamp(raw);
        self.value
    }

    fn snap(&mut self) -> u32 {
        let snapped = self.config.snap_rule.apply(self.value, self.config.nominal_step);
        self.value = self.clamp(snapped);
        self.value
    }
}

impl ParameterStore {
    /// Build a store from a configuration, validating it first.
    pub fn new(config: &TunerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: &TunerConfig) -> Self {
        Self {
            disparities: Parameter::new(
                ParameterKind::Disparities, config.disparities.clone()
            ),
            kernel_size: Parameter::new(
                ParameterKind::KernelSize, config.kernel_size.clone()
            ),
            opacity: Parameter::new(
                ParameterKind::Opacity, config.opacity.clone()
            ),
            scaling_factor: Parameter::new(
                ParameterKind::ScalingFactor, config.scaling_factor.clone()
            )
        }
    }

    pub fn get(&self, kind: ParameterKind) -> &Parameter {
        match kind {
            ParameterKind::Disparities => &self.disparities,
            ParameterKind::KernelSize => &self.kernel_size,
            ParameterKind::Opacity => &self.opacity,
            ParameterKind::ScalingFactor => &self.scaling_factor
        }
    }

    fn get_mut(&mut self, kind: ParameterKind) -> &mut Parameter {
        match kind {
            ParameterKind::Disparities => &mut self.disparities,
            ParameterKind::KernelSize => &mut self.kernel_size,
            ParameterKind::Opacity => &mut self.opacity,
            ParameterKind::ScalingFactor => &mut self.scaling_factor
        }
    }

    /// Move a parameter by one unit, clamped to its range. The snap rule is not applied.
    pub fn step(&mut self, kind: ParameterKind, direction: Direction) -> u32 {
        let value = self.get_mut(kind).offset(1, direction);
        debug!("Stepped {:?} {:?} to {}", kind, direction, value);
        value
    }

    /// Move a parameter by its page step, clamped to its range. The snap rule is not applied.
    pub fn page(&mut self, kind: ParameterKind, direction: Direction) -> u32 {
        let param = self.get_mut(kind);
        let amount = param.config.page_step;
        let value = param.offset(amount, direction);
        debug!("Paged {:?} {:?} to {}", kind, direction, value);
        value
    }

    /// Set a parameter to an arbitrary position, clamped to its range.
    pub fn set(&mut self, kind: ParameterKind, value: u32) -> u32 {
        let param = self.get_mut(kind);
        param.value = param.clamp(value);
        debug!("Set {:?} to {}", kind, param.value);
        param.value
    }

    /// Normalise a parameter according to its snap rule, then clamp it.
    pub fn snap(&mut self, kind: ParameterKind) -> u32 {
        let value = self.get_mut(kind).snap();
        debug!("Snapped {:?} to {}", kind, value);
        value
    }

    pub fn value(&self, kind: ParameterKind) -> u32 {
        self.get(kind).value()
    }

    pub fn label_text(&self, kind: ParameterKind) -> String {
        self.get(kind).label_text()
    }

    pub fn disparities(&self) -> u32 {
        self.disparities.value
    }

    pub fn kernel_size(&self) -> u32 {
        self.kernel_size.value
    }

    pub fn scaling_factor(&self) -> u32 {
        self.scaling_factor.value
    }

    /// Opacity as an alpha value in `0.0..=1.0`.
    pub fn opacity_fraction(&self) -> f32 {
        self.opacity.value as f32 / 100.0
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::from_valid(&TunerConfig::default())
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
