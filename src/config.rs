//! # Tuner configuration
//!
//! Bounds, step sizes, defaults and snapping rules for each tunable parameter. The defaults
//! reproduce the nominal values of the interactive tool; any of them can be overridden from a TOML
//! file.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::*;
use crate::params::{ParameterKind, SnapRule};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Configuration record for a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Human readable label, shown as `"<label>: <value>"`.
    pub label: String,
    pub min: u32,
    pub max: u32,
    /// Granularity the value is snapped to on release.
    pub nominal_step: u32,
    /// Distance moved by a page step.
    pub page_step: u32,
    pub default: u32,
    pub snap_rule: SnapRule
}

/// Configuration for the full parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    pub disparities: ParameterConfig,
    pub kernel_size: ParameterConfig,
    pub opacity: ParameterConfig,
    pub scaling_factor: ParameterConfig
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl ParameterConfig {
    /// Check that the record describes a usable parameter.
    ///
    /// Both bounds must already satisfy the snap rule, so that clamping a snapped value can never
    /// produce an unsnapped one.
    pub fn validate(&self) -> Result<()> {
        if self.nominal_step == 0 {
            return Err(Error::InvalidConfig(
                format!("{}: nominal step must be non-zero", self.label)
            ));
        }

        if self.min > self.max {
            return Err(Error::InvalidConfig(
                format!("{}: min {} is greater than max {}", self.label, self.min, self.max)
            ));
        }

        if self.default < self.min || self.default > self.max {
            return Err(Error::InvalidConfig(format!(
                "{}: default {} lies outside {}..={}",
                self.label, self.default, self.min, self.max
            )));
        }

        for bound in [self.min, self.max].iter() {
            if !self.snap_rule.is_satisfied(*bound, self.nominal_step) {
                return Err(Error::InvalidConfig(format!(
                    "{}: bound {} does not satisfy the {:?} snap rule",
                    self.label, bound, self.snap_rule
                )));
            }
        }

        Ok(())
    }
}

impl TunerConfig {
    /// Parse a configuration from a TOML string. Missing tables fall back to the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: TunerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Validate every parameter record.
    pub fn validate(&self) -> Result<()> {
        for kind in ParameterKind::ALL.iter() {
            self.get(*kind).validate()?;
        }

        // The matcher needs at least one disparity level to search
        if self.disparities.min == 0 {
            return Err(Error::InvalidConfig(
                format!("{}: min must be at least 1", self.disparities.label)
            ));
        }

        Ok(())
    }

    /// Get the record for the given parameter.
    pub fn get(&self, kind: ParameterKind) -> &ParameterConfig {
        match kind {
            ParameterKind::Disparities => &self.disparities,
            ParameterKind::KernelSize => &self.kernel_size,
            ParameterKind::Opacity => &self.opacity,
            ParameterKind::ScalingFactor => &self.scaling_factor
        }
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            disparities: ParameterConfig {
                label: "Disparities".into(),
                min: 16,
                max: 240,
                nominal_step: 16,
                page_step: 48,
                default: 64,
                snap_rule: SnapRule::RoundToNearest
            },
            kernel_size: ParameterConfig {
                label: "Kernel Size".into(),
                min: 5,
                max: 255,
                nominal_step: 2,
                page_step: 20,
                default: 15,
                snap_rule: SnapRule::ForceOdd
            },
            opacity: ParameterConfig {
                label: "Opacity".into(),
                min: 0,
                max: 100,
                nominal_step: 2,
                page_step: 10,
                default: 50,
                snap_rule: SnapRule::IncrementToMultiple
            },
            scaling_factor: ParameterConfig {
                label: "Scale Factor".into(),
                min: 10,
                max: 100,
                nominal_step: 2,
                page_step: 10,
                default: 10,
                snap_rule: SnapRule::IncrementToMultiple
            }
        }
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TunerConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = TunerConfig::from_toml_str(r#"
            [kernel_size]
            label = "Block"
            min = 3
            max = 51
            nominal_step = 2
            page_step = 10
            default = 9
            snap_rule = "force_odd"
        "#).unwrap();

        assert_eq!(config.kernel_size.max, 51);
        assert_eq!(config.kernel_size.label, "Block");
        assert_eq!(config.disparities, TunerConfig::default().disparities);
    }

    #[test]
    fn default_outside_range_is_rejected() {
        let mut config = TunerConfig::default();
        config.opacity.default = 120;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn unsnapped_bound_is_rejected() {
        let mut config = TunerConfig::default();
        config.kernel_size.max = 254;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn zero_disparities_is_rejected() {
        let result = TunerConfig::from_toml_str(r#"
            [disparities]
            label = "Disparities"
            min = 0
            max = 240
            nominal_step = 16
            page_step = 48
            default = 64
            snap_rule = "round_to_nearest"
        "#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn zero_step_is_rejected() {
        let mut config = TunerConfig::default();
        config.disparities.nominal_step = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = TunerConfig::from_toml_str("[opacity]\nmin = \"zero\"");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }
}
