//! Settings types.
//!
//! Every field has a default, so a settings file only needs the keys it
//! changes. Unknown keys are rejected to catch typos.

use std::path::Path;

use riser_math::{DensityOptions, RangeMethod, DEFAULT_HPD_RESOLUTION};
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};
use crate::CONFIG_SCHEMA_VERSION;

/// Complete settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub schema_version: String,
    pub resample: ResampleSettings,
    pub density: DensityOptions,
    pub analysis: AnalysisSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            resample: ResampleSettings::default(),
            density: DensityOptions::default(),
            analysis: AnalysisSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    pub fn to_json_pretty(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Cannot serialize settings: {}", e)))
    }
}

/// Constrained resampling controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResampleSettings {
    /// Accepted samples wanted per interval.
    pub target_count: usize,

    /// Iteration cap across all workers.
    pub max_iterations: u64,

    /// Optional upper bound on any incremental rate.
    pub max_rate: Option<f64>,

    /// RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Worker threads; 0 means one per available core.
    pub workers: usize,
}

impl Default for ResampleSettings {
    fn default() -> Self {
        Self {
            target_count: 10_000,
            max_iterations: 1_000_000,
            max_rate: None,
            seed: None,
            workers: 1,
        }
    }
}

/// Probable-range reporting controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSettings {
    /// Probability mass enclosed by reported ranges.
    pub mass: f64,
    pub method: RangeMethod,
    /// Bisection steps for the HPD threshold search.
    pub hpd_resolution: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            mass: 0.95,
            method: RangeMethod::Hpd,
            hpd_resolution: DEFAULT_HPD_RESOLUTION,
        }
    }
}
