//! Settings validation errors and semantic validation.

use riser_math::DensityError;
use thiserror::Error;

use crate::settings::Settings;
use crate::CONFIG_SCHEMA_VERSION;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn invalid(field: &str, message: String) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

/// Validate settings semantically.
///
/// Runs after loading and again after command-line overrides are applied.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    let resample = &settings.resample;
    if resample.target_count == 0 {
        return Err(invalid("resample.target_count", "Must be positive".to_string()));
    }
    if resample.max_iterations == 0 {
        return Err(invalid("resample.max_iterations", "Must be positive".to_string()));
    }
    if let Some(rate) = resample.max_rate {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(invalid(
                "resample.max_rate",
                format!("Must be a positive finite number, got {}", rate),
            ));
        }
    }

    // Density options carry their own checks; re-key them under `density.`.
    if let Err(err) = settings.density.validate() {
        return Err(match err {
            DensityError::InvalidOption { option, message } => {
                invalid(&format!("density.{}", option), message)
            }
            other => invalid("density", other.to_string()),
        });
    }

    let analysis = &settings.analysis;
    if !(analysis.mass > 0.0 && analysis.mass <= 1.0) {
        return Err(invalid(
            "analysis.mass",
            format!("Must be in (0, 1], got {}", analysis.mass),
        ));
    }
    if analysis.hpd_resolution == 0 {
        return Err(invalid(
            "analysis.hpd_resolution",
            "Must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use riser_math::{Bandwidth, BinCount, Smoothing};

    fn field_of(err: ValidationError) -> String {
        match err {
            ValidationError::InvalidValue { field, .. } => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn version_mismatch_is_reported() {
        let mut settings = Settings::default();
        settings.schema_version = "0.9.0".to_string();
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(err.code(), 66);
    }

    #[test]
    fn resample_bounds() {
        let mut settings = Settings::default();
        settings.resample.target_count = 0;
        assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "resample.target_count");

        let mut settings = Settings::default();
        settings.resample.max_iterations = 0;
        assert_eq!(
            field_of(validate_settings(&settings).unwrap_err()),
            "resample.max_iterations"
        );

        let mut settings = Settings::default();
        settings.resample.max_rate = Some(-1.0);
        assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "resample.max_rate");
    }

    #[test]
    fn density_errors_are_prefixed() {
        let mut settings = Settings::default();
        settings.density.bin_count = BinCount::Fixed(0);
        assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "density.bin_count");

        let mut settings = Settings::default();
        settings.density.bin_count = BinCount::Fixed(1_000_000_000_000);
        assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "density.bin_count");

        let mut settings = Settings::default();
        settings.density.smoothing = Smoothing::Gaussian(0);
        assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "density.smoothing");

        let mut settings = Settings::default();
        settings.density.bandwidth = Bandwidth::Explicit(0.0);
        assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "density.bandwidth");

        let mut settings = Settings::default();
        settings.density.grid_points = 1;
        assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "density.grid_points");
    }

    #[test]
    fn analysis_bounds() {
        for mass in [0.0, 1.5, f64::NAN] {
            let mut settings = Settings::default();
            settings.analysis.mass = mass;
            assert_eq!(field_of(validate_settings(&settings).unwrap_err()), "analysis.mass");
        }
        let mut settings = Settings::default();
        settings.analysis.mass = 1.0;
        assert!(validate_settings(&settings).is_ok());

        settings.analysis.hpd_resolution = 0;
        assert_eq!(
            field_of(validate_settings(&settings).unwrap_err()),
            "analysis.hpd_resolution"
        );
    }
}
