//! Settings loading for the riser CLI.
//!
//! This module handles:
//! - Settings resolution order (CLI > env > XDG > defaults)
//! - Parsing settings.json (shape/type checking via serde)
//! - Semantic validation before and after command-line overrides

pub use riser_config::{
    AnalysisSettings, ConfigSource, ResampleSettings, Settings, ValidationError,
};

use riser_config::{resolve_settings_path, validate_settings};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid settings file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("Semantic validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Settings with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: Settings,
    /// File the settings came from (None if using defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Load settings with the standard resolution order and validate them.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedSettings, ConfigError> {
    let resolved = resolve_settings_path(cli_path);
    let settings = match &resolved.path {
        Some(path) => load_settings_file(path)?,
        None => Settings::default(),
    };
    validate_settings(&settings)?;

    Ok(ResolvedSettings {
        settings,
        path: resolved.path,
        source: resolved.source,
    })
}

/// Load and parse a single settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Settings::from_file(path).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}
