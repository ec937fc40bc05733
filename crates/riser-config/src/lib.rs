//! RISeR settings loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for settings.json
//! - Settings path resolution (CLI → env → XDG → defaults)
//! - Semantic validation of resampling, density and analysis options

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_settings_path, ConfigSource, SettingsPath};
pub use settings::{AnalysisSettings, ResampleSettings, Settings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for settings files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
