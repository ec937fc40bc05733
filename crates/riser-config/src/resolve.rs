//! Settings path resolution.
//!
//! Resolution order: CLI argument → environment variable → XDG path → defaults.

use std::path::{Path, PathBuf};

/// Where the settings file came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via `--config`.
    CliArgument,

    /// Set via `RISER_CONFIG`.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Resolved settings location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPath {
    /// Settings file to load (None when using defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable naming an explicit settings file.
pub const ENV_CONFIG_PATH: &str = "RISER_CONFIG";

/// Settings file name inside the config directory.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Application name for XDG directories.
const APP_NAME: &str = "riser";

/// Resolve the settings file using the standard resolution order.
///
/// 1. Explicit CLI path (used even if missing, so the load reports it)
/// 2. `RISER_CONFIG` (same)
/// 3. `$XDG_CONFIG_HOME/riser/settings.json`, if it exists
/// 4. Built-in defaults (None)
pub fn resolve_settings_path(cli_path: Option<&Path>) -> SettingsPath {
    let env_path = std::env::var_os(ENV_CONFIG_PATH)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_from(cli_path, env_path, xdg_config_dir())
}

/// Resolution with the environment lookups already done.
pub fn resolve_from(
    cli_path: Option<&Path>,
    env_path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> SettingsPath {
    if let Some(path) = cli_path {
        return SettingsPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Some(path) = env_path {
        return SettingsPath {
            path: Some(path),
            source: ConfigSource::Environment,
        };
    }

    if let Some(dir) = config_dir {
        let path = dir.join(SETTINGS_FILENAME);
        if path.is_file() {
            return SettingsPath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    SettingsPath::default()
}

/// Get the XDG config directory for riser.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
