//! Log level and format selection.
//!
//! Precedence, lowest first: built-in defaults, `RUST_LOG`, `RISER_LOG`,
//! `RISER_LOG_FORMAT`, then the `--log-level` / `--log-format` flags and
//! finally `-v` / `-q`.

use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable for the log level.
pub const ENV_LOG_LEVEL: &str = "RISER_LOG";

/// Environment variable for the log format.
pub const ENV_LOG_FORMAT: &str = "RISER_LOG_FORMAT";

/// Shape of the lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Plain text for a terminal.
    #[default]
    Human,
    /// One JSON object per line.
    #[value(alias = "json")]
    Jsonl,
}

/// Minimum severity that reaches stderr, quietest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Move `steps` towards `Trace` (positive) or `Off` (negative).
    fn shift(self, steps: i32) -> Self {
        let levels = LogLevel::value_variants();
        let index = levels.iter().position(|l| *l == self).unwrap_or(2) as i32;
        let shifted = (index - steps).clamp(0, levels.len() as i32 - 1);
        levels[shifted as usize]
    }

    /// Most verbose level named in a `RUST_LOG` directive list such as
    /// `riser_core=debug,warn`.
    fn from_directives(directives: &str) -> Option<Self> {
        directives
            .split(',')
            .filter_map(|d| d.rsplit('=').next())
            .filter_map(|name| LogLevel::from_str(name.trim(), true).ok())
            .min()
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Resolved logging setup for one invocation.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// File and line on human output; only at `trace`.
    pub source_location: bool,
}

impl LogConfig {
    /// Resolve from the process environment plus CLI flags.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_vars(
            std::env::var(ENV_LOG_LEVEL).ok().as_deref(),
            std::env::var("RUST_LOG").ok().as_deref(),
            std::env::var(ENV_LOG_FORMAT).ok().as_deref(),
            cli_level,
            cli_format,
        )
    }

    /// Same as [`LogConfig::from_env`] with the variables passed in.
    ///
    /// Unparseable variables are ignored.
    pub fn from_vars(
        riser_log: Option<&str>,
        rust_log: Option<&str>,
        log_format: Option<&str>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let env_level = riser_log
            .and_then(|v| LogLevel::from_str(v.trim(), true).ok())
            .or_else(|| rust_log.and_then(LogLevel::from_directives));
        let env_format = log_format.and_then(|v| LogFormat::from_str(v.trim(), true).ok());

        let level = cli_level.or(env_level).unwrap_or_default();
        LogConfig {
            format: cli_format.or(env_format).unwrap_or_default(),
            level,
            source_location: level == LogLevel::Trace,
        }
    }

    /// Apply `-v` / `-q` counts on top of the resolved level.
    pub fn adjust_verbosity(mut self, verbose: u8, quiet: u8) -> Self {
        self.level = self.level.shift(i32::from(verbose) - i32::from(quiet));
        self.source_location = self.level == LogLevel::Trace;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_human_info() {
        let config = LogConfig::from_vars(None, None, None, None, None);
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Info);
        assert!(!config.source_location);
    }

    #[test]
    fn riser_log_beats_rust_log() {
        let config = LogConfig::from_vars(Some("warn"), Some("debug"), None, None, None);
        assert_eq!(config.level, LogLevel::Warn);
    }

    #[test]
    fn rust_log_directives_pick_the_most_verbose() {
        let config =
            LogConfig::from_vars(None, Some("riser_core=debug,error"), Some("json"), None, None);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Jsonl);

        let config = LogConfig::from_vars(None, Some("hyper=nonsense"), None, None, None);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let config = LogConfig::from_vars(Some("loud"), None, Some("xml"), None, None);
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn cli_flags_beat_env() {
        let config = LogConfig::from_vars(
            Some("trace"),
            None,
            Some("jsonl"),
            Some(LogLevel::Error),
            Some(LogFormat::Human),
        );
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn verbosity_shifts_and_saturates() {
        let base = LogConfig::default();
        assert_eq!(base.clone().adjust_verbosity(1, 0).level, LogLevel::Debug);
        assert_eq!(base.clone().adjust_verbosity(0, 2).level, LogLevel::Error);
        assert_eq!(base.clone().adjust_verbosity(2, 1).level, LogLevel::Debug);

        let loud = base.clone().adjust_verbosity(9, 0);
        assert_eq!(loud.level, LogLevel::Trace);
        assert!(loud.source_location);
        assert_eq!(base.adjust_verbosity(0, 9).level, LogLevel::Off);
    }

    #[test]
    fn level_maps_onto_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::OFF);
    }
}
