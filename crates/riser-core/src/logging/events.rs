//! Structured event vocabulary.
//!
//! Every event carries the run id and the pipeline stage it belongs to, so a
//! JSONL log of one run can be filtered and correlated without parsing
//! messages.

use serde::{Deserialize, Serialize};

/// Processing stages in the riser pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and settings resolution.
    Init,
    /// Reading PDF files and marker lists.
    Load,
    /// Constrained resampling.
    Resample,
    /// Density estimation from rate pools.
    Estimate,
    /// Probable-range analysis.
    Analyze,
    /// Writing reports and PDF files.
    Output,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Resample => "resample",
            Stage::Estimate => "estimate",
            Stage::Analyze => "analyze",
            Stage::Output => "output",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Load stage
    pub const PDF_LOADED: &str = "load.pdf";
    pub const MARKERS_LOADED: &str = "load.markers";

    // Resample stage
    pub const RESAMPLE_STARTED: &str = "resample.started";
    pub const RESAMPLE_WORKER_DONE: &str = "resample.worker_done";
    pub const RESAMPLE_FINISHED: &str = "resample.finished";
    pub const RESAMPLE_LOW_ACCEPTANCE: &str = "resample.low_acceptance";
    pub const RESAMPLE_NOT_CONVERGED: &str = "resample.not_converged";

    // Estimate / analyze stages
    pub const DENSITY_ESTIMATED: &str = "estimate.density";
    pub const RANGES_COMPUTED: &str = "analyze.ranges";

    // Output stage
    pub const OUTPUT_WRITTEN: &str = "output.written";

    // Error events
    pub const COMMAND_FAILED: &str = "command.failed";
}

/// Context for emitting events with a consistent run id.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Subcommand being executed, once known.
    pub command: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            command: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}
