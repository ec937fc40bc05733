//! Resample-then-analyze pipeline shared by the CLI and tests.

use riser_config::Settings;
use riser_math::RangeMethod;
use thiserror::Error;

use crate::analysis::{analyze_pools, AnalysisError, IntervalReport};
use crate::resample::{resample, MarkerChain, ResampleError, ResampleStats};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resample(#[from] ResampleError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub stats: ResampleStats,
    pub intervals: Vec<IntervalReport>,
}

/// Fill every interval's pool, then estimate its density and ranges.
///
/// Nothing is returned unless every pool reached the target count.
pub fn run_pipeline(
    chain: &MarkerChain,
    settings: &Settings,
    methods: &[RangeMethod],
) -> Result<PipelineOutcome, PipelineError> {
    let outcome = resample(chain, &settings.resample)?;
    let intervals = analyze_pools(
        &chain.interval_labels(),
        &outcome.pools,
        &settings.density,
        &settings.analysis,
        methods,
    )?;
    Ok(PipelineOutcome {
        stats: outcome.stats,
        intervals,
    })
}
