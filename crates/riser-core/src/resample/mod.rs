//! Constrained resampling of incremental slip rates.
//!
//! Each iteration draws an age and a displacement for every marker,
//! computes the rate of every interval between adjacent markers, and keeps
//! the whole draw only if all rates are physically admissible: ages
//! strictly increase down the chain and no rate is negative (or above an
//! optional ceiling). Accepted rates accumulate in one pool per interval
//! until each pool holds the target count.

pub mod engine;
pub mod marker;
pub mod pool;
pub mod verdict;

pub use engine::{resample, resample_with_source, ResampleOutcome, ResampleStats};
pub use marker::{Marker, MarkerChain};
pub use pool::RatePools;
pub use verdict::{judge, RateScratch, Rejection, Verdict};

use thiserror::Error;

/// The iteration cap ran out before every pool reached the target.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "resampling did not converge: {achieved} of {target} samples accepted after {iterations} \
     iterations (acceptance rate {acceptance_rate:.4})"
)]
pub struct ConvergenceError {
    pub target: usize,
    pub achieved: usize,
    pub iterations: u64,
    pub acceptance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResampleError {
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    #[error("at least 2 markers are needed to form an interval (got {count})")]
    TooFewMarkers { count: usize },

    #[error("age and displacement lists differ in length ({ages} vs {displacements})")]
    MismatchedLists { ages: usize, displacements: usize },

    #[error("invalid resample settings: {0}")]
    InvalidSettings(String),

    #[error("resampling worker {index} panicked")]
    WorkerFailed { index: usize },
}
