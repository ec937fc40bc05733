//! Per-interval analysis: density estimation and probable ranges.
//!
//! Runs once resampling has filled every pool. Each interval is independent,
//! so intervals are analyzed on their own scoped threads.

use riser_config::AnalysisSettings;
use riser_math::{
    estimate_density, numeric, summarize, DensityError, DensityOptions, PdfTable, RangeError,
    RangeMethod, RangeSummary,
};
use serde::Serialize;
use thiserror::Error;

use crate::logging::{event_names, Stage};
use crate::resample::RatePools;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("density estimation failed for interval {interval}: {source}")]
    Density {
        interval: String,
        #[source]
        source: DensityError,
    },

    #[error("range analysis failed for interval {interval}: {source}")]
    Range {
        interval: String,
        #[source]
        source: RangeError,
    },

    #[error("analysis of interval {interval} panicked")]
    WorkerFailed { interval: String },

    #[error("{labels} interval labels for {pools} pools")]
    LabelMismatch { labels: usize, pools: usize },
}

/// Point estimates of an output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PdfStats {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub min: f64,
    pub max: f64,
}

impl PdfStats {
    pub fn of(pdf: &PdfTable) -> Self {
        Self {
            mean: pdf.mean(),
            median: pdf.median(),
            mode: pdf.mode(),
            min: pdf.min(),
            max: pdf.max(),
        }
    }
}

/// Summary of the raw accepted rates for one interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl SampleStats {
    pub fn of(samples: &[f64]) -> Self {
        Self {
            count: samples.len(),
            mean: numeric::mean(samples),
            std_dev: numeric::sample_std(samples),
        }
    }
}

/// Everything reported about one interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalReport {
    pub index: usize,
    pub label: String,
    pub samples: SampleStats,
    pub stats: PdfStats,
    pub ranges: Vec<RangeSummary>,
    #[serde(skip)]
    pub pdf: PdfTable,
}

/// Expand a configured method into the list of summaries to compute.
pub fn methods_for(method: RangeMethod, both: bool) -> Vec<RangeMethod> {
    if both {
        vec![RangeMethod::Iqr, RangeMethod::Hpd]
    } else {
        vec![method]
    }
}

/// Compute the requested range summaries for an already-built PDF.
pub fn analyze_pdf(
    pdf: &PdfTable,
    mass: f64,
    methods: &[RangeMethod],
    resolution: u32,
) -> Result<Vec<RangeSummary>, RangeError> {
    methods
        .iter()
        .map(|&method| summarize(pdf, method, mass, resolution))
        .collect()
}

fn analyze_interval(
    index: usize,
    label: &str,
    samples: &[f64],
    density: &DensityOptions,
    analysis: &AnalysisSettings,
    methods: &[RangeMethod],
) -> Result<IntervalReport, AnalysisError> {
    let pdf = estimate_density(samples, density).map_err(|source| AnalysisError::Density {
        interval: label.to_string(),
        source,
    })?;
    tracing::debug!(
        target: event_names::DENSITY_ESTIMATED,
        stage = %Stage::Estimate,
        interval = label,
        points = pdf.points(),
        "density estimated"
    );

    let ranges = analyze_pdf(&pdf, analysis.mass, methods, analysis.hpd_resolution).map_err(
        |source| AnalysisError::Range {
            interval: label.to_string(),
            source,
        },
    )?;
    tracing::debug!(
        target: event_names::RANGES_COMPUTED,
        stage = %Stage::Analyze,
        interval = label,
        summaries = ranges.len(),
        "ranges computed"
    );

    Ok(IntervalReport {
        index,
        label: label.to_string(),
        samples: SampleStats::of(samples),
        stats: PdfStats::of(&pdf),
        ranges,
        pdf,
    })
}

/// Estimate a density and summarize ranges for every pool.
///
/// `labels` names the intervals in pool order. Reports come back in the same
/// order regardless of which thread finishes first.
pub fn analyze_pools(
    labels: &[String],
    pools: &RatePools,
    density: &DensityOptions,
    analysis: &AnalysisSettings,
    methods: &[RangeMethod],
) -> Result<Vec<IntervalReport>, AnalysisError> {
    if labels.len() != pools.interval_count() {
        return Err(AnalysisError::LabelMismatch {
            labels: labels.len(),
            pools: pools.interval_count(),
        });
    }

    std::thread::scope(|scope| {
        let handles: Vec<_> = labels
            .iter()
            .zip(pools.iter())
            .enumerate()
            .map(|(index, (label, samples))| {
                let handle = scope.spawn(move || {
                    analyze_interval(index, label, samples, density, analysis, methods)
                });
                (label, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(label, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(AnalysisError::WorkerFailed {
                        interval: label.clone(),
                    })
                })
            })
            .collect()
    })
}
