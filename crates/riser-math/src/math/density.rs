//! Sample pool → continuous PDF conversion.
//!
//! Two estimators are provided:
//! - **KDE**: Gaussian kernel density with a rule-of-thumb bandwidth. Smooth,
//!   but smears mass past hard edges of bounded or skewed distributions.
//! - **Histogram**: binned counts with an edge taper and optional smoothing.
//!   Follows the data closely, but rejection sampling leaves uneven sampling
//!   density that shows up as spikes unless smoothed.
//!
//! Both return a [`PdfTable`], so the result always integrates to 1.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::numeric::{linspace, quantile_sorted, sample_std};
use super::pdf::{DomainError, PdfTable};

const SQRT_2PI: f64 = 2.506_628_274_631_000_5;
/// Kernel contributions beyond this many bandwidths are ignored.
const KDE_CUTOFF: f64 = 8.0;
/// Grid half-width, in bandwidths, when all samples coincide.
const DEGENERATE_SPAN: f64 = 3.0;
/// Upper bound on histogram bins, chosen or configured.
const MAX_BINS: usize = 10_000;

/// Errors raised while estimating a density.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DensityError {
    #[error("cannot estimate a density from an empty sample pool")]
    Empty,

    #[error("non-finite sample at index {index}")]
    NonFinite { index: usize },

    #[error("invalid density option {option}: {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Estimator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityMode {
    #[default]
    Kde,
    #[serde(alias = "hist")]
    Histogram,
}

impl FromStr for DensityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kde" => Ok(DensityMode::Kde),
            "hist" | "histogram" => Ok(DensityMode::Histogram),
            _ => Err(format!("unknown density mode: {}", s)),
        }
    }
}

impl fmt::Display for DensityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityMode::Kde => write!(f, "kde"),
            DensityMode::Histogram => write!(f, "histogram"),
        }
    }
}

/// Histogram bin count: a fixed number, or Freedman–Diaconis with a Sturges
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CountOrKeyword", into = "CountOrKeyword")]
pub enum BinCount {
    #[default]
    Auto,
    Fixed(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CountOrKeyword {
    Count(usize),
    Keyword(String),
}

impl TryFrom<CountOrKeyword> for BinCount {
    type Error = String;

    fn try_from(value: CountOrKeyword) -> Result<Self, Self::Error> {
        match value {
            CountOrKeyword::Count(n) => Ok(BinCount::Fixed(n)),
            CountOrKeyword::Keyword(k) => k.parse(),
        }
    }
}

impl From<BinCount> for CountOrKeyword {
    fn from(value: BinCount) -> Self {
        match value {
            BinCount::Auto => CountOrKeyword::Keyword("auto".to_string()),
            BinCount::Fixed(n) => CountOrKeyword::Count(n),
        }
    }
}

impl FromStr for BinCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(BinCount::Auto);
        }
        s.parse::<usize>()
            .map(BinCount::Fixed)
            .map_err(|_| format!("bin count must be 'auto' or a positive integer: {}", s))
    }
}

impl fmt::Display for BinCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinCount::Auto => write!(f, "auto"),
            BinCount::Fixed(n) => write!(f, "{}", n),
        }
    }
}

/// Post-estimation smoothing pass over the density values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
    #[default]
    None,
    /// Moving mean over a window of this many points.
    Mean(usize),
    /// Gaussian window of this many points spanning ±2σ.
    Gaussian(usize),
}

impl FromStr for Smoothing {
    type Err = String;

    /// Accepts `none`, `mean:<w>` or `gaussian:<w>` (`gauss:<w>`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if lower == "none" {
            return Ok(Smoothing::None);
        }
        let (kind, width) = lower
            .split_once(':')
            .ok_or_else(|| format!("smoothing must be 'none', 'mean:<w>' or 'gaussian:<w>': {}", s))?;
        let width: usize = width
            .trim()
            .parse()
            .map_err(|_| format!("invalid smoothing window: {}", width))?;
        match kind.trim() {
            "mean" => Ok(Smoothing::Mean(width)),
            "gauss" | "gaussian" => Ok(Smoothing::Gaussian(width)),
            other => Err(format!("unknown smoothing kernel: {}", other)),
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smoothing::None => write!(f, "none"),
            Smoothing::Mean(w) => write!(f, "mean:{}", w),
            Smoothing::Gaussian(w) => write!(f, "gaussian:{}", w),
        }
    }
}

/// KDE bandwidth selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ValueOrKeyword", into = "ValueOrKeyword")]
pub enum Bandwidth {
    /// Scott's rule, `σ·n^(-1/5)`.
    #[default]
    Auto,
    /// Silverman's rule, `0.9·min(σ, IQR/1.34)·n^(-1/5)`.
    Silverman,
    Explicit(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ValueOrKeyword {
    Value(f64),
    Keyword(String),
}

impl TryFrom<ValueOrKeyword> for Bandwidth {
    type Error = String;

    fn try_from(value: ValueOrKeyword) -> Result<Self, Self::Error> {
        match value {
            ValueOrKeyword::Value(h) => Ok(Bandwidth::Explicit(h)),
            ValueOrKeyword::Keyword(k) => k.parse(),
        }
    }
}

impl From<Bandwidth> for ValueOrKeyword {
    fn from(value: Bandwidth) -> Self {
        match value {
            Bandwidth::Auto => ValueOrKeyword::Keyword("auto".to_string()),
            Bandwidth::Silverman => ValueOrKeyword::Keyword("silverman".to_string()),
            Bandwidth::Explicit(h) => ValueOrKeyword::Value(h),
        }
    }
}

impl FromStr for Bandwidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "scott" => Ok(Bandwidth::Auto),
            "silverman" => Ok(Bandwidth::Silverman),
            other => other
                .parse::<f64>()
                .map(Bandwidth::Explicit)
                .map_err(|_| format!("bandwidth must be 'auto', 'silverman' or a number: {}", s)),
        }
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bandwidth::Auto => write!(f, "auto"),
            Bandwidth::Silverman => write!(f, "silverman"),
            Bandwidth::Explicit(h) => write!(f, "{}", h),
        }
    }
}

/// Options for [`estimate_density`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityOptions {
    pub mode: DensityMode,
    pub bin_count: BinCount,
    pub smoothing: Smoothing,
    pub bandwidth: Bandwidth,
    /// Number of KDE evaluation points.
    pub grid_points: usize,
    /// Extra span on each side, as a fraction of the sample range.
    pub padding: f64,
}

impl Default for DensityOptions {
    fn default() -> Self {
        Self {
            mode: DensityMode::Kde,
            bin_count: BinCount::Auto,
            smoothing: Smoothing::None,
            bandwidth: Bandwidth::Auto,
            grid_points: 500,
            padding: 0.0,
        }
    }
}

impl DensityOptions {
    pub fn kde() -> Self {
        Self::default()
    }

    pub fn histogram() -> Self {
        Self {
            mode: DensityMode::Histogram,
            ..Self::default()
        }
    }

    pub fn with_bins(mut self, bins: BinCount) -> Self {
        self.bin_count = bins;
        self
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_grid_points(mut self, points: usize) -> Self {
        self.grid_points = points;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Check option values independently of any sample pool.
    pub fn validate(&self) -> Result<(), DensityError> {
        match self.bin_count {
            BinCount::Fixed(0) => return Err(invalid("bin_count", "must be at least 1")),
            BinCount::Fixed(n) if n > MAX_BINS => {
                return Err(invalid(
                    "bin_count",
                    &format!("must be at most {} (got {})", MAX_BINS, n),
                ));
            }
            _ => {}
        }
        match self.smoothing {
            Smoothing::Mean(0) | Smoothing::Gaussian(0) => {
                return Err(invalid("smoothing", "window must be at least 1"));
            }
            _ => {}
        }
        if let Bandwidth::Explicit(h) = self.bandwidth {
            if !(h.is_finite() && h > 0.0) {
                return Err(invalid("bandwidth", &format!("must be positive (got {})", h)));
            }
        }
        if self.grid_points < 2 {
            return Err(invalid("grid_points", "must be at least 2"));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(invalid(
                "padding",
                &format!("must be non-negative (got {})", self.padding),
            ));
        }
        Ok(())
    }
}

fn invalid(option: &'static str, message: &str) -> DensityError {
    DensityError::InvalidOption {
        option,
        message: message.to_string(),
    }
}

/// Convert a pool of samples into a normalized PDF.
///
/// Sample order does not affect the result.
pub fn estimate_density(samples: &[f64], options: &DensityOptions) -> Result<PdfTable, DensityError> {
    options.validate()?;
    if samples.is_empty() {
        return Err(DensityError::Empty);
    }
    if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
        return Err(DensityError::NonFinite { index });
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    match options.mode {
        DensityMode::Kde => kde(&sorted, options),
        DensityMode::Histogram => histogram(&sorted, options),
    }
}

/// Bandwidth `rule` would select for an ascending-sorted, non-empty sample.
pub fn select_bandwidth(sorted: &[f64], rule: Bandwidth) -> f64 {
    let n = sorted.len() as f64;
    let sigma = sample_std(sorted);
    let h = match rule {
        Bandwidth::Explicit(h) => return h,
        Bandwidth::Auto => sigma * n.powf(-0.2),
        Bandwidth::Silverman => {
            let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
            let spread = if iqr > 0.0 { sigma.min(iqr / 1.34) } else { sigma };
            0.9 * spread * n.powf(-0.2)
        }
    };
    if h.is_finite() && h > 0.0 {
        h
    } else {
        degenerate_width(quantile_sorted(sorted, 0.5))
    }
}

fn degenerate_width(center: f64) -> f64 {
    (center.abs() * 1e-3).max(1e-9)
}

fn kde(sorted: &[f64], options: &DensityOptions) -> Result<PdfTable, DensityError> {
    let h = select_bandwidth(sorted, options.bandwidth);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let range = max - min;
    let (lo, hi) = if range > 0.0 {
        let pad = options.padding * range;
        (min - pad, max + pad)
    } else {
        (min - DEGENERATE_SPAN * h, max + DEGENERATE_SPAN * h)
    };

    let grid = linspace(lo, hi, options.grid_points);
    let norm = 1.0 / (sorted.len() as f64 * h * SQRT_2PI);
    let reach = KDE_CUTOFF * h;
    let mut density: Vec<f64> = grid
        .iter()
        .map(|&x| {
            let start = sorted.partition_point(|&s| s < x - reach);
            let end = sorted.partition_point(|&s| s <= x + reach);
            let sum: f64 = sorted[start..end]
                .iter()
                .map(|&s| {
                    let z = (x - s) / h;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * norm
        })
        .collect();

    smooth(&mut density, options.smoothing);
    Ok(PdfTable::new(grid, density)?)
}

fn histogram(sorted: &[f64], options: &DensityOptions) -> Result<PdfTable, DensityError> {
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let range = max - min;

    let (lo, hi, bins) = if range > 0.0 {
        let pad = options.padding * range;
        let (lo, hi) = (min - pad, max + pad);
        let bins = match options.bin_count {
            BinCount::Fixed(n) => n,
            BinCount::Auto => auto_bin_count(sorted, hi - lo),
        };
        (lo, hi, bins)
    } else {
        let half = 0.5 * degenerate_width(min);
        (min - half, max + half, 1)
    };

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0.0; bins];
    for &s in sorted {
        let index = (((s - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1.0;
    }

    // Taper: one zero-density point at each outer bin edge.
    let mut support = Vec::with_capacity(bins + 2);
    let mut density = Vec::with_capacity(bins + 2);
    support.push(lo);
    density.push(0.0);
    for (i, count) in counts.into_iter().enumerate() {
        support.push(lo + (i as f64 + 0.5) * width);
        density.push(count);
    }
    support.push(hi);
    density.push(0.0);

    smooth(&mut density, options.smoothing);
    Ok(PdfTable::new(support, density)?)
}

fn auto_bin_count(sorted: &[f64], span: f64) -> usize {
    let n = sorted.len() as f64;
    let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
    if iqr > 0.0 {
        let width = 2.0 * iqr * n.powf(-1.0 / 3.0);
        ((span / width).ceil() as usize).clamp(1, MAX_BINS)
    } else {
        n.log2().ceil() as usize + 1
    }
}

/// Moving-window kernel for a smoothing option. Empty for `None`.
pub fn smoothing_kernel(smoothing: Smoothing) -> Vec<f64> {
    match smoothing {
        Smoothing::None => Vec::new(),
        Smoothing::Mean(w) => vec![1.0 / w as f64; w],
        Smoothing::Gaussian(w) => gaussian_kernel(w),
    }
}

/// Gaussian window of `width` points spanning ±2σ, normalized to sum 1.
pub fn gaussian_kernel(width: usize) -> Vec<f64> {
    if width <= 1 {
        return vec![1.0; width];
    }
    let raw: Vec<f64> = linspace(-2.0, 2.0, width)
        .into_iter()
        .map(|z| (-0.5 * z * z).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|k| k / total).collect()
}

/// Same-length discrete convolution, kernel centered on each point.
pub fn convolve_same(values: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = values.len();
    let offset = kernel.len().saturating_sub(1) / 2;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .filter_map(|(j, k)| {
                    let source = (i + offset).checked_sub(j)?;
                    values.get(source).map(|v| v * k)
                })
                .sum::<f64>()
        })
        .collect()
}

fn smooth(values: &mut Vec<f64>, smoothing: Smoothing) {
    let kernel = smoothing_kernel(smoothing);
    if kernel.is_empty() {
        return;
    }
    *values = convolve_same(values, &kernel);
    if let Some(first) = values.first_mut() {
        *first = 0.0;
    }
    if let Some(last) = values.last_mut() {
        *last = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::numeric::trapezoid;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn spread_samples() -> Vec<f64> {
        // Deterministic, roughly bell-shaped sample around 2.0.
        (0..400)
            .map(|i| {
                let u = (i as f64 + 0.5) / 400.0;
                2.0 + (u - 0.5) * 2.0 * (1.0 - (u - 0.5).abs())
            })
            .collect()
    }

    #[test]
    fn kde_integrates_to_one() {
        let pdf = estimate_density(&spread_samples(), &DensityOptions::kde()).unwrap();
        assert!(approx_eq(trapezoid(pdf.support(), pdf.density()), 1.0, 1e-9));
        assert_eq!(pdf.points(), 500);
    }

    #[test]
    fn histogram_integrates_to_one_with_taper() {
        let options = DensityOptions::histogram().with_bins(BinCount::Fixed(20));
        let pdf = estimate_density(&spread_samples(), &options).unwrap();
        assert!(approx_eq(trapezoid(pdf.support(), pdf.density()), 1.0, 1e-9));
        assert_eq!(pdf.points(), 22);
        assert_eq!(pdf.density()[0], 0.0);
        assert_eq!(*pdf.density().last().unwrap(), 0.0);
    }

    #[test]
    fn smoothed_histogram_integrates_to_one() {
        for smoothing in [Smoothing::Mean(3), Smoothing::Gaussian(5)] {
            let options = DensityOptions::histogram()
                .with_bins(BinCount::Fixed(30))
                .with_smoothing(smoothing);
            let pdf = estimate_density(&spread_samples(), &options).unwrap();
            assert!(approx_eq(trapezoid(pdf.support(), pdf.density()), 1.0, 1e-9));
        }
    }

    #[test]
    fn auto_bins_are_positive() {
        let options = DensityOptions::histogram();
        let pdf = estimate_density(&spread_samples(), &options).unwrap();
        assert!(pdf.points() >= 3);
    }

    #[test]
    fn identical_samples_still_produce_a_pdf() {
        let samples = vec![1.5; 50];
        for options in [DensityOptions::kde(), DensityOptions::histogram()] {
            let pdf = estimate_density(&samples, &options).unwrap();
            assert!(pdf.min() < 1.5 && pdf.max() > 1.5);
            assert!(approx_eq(pdf.median(), 1.5, 1e-6));
        }
    }

    #[test]
    fn kde_grid_spans_samples_plus_padding() {
        let samples = vec![1.0, 2.0, 3.0];
        let options = DensityOptions::kde().with_padding(0.5);
        let pdf = estimate_density(&samples, &options).unwrap();
        assert!(approx_eq(pdf.min(), 0.0, 1e-12));
        assert!(approx_eq(pdf.max(), 4.0, 1e-12));
    }

    #[test]
    fn order_does_not_matter() {
        let mut samples = spread_samples();
        let a = estimate_density(&samples, &DensityOptions::kde()).unwrap();
        samples.reverse();
        let b = estimate_density(&samples, &DensityOptions::kde()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_and_non_finite() {
        assert_eq!(
            estimate_density(&[], &DensityOptions::kde()).unwrap_err(),
            DensityError::Empty
        );
        assert_eq!(
            estimate_density(&[1.0, f64::INFINITY], &DensityOptions::kde()).unwrap_err(),
            DensityError::NonFinite { index: 1 }
        );
    }

    #[test]
    fn rejects_bad_options() {
        let samples = [1.0, 2.0];
        let bad = [
            DensityOptions::histogram().with_bins(BinCount::Fixed(0)),
            DensityOptions::histogram().with_bins(BinCount::Fixed(MAX_BINS + 1)),
            DensityOptions::histogram().with_bins(BinCount::Fixed(1_000_000_000_000)),
            DensityOptions::kde().with_smoothing(Smoothing::Mean(0)),
            DensityOptions::kde().with_bandwidth(Bandwidth::Explicit(-1.0)),
            DensityOptions::kde().with_grid_points(1),
            DensityOptions::kde().with_padding(-0.1),
        ];
        for options in bad {
            assert!(matches!(
                estimate_density(&samples, &options),
                Err(DensityError::InvalidOption { .. })
            ));
        }
    }

    #[test]
    fn largest_fixed_bin_count_is_accepted() {
        let options = DensityOptions::histogram().with_bins(BinCount::Fixed(MAX_BINS));
        assert!(estimate_density(&[0.0, 1.0, 2.0], &options).is_ok());
    }

    #[test]
    fn explicit_bandwidth_is_used_verbatim() {
        assert_eq!(select_bandwidth(&[1.0, 2.0], Bandwidth::Explicit(0.3)), 0.3);
        let scott = select_bandwidth(&[1.0, 2.0, 3.0, 4.0], Bandwidth::Auto);
        let silverman = select_bandwidth(&[1.0, 2.0, 3.0, 4.0], Bandwidth::Silverman);
        assert!(scott > 0.0 && silverman > 0.0);
        assert!(silverman < scott);
    }

    #[test]
    fn convolve_same_preserves_length_and_center() {
        let out = convolve_same(&[0.0, 0.0, 3.0, 0.0, 0.0], &[1.0 / 3.0; 3]);
        assert_eq!(out.len(), 5);
        assert!(approx_eq(out[1], 1.0, 1e-12));
        assert!(approx_eq(out[2], 1.0, 1e-12));
        assert!(approx_eq(out[3], 1.0, 1e-12));
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn gaussian_kernel_is_symmetric_and_normalized() {
        let k = gaussian_kernel(5);
        assert!(approx_eq(k.iter().sum::<f64>(), 1.0, 1e-12));
        assert!(approx_eq(k[0], k[4], 1e-15));
        assert!(k[2] > k[1]);
        assert_eq!(gaussian_kernel(1), vec![1.0]);
    }

    #[test]
    fn option_parsing() {
        assert_eq!("hist".parse::<DensityMode>().unwrap(), DensityMode::Histogram);
        assert_eq!("auto".parse::<BinCount>().unwrap(), BinCount::Auto);
        assert_eq!("40".parse::<BinCount>().unwrap(), BinCount::Fixed(40));
        assert_eq!("mean:3".parse::<Smoothing>().unwrap(), Smoothing::Mean(3));
        assert_eq!("gauss:5".parse::<Smoothing>().unwrap(), Smoothing::Gaussian(5));
        assert_eq!("none".parse::<Smoothing>().unwrap(), Smoothing::None);
        assert!("box:3".parse::<Smoothing>().is_err());
        assert_eq!("0.25".parse::<Bandwidth>().unwrap(), Bandwidth::Explicit(0.25));
        assert_eq!("scott".parse::<Bandwidth>().unwrap(), Bandwidth::Auto);
    }

    #[test]
    fn options_serde_shapes() {
        let options = DensityOptions::histogram()
            .with_bins(BinCount::Fixed(40))
            .with_smoothing(Smoothing::Gaussian(5));
        let json = serde_json::to_value(options).unwrap();
        assert_eq!(json["mode"], "histogram");
        assert_eq!(json["bin_count"], 40);
        assert_eq!(json["smoothing"]["gaussian"], 5);
        assert_eq!(json["bandwidth"], "auto");

        let parsed: DensityOptions =
            serde_json::from_str(r#"{"mode": "kde", "bin_count": "auto", "bandwidth": 0.5, "smoothing": "none"}"#)
                .unwrap();
        assert_eq!(parsed.bandwidth, Bandwidth::Explicit(0.5));
        assert_eq!(parsed.grid_points, 500);
    }
}
