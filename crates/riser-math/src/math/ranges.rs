//! Probable-range summaries of a PDF.
//!
//! - **IQR** (inter-quantile range): the symmetric quantile interval
//!   `[F⁻¹((1−p)/2), F⁻¹((1+p)/2)]`. Stable, but a long low-density tail
//!   drags it outward.
//! - **HPD** (highest posterior density): the narrowest set of intervals
//!   holding mass `p`. Found by bisection over the density threshold `t`;
//!   the mass of `{x : f(x) ≥ t}` is integrated exactly for the
//!   piecewise-linear density, so uneven support spacing is handled without
//!   resampling. Multimodal densities yield several disjoint intervals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pdf::PdfTable;

/// Bisection steps used when no resolution is given.
pub const DEFAULT_HPD_RESOLUTION: u32 = 60;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("probability mass must be in [0, 1] (got {mass})")]
    InvalidMass { mass: f64 },

    #[error("HPD resolution must be at least 1")]
    InvalidResolution,
}

/// Which summary to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMethod {
    Iqr,
    #[default]
    Hpd,
}

impl FromStr for RangeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iqr" | "quantile" => Ok(RangeMethod::Iqr),
            "hpd" => Ok(RangeMethod::Hpd),
            _ => Err(format!("unknown range method: {}", s)),
        }
    }
}

impl fmt::Display for RangeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeMethod::Iqr => write!(f, "iqr"),
            RangeMethod::Hpd => write!(f, "hpd"),
        }
    }
}

/// Symmetric quantile interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileRange {
    pub mass: f64,
    pub low: f64,
    pub high: f64,
}

impl QuantileRange {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// One connected piece of an HPD region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HpdInterval {
    pub low: f64,
    pub high: f64,
    /// Probability mass inside this interval.
    pub mass: f64,
}

/// Highest-posterior-density region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HpdRanges {
    pub requested_mass: f64,
    /// Mass actually enclosed; never below `requested_mass`.
    pub mass: f64,
    /// Density threshold defining the region.
    pub threshold: f64,
    /// Disjoint intervals in increasing order of `low`.
    pub intervals: Vec<HpdInterval>,
}

impl HpdRanges {
    pub fn lowest(&self) -> Option<f64> {
        self.intervals.first().map(|i| i.low)
    }

    pub fn highest(&self) -> Option<f64> {
        self.intervals.last().map(|i| i.high)
    }

    pub fn is_multimodal(&self) -> bool {
        self.intervals.len() > 1
    }
}

/// Either kind of probable-range summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum RangeSummary {
    Iqr(QuantileRange),
    Hpd(HpdRanges),
}

fn check_mass(mass: f64) -> Result<(), RangeError> {
    if (0.0..=1.0).contains(&mass) {
        Ok(())
    } else {
        Err(RangeError::InvalidMass { mass })
    }
}

/// Inter-quantile range holding `mass` of the distribution.
pub fn iqr(pdf: &PdfTable, mass: f64) -> Result<QuantileRange, RangeError> {
    check_mass(mass)?;
    Ok(QuantileRange {
        mass,
        low: pdf.invert(0.5 - mass / 2.0),
        high: pdf.invert(0.5 + mass / 2.0),
    })
}

/// Highest-posterior-density intervals holding at least `mass`.
///
/// `resolution` is the number of bisection steps on the threshold; more
/// steps bring the enclosed mass closer to `mass` from above. The bound is
/// only tight where the density has no plateaus: a flat top is taken whole,
/// so a uniform PDF reports mass 1.0 for any request.
pub fn hpd(pdf: &PdfTable, mass: f64, resolution: u32) -> Result<HpdRanges, RangeError> {
    check_mass(mass)?;
    if resolution == 0 {
        return Err(RangeError::InvalidResolution);
    }

    let xs = pdf.support();
    let fs = pdf.density();
    let total = region_mass(xs, fs, 0.0);
    let peak = fs.iter().copied().fold(0.0, f64::max);

    // Invariant: region_mass(lo) / total >= mass. Holds at t = 0 (ratio 1).
    let mut lo = 0.0;
    let mut hi = peak;
    for _ in 0..resolution {
        let mid = 0.5 * (lo + hi);
        if region_mass(xs, fs, mid) / total >= mass {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let enclosed = region_mass(xs, fs, lo) / total;
    let intervals = level_set(xs, fs, lo)
        .into_iter()
        .map(|(low, high, m)| HpdInterval {
            low,
            high,
            mass: m / total,
        })
        .collect();

    Ok(HpdRanges {
        requested_mass: mass,
        mass: enclosed,
        threshold: lo,
        intervals,
    })
}

/// Compute the summary selected by `method`.
pub fn summarize(
    pdf: &PdfTable,
    method: RangeMethod,
    mass: f64,
    resolution: u32,
) -> Result<RangeSummary, RangeError> {
    match method {
        RangeMethod::Iqr => iqr(pdf, mass).map(RangeSummary::Iqr),
        RangeMethod::Hpd => hpd(pdf, mass, resolution).map(RangeSummary::Hpd),
    }
}

/// Part of segment `[x0, x1]` where the linear density is at least `t`,
/// with the mass it holds.
fn segment_piece(x0: f64, x1: f64, f0: f64, f1: f64, t: f64) -> Option<(f64, f64, f64)> {
    let (a, fa, b, fb) = match (f0 >= t, f1 >= t) {
        (true, true) => (x0, f0, x1, f1),
        (false, false) => return None,
        (true, false) => {
            let c = (x0 + (f0 - t) / (f0 - f1) * (x1 - x0)).clamp(x0, x1);
            (x0, f0, c, t)
        }
        (false, true) => {
            let c = (x0 + (t - f0) / (f1 - f0) * (x1 - x0)).clamp(x0, x1);
            (c, t, x1, f1)
        }
    };
    Some((a, b, 0.5 * (b - a) * (fa + fb)))
}

fn region_mass(xs: &[f64], fs: &[f64], t: f64) -> f64 {
    xs.windows(2)
        .zip(fs.windows(2))
        .filter_map(|(x, f)| segment_piece(x[0], x[1], f[0], f[1], t))
        .map(|(_, _, m)| m)
        .sum()
}

/// Connected components of `{x : f(x) ≥ t}` as `(low, high, mass)`.
fn level_set(xs: &[f64], fs: &[f64], t: f64) -> Vec<(f64, f64, f64)> {
    let mut out: Vec<(f64, f64, f64)> = Vec::new();
    let mut open: Option<(f64, f64, f64)> = None;

    for (x, f) in xs.windows(2).zip(fs.windows(2)) {
        match segment_piece(x[0], x[1], f[0], f[1], t) {
            Some((a, b, m)) => {
                open = match open {
                    Some((low, high, acc)) if high == a => Some((low, b, acc + m)),
                    Some(done) => {
                        out.push(done);
                        Some((a, b, m))
                    }
                    None => Some((a, b, m)),
                };
            }
            None => {
                if let Some(done) = open.take() {
                    out.push(done);
                }
            }
        }
    }
    if let Some(done) = open {
        out.push(done);
    }

    out.retain(|(low, high, _)| high > low);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn uniform() -> PdfTable {
        PdfTable::new(vec![0.0, 10.0], vec![1.0, 1.0]).unwrap()
    }

    fn bimodal() -> PdfTable {
        // Two equal triangles on [0, 2] and [4, 6], zero between.
        PdfTable::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn iqr_of_uniform() {
        let r = iqr(&uniform(), 0.9).unwrap();
        assert!(approx_eq(r.low, 0.5, 1e-12));
        assert!(approx_eq(r.high, 9.5, 1e-12));
        assert!(approx_eq(r.width(), 9.0, 1e-12));
    }

    #[test]
    fn iqr_full_mass_spans_support() {
        let r = iqr(&bimodal(), 1.0).unwrap();
        assert_eq!(r.low, 0.0);
        assert_eq!(r.high, 6.0);
    }

    #[test]
    fn rejects_bad_mass_and_resolution() {
        assert_eq!(
            iqr(&uniform(), 1.5).unwrap_err(),
            RangeError::InvalidMass { mass: 1.5 }
        );
        assert!(hpd(&uniform(), -0.1, 10).is_err());
        assert!(hpd(&uniform(), f64::NAN, 10).is_err());
        assert_eq!(
            hpd(&uniform(), 0.5, 0).unwrap_err(),
            RangeError::InvalidResolution
        );
    }

    #[test]
    fn hpd_of_flat_top_takes_the_whole_plateau() {
        let r = hpd(&uniform(), 0.5, DEFAULT_HPD_RESOLUTION).unwrap();
        assert!(approx_eq(r.mass, 1.0, 1e-9));
        assert_eq!(r.intervals.len(), 1);
        assert!(approx_eq(r.intervals[0].low, 0.0, 1e-9));
        assert!(approx_eq(r.intervals[0].high, 10.0, 1e-9));
    }

    #[test]
    fn hpd_of_triangle_is_centered() {
        let pdf = PdfTable::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap();
        let r = hpd(&pdf, 0.75, DEFAULT_HPD_RESOLUTION).unwrap();
        assert_eq!(r.intervals.len(), 1);
        // Region |x - 1| <= h with mass 1 - (1 - h)^2 = 0.75 -> h = 0.5.
        assert!(approx_eq(r.intervals[0].low, 0.5, 1e-6));
        assert!(approx_eq(r.intervals[0].high, 1.5, 1e-6));
        assert!(r.mass >= 0.75);
        assert!(approx_eq(r.mass, 0.75, 1e-6));
    }

    #[test]
    fn hpd_splits_bimodal_density() {
        let r = hpd(&bimodal(), 0.8, DEFAULT_HPD_RESOLUTION).unwrap();
        assert_eq!(r.intervals.len(), 2);
        assert!(r.is_multimodal());
        assert!(r.intervals[0].high < r.intervals[1].low);
        assert!(approx_eq(r.intervals[0].mass, 0.4, 1e-6));
        assert!(approx_eq(r.intervals[1].mass, 0.4, 1e-6));
        let sum: f64 = r.intervals.iter().map(|i| i.mass).sum();
        assert!(approx_eq(sum, r.mass, 1e-9));
        assert!(r.mass >= 0.8);
    }

    #[test]
    fn hpd_full_mass_covers_everything() {
        let r = hpd(&bimodal(), 1.0, DEFAULT_HPD_RESOLUTION).unwrap();
        assert_eq!(r.lowest(), Some(0.0));
        assert_eq!(r.highest(), Some(6.0));
        assert_eq!(r.mass, 1.0);
    }

    #[test]
    fn hpd_is_narrower_than_iqr_for_skewed_density() {
        // Right-skewed: peak near 1, long tail to 10.
        let pdf = PdfTable::new(
            vec![0.0, 1.0, 10.0],
            vec![0.0, 1.0, 0.0],
        )
        .unwrap();
        let q = iqr(&pdf, 0.9).unwrap();
        let h = hpd(&pdf, 0.9, DEFAULT_HPD_RESOLUTION).unwrap();
        let hpd_width: f64 = h.intervals.iter().map(|i| i.high - i.low).sum();
        assert!(hpd_width <= q.width() + 1e-9);
    }

    #[test]
    fn summarize_dispatches() {
        let pdf = uniform();
        assert!(matches!(
            summarize(&pdf, RangeMethod::Iqr, 0.5, 10).unwrap(),
            RangeSummary::Iqr(_)
        ));
        assert!(matches!(
            summarize(&pdf, RangeMethod::Hpd, 0.5, 10).unwrap(),
            RangeSummary::Hpd(_)
        ));
        assert_eq!("quantile".parse::<RangeMethod>().unwrap(), RangeMethod::Iqr);
    }

    #[test]
    fn summary_serializes_with_method_tag() {
        let summary = summarize(&uniform(), RangeMethod::Iqr, 0.5, 10).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["method"], "iqr");
        assert!(json["low"].is_number());
    }
}
