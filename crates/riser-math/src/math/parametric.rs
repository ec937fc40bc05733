//! Parametric PDF generation.
//!
//! Builds [`PdfTable`]s for a handful of closed-form shapes, typically to
//! describe a marker whose age or offset is only known as "x ± σ" or as a
//! min/preferred/max triple.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::numeric::linspace;
use super::pdf::{DomainError, PdfTable};

/// Number of support points used when none is given.
pub const DEFAULT_POINTS: usize = 100;

/// Gaussian tables span `mean ± GAUSSIAN_SPAN·σ`.
const GAUSSIAN_SPAN: f64 = 4.0;

/// Shape family, parsed from a user-facing name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Gaussian,
    Uniform,
    Triangular,
    Trapezoidal,
}

impl DistributionKind {
    pub fn name(self) -> &'static str {
        match self {
            DistributionKind::Gaussian => "gaussian",
            DistributionKind::Uniform => "uniform",
            DistributionKind::Triangular => "triangular",
            DistributionKind::Trapezoidal => "trapezoidal",
        }
    }

    /// Number of values needed to describe the shape.
    pub fn arity(self) -> usize {
        match self {
            DistributionKind::Gaussian | DistributionKind::Uniform => 2,
            DistributionKind::Triangular => 3,
            DistributionKind::Trapezoidal => 4,
        }
    }
}

impl FromStr for DistributionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gauss" | "gaussian" | "normal" => Ok(DistributionKind::Gaussian),
            "uniform" | "boxcar" => Ok(DistributionKind::Uniform),
            "tri" | "triangle" | "triangular" => Ok(DistributionKind::Triangular),
            "trap" | "trapezoid" | "trapezoidal" => Ok(DistributionKind::Trapezoidal),
            _ => Err(format!(
                "unknown distribution: {} (expected gaussian, uniform, triangular or trapezoidal)",
                s
            )),
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully parameterized distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Distribution {
    Gaussian { mean: f64, std_dev: f64 },
    Uniform { min: f64, max: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
    Trapezoidal { min: f64, low: f64, high: f64, max: f64 },
}

impl Distribution {
    /// Build from a positional value list.
    ///
    /// Gaussian takes `mean std_dev`. The other shapes take their corner
    /// values in any order; they are sorted ascending first.
    pub fn from_values(kind: DistributionKind, values: &[f64]) -> Result<Self, DomainError> {
        if values.len() != kind.arity() {
            return Err(invalid(
                kind,
                format!("expected {} values, got {}", kind.arity(), values.len()),
            ));
        }
        let mut v = values.to_vec();
        if kind != DistributionKind::Gaussian {
            v.sort_by(f64::total_cmp);
        }
        let dist = match kind {
            DistributionKind::Gaussian => Distribution::Gaussian {
                mean: v[0],
                std_dev: v[1],
            },
            DistributionKind::Uniform => Distribution::Uniform { min: v[0], max: v[1] },
            DistributionKind::Triangular => Distribution::Triangular {
                min: v[0],
                mode: v[1],
                max: v[2],
            },
            DistributionKind::Trapezoidal => Distribution::Trapezoidal {
                min: v[0],
                low: v[1],
                high: v[2],
                max: v[3],
            },
        };
        dist.validate()?;
        Ok(dist)
    }

    pub fn kind(&self) -> DistributionKind {
        match self {
            Distribution::Gaussian { .. } => DistributionKind::Gaussian,
            Distribution::Uniform { .. } => DistributionKind::Uniform,
            Distribution::Triangular { .. } => DistributionKind::Triangular,
            Distribution::Trapezoidal { .. } => DistributionKind::Trapezoidal,
        }
    }

    fn corners(&self) -> Vec<f64> {
        match *self {
            Distribution::Gaussian { mean, std_dev } => vec![mean, std_dev],
            Distribution::Uniform { min, max } => vec![min, max],
            Distribution::Triangular { min, mode, max } => vec![min, mode, max],
            Distribution::Trapezoidal {
                min,
                low,
                high,
                max,
            } => vec![min, low, high, max],
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let kind = self.kind();
        let values = self.corners();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid(kind, "parameters must be finite".to_string()));
        }
        if let Distribution::Gaussian { std_dev, .. } = *self {
            if std_dev <= 0.0 {
                return Err(invalid(
                    kind,
                    format!("standard deviation must be positive (got {})", std_dev),
                ));
            }
            return Ok(());
        }
        if values.windows(2).any(|w| w[1] < w[0]) {
            return Err(invalid(kind, "values must be in ascending order".to_string()));
        }
        let (lo, hi) = (values[0], values[values.len() - 1]);
        if hi <= lo {
            return Err(invalid(
                kind,
                format!("distribution has zero width ({} to {})", lo, hi),
            ));
        }
        Ok(())
    }

    /// Support bounds of the generated table.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Distribution::Gaussian { mean, std_dev } => (
                mean - GAUSSIAN_SPAN * std_dev,
                mean + GAUSSIAN_SPAN * std_dev,
            ),
            Distribution::Uniform { min, max }
            | Distribution::Triangular { min, max, .. }
            | Distribution::Trapezoidal { min, max, .. } => (min, max),
        }
    }

    /// Unnormalized density at `x`.
    fn shape(&self, x: f64) -> f64 {
        match *self {
            Distribution::Gaussian { mean, std_dev } => {
                let z = (x - mean) / std_dev;
                (-0.5 * z * z).exp()
            }
            Distribution::Uniform { .. } => 1.0,
            Distribution::Triangular { min, mode, max } => ramp(x, min, mode, mode, max),
            Distribution::Trapezoidal {
                min,
                low,
                high,
                max,
            } => ramp(x, min, low, high, max),
        }
    }

    /// Tabulate the distribution on `points` evenly spaced support points.
    pub fn build_pdf(&self, points: usize) -> Result<PdfTable, DomainError> {
        self.validate()?;
        let (lo, hi) = self.bounds();
        let support = linspace(lo, hi, points);
        let density = support.iter().map(|&x| self.shape(x)).collect();
        PdfTable::new(support, density)
    }
}

/// Piecewise-linear 0 → 1 → 1 → 0 profile with corners `a ≤ b ≤ c ≤ d`.
fn ramp(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.0
    } else if x < b {
        (x - a) / (b - a)
    } else if x <= c {
        1.0
    } else {
        (d - x) / (d - c)
    }
}

fn invalid(kind: DistributionKind, message: String) -> DomainError {
    DomainError::InvalidParameters {
        distribution: kind.name(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::numeric::trapezoid;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn parses_aliases() {
        for name in ["gauss", "Gaussian", "NORMAL"] {
            assert_eq!(name.parse::<DistributionKind>().unwrap(), DistributionKind::Gaussian);
        }
        assert_eq!("boxcar".parse::<DistributionKind>().unwrap(), DistributionKind::Uniform);
        assert_eq!("tri".parse::<DistributionKind>().unwrap(), DistributionKind::Triangular);
        assert_eq!("trap".parse::<DistributionKind>().unwrap(), DistributionKind::Trapezoidal);
        assert!("lognormal".parse::<DistributionKind>().is_err());
    }

    #[test]
    fn gaussian_spans_four_sigma() {
        let dist = Distribution::from_values(DistributionKind::Gaussian, &[5.0, 0.3]).unwrap();
        let pdf = dist.build_pdf(DEFAULT_POINTS).unwrap();
        assert_eq!(pdf.points(), 100);
        assert!(approx_eq(pdf.min(), 3.8, 1e-12));
        assert!(approx_eq(pdf.max(), 6.2, 1e-12));
        assert!(approx_eq(pdf.median(), 5.0, 1e-9));
        assert!(approx_eq(trapezoid(pdf.support(), pdf.density()), 1.0, 1e-12));
    }

    #[test]
    fn uniform_sorts_values() {
        let dist = Distribution::from_values(DistributionKind::Uniform, &[5.0, 3.0]).unwrap();
        assert_eq!(dist, Distribution::Uniform { min: 3.0, max: 5.0 });
        let pdf = dist.build_pdf(11).unwrap();
        assert!(approx_eq(pdf.density()[5], 0.5, 1e-12));
    }

    #[test]
    fn triangle_peaks_at_mode() {
        let dist =
            Distribution::from_values(DistributionKind::Triangular, &[3.8, 5.0, 5.6]).unwrap();
        let pdf = dist.build_pdf(1000).unwrap();
        assert_eq!(pdf.density()[0], 0.0);
        assert_eq!(*pdf.density().last().unwrap(), 0.0);
        assert!(approx_eq(pdf.mode(), 5.0, 0.01));
    }

    #[test]
    fn trapezoid_has_flat_top() {
        let dist =
            Distribution::from_values(DistributionKind::Trapezoidal, &[4.0, 5.0, 6.0, 7.5])
                .unwrap();
        let pdf = dist.build_pdf(1000).unwrap();
        assert!(approx_eq(pdf.pdf(5.2), pdf.pdf(5.8), 1e-9));
        assert!(pdf.pdf(4.5) < pdf.pdf(5.5));
    }

    #[test]
    fn degenerate_corners_are_allowed_but_not_zero_width() {
        // Right triangle with the mode on the minimum.
        let dist =
            Distribution::from_values(DistributionKind::Triangular, &[1.0, 1.0, 2.0]).unwrap();
        assert!(dist.build_pdf(50).is_ok());

        let err = Distribution::from_values(DistributionKind::Uniform, &[2.0, 2.0]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameters { .. }));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Distribution::from_values(DistributionKind::Gaussian, &[1.0, 0.0]).is_err());
        assert!(Distribution::from_values(DistributionKind::Gaussian, &[1.0]).is_err());
        assert!(
            Distribution::from_values(DistributionKind::Uniform, &[0.0, f64::INFINITY]).is_err()
        );
        let unordered = Distribution::Triangular {
            min: 0.0,
            mode: 3.0,
            max: 2.0,
        };
        assert!(unordered.build_pdf(10).is_err());
    }

    #[test]
    fn too_few_points_is_a_domain_error() {
        let dist = Distribution::Uniform { min: 0.0, max: 1.0 };
        assert_eq!(
            dist.build_pdf(1).unwrap_err(),
            DomainError::TooFewPoints { len: 1 }
        );
    }
}
