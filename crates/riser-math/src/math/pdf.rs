//! Discretized probability density tables.
//!
//! A [`PdfTable`] holds a piecewise-linear density over a finite, strictly
//! increasing support together with its cumulative distribution. The density
//! is normalized to unit trapezoidal mass once, at construction; the table is
//! immutable afterwards.
//!
//! `cdf` and `invert` both interpolate the cumulative table linearly between
//! support points, so `cdf(invert(p)) == p` up to rounding.

use serde::Serialize;
use thiserror::Error;

use super::numeric::{cumulative_trapezoid, interp, trapezoid};

/// Malformed PDF input, detected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("support and density lengths differ ({support} vs {density})")]
    LengthMismatch { support: usize, density: usize },

    #[error("a PDF needs at least 2 points (got {len})")]
    TooFewPoints { len: usize },

    #[error("non-finite {field} value at index {index}")]
    NonFinite { field: &'static str, index: usize },

    #[error("support is not strictly increasing at index {index} ({previous} then {value})")]
    NotIncreasing {
        index: usize,
        previous: f64,
        value: f64,
    },

    #[error("negative density {value} at index {index}")]
    NegativeDensity { index: usize, value: f64 },

    #[error("density integrates to {mass}; expected a positive finite mass")]
    DegenerateMass { mass: f64 },

    #[error("invalid {distribution} parameters: {message}")]
    InvalidParameters {
        distribution: &'static str,
        message: String,
    },
}

/// A normalized, immutable probability density table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfTable {
    support: Vec<f64>,
    density: Vec<f64>,
    #[serde(skip)]
    cumulative: Vec<f64>,
}

impl PdfTable {
    /// Build a table from aligned support points and (unnormalized) densities.
    pub fn new(support: Vec<f64>, density: Vec<f64>) -> Result<Self, DomainError> {
        if support.len() != density.len() {
            return Err(DomainError::LengthMismatch {
                support: support.len(),
                density: density.len(),
            });
        }
        if support.len() < 2 {
            return Err(DomainError::TooFewPoints { len: support.len() });
        }
        if let Some(index) = support.iter().position(|x| !x.is_finite()) {
            return Err(DomainError::NonFinite {
                field: "support",
                index,
            });
        }
        if let Some(index) = density.iter().position(|p| !p.is_finite()) {
            return Err(DomainError::NonFinite {
                field: "density",
                index,
            });
        }
        if let Some(index) = density.iter().position(|&p| p < 0.0) {
            return Err(DomainError::NegativeDensity {
                index,
                value: density[index],
            });
        }
        if let Some(offset) = support.windows(2).position(|w| w[1] <= w[0]) {
            return Err(DomainError::NotIncreasing {
                index: offset + 1,
                previous: support[offset],
                value: support[offset + 1],
            });
        }

        let running = cumulative_trapezoid(&support, &density);
        let mass = running[running.len() - 1];
        if !(mass.is_finite() && mass > 0.0) {
            return Err(DomainError::DegenerateMass { mass });
        }

        let density: Vec<f64> = density.into_iter().map(|p| p / mass).collect();
        let mut cumulative: Vec<f64> = running
            .into_iter()
            .map(|c| (c / mass).clamp(0.0, 1.0))
            .collect();
        let last = cumulative.len() - 1;
        cumulative[last] = 1.0;

        Ok(Self {
            support,
            density,
            cumulative,
        })
    }

    /// Build a table from `(value, density)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, DomainError> {
        let (support, density) = pairs.iter().copied().unzip();
        Self::new(support, density)
    }

    pub fn support(&self) -> &[f64] {
        &self.support
    }

    /// Normalized density values (unit trapezoidal mass).
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of support points (always at least 2).
    pub fn points(&self) -> usize {
        self.support.len()
    }

    pub fn min(&self) -> f64 {
        self.support[0]
    }

    pub fn max(&self) -> f64 {
        self.support[self.support.len() - 1]
    }

    /// Density at `x`; zero outside the support.
    pub fn pdf(&self, x: f64) -> f64 {
        interp(x, &self.support, &self.density, 0.0)
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x <= self.min() {
            return 0.0;
        }
        if x >= self.max() {
            return 1.0;
        }
        interp(x, &self.support, &self.cumulative, 0.0)
    }

    /// Generalized inverse of the cumulative distribution.
    ///
    /// `p` is clamped to [0, 1]; `invert(0)` is the minimum support value and
    /// `invert(1)` the maximum. NaN maps to NaN.
    pub fn invert(&self, p: f64) -> f64 {
        if p.is_nan() {
            return f64::NAN;
        }
        if p <= 0.0 {
            return self.min();
        }
        if p >= 1.0 {
            return self.max();
        }
        // cumulative[0] == 0 < p and cumulative[last] == 1 > p, so `upper`
        // lands on 1..=last and the bracket is non-flat.
        let upper = self.cumulative.partition_point(|&c| c < p);
        let lower = upper - 1;
        let (c0, c1) = (self.cumulative[lower], self.cumulative[upper]);
        let (x0, x1) = (self.support[lower], self.support[upper]);
        x0 + (p - c0) / (c1 - c0) * (x1 - x0)
    }

    pub fn median(&self) -> f64 {
        self.invert(0.5)
    }

    /// Support point with the highest density (first one on ties).
    pub fn mode(&self) -> f64 {
        let mut best = 0;
        for (i, &p) in self.density.iter().enumerate() {
            if p > self.density[best] {
                best = i;
            }
        }
        self.support[best]
    }

    /// Expected value under the piecewise-linear density.
    pub fn mean(&self) -> f64 {
        let weighted: Vec<f64> = self
            .support
            .iter()
            .zip(&self.density)
            .map(|(x, p)| x * p)
            .collect();
        trapezoid(&self.support, &weighted)
    }

    /// Consume the table, returning `(support, normalized density)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.support, self.density)
    }
}
