//! Analytic quotient of two PDFs.
//!
//! For independent positive quantities `N` and `D`, the density of `Q = N/D`
//! is `p(q) = ∫ f_D(x) · f_N(q·x) · x dx`. The integral is evaluated as a
//! sum over the denominator's support points, then the result is normalized.
//! Dividing a marker's displacement PDF by its age PDF gives the average
//! slip rate since that marker formed.

use thiserror::Error;

use super::pdf::{DomainError, PdfTable};

/// Axis steps used when no explicit step is given.
pub const DEFAULT_AXIS_STEPS: usize = 1000;

/// Refuse to build absurdly long quotient axes.
pub const MAX_AXIS_POINTS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuotientError {
    #[error("{which} PDF has no positive support with positive density")]
    NoPositiveSupport { which: &'static str },

    #[error("quotient axis is empty ({min} to {max})")]
    EmptyAxis { min: f64, max: f64 },

    #[error("invalid quotient step {step}")]
    InvalidStep { step: f64 },

    #[error("quotient axis would need {points} points (limit {limit})")]
    AxisTooLarge { points: usize, limit: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuotientOptions {
    /// Axis spacing; defaults to the axis range over [`DEFAULT_AXIS_STEPS`].
    pub step: Option<f64>,
    /// Upper cap on the quotient axis.
    pub max_quotient: Option<f64>,
}

/// Positive-valued support points with positive density.
fn positive_part(pdf: &PdfTable) -> (Vec<f64>, Vec<f64>) {
    pdf.support()
        .iter()
        .zip(pdf.density())
        .filter(|(&x, &p)| x > 0.0 && p > 0.0)
        .map(|(&x, &p)| (x, p))
        .unzip()
}

/// Density of `numerator / denominator`.
pub fn divide(
    numerator: &PdfTable,
    denominator: &PdfTable,
    options: &QuotientOptions,
) -> Result<PdfTable, QuotientError> {
    let (num_x, _) = positive_part(numerator);
    let (den_x, den_p) = positive_part(denominator);
    let (Some(&num_lo), Some(&num_hi)) = (num_x.first(), num_x.last()) else {
        return Err(QuotientError::NoPositiveSupport { which: "numerator" });
    };
    let (Some(&den_lo), Some(&den_hi)) = (den_x.first(), den_x.last()) else {
        return Err(QuotientError::NoPositiveSupport {
            which: "denominator",
        });
    };

    let q_min = num_lo / den_hi;
    let mut q_max = num_hi / den_lo;
    if let Some(cap) = options.max_quotient {
        q_max = q_max.min(cap);
    }
    if !(q_max > q_min) {
        return Err(QuotientError::EmptyAxis {
            min: q_min,
            max: q_max,
        });
    }

    let step = options
        .step
        .unwrap_or((q_max - q_min) / DEFAULT_AXIS_STEPS as f64);
    if !(step.is_finite() && step > 0.0) {
        return Err(QuotientError::InvalidStep { step });
    }
    let span = (q_max - q_min) / step;
    if span >= MAX_AXIS_POINTS as f64 {
        return Err(QuotientError::AxisTooLarge {
            points: span as usize + 1,
            limit: MAX_AXIS_POINTS,
        });
    }
    // Tolerate rounding so the default step lands on q_max.
    let points = (span + 1e-9).floor() as usize + 1;
    if points < 2 {
        return Err(QuotientError::EmptyAxis {
            min: q_min,
            max: q_max,
        });
    }

    let axis: Vec<f64> = (0..points).map(|i| q_min + step * i as f64).collect();
    let density: Vec<f64> = axis
        .iter()
        .map(|&q| {
            den_x
                .iter()
                .zip(&den_p)
                .map(|(&x, &p)| p * numerator.pdf(q * x) * x)
                .sum::<f64>()
        })
        .collect();

    Ok(PdfTable::new(axis, density)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(lo: f64, hi: f64, n: usize) -> PdfTable {
        let support: Vec<f64> = (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect();
        PdfTable::new(support, vec![1.0; n]).unwrap()
    }

    #[test]
    fn dividing_by_near_constant_rescales() {
        // Denominator concentrated at 2: quotient ~ numerator / 2.
        let num = uniform(10.0, 20.0, 201);
        let den = PdfTable::new(vec![1.99, 2.0, 2.01], vec![0.0, 1.0, 0.0]).unwrap();
        let q = divide(&num, &den, &QuotientOptions::default()).unwrap();
        assert!((q.median() - 7.5).abs() < 0.05, "median {}", q.median());
        assert!(q.min() > 4.9 && q.max() < 10.1);
    }

    #[test]
    fn default_axis_has_about_a_thousand_steps() {
        let q = divide(
            &uniform(1.0, 2.0, 11),
            &uniform(1.0, 2.0, 11),
            &QuotientOptions::default(),
        )
        .unwrap();
        assert_eq!(q.points(), DEFAULT_AXIS_STEPS + 1);
        assert!((q.min() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn max_quotient_caps_the_axis() {
        let options = QuotientOptions {
            step: Some(0.01),
            max_quotient: Some(1.0),
        };
        let q = divide(&uniform(1.0, 2.0, 11), &uniform(1.0, 2.0, 11), &options).unwrap();
        assert!(q.max() <= 1.0 + 1e-9);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        let negative = uniform(-3.0, -1.0, 5);
        let positive = uniform(1.0, 2.0, 5);
        assert_eq!(
            divide(&negative, &positive, &QuotientOptions::default()).unwrap_err(),
            QuotientError::NoPositiveSupport { which: "numerator" }
        );
        assert_eq!(
            divide(&positive, &negative, &QuotientOptions::default()).unwrap_err(),
            QuotientError::NoPositiveSupport {
                which: "denominator"
            }
        );
    }

    #[test]
    fn rejects_bad_step_and_empty_axis() {
        let a = uniform(1.0, 2.0, 5);
        let bad_step = QuotientOptions {
            step: Some(0.0),
            max_quotient: None,
        };
        assert!(matches!(
            divide(&a, &a, &bad_step),
            Err(QuotientError::InvalidStep { .. })
        ));
        let capped = QuotientOptions {
            step: None,
            max_quotient: Some(0.1),
        };
        assert!(matches!(
            divide(&a, &a, &capped),
            Err(QuotientError::EmptyAxis { .. })
        ));
    }
}
