//! Acceptance test for one joint draw.

use serde::Serialize;

/// Why a joint draw was discarded. `interval` is the first failing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The older marker drew an age no greater than the younger one.
    AgeInversion { interval: usize },
    /// Displacement decreased with age.
    NegativeRate { interval: usize },
    /// Rate exceeded the configured ceiling.
    RateCeiling { interval: usize },
}

impl Rejection {
    pub fn interval(&self) -> usize {
        match *self {
            Rejection::AgeInversion { interval }
            | Rejection::NegativeRate { interval }
            | Rejection::RateCeiling { interval } => interval,
        }
    }
}

/// Outcome of judging one joint draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict<'a> {
    /// Every interval passed; one rate per interval.
    Accepted(&'a [f64]),
    Rejected(Rejection),
}

impl Verdict<'_> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Reusable buffers so judging does not allocate per iteration.
#[derive(Debug, Clone, Default)]
pub struct RateScratch {
    gaps: Vec<f64>,
    rates: Vec<f64>,
}

impl RateScratch {
    pub fn with_intervals(intervals: usize) -> Self {
        Self {
            gaps: Vec::with_capacity(intervals),
            rates: Vec::with_capacity(intervals),
        }
    }
}

/// Compute every interval's age gap and rate in one pass, then accept the
/// draw only if all intervals pass.
///
/// `ages` and `displacements` hold one value per marker, youngest first.
/// Per interval the checks apply in order: age gap must be positive, rate
/// must be non-negative, rate must not exceed `max_rate`.
pub fn judge<'a>(
    ages: &[f64],
    displacements: &[f64],
    max_rate: Option<f64>,
    scratch: &'a mut RateScratch,
) -> Verdict<'a> {
    scratch.gaps.clear();
    scratch.rates.clear();
    for (age, disp) in ages.windows(2).zip(displacements.windows(2)) {
        let gap = age[1] - age[0];
        scratch.gaps.push(gap);
        scratch.rates.push((disp[1] - disp[0]) / gap);
    }

    for (interval, (&gap, &rate)) in scratch.gaps.iter().zip(&scratch.rates).enumerate() {
        if !(gap > 0.0) {
            return Verdict::Rejected(Rejection::AgeInversion { interval });
        }
        if !(rate >= 0.0) {
            return Verdict::Rejected(Rejection::NegativeRate { interval });
        }
        if let Some(ceiling) = max_rate {
            if rate > ceiling {
                return Verdict::Rejected(Rejection::RateCeiling { interval });
            }
        }
    }
    Verdict::Accepted(&scratch.rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ages: &[f64], disps: &[f64], max_rate: Option<f64>) -> Result<Vec<f64>, Rejection> {
        let mut scratch = RateScratch::default();
        match judge(ages, disps, max_rate, &mut scratch) {
            Verdict::Accepted(rates) => Ok(rates.to_vec()),
            Verdict::Rejected(reason) => Err(reason),
        }
    }

    #[test]
    fn accepts_monotone_draw() {
        let rates = run(&[1.0, 3.0, 7.0], &[2.0, 6.0, 6.0], None).unwrap();
        assert_eq!(rates, vec![2.0, 0.0]);
    }

    #[test]
    fn rejects_negative_rate() {
        assert_eq!(
            run(&[1.0, 3.0], &[5.0, 4.0], None),
            Err(Rejection::NegativeRate { interval: 0 })
        );
    }

    #[test]
    fn rejects_age_inversion_with_positive_displacement() {
        // Older marker drew a younger age; displacement still increases.
        assert_eq!(
            run(&[5.0, 3.0], &[1.0, 2.0], None),
            Err(Rejection::AgeInversion { interval: 0 })
        );
    }

    #[test]
    fn rejects_double_inversion() {
        // Both age and displacement inverted: the quotient is positive, but
        // the draw is still unphysical.
        assert_eq!(
            run(&[5.0, 3.0], &[2.0, 1.0], None),
            Err(Rejection::AgeInversion { interval: 0 })
        );
    }

    #[test]
    fn rejects_equal_ages() {
        assert_eq!(
            run(&[2.0, 2.0], &[1.0, 3.0], None),
            Err(Rejection::AgeInversion { interval: 0 })
        );
    }

    #[test]
    fn reports_first_failing_interval() {
        assert_eq!(
            run(&[1.0, 2.0, 3.0, 2.5], &[0.0, 1.0, 0.5, 0.0], None),
            Err(Rejection::NegativeRate { interval: 1 })
        );
    }

    #[test]
    fn ceiling_applies_only_when_set() {
        assert!(run(&[0.0, 1.0], &[0.0, 100.0], None).is_ok());
        assert_eq!(
            run(&[0.0, 1.0], &[0.0, 100.0], Some(50.0)),
            Err(Rejection::RateCeiling { interval: 0 })
        );
        assert!(run(&[0.0, 1.0], &[0.0, 50.0], Some(50.0)).is_ok());
    }

    #[test]
    fn rejection_serializes_with_reason_tag() {
        let json = serde_json::to_value(Rejection::RateCeiling { interval: 2 }).unwrap();
        assert_eq!(json["reason"], "rate_ceiling");
        assert_eq!(json["interval"], 2);
    }
}
