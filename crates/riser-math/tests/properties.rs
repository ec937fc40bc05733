//! Property-based tests for riser-math.
//!
//! Uses proptest to check the distributional invariants over many random
//! PDF tables and sample pools.

use proptest::prelude::*;
use riser_math::numeric::trapezoid;
use riser_math::{
    estimate_density, hpd, iqr, sample, DensityOptions, PdfTable, Smoothing,
    DEFAULT_HPD_RESOLUTION,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

/// Random valid PDF table: strictly increasing support from positive gaps,
/// non-negative densities with at least one positive value.
fn arb_pdf() -> impl Strategy<Value = PdfTable> {
    (2usize..40)
        .prop_flat_map(|n| {
            (
                -100.0..100.0f64,
                prop::collection::vec(0.01..10.0f64, n - 1),
                prop::collection::vec(0.0..5.0f64, n),
            )
        })
        .prop_map(|(start, gaps, mut density)| {
            let mut support = Vec::with_capacity(gaps.len() + 1);
            support.push(start);
            for gap in gaps {
                let next = support[support.len() - 1] + gap;
                support.push(next);
            }
            // Guarantee positive mass.
            density[0] += 0.5;
            PdfTable::new(support, density).expect("generated table is valid")
        })
}

fn arb_pool() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50.0..50.0f64, 1..300)
}

// ============================================================================
// PDF table / sampler
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// cdf(invert(p)) recovers p.
    #[test]
    fn cdf_inverts_invert(pdf in arb_pdf(), p in 0.0..=1.0f64) {
        let x = pdf.invert(p);
        prop_assert!(approx_eq(pdf.cdf(x), p, 1e-7), "p={} x={} cdf={}", p, x, pdf.cdf(x));
    }

    /// Inversion is bounded by the support and monotone in p.
    #[test]
    fn invert_is_monotone_and_bounded(pdf in arb_pdf(), a in 0.0..=1.0f64, b in 0.0..=1.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let x_lo = pdf.invert(lo);
        let x_hi = pdf.invert(hi);
        prop_assert!(x_lo <= x_hi + TOL);
        prop_assert!(x_lo >= pdf.min() && x_hi <= pdf.max());
        prop_assert_eq!(pdf.invert(0.0), pdf.min());
        prop_assert_eq!(pdf.invert(1.0), pdf.max());
    }

    /// Stored density has unit mass and the cumulative is non-decreasing.
    #[test]
    fn table_is_normalized(pdf in arb_pdf()) {
        prop_assert!(approx_eq(trapezoid(pdf.support(), pdf.density()), 1.0, 1e-9));
        prop_assert!(pdf.cumulative().windows(2).all(|w| w[1] >= w[0]));
    }

    /// Sampling is a pure function of the uniform.
    #[test]
    fn sample_is_deterministic(pdf in arb_pdf(), u in 0.0..1.0f64) {
        prop_assert_eq!(sample(&pdf, u), sample(&pdf, u));
    }
}

// ============================================================================
// Density estimator
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn kde_integrates_to_one(pool in arb_pool()) {
        let pdf = estimate_density(&pool, &DensityOptions::kde()).unwrap();
        prop_assert!(approx_eq(trapezoid(pdf.support(), pdf.density()), 1.0, 1e-9));
    }

    #[test]
    fn histogram_integrates_to_one(pool in arb_pool(), window in 1usize..6) {
        let options = DensityOptions::histogram().with_smoothing(Smoothing::Gaussian(window));
        let pdf = estimate_density(&pool, &options).unwrap();
        prop_assert!(approx_eq(trapezoid(pdf.support(), pdf.density()), 1.0, 1e-9));
        prop_assert_eq!(pdf.density()[0], 0.0);
    }

    /// Shuffling the pool does not change the estimate.
    #[test]
    fn density_ignores_sample_order(pool in arb_pool()) {
        let mut reversed = pool.clone();
        reversed.reverse();
        let options = DensityOptions::histogram();
        prop_assert_eq!(
            estimate_density(&pool, &options).unwrap(),
            estimate_density(&reversed, &options).unwrap()
        );
    }
}

// ============================================================================
// Range analyzer
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// IQR width never shrinks as the requested mass grows.
    #[test]
    fn iqr_width_is_monotone(pdf in arb_pdf(), a in 0.0..=1.0f64, b in 0.0..=1.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let narrow = iqr(&pdf, lo).unwrap();
        let wide = iqr(&pdf, hi).unwrap();
        prop_assert!(narrow.width() <= wide.width() + TOL);
    }

    /// HPD intervals are sorted, disjoint and hold at least the requested mass.
    #[test]
    fn hpd_intervals_are_well_formed(pdf in arb_pdf(), mass in 0.05..=1.0f64) {
        let ranges = hpd(&pdf, mass, DEFAULT_HPD_RESOLUTION).unwrap();
        prop_assert!(!ranges.intervals.is_empty());
        prop_assert!(ranges.mass >= mass - 1e-9, "mass {} < {}", ranges.mass, mass);
        for interval in &ranges.intervals {
            prop_assert!(interval.low < interval.high);
            prop_assert!(interval.low >= pdf.min() && interval.high <= pdf.max());
        }
        for pair in ranges.intervals.windows(2) {
            prop_assert!(pair[0].high < pair[1].low);
        }
        let total: f64 = ranges.intervals.iter().map(|i| i.mass).sum();
        prop_assert!(approx_eq(total, ranges.mass, 1e-7));
    }

    /// More bisection steps bring the enclosed mass closer to the target.
    #[test]
    fn hpd_converges_with_resolution(pdf in arb_pdf(), mass in 0.1..0.95f64) {
        let coarse = hpd(&pdf, mass, 4).unwrap();
        let fine = hpd(&pdf, mass, DEFAULT_HPD_RESOLUTION).unwrap();
        prop_assert!(fine.mass <= coarse.mass + 1e-9);
        prop_assert!(fine.mass >= mass - 1e-9);
    }
}
