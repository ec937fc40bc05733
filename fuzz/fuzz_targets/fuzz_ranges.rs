//! Fuzz target for IQR and HPD on arbitrary tables.
//!
//! Valid tables must always produce ordered, non-overlapping HPD intervals
//! enclosing at least the requested mass.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use riser_math::{hpd, iqr, PdfTable};

#[derive(Debug, Arbitrary)]
struct Input {
    steps: Vec<(u8, u16)>,
    mass: u8,
    resolution: u8,
}

fuzz_target!(|input: Input| {
    let mut x = 0.0;
    let mut support = Vec::new();
    let mut density = Vec::new();
    for (dx, p) in input.steps.iter().take(512) {
        x += f64::from(*dx) + 1.0;
        support.push(x);
        density.push(f64::from(*p));
    }
    let Ok(pdf) = PdfTable::new(support, density) else {
        return;
    };
    let mass = f64::from(input.mass) / 255.0;

    let q = iqr(&pdf, mass).unwrap();
    assert!(q.low <= q.high);

    let resolution = u32::from(input.resolution.max(1));
    let ranges = hpd(&pdf, mass, resolution).unwrap();
    assert!(ranges.mass >= mass - 1e-9);
    for pair in ranges.intervals.windows(2) {
        assert!(pair[0].high <= pair[1].low);
    }
});
