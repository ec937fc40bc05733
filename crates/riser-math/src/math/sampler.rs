//! Inverse-transform sampling from [`PdfTable`]s.
//!
//! All randomness sits behind [`UniformSource`], so sampling is a pure
//! function of the uniform sequence. Any `rand` generator is a source;
//! [`ReplayUniforms`] replays a fixed sequence for deterministic runs.

use rand::{Rng, RngCore};

use super::pdf::PdfTable;

/// A stream of uniform numbers in [0, 1).
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed sequence of uniforms, cycling when exhausted.
///
/// Values are clamped into [0, 1]. An empty sequence yields 0.0.
#[derive(Debug, Clone)]
pub struct ReplayUniforms {
    values: Vec<f64>,
    cursor: usize,
}

impl ReplayUniforms {
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|u| if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) })
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of values handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ReplayUniforms {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let u = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        u
    }
}

/// Draw one value from `pdf` for the uniform `u`.
#[inline]
pub fn sample(pdf: &PdfTable, u: f64) -> f64 {
    pdf.invert(u)
}

/// Inverse-transform sampler bound to a uniform source.
#[derive(Debug, Clone)]
pub struct InverseTransformSampler<S> {
    source: S,
}

impl<S: UniformSource> InverseTransformSampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Draw one value, consuming exactly one uniform.
    pub fn draw(&mut self, pdf: &PdfTable) -> f64 {
        sample(pdf, self.source.next_uniform())
    }

    pub fn draw_n(&mut self, pdf: &PdfTable, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.draw(pdf)).collect()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
