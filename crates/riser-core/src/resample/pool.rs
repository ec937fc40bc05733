//! Per-interval accepted-rate pools.

/// One append-only pool of accepted rates per interval.
///
/// All pools grow in lockstep: a draw is accepted for every interval or for
/// none, so they always have equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePools {
    pools: Vec<Vec<f64>>,
}

impl RatePools {
    /// Empty pools pre-sized for `capacity` samples each.
    pub fn with_capacity(intervals: usize, capacity: usize) -> Self {
        Self {
            pools: (0..intervals).map(|_| Vec::with_capacity(capacity)).collect(),
        }
    }

    /// Append one accepted draw (one rate per interval).
    pub fn push_draw(&mut self, rates: &[f64]) {
        debug_assert_eq!(rates.len(), self.pools.len());
        for (pool, &rate) in self.pools.iter_mut().zip(rates) {
            pool.push(rate);
        }
    }

    /// Accepted draws so far.
    pub fn accepted(&self) -> usize {
        self.pools.first().map_or(0, Vec::len)
    }

    pub fn interval_count(&self) -> usize {
        self.pools.len()
    }

    pub fn interval(&self, index: usize) -> Option<&[f64]> {
        self.pools.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.pools.iter().map(Vec::as_slice)
    }

    /// Append another set of pools interval by interval.
    pub fn merge(&mut self, other: RatePools) {
        for (pool, more) in self.pools.iter_mut().zip(other.pools) {
            pool.extend(more);
        }
    }

    /// Keep only the first `draws` accepted draws.
    pub fn truncate(&mut self, draws: usize) {
        for pool in &mut self.pools {
            pool.truncate(draws);
        }
    }

    pub fn into_inner(self) -> Vec<Vec<f64>> {
        self.pools
    }
}
