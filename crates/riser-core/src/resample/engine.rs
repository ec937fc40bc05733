//! Resampling loop and worker fan-out.

use rand::rngs::StdRng;
use rand::SeedableRng;
use riser_config::ResampleSettings;
use riser_math::{sample, UniformSource};
use serde::Serialize;

use super::marker::MarkerChain;
use super::pool::RatePools;
use super::verdict::{judge, RateScratch, Rejection, Verdict};
use super::{ConvergenceError, ResampleError};
use crate::logging::{event_names, Stage};

/// Acceptance below this fraction is worth a warning.
const LOW_ACCEPTANCE: f64 = 0.01;

/// Smallest per-worker slice of a round.
const MIN_CHUNK: u64 = 64;

/// Cap on round growth while no draw has been accepted.
const MAX_DOUBLINGS: u32 = 20;

/// Counters for one resampling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResampleStats {
    pub iterations: u64,
    pub accepted: usize,
    pub age_inversions: u64,
    pub negative_rates: u64,
    pub rate_ceiling: u64,
    pub workers: usize,
}

impl ResampleStats {
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }

    pub fn rejected(&self) -> u64 {
        self.age_inversions + self.negative_rates + self.rate_ceiling
    }

    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::AgeInversion { .. } => self.age_inversions += 1,
            Rejection::NegativeRate { .. } => self.negative_rates += 1,
            Rejection::RateCeiling { .. } => self.rate_ceiling += 1,
        }
    }

    fn absorb(&mut self, other: &ResampleStats) {
        self.iterations += other.iterations;
        self.accepted += other.accepted;
        self.age_inversions += other.age_inversions;
        self.negative_rates += other.negative_rates;
        self.rate_ceiling += other.rate_ceiling;
    }
}

/// Pools of exactly `target_count` rates per interval plus run counters.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleOutcome {
    pub pools: RatePools,
    pub stats: ResampleStats,
}

/// Split `total` into `parts` shares differing by at most one.
fn share(total: u64, parts: usize, index: usize) -> u64 {
    let parts = parts as u64;
    let index = index as u64;
    total / parts + u64::from(index < total % parts)
}

fn worker_count(settings: &ResampleSettings) -> usize {
    let requested = if settings.workers == 0 {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    } else {
        settings.workers
    };
    requested.clamp(1, settings.target_count.max(1))
}

fn worker_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_os_rng(),
    }
}

/// Reusable buffers for drawing and judging one joint sample.
struct DrawBuffers {
    ages: Vec<f64>,
    displacements: Vec<f64>,
    scratch: RateScratch,
}

impl DrawBuffers {
    fn new(chain: &MarkerChain) -> Self {
        Self {
            ages: vec![0.0; chain.len()],
            displacements: vec![0.0; chain.len()],
            scratch: RateScratch::with_intervals(chain.interval_count()),
        }
    }

    /// Draw an age and a displacement for every marker, then judge them.
    fn draw<S: UniformSource>(
        &mut self,
        chain: &MarkerChain,
        max_rate: Option<f64>,
        source: &mut S,
    ) -> Verdict<'_> {
        for (i, marker) in chain.markers().iter().enumerate() {
            self.ages[i] = sample(marker.age(), source.next_uniform());
            self.displacements[i] = sample(marker.displacement(), source.next_uniform());
        }
        judge(&self.ages, &self.displacements, max_rate, &mut self.scratch)
    }
}

/// Single-source accumulation loop.
fn run_loop<S: UniformSource>(
    chain: &MarkerChain,
    target: usize,
    cap: u64,
    max_rate: Option<f64>,
    source: &mut S,
) -> (RatePools, ResampleStats) {
    let mut pools = RatePools::with_capacity(chain.interval_count(), target);
    let mut stats = ResampleStats {
        workers: 1,
        ..ResampleStats::default()
    };
    let mut buffers = DrawBuffers::new(chain);

    while pools.accepted() < target && stats.iterations < cap {
        stats.iterations += 1;
        match buffers.draw(chain, max_rate, source) {
            Verdict::Accepted(rates) => {
                pools.push_draw(rates);
                stats.accepted += 1;
            }
            Verdict::Rejected(reason) => stats.record(reason),
        }
    }
    (pools, stats)
}

/// What one worker drew during a round, in draw order.
struct Chunk {
    pools: RatePools,
    stats: ResampleStats,
    /// Counters as they stood right after each accepted draw.
    marks: Vec<ResampleStats>,
}

impl Chunk {
    /// Append at most `room` of this chunk's accepted draws, counting only
    /// the iterations that led up to them.
    fn drain_into(mut self, pools: &mut RatePools, stats: &mut ResampleStats, room: usize) {
        if room == 0 {
            return;
        }
        if self.stats.accepted < room {
            stats.absorb(&self.stats);
        } else {
            stats.absorb(&self.marks[room - 1]);
            self.pools.truncate(room);
        }
        pools.merge(self.pools);
    }
}

/// One worker's slice of a round: stop after `need` acceptances or `budget`
/// iterations, whichever comes first.
fn run_chunk<S: UniformSource>(
    chain: &MarkerChain,
    need: usize,
    budget: u64,
    max_rate: Option<f64>,
    source: &mut S,
) -> Chunk {
    let mut pools = RatePools::with_capacity(chain.interval_count(), need);
    let mut stats = ResampleStats::default();
    let mut marks = Vec::with_capacity(need);
    let mut buffers = DrawBuffers::new(chain);

    while stats.accepted < need && stats.iterations < budget {
        stats.iterations += 1;
        match buffers.draw(chain, max_rate, source) {
            Verdict::Accepted(rates) => {
                pools.push_draw(rates);
                stats.accepted += 1;
                marks.push(stats.clone());
            }
            Verdict::Rejected(reason) => stats.record(reason),
        }
    }
    Chunk {
        pools,
        stats,
        marks,
    }
}

/// Iterations to hand out in the next round across all workers.
///
/// Sized from the acceptance rate seen so far; doubles each round while
/// nothing has been accepted. Never exceeds what is left of the cap.
fn round_budget(
    need: usize,
    stats: &ResampleStats,
    remaining: u64,
    workers: usize,
    round: u32,
) -> u64 {
    let need = need as u64;
    let estimate = if stats.accepted == 0 {
        need.saturating_mul(1u64 << round.min(MAX_DOUBLINGS))
    } else {
        let per_draw = stats.iterations.div_ceil(stats.accepted as u64);
        need.saturating_mul(per_draw).saturating_add(need / 10 + 1)
    };
    estimate
        .max(MIN_CHUNK.saturating_mul(workers as u64))
        .min(remaining)
}

fn check_settings(settings: &ResampleSettings) -> Result<(), ResampleError> {
    if settings.target_count == 0 {
        return Err(ResampleError::InvalidSettings(
            "target_count must be positive".to_string(),
        ));
    }
    if settings.max_iterations == 0 {
        return Err(ResampleError::InvalidSettings(
            "max_iterations must be positive".to_string(),
        ));
    }
    if let Some(rate) = settings.max_rate {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ResampleError::InvalidSettings(format!(
                "max_rate must be positive (got {})",
                rate
            )));
        }
    }
    Ok(())
}

fn finish(
    pools: RatePools,
    stats: ResampleStats,
    target: usize,
) -> Result<ResampleOutcome, ResampleError> {
    let rate = stats.acceptance_rate();
    if stats.accepted < target {
        tracing::warn!(
            target: event_names::RESAMPLE_NOT_CONVERGED,
            stage = %Stage::Resample,
            target_count = target,
            accepted = stats.accepted,
            iterations = stats.iterations,
            acceptance_rate = rate,
            "iteration cap reached before the target count"
        );
        return Err(ConvergenceError {
            target,
            achieved: stats.accepted,
            iterations: stats.iterations,
            acceptance_rate: rate,
        }
        .into());
    }

    tracing::info!(
        target: event_names::RESAMPLE_FINISHED,
        stage = %Stage::Resample,
        accepted = stats.accepted,
        iterations = stats.iterations,
        age_inversions = stats.age_inversions,
        negative_rates = stats.negative_rates,
        rate_ceiling = stats.rate_ceiling,
        workers = stats.workers,
        acceptance_rate = rate,
        "resampling complete"
    );
    if rate < LOW_ACCEPTANCE {
        tracing::warn!(
            target: event_names::RESAMPLE_LOW_ACCEPTANCE,
            stage = %Stage::Resample,
            acceptance_rate = rate,
            "acceptance rate below 1%; marker PDFs overlap heavily"
        );
    }
    Ok(ResampleOutcome { pools, stats })
}

/// Single-threaded run drawing every uniform from `source`.
///
/// Runs are a pure function of the uniform sequence; `workers` and `seed`
/// in `settings` are ignored.
pub fn resample_with_source<S: UniformSource>(
    chain: &MarkerChain,
    settings: &ResampleSettings,
    source: &mut S,
) -> Result<ResampleOutcome, ResampleError> {
    check_settings(settings)?;
    let (pools, stats) = run_loop(
        chain,
        settings.target_count,
        settings.max_iterations,
        settings.max_rate,
        source,
    );
    finish(pools, stats, settings.target_count)
}

/// Run constrained resampling with the configured worker count.
///
/// With more than one worker the run proceeds in rounds. Each round splits
/// its share of the remaining iteration cap across workers; every worker
/// draws from its own RNG (seeded from `seed + worker_index` when a seed is
/// set) until it alone could fill the remaining target or its slice runs out.
/// Chunks are then taken in worker order until the pools hold
/// `target_count` draws, and only the iterations behind the kept draws are
/// counted. The cap is therefore global: a run fails only after
/// `max_iterations` iterations, and a fixed seed and worker count reproduce it
/// exactly.
pub fn resample(
    chain: &MarkerChain,
    settings: &ResampleSettings,
) -> Result<ResampleOutcome, ResampleError> {
    check_settings(settings)?;
    let workers = worker_count(settings);
    let target = settings.target_count;
    let cap = settings.max_iterations;

    tracing::info!(
        target: event_names::RESAMPLE_STARTED,
        stage = %Stage::Resample,
        markers = chain.len(),
        intervals = chain.interval_count(),
        target_count = target,
        max_iterations = cap,
        workers = workers,
        "resampling started"
    );

    if workers == 1 {
        let mut rng = worker_rng(settings.seed, 0);
        let (pools, stats) = run_loop(chain, target, cap, settings.max_rate, &mut rng);
        return finish(pools, stats, target);
    }

    let mut rngs: Vec<StdRng> = (0..workers)
        .map(|index| worker_rng(settings.seed, index))
        .collect();
    let mut pools = RatePools::with_capacity(chain.interval_count(), target);
    let mut stats = ResampleStats {
        workers,
        ..ResampleStats::default()
    };
    let mut round = 0u32;

    while stats.accepted < target && stats.iterations < cap {
        let need = target - stats.accepted;
        let budget = round_budget(need, &stats, cap - stats.iterations, workers, round);
        let max_rate = settings.max_rate;

        let chunks = std::thread::scope(|scope| {
            let handles: Vec<_> = rngs
                .iter_mut()
                .enumerate()
                .map(|(index, rng)| {
                    let slice = share(budget, workers, index);
                    scope.spawn(move || {
                        let chunk = run_chunk(chain, need, slice, max_rate, rng);
                        tracing::debug!(
                            target: event_names::RESAMPLE_WORKER_DONE,
                            stage = %Stage::Resample,
                            worker = index,
                            round = round,
                            accepted = chunk.stats.accepted,
                            iterations = chunk.stats.iterations,
                            "worker finished round"
                        );
                        chunk
                    })
                })
                .collect();
            handles
                .into_iter()
                .enumerate()
                .map(|(index, handle)| {
                    handle
                        .join()
                        .map_err(|_| ResampleError::WorkerFailed { index })
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        for chunk in chunks {
            let room = target - stats.accepted;
            chunk.drain_into(&mut pools, &mut stats, room);
        }
        round += 1;
    }
    finish(pools, stats, target)
}
