//! RISeR math: PDF tables, sampling, density estimation and probable ranges.

pub mod math;

pub use math::pdf::{DomainError, PdfTable};
pub use math::sampler::{sample, InverseTransformSampler, ReplayUniforms, UniformSource};
pub use math::density::{
    estimate_density, select_bandwidth, Bandwidth, BinCount, DensityError, DensityMode,
    DensityOptions, Smoothing,
};
pub use math::ranges::{
    hpd, iqr, summarize, HpdInterval, HpdRanges, QuantileRange, RangeError, RangeMethod,
    RangeSummary, DEFAULT_HPD_RESOLUTION,
};
pub use math::parametric::{Distribution, DistributionKind, DEFAULT_POINTS};
pub use math::quotient::{divide, QuotientError, QuotientOptions};
pub use math::numeric;
