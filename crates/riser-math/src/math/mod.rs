//! Core math modules.

pub mod numeric;
pub mod pdf;
pub mod sampler;
pub mod density;
pub mod ranges;
pub mod parametric;
pub mod quotient;
