//! RISeR core library
//!
//! Incremental slip rates from dated, offset geomorphic markers:
//! - Constrained resampling of marker ages and displacements
//! - Per-interval density estimation and probable ranges
//! - PDF and marker list files
//! - Settings loading, exit codes and structured logging for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod analysis;
pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod markers;
pub mod output;
pub mod pdf_file;
pub mod pipeline;
pub mod resample;
