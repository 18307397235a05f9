// SPDX-License-Identifier: MIT OR Apache-2.0
//! Benchmark sweeps for rcuperf
//!
//! A sweep runs every benchmark binary over a grid of parameters, several
//! times each, and stores the raw output of every run in its own capture
//! file. Runs are strictly sequential so that benchmarks never compete for
//! cores.
//!
//! - [`config`] - The sweep grid, loaded from TOML
//! - [`plan`] - Expansion of the grid into an ordered list of runs
//! - [`runner`] - Process launching and capture storage

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Sweep grid configuration
pub mod config;
/// Run planning
pub mod plan;
/// Sequential execution
pub mod runner;

pub use config::SweepConfig;
pub use plan::{PlannedRun, SweepPlan};
pub use runner::{BenchmarkLauncher, ProcessLauncher, SweepRunner, SweepSummary};
