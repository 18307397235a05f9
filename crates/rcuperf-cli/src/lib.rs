// SPDX-License-Identifier: MIT OR Apache-2.0
//! # rcuperf-cli
//!
//! Command-line interface for rcuperf: run RCU and mutex benchmark sweeps
//! and turn the captured output into comparison charts.
//!
//! ## Usage
//!
//! ```bash
//! # Run every benchmark over the default grid (wipes ./results first)
//! rcuperf sweep --bin-dir build/ --result-dir results
//!
//! # Show what a sweep would run
//! rcuperf plan --config sweep.toml
//!
//! # Print one table per parameter combination
//! rcuperf analyze --result-dir results --metric reader_sum
//!
//! # Save log-scale SVG charts without the userspace RCU series
//! rcuperf analyze --metric writer_av --log --skip urcu --save --output-dir charts
//! ```
//!
//! ## Subcommands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sweep` | Run the benchmark grid, one capture file per run |
//! | `plan` | List the capture files a sweep would produce |
//! | `analyze` | Aggregate captures, reduce trials and render charts |
//!
//! ## Library Usage
//!
//! This crate is primarily a CLI tool. For programmatic access use the
//! library crates directly, or the `rcuperf` umbrella crate.

#![warn(missing_docs)]

/// Re-export of rcuperf-core for keys, metrics and errors.
pub use rcuperf_core as core;

/// Re-export of rcuperf-capture for capture parsing.
pub use rcuperf_capture as capture;

/// Re-export of rcuperf-chart for series and rendering.
pub use rcuperf_chart as chart;

/// Re-export of rcuperf-sweep for sweep execution.
pub use rcuperf_sweep as sweep;
