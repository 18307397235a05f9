// SPDX-License-Identifier: MIT OR Apache-2.0
//! # rcuperf
//!
//! Benchmark sweeps and result charts for RCU and mutex implementations.
//!
//! A sweep runs each benchmark binary over a grid of dataset sizes and
//! thread counts, storing every run's output in a capture file whose name
//! encodes the parameters. The analysis side reads those files back,
//! reduces repeated trials with a trimmed mean and draws one curve per
//! implementation.
//!
//! ```no_run
//! use rcuperf::capture::{CaptureParser, NumberFormat, load_directory};
//! use rcuperf::chart::{Chart, ChartOptions, ChartRenderer, KeyFilter, SeriesQuery,
//!     StyleTable, SvgRenderer, build_default_series, DEFAULT_IMPLEMENTATION_PREFIX};
//! use rcuperf::core::{KeyCodec, Metric};
//! use std::path::Path;
//!
//! # fn main() -> rcuperf::core::Result<()> {
//! let parser = CaptureParser::standard(NumberFormat::default())?;
//! let report = load_directory(Path::new("results"), &KeyCodec::default(), &parser)?;
//!
//! let filter = KeyFilter::any().with_dataset_size(8196).with_total_readers(0).with_writers(1);
//! let query = SeriesQuery::new(Metric::ReaderSum).with_filter(filter.clone());
//! let set = build_default_series(&report.store, &query, DEFAULT_IMPLEMENTATION_PREFIX);
//!
//! let chart = Chart::new(&set, &StyleTable::default(), ChartOptions::new(Metric::ReaderSum, filter))?;
//! SvgRenderer::new("charts").render(&chart)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - [`core`] - Keys, metrics, errors and the trimmed mean
//! - [`capture`] - Capture parsing and trial aggregation
//! - [`chart`] - Series grouping, styles and renderers
//! - [`sweep`] - Sweep planning and execution

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Keys, metrics, errors and the trimmed mean
pub use rcuperf_core as core;

/// Capture parsing and trial aggregation
pub use rcuperf_capture as capture;

/// Series grouping, styles and renderers
pub use rcuperf_chart as chart;

/// Sweep planning and execution
pub use rcuperf_sweep as sweep;

pub use rcuperf_core::{Error, Metric, ParameterKey, Result};
