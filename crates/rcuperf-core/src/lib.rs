// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types, error handling, and trial statistics for rcuperf
//!
//! This crate provides the foundational types shared by the sweep and the
//! result pipeline:
//!
//! - [`error`] - Error taxonomy and Result alias
//! - [`key`] - Parameter keys and their file name encoding
//! - [`metric`] - Metrics extracted from benchmark captures
//! - [`reduce`] - Outlier-trimmed reduction of repeated trials

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Error types for rcuperf operations
pub mod error;
/// Parameter keys and the capture file name codec
pub mod key;
/// Metrics reported by the benchmark binaries
pub mod metric;
/// Reduction of repeated trial values to one representative number
pub mod reduce;
// Re-exports for convenience
pub use error::{Error, Result};
pub use key::{FIELD_DELIMITER, KeyCodec, KeyLayout, ParameterKey, TRIAL_DELIMITER};
pub use metric::Metric;
pub use reduce::{MIN_TRIALS, trimmed_mean};
