// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capture parsing and trial aggregation for rcuperf
//!
//! Turns the raw text written by benchmark runs back into structured data:
//!
//! - [`number`] - Locale-aware number parsing
//! - [`parser`] - Pattern rules extracting metric values from capture text
//! - [`aggregate`] - Per-key accumulation of repeated trials
//! - [`loader`] - Loading a whole result directory

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Per-key trial aggregation
pub mod aggregate;
/// Result directory loading
pub mod loader;
/// Locale-aware number parsing
pub mod number;
/// Capture text parsing
pub mod parser;

pub use aggregate::{ResultStore, TrialAggregate};
pub use loader::{LoadReport, SkippedCapture, load_directory};
pub use number::NumberFormat;
pub use parser::{CaptureParser, CaptureRule, RawCapture, RuleSet};
