// SPDX-License-Identifier: MIT OR Apache-2.0
//! Metrics reported by the benchmark binaries.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A named measurement printed by a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total read operations per second across all readers
    ReaderSum,
    /// Total write operations per second across all writers
    WriterSum,
    /// Read operations per second per reader
    #[serde(rename = "reader_av")]
    ReaderAverage,
    /// Write operations per second per writer
    #[serde(rename = "writer_av")]
    WriterAverage,
}

impl Metric {
    /// Every metric, in capture rule order
    pub const ALL: [Self; 4] = [
        Self::ReaderSum,
        Self::WriterSum,
        Self::ReaderAverage,
        Self::WriterAverage,
    ];

    /// Canonical name (`reader_sum`, `writer_av`, ...)
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReaderSum => "reader_sum",
            Self::WriterSum => "writer_sum",
            Self::ReaderAverage => "reader_av",
            Self::WriterAverage => "writer_av",
        }
    }

    /// Label preceding the value in benchmark output (`reader sum: 1234`)
    #[must_use]
    pub const fn capture_label(self) -> &'static str {
        match self {
            Self::ReaderSum => "reader sum",
            Self::WriterSum => "writer sum",
            Self::ReaderAverage => "reader av",
            Self::WriterAverage => "writer av",
        }
    }

    /// Human readable y-axis label
    #[must_use]
    pub const fn axis_label(self) -> &'static str {
        match self {
            Self::ReaderSum => "Number of Read Operations / second",
            Self::WriterSum => "Number of Write Operations / second",
            Self::ReaderAverage => "Average Read Operations / second per Reader",
            Self::WriterAverage => "Average Write Operations / second per Writer",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|m| m.name()).collect();
                Error::config(format!(
                    "unknown metric {s:?} (expected one of {})",
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_unknown_metric() {
        let err = "reader_total".parse::<Metric>().unwrap_err();
        assert!(err.to_string().contains("reader_sum"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Metric::ReaderSum.capture_label(), "reader sum");
        assert_eq!(
            Metric::WriterSum.axis_label(),
            "Number of Write Operations / second"
        );
    }
}
