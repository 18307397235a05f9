// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error taxonomy shared by every rcuperf crate.
//!
//! Each variant carries its own recovery policy: malformed capture names are
//! skipped, insufficient trial data omits a single chart point, and the rest
//! abort the current operation.

use std::process::ExitStatus;

/// Result alias used across rcuperf
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors produced by the sweep and the result pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A capture file name (or token sequence) does not decode to a key
    #[error("malformed key {input:?}: {reason}")]
    MalformedKey {
        /// The offending input
        input: String,
        /// Why decoding failed
        reason: String,
    },

    /// Too few trial values to apply the trimming policy
    #[error("insufficient data: {available} value(s) available, at least {required} required")]
    InsufficientData {
        /// Number of values that were available
        available: usize,
        /// Number of values the reducer needs
        required: usize,
    },

    /// A series has no entry in the style table
    #[error("no style configured for series {series:?}")]
    UnknownSeriesStyle {
        /// Series identity that failed the lookup
        series: String,
    },

    /// A benchmark process exited unsuccessfully
    #[error("command `{command}` failed with {status}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    ExternalProcessFailure {
        /// Rendered command line
        command: String,
        /// Exit status of the process
        status: ExitStatus,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// A benchmark process could not be started
    #[error("failed to run `{command}`: {source}")]
    ExternalProcessSpawn {
        /// Rendered command line
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("config: {0}")]
    Config(String),

    /// Chart rendering failed
    #[error("render: {0}")]
    Render(String),

    /// I/O failure
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::MalformedKey`]
    pub fn malformed_key(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`Error::Config`]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`Error::Render`]
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether the analysis pipeline may skip the failing item and continue
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedKey { .. } | Self::InsufficientData { .. }
        )
    }
}
