// SPDX-License-Identifier: MIT OR Apache-2.0
//! The sweep grid.
//!
//! Every field is optional in the TOML file; missing fields keep the
//! defaults of the reference sweep:
//!
//! ```toml
//! binaries = ["measure_std_mutex", "measure_rcuptr"]
//! dataset_sizes = [8196]
//! iterations = 3
//! max_threads = 8
//! ```

use rcuperf_core::{Error, KeyLayout, ParameterKey, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;

const DEFAULT_BINARIES: [&str; 6] = [
    "measure_std_mutex",
    "measure_rcuptr",
    "measure_rcuptr_jss",
    "measure_tbb_qrw_mutex",
    "measure_tbb_srw_mutex",
    "measure_urcu_bp",
];

/// Parameter grid and execution settings of a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Benchmark binary names, looked up in the binary directory
    pub binaries: Vec<String>,
    /// Dataset sizes
    pub dataset_sizes: Vec<u64>,
    /// Slow reader counts
    pub total_readers: Vec<u32>,
    /// Writer counts
    pub writers: Vec<u32>,
    /// Read-operation kinds; empty when the binaries take no kind argument
    pub read_kinds: Vec<String>,
    /// Trials per combination
    pub iterations: u32,
    /// Thread budget shared by writers and readers; defaults to the
    /// available parallelism
    pub max_threads: Option<u32>,
    /// Wrapper command placed before the binary
    pub tool: Vec<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            binaries: DEFAULT_BINARIES.iter().map(ToString::to_string).collect(),
            dataset_sizes: vec![8196, 131_072, 1_048_576],
            total_readers: vec![0, 1],
            writers: vec![1],
            read_kinds: Vec::new(),
            iterations: 5,
            max_threads: None,
            tool: vec!["perf".into(), "stat".into(), "-d".into()],
        }
    }
}

impl SweepConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document does not parse or fails
    /// [`SweepConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| Error::config(format!("invalid sweep config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise see
    /// [`SweepConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Check that the grid is non-empty and every name is a legal file
    /// name token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let grids = [
            ("binaries", self.binaries.is_empty()),
            ("dataset_sizes", self.dataset_sizes.is_empty()),
            ("total_readers", self.total_readers.is_empty()),
            ("writers", self.writers.is_empty()),
        ];
        if let Some((name, _)) = grids.iter().find(|(_, empty)| *empty) {
            return Err(Error::config(format!("{name} must not be empty")));
        }
        if self.iterations == 0 {
            return Err(Error::config("iterations must be at least 1"));
        }
        if self.max_threads == Some(0) {
            return Err(Error::config("max_threads must be at least 1"));
        }
        for binary in &self.binaries {
            ParameterKey::new(binary.as_str(), 0, 0, 0, 0)
                .map_err(|e| Error::config(format!("binary name: {e}")))?;
        }
        if let Some(binary) = self.binaries.first() {
            for kind in &self.read_kinds {
                ParameterKey::new(binary.as_str(), 0, 0, 0, 0)
                    .and_then(|key| key.with_read_kind(kind.as_str()))
                    .map_err(|e| Error::config(format!("read kind: {e}")))?;
            }
        }
        Ok(())
    }

    /// Key layout of the captures this sweep produces
    #[must_use]
    pub fn layout(&self) -> KeyLayout {
        if self.read_kinds.is_empty() {
            KeyLayout::Basic
        } else {
            KeyLayout::WithReadKind
        }
    }

    /// Thread budget: `max_threads`, or the available parallelism.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the parallelism cannot be determined.
    pub fn thread_budget(&self) -> Result<u32> {
        if let Some(threads) = self.max_threads {
            return Ok(threads);
        }
        let available = thread::available_parallelism().map(NonZeroUsize::get)?;
        Ok(u32::try_from(available).unwrap_or(u32::MAX))
    }
}
