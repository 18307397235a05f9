// SPDX-License-Identifier: MIT OR Apache-2.0
//! Expansion of a [`SweepConfig`] into individual runs.

use crate::config::SweepConfig;
use rcuperf_core::{KeyCodec, KeyLayout, ParameterKey, Result};
use tracing::warn;

/// One benchmark invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRun {
    /// Parameters passed to the binary
    pub key: ParameterKey,
    /// Trial index, used as the capture file suffix
    pub trial: u32,
}

/// Every run of a sweep, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPlan {
    layout: KeyLayout,
    runs: Vec<PlannedRun>,
}

impl SweepPlan {
    /// Expand `config` for a machine with `threads` hardware threads.
    ///
    /// Runs are ordered iteration first, then binary, slow readers, dataset
    /// size, writers and read kind, with the active reader count varying
    /// fastest from 1 up to whatever the writers and slow readers leave of
    /// the thread budget. A combination that leaves no room for an active
    /// reader is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`rcuperf_core::Error::MalformedKey`] if a binary name or
    /// read kind is not a legal file name token.
    pub fn new(config: &SweepConfig, threads: u32) -> Result<Self> {
        let kinds: Vec<Option<&str>> = if config.read_kinds.is_empty() {
            vec![None]
        } else {
            config.read_kinds.iter().map(|k| Some(k.as_str())).collect()
        };

        let mut runs = Vec::new();
        for trial in 0..config.iterations {
            for binary in &config.binaries {
                for &all in &config.total_readers {
                    for &size in &config.dataset_sizes {
                        for &writers in &config.writers {
                            let max_readers = threads
                                .checked_sub(writers)
                                .and_then(|t| t.checked_sub(all))
                                .unwrap_or(0);
                            if max_readers == 0 {
                                if trial == 0 {
                                    warn!(
                                        binary = %binary,
                                        size,
                                        all,
                                        writers,
                                        threads,
                                        "no thread left for active readers, skipping"
                                    );
                                }
                                continue;
                            }
                            for kind in &kinds {
                                for readers in 1..=max_readers {
                                    let mut key =
                                        ParameterKey::new(binary.as_str(), size, all, readers, writers)?;
                                    if let Some(kind) = kind {
                                        key = key.with_read_kind(*kind)?;
                                    }
                                    runs.push(PlannedRun { key, trial });
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(Self {
            layout: config.layout(),
            runs,
        })
    }

    /// Layout the capture file names use
    #[must_use]
    pub const fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Codec for this plan's capture file names
    #[must_use]
    pub const fn codec(&self) -> KeyCodec {
        KeyCodec::new(self.layout)
    }

    /// Runs in execution order
    #[must_use]
    pub fn runs(&self) -> &[PlannedRun] {
        &self.runs
    }

    /// Number of runs
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether there is nothing to run
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Capture file name of every run, in execution order.
    ///
    /// # Errors
    ///
    /// See [`KeyCodec::file_name`].
    pub fn file_names(&self) -> Result<Vec<String>> {
        let codec = self.codec();
        self.runs
            .iter()
            .map(|run| codec.file_name(&run.key, run.trial))
            .collect()
    }
}
