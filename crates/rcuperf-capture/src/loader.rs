// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loading a result directory into a [`ResultStore`].
//!
//! Files are processed one at a time in file name order. A file whose name
//! does not decode, or whose content cannot be read, is reported and skipped
//! so that one stray file never hides the rest of a sweep.

use crate::aggregate::ResultStore;
use crate::parser::CaptureParser;
use rcuperf_core::{Error, KeyCodec, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A capture file that was not aggregated
#[derive(Debug)]
pub struct SkippedCapture {
    /// Path of the skipped file
    pub path: PathBuf,
    /// Why it was skipped
    pub error: Error,
}

/// Outcome of [`load_directory`]
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Aggregated trials
    pub store: ResultStore,
    /// Number of files aggregated
    pub loaded: usize,
    /// Files that were skipped
    pub skipped: Vec<SkippedCapture>,
}

/// Decode, parse and aggregate every regular file in `dir`.
///
/// # Errors
///
/// Returns [`Error::Io`] only if the directory itself cannot be listed;
/// per-file failures end up in [`LoadReport::skipped`].
pub fn load_directory(dir: &Path, codec: &KeyCodec, parser: &CaptureParser) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(error) => {
                report.skip(dir.to_path_buf(), error.into());
                continue;
            }
        };
        // Follows symlinks
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => paths.push(path),
            Ok(_) => debug!(path = %path.display(), "not a regular file"),
            Err(error) => report.skip(path, error.into()),
        }
    }
    paths.sort();

    for path in paths {
        match load_file(&path, codec, parser, &mut report.store) {
            Ok(()) => report.loaded += 1,
            Err(error) => report.skip(path, error),
        }
    }

    info!(
        dir = %dir.display(),
        loaded = report.loaded,
        skipped = report.skipped.len(),
        keys = report.store.len(),
        "loaded captures"
    );
    Ok(report)
}

impl LoadReport {
    fn skip(&mut self, path: PathBuf, error: Error) {
        if error.is_recoverable() {
            info!(path = %path.display(), %error, "skipping file");
        } else {
            warn!(path = %path.display(), %error, "skipping capture");
        }
        self.skipped.push(SkippedCapture { path, error });
    }
}

fn load_file(
    path: &Path,
    codec: &KeyCodec,
    parser: &CaptureParser,
    store: &mut ResultStore,
) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::malformed_key(path.display().to_string(), "non UTF-8 file name"))?;
    let key = codec.parse_file_name(name)?;
    let bytes = fs::read(path)?;
    let capture = parser.parse(&String::from_utf8_lossy(&bytes));
    debug!(%key, values = capture.observations().len(), "parsed capture");
    store.record(key, &capture);
    Ok(())
}
