// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequential execution of a [`SweepPlan`].

use crate::plan::SweepPlan;
use rcuperf_core::{Error, ParameterKey, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Runs one benchmark and returns its combined output
pub trait BenchmarkLauncher {
    /// Run the benchmark for `key` to completion.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::ExternalProcessFailure`] or
    /// [`Error::ExternalProcessSpawn`] when the run does not succeed.
    fn launch(&mut self, key: &ParameterKey) -> Result<String>;
}

/// Launches `<tool...> <bin_dir>/<binary> <args...>` as a child process
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    bin_dir: PathBuf,
    tool: Vec<String>,
}

impl ProcessLauncher {
    /// Launcher for binaries in `bin_dir`, wrapped by `tool` (may be empty)
    #[must_use]
    pub fn new(bin_dir: impl Into<PathBuf>, tool: Vec<String>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            tool,
        }
    }

    /// Full argument vector for `key`
    #[must_use]
    pub fn command_line(&self, key: &ParameterKey) -> Vec<String> {
        let mut argv = self.tool.clone();
        argv.push(
            self.bin_dir
                .join(key.implementation())
                .to_string_lossy()
                .into_owned(),
        );
        argv.extend(key.benchmark_args());
        argv
    }
}

impl BenchmarkLauncher for ProcessLauncher {
    fn launch(&mut self, key: &ParameterKey) -> Result<String> {
        let argv = self.command_line(key);
        let command = argv.join(" ");
        let Some((program, args)) = argv.split_first() else {
            return Err(Error::config("empty command line"));
        };

        debug!(%command, "spawning benchmark");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| Error::ExternalProcessSpawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(Error::ExternalProcessFailure {
                command,
                status: output.status,
                stdout,
                stderr,
            });
        }
        Ok(stdout + &stderr)
    }
}

/// Outcome of a completed sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    /// Number of captures written
    pub runs: usize,
    /// Directory holding the captures
    pub out_dir: PathBuf,
}

/// Runs a plan one benchmark at a time and stores each capture
#[derive(Debug)]
pub struct SweepRunner<L> {
    launcher: L,
    out_dir: PathBuf,
}

impl<L: BenchmarkLauncher> SweepRunner<L> {
    /// Runner storing captures in `out_dir`
    #[must_use]
    pub fn new(launcher: L, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            launcher,
            out_dir: out_dir.into(),
        }
    }

    /// Capture directory
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Recover the launcher
    #[must_use]
    pub fn into_launcher(self) -> L {
        self.launcher
    }

    /// Delete the capture directory with all its content and create it
    /// again, empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the path exists but is not a directory,
    /// and [`Error::Io`] if removal or creation fails.
    pub fn prepare_output_dir(&self) -> Result<()> {
        match fs::symlink_metadata(&self.out_dir) {
            Ok(meta) if meta.is_dir() => {
                info!(dir = %self.out_dir.display(), "removing previous results");
                fs::remove_dir_all(&self.out_dir)?;
            }
            Ok(_) => {
                return Err(Error::config(format!(
                    "result path {} exists and is not a directory",
                    self.out_dir.display()
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&self.out_dir)?;
        Ok(())
    }

    /// Execute every run of `plan` in order, stopping at the first failure.
    ///
    /// Captures written before a failure are left in place.
    ///
    /// # Errors
    ///
    /// Propagates the launcher's error for the failing run, or
    /// [`Error::Io`] if a capture cannot be written.
    pub fn run(&mut self, plan: &SweepPlan) -> Result<SweepSummary> {
        let codec = plan.codec();
        let total = plan.len();
        for (index, run) in plan.runs().iter().enumerate() {
            let name = codec.file_name(&run.key, run.trial)?;
            info!(run = index + 1, total, key = %run.key, trial = run.trial, "running benchmark");
            let capture = self.launcher.launch(&run.key)?;
            fs::write(self.out_dir.join(&name), capture)?;
            debug!(file = %name, "stored capture");
        }
        info!(runs = total, dir = %self.out_dir.display(), "sweep complete");
        Ok(SweepSummary {
            runs: total,
            out_dir: self.out_dir.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;

    /// Echoes the key back as a capture and optionally fails at one run
    struct FakeLauncher {
        launched: Vec<ParameterKey>,
        fail_at: Option<usize>,
    }

    impl FakeLauncher {
        fn new() -> Self {
            Self {
                launched: Vec::new(),
                fail_at: None,
            }
        }
    }

    impl BenchmarkLauncher for FakeLauncher {
        fn launch(&mut self, key: &ParameterKey) -> Result<String> {
            if self.fail_at == Some(self.launched.len()) {
                return Err(Error::config("injected failure"));
            }
            self.launched.push(key.clone());
            Ok(format!("reader sum: {}\n", key.active_readers() * 100))
        }
    }

    fn plan() -> SweepPlan {
        let config = SweepConfig {
            binaries: vec!["measure_a".into()],
            dataset_sizes: vec![8196],
            total_readers: vec![0],
            writers: vec![1],
            read_kinds: Vec::new(),
            iterations: 2,
            max_threads: Some(3),
            tool: Vec::new(),
        };
        SweepPlan::new(&config, 3).unwrap()
    }

    #[test]
    fn test_runs_in_plan_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SweepRunner::new(FakeLauncher::new(), dir.path());
        let summary = runner.run(&plan()).unwrap();
        assert_eq!(summary.runs, 4);

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                "measure_a__8196__0__1__1.0",
                "measure_a__8196__0__1__1.1",
                "measure_a__8196__0__2__1.0",
                "measure_a__8196__0__2__1.1",
            ]
        );
        let capture = fs::read_to_string(dir.path().join("measure_a__8196__0__2__1.1")).unwrap();
        assert_eq!(capture, "reader sum: 200\n");

        let launched: Vec<u32> = runner
            .into_launcher()
            .launched
            .iter()
            .map(ParameterKey::active_readers)
            .collect();
        assert_eq!(launched, [1, 2, 1, 2]);
    }

    #[test]
    fn test_first_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let mut launcher = FakeLauncher::new();
        launcher.fail_at = Some(1);
        let mut runner = SweepRunner::new(launcher, dir.path());
        assert!(runner.run(&plan()).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(runner.into_launcher().launched.len(), 1);
    }

    #[test]
    fn test_prepare_output_dir_clears_previous_results() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("stale"), "old").unwrap();

        let runner = SweepRunner::new(FakeLauncher::new(), &out);
        runner.prepare_output_dir().unwrap();
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);

        let fresh = dir.path().join("fresh");
        SweepRunner::new(FakeLauncher::new(), &fresh)
            .prepare_output_dir()
            .unwrap();
        assert!(fresh.is_dir());
    }

    #[test]
    fn test_prepare_output_dir_refuses_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("results");
        fs::write(&file, "not a directory").unwrap();
        let runner = SweepRunner::new(FakeLauncher::new(), &file);
        assert!(matches!(runner.prepare_output_dir(), Err(Error::Config(_))));
        assert!(file.is_file());
    }

    #[test]
    fn test_command_line() {
        let launcher = ProcessLauncher::new("/opt/bench", vec!["perf".into(), "stat".into(), "-d".into()]);
        let key = ParameterKey::new("measure_rcuptr", 8196, 1, 2, 1)
            .unwrap()
            .with_read_kind("find")
            .unwrap();
        assert_eq!(
            launcher.command_line(&key),
            ["perf", "stat", "-d", "/opt/bench/measure_rcuptr", "8196", "1", "2", "1", "find"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_process_output_captured() {
        let mut launcher = ProcessLauncher::new("/bin", vec!["echo".into()]);
        let key = ParameterKey::new("measure_x", 8196, 0, 3, 1).unwrap();
        let output = launcher.launch(&key).unwrap();
        assert_eq!(output.trim(), "/bin/measure_x 8196 0 3 1");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_failure_surfaces_status() {
        let mut launcher = ProcessLauncher::new("/bin", vec!["false".into()]);
        let key = ParameterKey::new("measure_x", 1, 0, 1, 1).unwrap();
        let err = launcher.launch(&key).unwrap_err();
        match err {
            Error::ExternalProcessFailure {
                command, status, ..
            } => {
                assert!(command.starts_with("false /bin/measure_x"));
                assert!(!status.success());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_process_failure_carries_output() {
        let tool = ["sh", "-c", "echo out; echo err >&2; exit 3"]
            .map(String::from)
            .to_vec();
        let mut launcher = ProcessLauncher::new("/bin", tool);
        let key = ParameterKey::new("measure_x", 1, 0, 1, 1).unwrap();
        let err = launcher.launch(&key).unwrap_err();
        let msg = err.to_string();
        match err {
            Error::ExternalProcessFailure {
                status,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stdout, "out\n");
                assert_eq!(stderr, "err\n");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(msg.contains("--- stdout ---\nout\n"));
        assert!(msg.contains("--- stderr ---\nerr\n"));
    }

    #[test]
    fn test_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut launcher = ProcessLauncher::new(dir.path(), Vec::new());
        let key = ParameterKey::new("measure_missing", 1, 0, 1, 1).unwrap();
        assert!(matches!(
            launcher.launch(&key),
            Err(Error::ExternalProcessSpawn { .. })
        ));
    }
}
