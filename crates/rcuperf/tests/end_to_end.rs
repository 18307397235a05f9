// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sweep output through to charts

use proptest::prelude::*;
use rcuperf::capture::{CaptureParser, NumberFormat, load_directory};
use rcuperf::chart::{
    Chart, ChartOptions, ChartRenderer, DEFAULT_IMPLEMENTATION_PREFIX, KeyFilter, RenderOutput,
    SeriesQuery, StyleTable, SvgRenderer, TextRenderer, build_default_series,
};
use rcuperf::core::{KeyCodec, KeyLayout, Metric, ParameterKey};
use rcuperf::sweep::{BenchmarkLauncher, SweepConfig, SweepPlan, SweepRunner};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn parser() -> CaptureParser {
    CaptureParser::standard(NumberFormat::default()).unwrap()
}

fn pinned() -> KeyFilter {
    KeyFilter::any()
        .with_dataset_size(8196)
        .with_total_readers(0)
        .with_writers(1)
}

#[test]
fn test_trimmed_series_from_capture_files() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, text: &str| fs::write(dir.path().join(name), text).unwrap();
    write("A__8196__0__2__1.0", "reader sum: 100\n");
    write("A__8196__0__2__1.1", "reader sum: 200\n");
    write("A__8196__0__2__1.2", "reader sum: 300\n");
    write(
        "A__8196__0__4__1.0",
        "reader sum: 400\nreader sum: 500\nreader sum: 600\n",
    );

    let report = load_directory(dir.path(), &KeyCodec::default(), &parser()).unwrap();
    assert_eq!(report.loaded, 4);

    let query = SeriesQuery::new(Metric::ReaderSum).with_filter(pinned());
    let set = build_default_series(&report.store, &query, DEFAULT_IMPLEMENTATION_PREFIX);
    let a = set.get("A").unwrap();
    assert_eq!(a.points().collect::<Vec<_>>(), [(2, 200.0), (4, 500.0)]);
    assert!(set.omitted.is_empty());
}

/// Emits a reader sum that depends on the implementation and thread count,
/// plus a per-trial jitter that the trimmed mean must remove.
struct SyntheticBenchmark {
    calls: HashMap<ParameterKey, u32>,
}

impl BenchmarkLauncher for SyntheticBenchmark {
    fn launch(&mut self, key: &ParameterKey) -> rcuperf::Result<String> {
        let call = self.calls.entry(key.clone()).or_insert(0);
        let jitter = match *call {
            0 => 0,
            1 => 1_000,
            _ => 50,
        };
        *call += 1;
        let base = match key.implementation() {
            "measure_rcuptr" => 10_000,
            _ => 1_000,
        };
        let sum = base * key.active_readers() + jitter;
        Ok(format!(
            "reader sum: {sum}\nwriter sum: 7\n\n Performance counter stats for '{}':\n",
            key.implementation()
        ))
    }
}

fn run_sweep(out: &Path) -> SweepPlan {
    let config = SweepConfig {
        binaries: vec!["measure_rcuptr".into(), "measure_std_mutex".into()],
        dataset_sizes: vec![8196],
        total_readers: vec![0, 1],
        writers: vec![1],
        read_kinds: Vec::new(),
        iterations: 3,
        max_threads: Some(4),
        tool: Vec::new(),
    };
    let plan = SweepPlan::new(&config, config.thread_budget().unwrap()).unwrap();
    let mut runner = SweepRunner::new(
        SyntheticBenchmark {
            calls: HashMap::new(),
        },
        out,
    );
    runner.prepare_output_dir().unwrap();
    let summary = runner.run(&plan).unwrap();
    assert_eq!(summary.runs, plan.len());
    plan
}

#[test]
fn test_sweep_then_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    let plan = run_sweep(&results);
    assert_eq!(plan.layout(), KeyLayout::Basic);

    let report = load_directory(&results, &plan.codec(), &parser()).unwrap();
    assert_eq!(report.loaded, plan.len());
    assert!(report.skipped.is_empty());

    let combos = KeyFilter::observed_combinations(&report.store);
    assert_eq!(
        combos,
        [pinned(), KeyFilter::any().with_dataset_size(8196).with_total_readers(1).with_writers(1)]
    );

    let query = SeriesQuery::new(Metric::ReaderSum).with_filter(pinned());
    let set = build_default_series(&report.store, &query, DEFAULT_IMPLEMENTATION_PREFIX);
    // Jitter 0, 1000 and 50: the trimmed mean keeps only the 50
    let rcuptr = set.get("rcuptr").unwrap();
    assert_eq!(
        rcuptr.points().collect::<Vec<_>>(),
        [(1, 10_050.0), (2, 20_050.0), (3, 30_050.0)]
    );
    assert_eq!(set.get("std_mutex").unwrap().get(3), Some(3_050.0));

    let chart = Chart::new(
        &set,
        &StyleTable::default(),
        ChartOptions::new(Metric::ReaderSum, pinned()),
    )
    .unwrap();

    let mut text = TextRenderer::new(Vec::new());
    text.render(&chart).unwrap();
    let table = String::from_utf8(text.into_inner()).unwrap();
    assert!(table.contains("20050.0"));
    assert!(table.contains("std mutex"));

    let mut svg = SvgRenderer::new(dir.path().join("charts"));
    let RenderOutput::File(path) = svg.render(&chart).unwrap() else {
        panic!("svg renderer should write a file");
    };
    assert!(path.ends_with("res_reader_sum_8196_0_1.svg"));
    assert!(fs::read_to_string(path).unwrap().contains("rcuptr"));
}

#[test]
fn test_second_sweep_replaces_results() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    run_sweep(&results);
    fs::write(results.join("measure_old__1__0__1__1.0"), "reader sum: 1\n").unwrap();
    let plan = run_sweep(&results);

    let report = load_directory(&results, &plan.codec(), &parser()).unwrap();
    assert_eq!(report.loaded, plan.len());
    assert!(
        report
            .store
            .iter()
            .all(|(key, _)| key.implementation() != "measure_old")
    );
}

#[test]
fn test_short_sweep_omits_points() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("measure_urcu__8196__0__1__1.0"), "reader sum: 5\n").unwrap();
    fs::write(dir.path().join("measure_urcu__8196__0__1__1.1"), "reader sum: 6\n").unwrap();

    let report = load_directory(dir.path(), &KeyCodec::default(), &parser()).unwrap();
    let query = SeriesQuery::new(Metric::ReaderSum).with_filter(pinned());
    let set = build_default_series(&report.store, &query, DEFAULT_IMPLEMENTATION_PREFIX);
    assert!(set.is_empty());
    assert_eq!(set.omitted.len(), 1);
    assert_eq!(set.omitted[0].series, "urcu");
    assert_eq!(set.omitted[0].available, 2);
}

/// Loads the captures written in `order` and groups them
fn series_from_files(files: &[(String, u32)], order: &[usize]) -> rcuperf::chart::SeriesSet {
    let dir = tempfile::tempdir().unwrap();
    for &i in order {
        let (name, value) = &files[i];
        fs::write(dir.path().join(name), format!("reader sum: {value}\n")).unwrap();
    }
    let report = load_directory(dir.path(), &KeyCodec::default(), &parser()).unwrap();
    assert_eq!(report.loaded, files.len());
    let query = SeriesQuery::new(Metric::ReaderSum).with_filter(pinned());
    build_default_series(&report.store, &query, DEFAULT_IMPLEMENTATION_PREFIX)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_file_write_order_does_not_change_series(
        values in prop::collection::vec(1_u32..100_000, 12),
        order in Just((0..12).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let files: Vec<(String, u32)> = ["measure_rcuptr", "measure_urcu"]
            .iter()
            .flat_map(|bin| (1..=2).flat_map(move |readers| {
                (0..3).map(move |trial| format!("{bin}__8196__0__{readers}__1.{trial}"))
            }))
            .zip(values)
            .collect();
        let in_order: Vec<usize> = (0..files.len()).collect();

        let expected = series_from_files(&files, &in_order);
        prop_assert_eq!(expected.series.len(), 2);
        prop_assert_eq!(expected, series_from_files(&files, &order));
    }
}
