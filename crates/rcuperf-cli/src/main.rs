// SPDX-License-Identifier: MIT OR Apache-2.0
//! rcuperf CLI binary - RCU and mutex benchmark sweeps and charts

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use rcuperf_capture::{CaptureParser, NumberFormat, ResultStore, load_directory};
use rcuperf_chart::{
    Chart, ChartOptions, ChartRenderer, KeyFilter, LegendLocation, RenderOutput, Scale,
    SeriesQuery, StyleTable, SvgRenderer, TextRenderer, build_default_series,
    DEFAULT_IMPLEMENTATION_PREFIX,
};
use rcuperf_core::{KeyCodec, KeyLayout, Metric};
use rcuperf_sweep::{ProcessLauncher, SweepConfig, SweepPlan, SweepRunner};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rcuperf")]
#[command(version, about, long_about = None)]
struct Args {
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for rcuperf CLI
#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark sweep
    Sweep {
        /// Directory containing the benchmark binaries
        #[arg(long = "bin-dir", value_name = "DIR")]
        bin_dir: PathBuf,

        /// Capture directory (deleted and recreated)
        #[arg(long = "result-dir", value_name = "DIR", default_value = "results")]
        result_dir: PathBuf,

        /// Sweep grid file (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the thread budget
        #[arg(long = "max-threads")]
        max_threads: Option<u32>,
    },
    /// Print the capture files a sweep would produce
    Plan {
        /// Sweep grid file (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the thread budget
        #[arg(long = "max-threads")]
        max_threads: Option<u32>,
    },
    /// Aggregate captures and chart one metric
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args)]
#[allow(clippy::struct_excessive_bools)]
struct AnalyzeArgs {
    /// Capture directory
    #[arg(long = "result-dir", value_name = "DIR", default_value = "results")]
    result_dir: PathBuf,

    /// Metric to chart (reader_sum, writer_sum, reader_av, writer_av)
    #[arg(short, long, default_value = "reader_sum")]
    metric: Metric,

    /// Leave out series whose name contains this text (repeatable)
    #[arg(long = "skip", value_name = "TEXT")]
    skip: Vec<String>,

    /// Leave out the userspace RCU series
    #[arg(long = "skip-urcu")]
    skip_urcu: bool,

    /// Leave out the mutex series
    #[arg(long = "skip-mtx")]
    skip_mtx: bool,

    /// Logarithmic y axis
    #[arg(long)]
    log: bool,

    /// Legend position, e.g. "lower right" or upper-left
    #[arg(long, value_name = "LOC", default_value = "lower right")]
    legend: LegendLocation,

    /// Write SVG files instead of printing tables
    #[arg(long)]
    save: bool,

    /// Directory for saved charts
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print the resolved charts as JSON
    #[arg(long, conflicts_with = "save")]
    json: bool,

    /// Only this dataset size
    #[arg(long = "dataset-size")]
    dataset_size: Option<u64>,

    /// Only this slow reader count
    #[arg(long = "total-readers")]
    total_readers: Option<u32>,

    /// Only this writer count
    #[arg(long)]
    writers: Option<u32>,

    /// Only this read kind (implies --with-read-kind)
    #[arg(long = "read-kind")]
    read_kind: Option<String>,

    /// Capture names carry a read kind field
    #[arg(long = "with-read-kind")]
    with_read_kind: bool,

    /// Extra series styles (TOML)
    #[arg(long, value_name = "FILE")]
    styles: Option<PathBuf>,

    /// Prefix removed from binary names to form series names
    #[arg(long = "strip-prefix", default_value = DEFAULT_IMPLEMENTATION_PREFIX)]
    strip_prefix: String,

    /// Numbers use '.' for grouping and ',' as decimal separator
    #[arg(long = "decimal-comma")]
    decimal_comma: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match &args.command {
        Commands::Sweep { .. } => handle_sweep(&args),
        Commands::Plan { .. } => handle_plan(&args),
        Commands::Analyze(analyze) => handle_analyze(analyze),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&PathBuf>, max_threads: Option<u32>) -> Result<SweepConfig> {
    let mut config = match path {
        Some(path) => SweepConfig::load(path)
            .with_context(|| format!("loading sweep config {}", path.display()))?,
        None => SweepConfig::default(),
    };
    if max_threads.is_some() {
        config.max_threads = max_threads;
        config.validate()?;
    }
    Ok(config)
}

fn build_plan(config: &SweepConfig) -> Result<SweepPlan> {
    let threads = config
        .thread_budget()
        .context("determining the thread budget")?;
    let plan = SweepPlan::new(config, threads)?;
    info!(runs = plan.len(), threads, "planned sweep");
    Ok(plan)
}

fn handle_sweep(args: &Args) {
    if let Commands::Sweep {
        bin_dir,
        result_dir,
        config,
        max_threads,
    } = &args.command
        && let Err(e) = run_sweep(bin_dir, result_dir, config.as_ref(), *max_threads)
    {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run_sweep(
    bin_dir: &Path,
    result_dir: &Path,
    config: Option<&PathBuf>,
    max_threads: Option<u32>,
) -> Result<()> {
    let config = load_config(config, max_threads)?;
    let plan = build_plan(&config)?;
    if plan.is_empty() {
        bail!("the sweep grid leaves no room for any reader thread");
    }

    let launcher = ProcessLauncher::new(bin_dir, config.tool.clone());
    let mut runner = SweepRunner::new(launcher, result_dir);
    runner
        .prepare_output_dir()
        .with_context(|| format!("preparing {}", runner.out_dir().display()))?;
    let summary = runner.run(&plan).context("sweep aborted")?;
    println!(
        "{} captures written to {}",
        summary.runs,
        summary.out_dir.display()
    );
    Ok(())
}

fn handle_plan(args: &Args) {
    if let Commands::Plan {
        config,
        max_threads,
    } = &args.command
        && let Err(e) = run_plan(config.as_ref(), *max_threads)
    {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run_plan(config: Option<&PathBuf>, max_threads: Option<u32>) -> Result<()> {
    let config = load_config(config, max_threads)?;
    let plan = build_plan(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for name in plan.file_names()? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

fn handle_analyze(args: &AnalyzeArgs) {
    if let Err(e) = run_analyze(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let styles = match &args.styles {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading styles {}", path.display()))?;
            StyleTable::from_toml_str(&text)
                .with_context(|| format!("loading styles {}", path.display()))?
        }
        None => StyleTable::default(),
    };

    let layout = if args.with_read_kind || args.read_kind.is_some() {
        KeyLayout::WithReadKind
    } else {
        KeyLayout::Basic
    };
    let number = if args.decimal_comma {
        NumberFormat::EUROPEAN
    } else {
        NumberFormat::ENGLISH
    };
    let parser = CaptureParser::standard(number)?;
    let report = load_directory(&args.result_dir, &KeyCodec::new(layout), &parser)
        .with_context(|| format!("loading captures from {}", args.result_dir.display()))?;
    if report.store.is_empty() {
        bail!("no captures found in {}", args.result_dir.display());
    }

    let filters = chart_filters(&report.store, args);
    if filters.is_empty() {
        bail!("no captures match the requested parameters");
    }

    let mut exclude = args.skip.clone();
    if args.skip_urcu {
        exclude.push("urcu".into());
    }
    if args.skip_mtx {
        exclude.push("mutex".into());
    }

    let mut charts = Vec::new();
    for filter in filters {
        let query = SeriesQuery {
            metric: args.metric,
            filter: filter.clone(),
            exclude: exclude.clone(),
        };
        let set = build_default_series(&report.store, &query, &args.strip_prefix);
        if set.is_empty() {
            warn!(%filter, metric = %args.metric, "nothing to chart");
            continue;
        }
        let mut options = ChartOptions::new(args.metric, filter);
        options.legend = args.legend;
        if args.log {
            options.scale = Scale::Log;
        }
        charts.push(Chart::new(&set, &styles, options)?);
    }

    if args.json {
        let output = serde_json::to_string_pretty(&charts)?;
        println!("{output}");
        return Ok(());
    }

    let mut renderer: Box<dyn ChartRenderer> = if args.save {
        Box::new(SvgRenderer::new(&args.output_dir))
    } else {
        Box::new(TextRenderer::new(io::stdout()))
    };
    for chart in &charts {
        let output = renderer
            .render(chart)
            .with_context(|| format!("rendering {}", chart.artifact_name()))?;
        if let RenderOutput::File(path) = output {
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Observed parameter combinations that agree with every explicit filter
/// argument.
fn chart_filters(store: &ResultStore, args: &AnalyzeArgs) -> Vec<KeyFilter> {
    KeyFilter::observed_combinations(store)
        .into_iter()
        .filter(|f| {
            args.dataset_size.is_none_or(|v| f.dataset_size == Some(v))
                && args.total_readers.is_none_or(|v| f.total_readers == Some(v))
                && args.writers.is_none_or(|v| f.writers == Some(v))
                && args
                    .read_kind
                    .as_deref()
                    .is_none_or(|v| f.read_kind.as_deref() == Some(v))
        })
        .collect()
}
