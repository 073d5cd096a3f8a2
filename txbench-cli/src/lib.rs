#![warn(missing_docs)]
//! TxBench CLI Library
//!
//! This module provides the command line harness around the registered
//! dispatch benchmarks. Use `txbench::run()` (or `txbench_cli::run()`) in a
//! main function to get the full CLI.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = txbench_cli::run() {
//!         eprintln!("Error: {e}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    BenchExecutionResult, ExecutionConfig, Executor, build_report, build_speedup_comparison,
    compute_statistics, format_human_output,
};
pub use planner::{ExecutionPlan, build_plan};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use regex::Regex;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use txbench_core::{
    BASELINE_ID, BenchmarkDef, DispatchConfig, DispatchStrategy, registered_benchmarks,
};
use txbench_report::{
    Comparison, OutputFormat, Report, generate_csv_report, generate_json_report,
    parse_json_report,
};
use txbench_stats::{ChangeKind, OutlierMethod, classify_change, relative_change};

/// TxBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "txbench")]
#[command(
    author,
    version,
    about = "TxBench - sequential vs concurrent dispatch of a simulated transaction workload"
)]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter benchmarks by regex pattern on their id
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Run only these strategies (repeatable): sequential, default, io, unconfined, main
    #[arg(long = "strategy", short = 's')]
    pub strategies: Vec<DispatchStrategy>,

    /// Run benchmarks for this group only (sequential, concurrent)
    #[arg(long)]
    pub group: Option<String>,

    /// Output format: human, json, csv (defaults to txbench.toml, then human)
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Iterations run and discarded before measurement
    #[arg(long)]
    pub warmup_iterations: Option<u64>,

    /// Measured iterations per benchmark
    #[arg(long, short = 'n')]
    pub iterations: Option<u64>,

    /// Transactions per iteration
    #[arg(long)]
    pub transactions: Option<u64>,

    /// Length of one delay unit (e.g. "1ms", "100us")
    #[arg(long)]
    pub time_unit: Option<String>,

    /// Worker threads for the default pool
    #[arg(long)]
    pub default_workers: Option<usize>,

    /// Worker threads for the I/O pool
    #[arg(long)]
    pub io_workers: Option<usize>,

    /// Number of threads for parallel statistics computation
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,

    /// Load baseline for comparison
    /// Optionally specify a path; defaults to config or target/txbench/baseline.json
    #[arg(long, num_args = 0..=1)]
    pub baseline: Option<Option<PathBuf>>,

    /// Save benchmark results as baseline JSON
    /// Optionally specify a path; defaults to config or target/txbench/baseline.json
    #[arg(long, num_args = 0..=1)]
    pub save_baseline: Option<Option<PathBuf>>,

    /// Regression threshold percentage
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the benchmarks that would run
    List,
    /// Run benchmarks (default)
    Run,
    /// Write a default txbench.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the TxBench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong, including
/// failed or crashed benchmarks and regressions against a baseline.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the TxBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    // Discover txbench.toml configuration (CLI flags override)
    let config = TxBenchConfig::discover()?.unwrap_or_default();

    match cli.command {
        Some(Commands::List) => list_benchmarks(&cli, &config),
        Some(Commands::Run) | None => run_benchmarks(&cli, &config),
        Some(Commands::Init { force }) => {
            TxBenchConfig::write_default(CONFIG_FILE_NAME, force)?;
            eprintln!("Wrote {}", CONFIG_FILE_NAME);
            Ok(())
        }
    }
}

/// Default log filter; `RUST_LOG` replaces it when set.
fn log_filter(verbose: bool) -> &'static str {
    if verbose { "txbench=debug" } else { "txbench=info" }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(verbose)));

    // Reports go to stdout, so logs stay on stderr. A second init is a no-op.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter benchmarks based on CLI options using the planner module.
fn plan_benchmarks(cli: &Cli) -> anyhow::Result<ExecutionPlan> {
    let filter_re = Regex::new(&cli.filter)
        .with_context(|| format!("invalid filter pattern {:?}", cli.filter))?;

    Ok(planner::build_plan(
        registered_benchmarks(),
        Some(&filter_re),
        cli.group.as_deref(),
        &cli.strategies,
    ))
}

fn list_benchmarks(cli: &Cli, config: &TxBenchConfig) -> anyhow::Result<()> {
    println!("TxBench Plan:");

    let benchmarks = plan_benchmarks(cli)?.benchmarks;
    let dispatch = dispatch_config(cli, config);

    let mut groups: std::collections::BTreeMap<&str, Vec<&BenchmarkDef>> =
        std::collections::BTreeMap::new();
    for bench in &benchmarks {
        groups.entry(bench.group).or_default().push(bench);
    }

    let mut total = 0;
    for (group, benches) in &groups {
        println!("├── group: {}", group);
        for bench in benches {
            println!(
                "│   ├── {} [{}, {} worker(s)]",
                bench.id,
                bench.strategy,
                dispatch.worker_threads(bench.strategy)
            );
            total += 1;
        }
    }

    println!("{} benchmarks found.", total);
    Ok(())
}

/// Build an ExecutionConfig by layering: txbench.toml defaults → CLI overrides.
fn build_execution_config(cli: &Cli, config: &TxBenchConfig) -> anyhow::Result<ExecutionConfig> {
    let mut workload = config.workload.clone();
    if let Some(n) = cli.transactions {
        workload.transactions = n;
    }
    if let Some(unit) = &cli.time_unit {
        workload.time_unit = unit.clone();
    }
    workload.validate()?;

    let mut runner = config.runner.clone();
    if let Some(n) = cli.warmup_iterations {
        runner.warmup_iterations = n;
    }
    if let Some(n) = cli.iterations {
        runner.measurement_iterations = n;
    }

    Ok(ExecutionConfig {
        transactions: workload.transactions,
        loop_config: runner.loop_config(),
        delays: workload.delay_profile()?,
        dispatch: dispatch_config(cli, config),
        show_progress: true,
    })
}

fn dispatch_config(cli: &Cli, config: &TxBenchConfig) -> DispatchConfig {
    DispatchConfig {
        default_workers: cli.default_workers.or(config.dispatch.default_workers),
        io_workers: cli.io_workers.or(config.dispatch.io_workers),
    }
}

fn run_benchmarks(cli: &Cli, config: &TxBenchConfig) -> anyhow::Result<()> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    // Configure Rayon thread pool for statistics computation
    let threads = if cli.threads > 0 {
        Some(cli.threads)
    } else {
        config.runner.stats_threads
    };
    if let Some(n) = threads {
        ThreadPoolBuilder::new().num_threads(n).build_global().ok();
    }

    let plan = plan_benchmarks(cli)?;
    if plan.benchmarks.is_empty() {
        // stdout may be a JSON or CSV consumer
        tracing::warn!(filter = %cli.filter, "no benchmarks found");
        return Ok(());
    }
    if !plan.includes_baseline() {
        tracing::warn!("{BASELINE_ID} not selected, speedups will not be reported");
    }
    let benchmarks = plan.benchmarks;

    let exec_config = build_execution_config(cli, config)?;

    eprintln!(
        "Running {} benchmarks, {} transactions, {} warmup + {} measured iterations...\n",
        benchmarks.len(),
        exec_config.transactions,
        exec_config.loop_config.warmup_iterations,
        exec_config.loop_config.measurement_iterations
    );

    let start_time = Instant::now();

    let mut executor = Executor::new(exec_config.clone());
    let results = executor.execute(&benchmarks);

    let stats = compute_statistics(&results, OutlierMethod::default());

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let mut report = build_report(&results, &stats, &exec_config, total_duration_ms);

    let threshold = cli.threshold.unwrap_or(config.ci.regression_threshold);
    if let Some(baseline_path) = resolve_baseline_path(&cli.baseline, config) {
        if baseline_path.exists() {
            match std::fs::read_to_string(&baseline_path)
                .map_err(anyhow::Error::from)
                .and_then(|json| parse_json_report(&json).map_err(anyhow::Error::from))
            {
                Ok(baseline) => apply_baseline_comparison(&mut report, &baseline, threshold),
                Err(e) => {
                    tracing::warn!(path = %baseline_path.display(), "failed to load baseline: {e}");
                }
            }
        } else {
            tracing::warn!(path = %baseline_path.display(), "baseline file not found");
        }
    }

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    save_baseline_if_needed(cli, config, &report)?;

    if report.has_failures() {
        bail!(
            "{} benchmark(s) failed, {} crashed",
            report.summary.failed,
            report.summary.crashed
        );
    }
    if report.summary.regressions > 0 {
        bail!(
            "{} regression(s) detected above {}% threshold",
            report.summary.regressions,
            threshold
        );
    }

    Ok(())
}

/// Save the report as a baseline JSON file if configured.
fn save_baseline_if_needed(cli: &Cli, config: &TxBenchConfig, report: &Report) -> anyhow::Result<()> {
    let should_save = cli.save_baseline.is_some() || config.output.save_baseline;
    if !should_save {
        return Ok(());
    }

    // Resolve path: CLI value > config value > default
    let path = cli
        .save_baseline
        .as_ref()
        .and_then(|opt| opt.clone())
        .unwrap_or_else(|| configured_baseline_path(config));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = generate_json_report(report)?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("Baseline saved to: {}", path.display());

    Ok(())
}

/// Apply baseline comparison data to the report.
///
/// Compares each benchmark's mean iteration time with the saved one and
/// counts regressions and improvements beyond `regression_threshold` percent.
fn apply_baseline_comparison(report: &mut Report, baseline: &Report, regression_threshold: f64) {
    report.baseline_meta = Some(baseline.meta.clone());

    if baseline.meta.config != report.meta.config {
        tracing::warn!("baseline was recorded with a different workload configuration");
    }

    let baseline_means: HashMap<_, _> = baseline
        .results
        .iter()
        .filter_map(|r| r.metrics.as_ref().map(|m| (r.id.as_str(), m.mean_ns)))
        .collect();

    for result in &mut report.results {
        let (Some(metrics), Some(&baseline_mean)) =
            (&result.metrics, baseline_means.get(result.id.as_str()))
        else {
            continue;
        };

        let change = relative_change(baseline_mean, metrics.mean_ns);
        let kind = classify_change(change, regression_threshold);
        match kind {
            ChangeKind::Regression => report.summary.regressions += 1,
            ChangeKind::Improvement => report.summary.improvements += 1,
            ChangeKind::Unchanged => {}
        }

        result.comparison = Some(Comparison {
            baseline_mean_ns: baseline_mean,
            absolute_change_ns: metrics.mean_ns - baseline_mean,
            relative_change: change,
            is_regression: kind == ChangeKind::Regression,
        });
    }
}

fn configured_baseline_path(config: &TxBenchConfig) -> PathBuf {
    config
        .output
        .baseline_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINE_PATH))
}

/// Resolve baseline path from CLI flag, config, or default.
///
/// - `Some(Some(path))`: explicit path from `--baseline /path/to/file`
/// - `Some(None)`: `--baseline` with no value, use config or default
/// - `None`: flag not passed, use the config path if one is set
fn resolve_baseline_path(
    cli_baseline: &Option<Option<PathBuf>>,
    config: &TxBenchConfig,
) -> Option<PathBuf> {
    match cli_baseline {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(configured_baseline_path(config)),
        None => config.output.baseline_path.as_ref().map(PathBuf::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txbench_report::{
        BenchmarkMetrics, BenchmarkReportResult, BenchmarkStatus, ReportConfig, ReportMeta,
        ReportSummary, SystemInfo,
    };

    fn dummy_meta() -> ReportMeta {
        ReportMeta {
            schema_version: 1,
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            git_commit: None,
            git_branch: None,
            system: SystemInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
                cpu: "test".to_string(),
                cpu_cores: 1,
            },
            config: ReportConfig {
                transactions: 100,
                warmup_iterations: 10,
                measurement_iterations: 10,
                validate_delay: [5, 20],
                process_delay: [10, 50],
                time_unit_ns: 1_000_000,
            },
        }
    }

    fn dummy_metrics(mean: f64) -> BenchmarkMetrics {
        BenchmarkMetrics {
            samples: 10,
            mean_ns: mean,
            median_ns: mean,
            std_dev_ns: mean * 0.01,
            cv_percent: 1.0,
            std_error_ns: mean * 0.01 / 10f64.sqrt(),
            min_ns: mean * 0.9,
            max_ns: mean * 1.1,
            p50_ns: mean,
            p90_ns: mean * 1.05,
            p95_ns: mean * 1.07,
            p99_ns: mean * 1.09,
            outliers: 0,
            transactions: 100,
            processed: 90,
            throughput_tps: None,
        }
    }

    fn dummy_result(id: &str, mean: f64) -> BenchmarkReportResult {
        BenchmarkReportResult {
            id: id.to_string(),
            name: id.to_string(),
            group: "concurrent".to_string(),
            strategy: DispatchStrategy::Default,
            worker_threads: 4,
            status: BenchmarkStatus::Passed,
            metrics: Some(dummy_metrics(mean)),
            comparison: None,
            failure: None,
        }
    }

    fn dummy_report(results: Vec<BenchmarkReportResult>) -> Report {
        let total = results.len();
        Report {
            meta: dummy_meta(),
            results,
            comparison: None,
            summary: ReportSummary {
                total_benchmarks: total,
                passed: total,
                ..Default::default()
            },
            baseline_meta: None,
        }
    }

    #[test]
    fn regression_above_threshold() {
        // 60ms → 66ms is a 10% slowdown
        let mut report = dummy_report(vec![dummy_result("dispatch_default", 66e6)]);
        let baseline = dummy_report(vec![dummy_result("dispatch_default", 60e6)]);

        apply_baseline_comparison(&mut report, &baseline, 5.0);

        assert_eq!(report.summary.regressions, 1);
        let cmp = report.results[0].comparison.as_ref().unwrap();
        assert!(cmp.is_regression);
        assert!((cmp.relative_change - 10.0).abs() < 1e-9);
        assert!((cmp.absolute_change_ns - 6e6).abs() < 1e-3);
        assert!(report.baseline_meta.is_some());
    }

    #[test]
    fn change_within_threshold_is_unchanged() {
        let mut report = dummy_report(vec![dummy_result("dispatch_io", 63e6)]);
        let baseline = dummy_report(vec![dummy_result("dispatch_io", 60e6)]);

        apply_baseline_comparison(&mut report, &baseline, 25.0);

        assert_eq!(report.summary.regressions, 0);
        assert_eq!(report.summary.improvements, 0);
        assert!(!report.results[0].comparison.as_ref().unwrap().is_regression);
    }

    #[test]
    fn improvement_detected() {
        let mut report = dummy_report(vec![dummy_result("dispatch_main", 54e6)]);
        let baseline = dummy_report(vec![dummy_result("dispatch_main", 60e6)]);

        apply_baseline_comparison(&mut report, &baseline, 5.0);

        assert_eq!(report.summary.improvements, 1);
        assert_eq!(report.summary.regressions, 0);
    }

    #[test]
    fn benchmarks_missing_from_baseline_are_skipped() {
        let mut report = dummy_report(vec![
            dummy_result("sequential", 3.0e9),
            dummy_result("dispatch_unconfined", 60e6),
        ]);
        let baseline = dummy_report(vec![dummy_result("sequential", 3.0e9)]);

        apply_baseline_comparison(&mut report, &baseline, 5.0);

        assert!(report.results[0].comparison.is_some());
        assert!(report.results[1].comparison.is_none());
    }

    #[test]
    fn baseline_path_resolution() {
        let mut config = TxBenchConfig::default();

        assert_eq!(resolve_baseline_path(&None, &config), None);
        assert_eq!(
            resolve_baseline_path(&Some(None), &config),
            Some(PathBuf::from(DEFAULT_BASELINE_PATH))
        );
        assert_eq!(
            resolve_baseline_path(&Some(Some(PathBuf::from("a.json"))), &config),
            Some(PathBuf::from("a.json"))
        );

        config.output.baseline_path = Some("ci/base.json".to_string());
        assert_eq!(
            resolve_baseline_path(&None, &config),
            Some(PathBuf::from("ci/base.json"))
        );
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "txbench",
            "--transactions",
            "40",
            "--time-unit",
            "10us",
            "-n",
            "3",
            "--io-workers",
            "8",
            "--strategy",
            "io",
            "--strategy",
            "sequential",
        ]);
        let exec = build_execution_config(&cli, &TxBenchConfig::default()).unwrap();

        assert_eq!(exec.transactions, 40);
        assert_eq!(exec.delays.time_unit, std::time::Duration::from_micros(10));
        assert_eq!(exec.loop_config.measurement_iterations, 3);
        assert_eq!(exec.loop_config.warmup_iterations, 10);
        assert_eq!(exec.dispatch.io_workers, Some(8));
        assert_eq!(
            cli.strategies,
            vec![DispatchStrategy::Io, DispatchStrategy::Sequential]
        );

        let plan = plan_benchmarks(&cli).unwrap();
        let ids: Vec<_> = plan.benchmarks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["sequential", "dispatch_io"]);
        assert!(plan.includes_baseline());
    }

    #[test]
    fn concurrent_only_selection_has_no_baseline() {
        let cli = Cli::parse_from(["txbench", "--group", "concurrent"]);
        let plan = plan_benchmarks(&cli).unwrap();

        assert_eq!(plan.benchmarks.len(), 4);
        assert!(!plan.includes_baseline());
    }

    #[test]
    fn no_matching_benchmarks_is_not_an_error() {
        let cli = Cli::parse_from(["txbench", "--format", "json", "^no_such_benchmark$"]);
        assert!(plan_benchmarks(&cli).unwrap().benchmarks.is_empty());
        run_benchmarks(&cli, &TxBenchConfig::default()).unwrap();
    }

    #[test]
    fn invalid_workload_rejected() {
        let cli = Cli::parse_from(["txbench", "--transactions", "0"]);
        assert!(build_execution_config(&cli, &TxBenchConfig::default()).is_err());

        let cli = Cli::parse_from(["txbench", "--time-unit", "soon"]);
        assert!(build_execution_config(&cli, &TxBenchConfig::default()).is_err());
    }

    #[test]
    fn optional_path_flags() {
        let cli = Cli::parse_from(["txbench", "--baseline", "base.json"]);
        assert_eq!(cli.baseline, Some(Some(PathBuf::from("base.json"))));

        let cli = Cli::parse_from(["txbench", "--save-baseline", "--verbose"]);
        assert_eq!(cli.save_baseline, Some(None));
        assert!(cli.verbose);

        let cli = Cli::parse_from(["txbench", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));

        let cli = Cli::parse_from(["txbench", "init", "--force"]);
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn verbose_switches_filter() {
        assert_eq!(log_filter(false), "txbench=info");
        assert_eq!(log_filter(true), "txbench=debug");
    }
}
