//! Benchmark Execution
//!
//! Runs each planned benchmark in-process: build the strategy's dispatcher,
//! drive the warmup and measurement iterations, then check that every
//! measured iteration processed the expected number of transactions.
//!
//! ## Data Flow
//!
//! ```text
//! BenchmarkDef (registry)
//!        │
//!        ▼
//!   ExecutionConfig
//!        │
//!        ▼
//! ┌──────────────────┐
//! │    Executor      │  Dispatcher → Warmup → Measurement → Count check
//! └────────┬─────────┘
//!          │
//!          ▼
//!  BenchExecutionResult (samples, status, failure)
//! ```
//!
//! A panic inside a benchmark is caught and reported as `Crashed`; the
//! remaining benchmarks still run.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use txbench_core::{
    Bencher, BenchmarkDef, BenchmarkResult, DEFAULT_TRANSACTION_COUNT, DelayProfile,
    DispatchConfig, DispatchStrategy, Dispatcher, LoopConfig, Timer, TransactionWorkload,
    expected_processed, run_benchmark_loop,
};
use txbench_report::{BenchmarkStatus, FailureInfo};

/// Configuration for benchmark execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Transactions per iteration
    pub transactions: u64,
    /// Warmup and measurement iteration counts
    pub loop_config: LoopConfig,
    /// Delay ranges and time unit
    pub delays: DelayProfile,
    /// Pool sizing
    pub dispatch: DispatchConfig,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            transactions: DEFAULT_TRANSACTION_COUNT,
            loop_config: LoopConfig::default(),
            delays: DelayProfile::default(),
            dispatch: DispatchConfig::default(),
            show_progress: true,
        }
    }
}

/// Result from executing a single benchmark
#[derive(Debug)]
pub struct BenchExecutionResult {
    /// Benchmark id
    pub benchmark_id: String,
    /// Human-readable name
    pub benchmark_name: String,
    /// Group
    pub group: String,
    /// Strategy measured
    pub strategy: DispatchStrategy,
    /// Worker threads backing the strategy
    pub worker_threads: usize,
    /// Outcome
    pub status: BenchmarkStatus,
    /// Measured iteration times in nanoseconds
    pub samples: Vec<f64>,
    /// Transactions per iteration
    pub transactions: u64,
    /// Counter value of the last measured iteration
    pub processed: u64,
    /// Wall-clock time including runtime start-up and warmup
    pub duration_ns: u64,
    /// Set when the status is not `Passed`
    pub failure: Option<FailureInfo>,
}

/// Execute benchmarks and produce results (in-process mode)
pub struct Executor {
    config: ExecutionConfig,
    results: Vec<BenchExecutionResult>,
}

impl Executor {
    /// Create an executor with no results yet
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            results: Vec::new(),
        }
    }

    /// Execute all provided benchmarks, in order
    pub fn execute(&mut self, benchmarks: &[&BenchmarkDef]) -> Vec<BenchExecutionResult> {
        let pb = if self.config.show_progress {
            ProgressBar::new(benchmarks.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for bench in benchmarks {
            pb.set_message(bench.id.to_string());
            let result = pb.suspend(|| self.execute_single(bench));
            self.results.push(result);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        std::mem::take(&mut self.results)
    }

    /// Execute a single benchmark
    fn execute_single(&self, bench: &BenchmarkDef) -> BenchExecutionResult {
        let timer = Timer::start();
        let cfg = &self.config;
        let worker_threads = cfg.dispatch.worker_threads(bench.strategy);

        tracing::debug!(id = bench.id, strategy = %bench.strategy, worker_threads, "starting benchmark");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let dispatcher = Dispatcher::new(bench.strategy, &cfg.dispatch)?;
            let workload = Arc::new(TransactionWorkload::new(cfg.delays.clone()));
            let bencher = Bencher::new(workload, cfg.transactions);
            run_benchmark_loop(bencher, &dispatcher, cfg.loop_config)
        }));

        let duration_ns = timer.stop();
        let mut result = BenchExecutionResult {
            benchmark_id: bench.id.to_string(),
            benchmark_name: bench.name.to_string(),
            group: bench.group.to_string(),
            strategy: bench.strategy,
            worker_threads,
            status: BenchmarkStatus::Passed,
            samples: Vec::new(),
            transactions: cfg.transactions,
            processed: 0,
            duration_ns,
            failure: None,
        };

        match outcome {
            Ok(Ok(bench_result)) => {
                result.samples = bench_result.durations_ns();
                result.processed = bench_result
                    .samples
                    .last()
                    .map(|s| s.processed)
                    .unwrap_or_else(|| expected_processed(cfg.transactions));
                if let Some(message) = count_mismatch(&bench_result) {
                    tracing::warn!(id = bench.id, "{message}");
                    result.status = BenchmarkStatus::Failed;
                    result.failure = Some(FailureInfo {
                        kind: "mismatch".to_string(),
                        message,
                    });
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(id = bench.id, error = %e, "dispatch failed");
                result.status = BenchmarkStatus::Failed;
                result.failure = Some(FailureInfo {
                    kind: "dispatch".to_string(),
                    message: e.to_string(),
                });
            }
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                tracing::error!(id = bench.id, "benchmark panicked: {message}");
                result.status = BenchmarkStatus::Crashed;
                result.failure = Some(FailureInfo {
                    kind: "panic".to_string(),
                    message,
                });
            }
        }

        result
    }
}

fn count_mismatch(result: &BenchmarkResult) -> Option<String> {
    result.first_mismatch().map(|(idx, sample)| {
        format!(
            "iteration {} processed {} transactions, expected {}",
            idx + 1,
            sample.processed,
            result.expected_processed
        )
    })
}
