#![warn(missing_docs)]
//! # TxBench
//!
//! Measures how long it takes to push a batch of simulated transactions
//! through a validate-then-process pipeline, sequentially and under four
//! concurrent dispatch strategies:
//!
//! - **Sequential**: in-order calls on a current-thread runtime
//! - **Default**: spawn all, join all on a pool sized to the CPU count
//! - **IO**: the same on an oversized pool (at least 64 workers)
//! - **Unconfined**: all futures joined in place, no spawning
//! - **Main**: spawn all, join all on a single-threaded event loop
//!
//! Each transaction sleeps a random time to validate and, unless its id is a
//! multiple of ten, a random time to process before bumping a shared atomic
//! counter. Every strategy must end each iteration with the same count.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use txbench::prelude::*;
//!
//! let workload = Arc::new(TransactionWorkload::new(DelayProfile::default()));
//! let dispatcher = Dispatcher::new(DispatchStrategy::Io, &DispatchConfig::default())?;
//! let elapsed = dispatcher.run(&workload, 100)?;
//! assert_eq!(workload.processed(), 90);
//! ```
//!
//! The `txbench` binary runs every registered strategy with warmup and
//! measured iterations and prints a speedup table against the sequential run.

// Re-export core types
pub use txbench_core::{
    BASELINE_ID, Bencher, BenchmarkDef, BenchmarkResult, DelayProfile, DispatchConfig,
    DispatchError, DispatchStrategy, Dispatcher, LoopConfig, Sample, TransactionWorkload,
    expected_processed, find_benchmark, registered_benchmarks, run_benchmark_loop,
};

// Re-export stats
pub use txbench_stats::{OutlierMethod, SummaryStatistics, compute_speedup, compute_summary};

// Re-export report types
pub use txbench_report::{
    BenchmarkStatus, OutputFormat, Report, generate_csv_report, generate_json_report,
    parse_json_report,
};

// Re-export the harness pieces used outside the binary
pub use txbench_cli::{
    ExecutionConfig, Executor, TxBenchConfig, build_report, compute_statistics,
    format_human_output,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bencher, DelayProfile, DispatchConfig, DispatchStrategy, Dispatcher, LoopConfig,
        TransactionWorkload, run_benchmark_loop,
    };
}

/// Run the TxBench CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() {
///     if let Err(e) = txbench::run() {
///         eprintln!("Error: {e:#}");
///         std::process::exit(1);
///     }
/// }
/// ```
pub use txbench_cli::run;
