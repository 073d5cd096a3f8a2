#![warn(missing_docs)]
//! TxBench Core - Workload and Dispatch Runtime
//!
//! This crate provides the execution environment for the transaction benchmarks:
//! - `TransactionWorkload`: validate/process with random delays and an atomic counter
//! - `Dispatcher`: one tokio runtime per dispatch strategy
//! - `Bencher`: warmup and measured iterations, counter reset per iteration
//! - The registry of benchmark definitions, one per strategy

mod bencher;
mod dispatch;
mod error;
mod measure;
mod workload;

pub use bencher::{
    Bencher, BenchmarkResult, DEFAULT_MEASUREMENT_ITERATIONS, DEFAULT_WARMUP_ITERATIONS,
    LoopConfig, Sample, run_benchmark_loop,
};
pub use dispatch::{DispatchConfig, DispatchStrategy, Dispatcher, MIN_IO_WORKERS};
pub use error::DispatchError;
pub use measure::{Timer, duration_to_millis, duration_to_nanos};
pub use workload::{
    DEFAULT_TRANSACTION_COUNT, DelayProfile, FAILURE_MODULUS, TransactionWorkload,
    expected_processed,
};

/// Benchmark definition: one entry point per strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkDef {
    /// Unique identifier
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Group this benchmark belongs to
    pub group: &'static str,
    /// Strategy the benchmark runs
    pub strategy: DispatchStrategy,
}

/// Group of the in-order baseline
pub const GROUP_SEQUENTIAL: &str = "sequential";

/// Group of every concurrent strategy
pub const GROUP_CONCURRENT: &str = "concurrent";

/// Id of the benchmark every other one is compared against
pub const BASELINE_ID: &str = "sequential";

static BENCHMARKS: [BenchmarkDef; 5] = [
    BenchmarkDef {
        id: BASELINE_ID,
        name: "Sequential transactions",
        group: GROUP_SEQUENTIAL,
        strategy: DispatchStrategy::Sequential,
    },
    BenchmarkDef {
        id: "dispatch_default",
        name: "Default dispatch",
        group: GROUP_CONCURRENT,
        strategy: DispatchStrategy::Default,
    },
    BenchmarkDef {
        id: "dispatch_io",
        name: "IO dispatch",
        group: GROUP_CONCURRENT,
        strategy: DispatchStrategy::Io,
    },
    BenchmarkDef {
        id: "dispatch_unconfined",
        name: "Unconfined dispatch",
        group: GROUP_CONCURRENT,
        strategy: DispatchStrategy::Unconfined,
    },
    BenchmarkDef {
        id: "dispatch_main",
        name: "Main dispatch",
        group: GROUP_CONCURRENT,
        strategy: DispatchStrategy::Main,
    },
];

/// All registered benchmarks, baseline first
pub fn registered_benchmarks() -> &'static [BenchmarkDef] {
    &BENCHMARKS
}

/// Look up a benchmark by id
pub fn find_benchmark(id: &str) -> Option<&'static BenchmarkDef> {
    BENCHMARKS.iter().find(|b| b.id == id)
}
