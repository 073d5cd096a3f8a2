//! Benchmark Executor
//!
//! Runs benchmarks and collects results.
//!
//! ## Pipeline Overview
//!
//! ```text
//! BenchmarkDef (registry)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Build dispatcher, run iterations, check counts
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Compute summary stats (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report with the speedup table
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Per-benchmark execution with panic capture
//! - [`statistics`] - Parallel statistics computation
//! - [`report`] - Report and speedup table building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;

pub use execution::{BenchExecutionResult, ExecutionConfig, Executor};
pub use formatting::format_human_output;
pub use report::{build_report, build_speedup_comparison};
pub use statistics::compute_statistics;
