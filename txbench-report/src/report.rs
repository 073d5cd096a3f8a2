//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use txbench_core::DispatchStrategy;
use txbench_stats::SummaryStatistics;

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per executed benchmark
    pub results: Vec<BenchmarkReportResult>,
    /// Speedup table against the sequential baseline
    #[serde(default)]
    pub comparison: Option<ComparisonResult>,
    /// Totals
    pub summary: ReportSummary,
    /// Metadata of the saved report this run was compared with
    #[serde(default)]
    pub baseline_meta: Option<ReportMeta>,
}

impl Report {
    /// Find a result by benchmark id
    pub fn result(&self, id: &str) -> Option<&BenchmarkReportResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Whether any benchmark failed or crashed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0 || self.summary.crashed > 0
    }
}

/// Speedup of every strategy relative to the baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Human-readable title
    pub title: String,
    /// Baseline benchmark id
    pub baseline: String,
    /// Metric compared (always the mean iteration time)
    pub metric: String,
    /// Entries, in report order
    pub entries: Vec<ComparisonEntry>,
}

/// Single row of the speedup table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Benchmark id
    pub benchmark_id: String,
    /// Mean iteration time in nanoseconds
    pub value: f64,
    /// Baseline mean divided by this mean (>1.0 = faster than baseline)
    pub speedup: f64,
    /// Whether this row is the baseline itself
    pub is_baseline: bool,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Schema version of this document
    pub schema_version: u32,
    /// Harness version
    pub version: String,
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Commit of the working tree, when run inside git
    pub git_commit: Option<String>,
    /// Branch of the working tree, when run inside git
    pub git_branch: Option<String>,
    /// Host description
    pub system: SystemInfo,
    /// Effective configuration
    pub config: ReportConfig,
}

/// Effective run configuration captured in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Transactions per iteration
    pub transactions: u64,
    /// Discarded iterations per benchmark
    pub warmup_iterations: u64,
    /// Measured iterations per benchmark
    pub measurement_iterations: u64,
    /// Validation delay range in time units (half-open)
    pub validate_delay: [u64; 2],
    /// Processing delay range in time units (half-open)
    pub process_delay: [u64; 2],
    /// One time unit in nanoseconds
    pub time_unit_ns: u64,
}

/// Host information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Logical cores
    pub cpu_cores: u32,
}

/// Individual benchmark result in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReportResult {
    /// Benchmark id
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Group
    pub group: String,
    /// Dispatch strategy measured
    pub strategy: DispatchStrategy,
    /// Worker threads backing the strategy
    pub worker_threads: usize,
    /// Outcome
    pub status: BenchmarkStatus,
    /// Timing metrics, absent when no sample was collected
    pub metrics: Option<BenchmarkMetrics>,
    /// Change against a saved report
    #[serde(default)]
    pub comparison: Option<Comparison>,
    /// Failure details
    pub failure: Option<FailureInfo>,
}

/// Benchmark execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    /// Ran and every iteration processed the expected count
    Passed,
    /// Dispatch error or counter mismatch
    Failed,
    /// Panicked
    Crashed,
}

impl BenchmarkStatus {
    /// Lowercase name, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            BenchmarkStatus::Passed => "passed",
            BenchmarkStatus::Failed => "failed",
            BenchmarkStatus::Crashed => "crashed",
        }
    }

    /// Terminal status icon
    pub fn icon(self) -> &'static str {
        match self {
            BenchmarkStatus::Passed => "✓",
            BenchmarkStatus::Failed => "✗",
            BenchmarkStatus::Crashed => "💥",
        }
    }
}

/// Iteration timing metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Measured iterations
    pub samples: usize,
    /// Mean iteration time
    pub mean_ns: f64,
    /// Median iteration time
    pub median_ns: f64,
    /// Standard deviation
    pub std_dev_ns: f64,
    /// Standard deviation as a percentage of the mean
    #[serde(default)]
    pub cv_percent: f64,
    /// Standard error of the mean
    #[serde(default)]
    pub std_error_ns: f64,
    /// Fastest iteration
    pub min_ns: f64,
    /// Slowest iteration
    pub max_ns: f64,
    /// 50th percentile
    pub p50_ns: f64,
    /// 90th percentile
    pub p90_ns: f64,
    /// 95th percentile
    pub p95_ns: f64,
    /// 99th percentile
    pub p99_ns: f64,
    /// Flagged iterations
    pub outliers: usize,
    /// Transactions dispatched per iteration
    pub transactions: u64,
    /// Transactions that passed validation per iteration
    pub processed: u64,
    /// Dispatched transactions per second at the mean iteration time
    pub throughput_tps: Option<f64>,
}

impl From<&SummaryStatistics> for BenchmarkMetrics {
    fn from(stats: &SummaryStatistics) -> Self {
        Self {
            samples: stats.sample_count,
            mean_ns: stats.mean,
            median_ns: stats.median,
            std_dev_ns: stats.std_dev,
            cv_percent: stats.coefficient_of_variation(),
            std_error_ns: stats.std_error(),
            min_ns: stats.min,
            max_ns: stats.max,
            p50_ns: stats.p50,
            p90_ns: stats.p90,
            p95_ns: stats.p95,
            p99_ns: stats.p99,
            outliers: stats.outlier_count,
            // Filled by the caller, which knows the workload size
            transactions: 0,
            processed: 0,
            throughput_tps: None,
        }
    }
}

impl BenchmarkMetrics {
    /// Attach workload size and derive throughput from the mean
    pub fn with_workload(mut self, transactions: u64, processed: u64) -> Self {
        self.transactions = transactions;
        self.processed = processed;
        self.throughput_tps = if self.mean_ns > 0.0 {
            Some(transactions as f64 * 1_000_000_000.0 / self.mean_ns)
        } else {
            None
        };
        self
    }
}

/// Change against a saved report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    /// Mean in the saved report
    pub baseline_mean_ns: f64,
    /// current - saved
    pub absolute_change_ns: f64,
    /// Signed percentage change
    pub relative_change: f64,
    /// Whether the change exceeds the regression threshold
    pub is_regression: bool,
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// "dispatch", "mismatch" or "panic"
    pub kind: String,
    /// Description
    pub message: String,
}

/// Report totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Benchmarks in the report
    pub total_benchmarks: usize,
    /// Passed
    pub passed: usize,
    /// Failed
    pub failed: usize,
    /// Crashed
    pub crashed: usize,
    /// Regressions against a saved report
    pub regressions: usize,
    /// Improvements against a saved report
    pub improvements: usize,
    /// Wall-clock time of the whole run
    pub total_duration_ms: f64,
}
