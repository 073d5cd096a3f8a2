//! Report Building
//!
//! Constructs the complete benchmark report from execution results.
//!
//! ## Pipeline
//!
//! ```text
//! BenchExecutionResult + SummaryStatistics
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  BenchmarkMetrics   │  Timing stats + workload size + throughput
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  Speedup table      │  Every strategy against the sequential run
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │      Report         │  Ready for JSON/CSV/human output
//!   └─────────────────────┘
//! ```

use super::execution::{BenchExecutionResult, ExecutionConfig};
use super::metadata::build_report_meta;
use std::collections::HashMap;
use txbench_core::BASELINE_ID;
use txbench_report::{
    BenchmarkMetrics, BenchmarkReportResult, BenchmarkStatus, ComparisonEntry, ComparisonResult,
    Report, ReportSummary,
};
use txbench_stats::{SummaryStatistics, compute_speedup};

/// Build a complete Report from execution results
///
/// # Arguments
/// * `results` - Benchmark execution results
/// * `stats` - Pre-computed summary statistics for each benchmark
/// * `config` - Execution configuration, recorded in the report header
/// * `total_duration_ms` - Total execution time in milliseconds
pub fn build_report(
    results: &[BenchExecutionResult],
    stats: &[(String, Option<SummaryStatistics>)],
    config: &ExecutionConfig,
    total_duration_ms: f64,
) -> Report {
    let stats_map: HashMap<_, _> = stats
        .iter()
        .map(|(id, s)| (id.as_str(), s.as_ref()))
        .collect();

    let mut benchmark_results = Vec::with_capacity(results.len());
    let mut summary = ReportSummary {
        total_benchmarks: results.len(),
        total_duration_ms,
        ..Default::default()
    };

    for result in results {
        let metrics = stats_map
            .get(result.benchmark_id.as_str())
            .copied()
            .flatten()
            .map(|s| BenchmarkMetrics::from(s).with_workload(result.transactions, result.processed));

        match result.status {
            BenchmarkStatus::Passed => summary.passed += 1,
            BenchmarkStatus::Failed => summary.failed += 1,
            BenchmarkStatus::Crashed => summary.crashed += 1,
        }

        benchmark_results.push(BenchmarkReportResult {
            id: result.benchmark_id.clone(),
            name: result.benchmark_name.clone(),
            group: result.group.clone(),
            strategy: result.strategy,
            worker_threads: result.worker_threads,
            status: result.status,
            metrics,
            comparison: None, // Filled when comparing to a saved report
            failure: result.failure.clone(),
        });
    }

    let comparison = build_speedup_comparison(&benchmark_results);

    Report {
        meta: build_report_meta(config),
        results: benchmark_results,
        comparison,
        summary,
        baseline_meta: None,
    }
}

/// Speedup of every measured benchmark against the sequential baseline.
///
/// `None` when the baseline was not run or produced no samples.
pub fn build_speedup_comparison(results: &[BenchmarkReportResult]) -> Option<ComparisonResult> {
    let baseline_mean = results
        .iter()
        .find(|r| r.id == BASELINE_ID)
        .and_then(|r| r.metrics.as_ref())
        .map(|m| m.mean_ns)
        .filter(|mean| *mean > 0.0)?;

    let entries = results
        .iter()
        .filter_map(|r| {
            let metrics = r.metrics.as_ref()?;
            Some(ComparisonEntry {
                benchmark_id: r.id.clone(),
                value: metrics.mean_ns,
                speedup: compute_speedup(baseline_mean, metrics.mean_ns),
                is_baseline: r.id == BASELINE_ID,
            })
        })
        .collect();

    Some(ComparisonResult {
        title: "Speedup vs sequential".to_string(),
        baseline: BASELINE_ID.to_string(),
        metric: "mean".to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use txbench_core::DispatchStrategy;
    use txbench_report::FailureInfo;
    use txbench_stats::{OutlierMethod, compute_summary};

    fn exec_result(
        id: &str,
        strategy: DispatchStrategy,
        status: BenchmarkStatus,
        samples: Vec<f64>,
    ) -> BenchExecutionResult {
        BenchExecutionResult {
            benchmark_id: id.to_string(),
            benchmark_name: id.to_string(),
            group: if strategy.is_concurrent() {
                "concurrent".to_string()
            } else {
                "sequential".to_string()
            },
            strategy,
            worker_threads: 1,
            status,
            samples,
            transactions: 100,
            processed: 90,
            duration_ns: 0,
            failure: (status != BenchmarkStatus::Passed).then(|| FailureInfo {
                kind: "mismatch".to_string(),
                message: "iteration 1 processed 89 transactions, expected 90".to_string(),
            }),
        }
    }

    fn stats_for(results: &[BenchExecutionResult]) -> Vec<(String, Option<SummaryStatistics>)> {
        results
            .iter()
            .map(|r| {
                let s = (!r.samples.is_empty())
                    .then(|| compute_summary(&r.samples, OutlierMethod::None));
                (r.benchmark_id.clone(), s)
            })
            .collect()
    }

    #[test]
    fn test_speedup_against_sequential() {
        let results = vec![
            exec_result(
                "sequential",
                DispatchStrategy::Sequential,
                BenchmarkStatus::Passed,
                vec![3.0e9, 3.0e9],
            ),
            exec_result(
                "dispatch_io",
                DispatchStrategy::Io,
                BenchmarkStatus::Passed,
                vec![60e6, 60e6],
            ),
        ];
        let stats = stats_for(&results);
        let report = build_report(&results, &stats, &ExecutionConfig::default(), 1.0);

        let comparison = report.comparison.as_ref().unwrap();
        assert_eq!(comparison.baseline, "sequential");
        assert_eq!(comparison.entries.len(), 2);
        assert!(comparison.entries[0].is_baseline);
        assert!((comparison.entries[0].speedup - 1.0).abs() < 1e-9);
        assert!((comparison.entries[1].speedup - 50.0).abs() < 1e-9);

        let io = report.result("dispatch_io").unwrap();
        let metrics = io.metrics.as_ref().unwrap();
        assert!((metrics.throughput_tps.unwrap() - 100.0 / 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_summary_counts_and_failures() {
        let results = vec![
            exec_result(
                "sequential",
                DispatchStrategy::Sequential,
                BenchmarkStatus::Passed,
                vec![1e6],
            ),
            exec_result(
                "dispatch_main",
                DispatchStrategy::Main,
                BenchmarkStatus::Failed,
                vec![1e6],
            ),
            exec_result(
                "dispatch_default",
                DispatchStrategy::Default,
                BenchmarkStatus::Crashed,
                Vec::new(),
            ),
        ];
        let stats = stats_for(&results);
        let report = build_report(&results, &stats, &ExecutionConfig::default(), 2.0);

        assert_eq!(report.summary.total_benchmarks, 3);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.crashed, 1);
        assert!(report.has_failures());

        let crashed = report.result("dispatch_default").unwrap();
        assert!(crashed.metrics.is_none());
        assert!(crashed.failure.is_some());

        // Crashed benchmark has no metrics, so no speedup row
        assert_eq!(report.comparison.unwrap().entries.len(), 2);
    }

    #[test]
    fn test_no_comparison_without_baseline() {
        let results = vec![exec_result(
            "dispatch_unconfined",
            DispatchStrategy::Unconfined,
            BenchmarkStatus::Passed,
            vec![5e6],
        )];
        let stats = stats_for(&results);
        let report = build_report(&results, &stats, &ExecutionConfig::default(), 0.5);
        assert!(report.comparison.is_none());
    }
}
