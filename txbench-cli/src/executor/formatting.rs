//! Output Formatting
//!
//! Human-readable output formatting for benchmark reports.
//!
//! Generates terminal-friendly output with:
//! - Grouped benchmark results with status icons (✓/✗/💥)
//! - Iteration timing (mean, median, stddev, percentiles) and throughput
//! - The speedup table against the sequential run
//! - Changes against a saved baseline, when one was loaded

use std::collections::BTreeMap;
use txbench_report::{BenchmarkReportResult, Report, format_duration};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("TxBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let config = &report.meta.config;
    output.push_str(&format!(
        "Workload: {} transactions, validate {:?}, process {:?}, unit {}\n",
        config.transactions,
        config.validate_delay,
        config.process_delay,
        format_duration(config.time_unit_ns as f64)
    ));
    output.push_str(&format!(
        "Iterations: {} warmup, {} measured\n\n",
        config.warmup_iterations, config.measurement_iterations
    ));

    let mut groups: BTreeMap<&str, Vec<&BenchmarkReportResult>> = BTreeMap::new();
    for result in &report.results {
        groups.entry(&result.group).or_default().push(result);
    }

    // Sequential group first
    let mut ordered: Vec<_> = groups.into_iter().collect();
    ordered.sort_by_key(|(_, results)| results.iter().all(|r| r.strategy.is_concurrent()));

    for (group, results) in ordered {
        output.push_str(&format!("Group: {}\n", group));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for result in results {
            output.push_str(&format!(
                "  {} {} ({}, {} worker{})\n",
                result.status.icon(),
                result.id,
                result.strategy.label(),
                result.worker_threads,
                if result.worker_threads == 1 { "" } else { "s" }
            ));

            if let Some(metrics) = &result.metrics {
                output.push_str(&format!(
                    "      mean: {} ± {}  median: {}  stddev: {} (cv {:.1}%)\n",
                    format_duration(metrics.mean_ns),
                    format_duration(metrics.std_error_ns),
                    format_duration(metrics.median_ns),
                    format_duration(metrics.std_dev_ns),
                    metrics.cv_percent
                ));
                output.push_str(&format!(
                    "      min: {}  max: {}  samples: {}  outliers: {}\n",
                    format_duration(metrics.min_ns),
                    format_duration(metrics.max_ns),
                    metrics.samples,
                    metrics.outliers
                ));
                output.push_str(&format!(
                    "      p50: {}  p95: {}  p99: {}\n",
                    format_duration(metrics.p50_ns),
                    format_duration(metrics.p95_ns),
                    format_duration(metrics.p99_ns)
                ));
                output.push_str(&format!(
                    "      processed: {}/{}",
                    metrics.processed, metrics.transactions
                ));
                if let Some(tps) = metrics.throughput_tps {
                    output.push_str(&format!("  throughput: {:.1} tx/s", tps));
                }
                output.push('\n');
            }

            if let Some(cmp) = &result.comparison {
                output.push_str(&format!(
                    "      vs baseline: {:+.2}% ({} → {}){}\n",
                    cmp.relative_change,
                    format_duration(cmp.baseline_mean_ns),
                    format_duration(cmp.baseline_mean_ns + cmp.absolute_change_ns),
                    if cmp.is_regression { "  REGRESSION" } else { "" }
                ));
            }

            if let Some(failure) = &result.failure {
                output.push_str(&format!("      error ({}): {}\n", failure.kind, failure.message));
            }

            output.push('\n');
        }
    }

    if let Some(cmp) = &report.comparison {
        output.push_str(&format!("\n{}\n", cmp.title));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let max_name_len = cmp
            .entries
            .iter()
            .map(|e| e.benchmark_id.len())
            .max()
            .unwrap_or(20)
            .max("Benchmark".len());

        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>10}\n",
            "Benchmark",
            cmp.metric,
            "Speedup",
            width = max_name_len
        ));
        output.push_str(&format!("  {}\n", "-".repeat(max_name_len + 26)));

        // Fastest first
        let mut sorted_entries: Vec<_> = cmp.entries.iter().collect();
        sorted_entries.sort_by(|a, b| {
            b.speedup
                .partial_cmp(&a.speedup)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for entry in sorted_entries {
            let baseline_marker = if entry.is_baseline {
                " (baseline)"
            } else {
                ""
            };
            output.push_str(&format!(
                "  {:<width$}  {:>12}  {:>9.2}x{}\n",
                entry.benchmark_id,
                format_duration(entry.value),
                entry.speedup,
                baseline_marker,
                width = max_name_len
            ));
        }
    }

    if let Some(baseline) = &report.baseline_meta {
        output.push_str(&format!(
            "\nCompared with baseline {} ({})\n",
            baseline.git_commit.as_deref().unwrap_or("unknown"),
            baseline.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
        output.push_str(&format!(
            "  Regressions: {}  Improvements: {}\n",
            report.summary.regressions, report.summary.improvements
        ));
    }

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}  Crashed: {}\n",
        report.summary.total_benchmarks,
        report.summary.passed,
        report.summary.failed,
        report.summary.crashed
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{BenchExecutionResult, ExecutionConfig, build_report};
    use txbench_core::DispatchStrategy;
    use txbench_report::{BenchmarkStatus, FailureInfo};
    use txbench_stats::{OutlierMethod, compute_summary};

    fn exec_result(id: &str, strategy: DispatchStrategy, mean_ms: f64) -> BenchExecutionResult {
        BenchExecutionResult {
            benchmark_id: id.to_string(),
            benchmark_name: id.to_string(),
            group: if strategy.is_concurrent() {
                "concurrent"
            } else {
                "sequential"
            }
            .to_string(),
            strategy,
            worker_threads: 1,
            status: BenchmarkStatus::Passed,
            samples: vec![mean_ms * 1e6; 3],
            transactions: 100,
            processed: 90,
            duration_ns: 0,
            failure: None,
        }
    }

    fn render(results: &[BenchExecutionResult]) -> String {
        let stats: Vec<_> = results
            .iter()
            .map(|r| {
                let s = (!r.samples.is_empty())
                    .then(|| compute_summary(&r.samples, OutlierMethod::None));
                (r.benchmark_id.clone(), s)
            })
            .collect();
        let report = build_report(results, &stats, &ExecutionConfig::default(), 10.0);
        format_human_output(&report)
    }

    #[test]
    fn test_human_output_has_speedup_table() {
        let output = render(&[
            exec_result("sequential", DispatchStrategy::Sequential, 3000.0),
            exec_result("dispatch_main", DispatchStrategy::Main, 60.0),
        ]);

        assert!(output.contains("TxBench Results"));
        assert!(output.contains("✓ sequential (Sequential, 1 worker)"));
        assert!(output.contains("processed: 90/100"));
        assert!(output.contains("(cv 0.0%)"));
        assert!(output.contains("Speedup vs sequential"));
        assert!(output.contains("50.00x"));
        assert!(output.contains("(baseline)"));
        // Sequential group printed before the concurrent one
        let seq = output.find("Group: sequential").unwrap();
        let conc = output.find("Group: concurrent").unwrap();
        assert!(seq < conc);
    }

    #[test]
    fn test_human_output_shows_failure() {
        let mut failed = exec_result("dispatch_io", DispatchStrategy::Io, 60.0);
        failed.status = BenchmarkStatus::Failed;
        failed.failure = Some(FailureInfo {
            kind: "mismatch".to_string(),
            message: "iteration 2 processed 91 transactions, expected 90".to_string(),
        });

        let output = render(&[failed]);
        assert!(output.contains("✗ dispatch_io"));
        assert!(output.contains("error (mismatch): iteration 2 processed 91"));
        assert!(output.contains("Failed: 1"));
        assert!(!output.contains("Speedup vs sequential"));
    }
}
