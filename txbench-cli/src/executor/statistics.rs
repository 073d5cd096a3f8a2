//! Statistics Computation
//!
//! Parallel computation of summary statistics for benchmark results.
//!
//! Each benchmark's iteration times are processed independently to compute:
//! - Central tendency (mean, median)
//! - Dispersion (std dev, min, max)
//! - Percentiles (p50, p90, p95, p99)
//! - Outlier detection via the IQR method
//!
//! Benchmarks whose iteration times spread too widely are logged as unstable.

use super::execution::BenchExecutionResult;
use rayon::prelude::*;
use txbench_stats::{OutlierMethod, SummaryStatistics, compute_summary};

/// Coefficient of variation (percent) above which a benchmark is unstable
pub const UNSTABLE_CV_PERCENT: f64 = 10.0;

/// Share of flagged iterations (percent) above which a benchmark is noisy
pub const NOISY_OUTLIER_PERCENT: f64 = 20.0;

/// Compute statistics for benchmark results (parallelized with Rayon)
///
/// Returns `(benchmark_id, statistics)` pairs in input order. Benchmarks
/// without samples (crashed, or failed before measurement) map to `None`.
pub fn compute_statistics(
    results: &[BenchExecutionResult],
    outlier_method: OutlierMethod,
) -> Vec<(String, Option<SummaryStatistics>)> {
    results
        .par_iter()
        .map(|r| {
            if r.samples.is_empty() {
                (r.benchmark_id.clone(), None)
            } else {
                let stats = compute_summary(&r.samples, outlier_method);
                if let Some(reason) = stability_warning(&stats) {
                    tracing::warn!(id = %r.benchmark_id, "unstable timings: {reason}");
                }
                (r.benchmark_id.clone(), Some(stats))
            }
        })
        .collect()
}

/// Describe why a benchmark's timings should not be trusted, if they shouldn't
pub fn stability_warning(stats: &SummaryStatistics) -> Option<String> {
    let mut reasons = Vec::new();
    if !stats.is_stable(UNSTABLE_CV_PERCENT) {
        reasons.push(format!("cv {:.1}%", stats.coefficient_of_variation()));
    }
    if stats.outlier_analysis.is_noisy(NOISY_OUTLIER_PERCENT) {
        reasons.push(format!(
            "{:.0}% outlier iterations",
            stats.outlier_analysis.outlier_percentage()
        ));
    }
    (!reasons.is_empty()).then(|| reasons.join(", "))
}
