//! Summary Statistics
//!
//! - mean, median, std-dev: computed from CLEANED data (outliers removed)
//! - min, max, percentiles: computed from ALL data

use crate::outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
use crate::percentiles::{compute_percentiles, percentile_of_sorted, sorted_copy};

/// Summary of one benchmark's iteration times
#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    /// Mean of cleaned samples
    pub mean: f64,
    /// Median of cleaned samples
    pub median: f64,
    /// Sample standard deviation of cleaned samples
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// 50th percentile of all samples
    pub p50: f64,
    /// 90th percentile of all samples
    pub p90: f64,
    /// 95th percentile of all samples
    pub p95: f64,
    /// 99th percentile of all samples
    pub p99: f64,
    /// Number of samples
    pub sample_count: usize,
    /// Number of flagged samples
    pub outlier_count: usize,
    /// Full outlier breakdown
    pub outlier_analysis: OutlierAnalysis,
}

/// Compute summary statistics for `samples`
pub fn compute_summary(samples: &[f64], outlier_method: OutlierMethod) -> SummaryStatistics {
    let analysis = detect_outliers(samples, outlier_method);
    let cleaned = sorted_copy(&analysis.cleaned_samples);
    let all = sorted_copy(samples);

    let mean = if cleaned.is_empty() {
        0.0
    } else {
        cleaned.iter().sum::<f64>() / cleaned.len() as f64
    };

    let std_dev = if cleaned.len() < 2 {
        0.0
    } else {
        let variance =
            cleaned.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (cleaned.len() - 1) as f64;
        variance.sqrt()
    };

    let percentiles = compute_percentiles(&all);

    SummaryStatistics {
        mean,
        median: percentile_of_sorted(&cleaned, 50.0),
        std_dev,
        min: all.first().copied().unwrap_or(0.0),
        max: all.last().copied().unwrap_or(0.0),
        p50: percentiles.p50,
        p90: percentiles.p90,
        p95: percentiles.p95,
        p99: percentiles.p99,
        sample_count: all.len(),
        outlier_count: analysis.outlier_indices.len(),
        outlier_analysis: analysis,
    }
}

impl SummaryStatistics {
    /// Coefficient of variation in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Standard error of the mean
    pub fn std_error(&self) -> f64 {
        let n = self.outlier_analysis.cleaned_samples.len();
        if n == 0 {
            0.0
        } else {
            self.std_dev / (n as f64).sqrt()
        }
    }

    /// Whether the coefficient of variation is below `cv_threshold` percent
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation() < cv_threshold
    }
}
