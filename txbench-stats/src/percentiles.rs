//! Percentiles
//!
//! Linear interpolation between closest ranks, computed over all samples.
//! With only a handful of iterations per benchmark the upper percentiles sit
//! close to the maximum; that is expected.

use std::cmp::Ordering;

/// Percentiles reported for every benchmark
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Percentiles {
    /// Median
    pub p50: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Sort a copy of `samples` ascending. NaNs compare equal to everything.
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Percentile of already-sorted data; `percentile` is in `0.0..=100.0`
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (percentile.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
        }
    }
}

/// Percentile of unsorted data
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    percentile_of_sorted(&sorted_copy(samples), percentile)
}

/// All reported percentiles with a single sort
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    let sorted = sorted_copy(samples);
    Percentiles {
        p50: percentile_of_sorted(&sorted, 50.0),
        p90: percentile_of_sorted(&sorted, 90.0),
        p95: percentile_of_sorted(&sorted, 95.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(compute_percentile(&[5.0, 1.0, 3.0], 50.0), 3.0);
        assert_eq!(compute_percentile(&[4.0, 1.0, 3.0, 2.0], 50.0), 2.5);
    }

    #[test]
    fn test_interpolation() {
        let samples: Vec<f64> = (1..=11).map(|x| x as f64 * 10.0).collect();
        assert_eq!(compute_percentile(&samples, 0.0), 10.0);
        assert_eq!(compute_percentile(&samples, 100.0), 110.0);
        assert!((compute_percentile(&samples, 25.0) - 35.0).abs() < 1e-9);
        assert!((compute_percentile(&samples, 95.0) - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_percentile_clamped() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(compute_percentile(&samples, 150.0), 3.0);
        assert_eq!(compute_percentile(&samples, -5.0), 1.0);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(compute_percentile(&[42.0], 99.0), 42.0);
        assert_eq!(compute_percentile(&[], 50.0), 0.0);
        assert_eq!(compute_percentiles(&[]), Percentiles::default());
    }

    #[test]
    fn test_compute_all_percentiles() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let p = compute_percentiles(&samples);

        assert!((p.p50 - 50.5).abs() < 1e-9);
        assert!(p.p90 > 90.0 && p.p90 < 91.0);
        assert!(p.p99 > 99.0 && p.p99 < 100.0);
    }
}
