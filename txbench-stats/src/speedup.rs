//! Baseline Ratios
//!
//! Speedup is reported as `baseline / candidate`, so a strategy twice as fast
//! as the sequential run scores 2.0. Relative change is the signed percentage
//! used for regression checks against a saved report.

/// How many times faster `candidate` is than `baseline`.
///
/// Returns 0.0 when either mean is not positive.
pub fn compute_speedup(baseline_mean: f64, candidate_mean: f64) -> f64 {
    if baseline_mean <= 0.0 || candidate_mean <= 0.0 {
        return 0.0;
    }
    baseline_mean / candidate_mean
}

/// Signed percentage change from `baseline` to `current`
pub fn relative_change(baseline: f64, current: f64) -> f64 {
    if baseline > 0.0 {
        ((current - baseline) / baseline) * 100.0
    } else {
        0.0
    }
}

/// Outcome of comparing a mean against a saved one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Slower by more than the threshold
    Regression,
    /// Faster by more than the threshold
    Improvement,
    /// Within the threshold
    Unchanged,
}

/// Classify a relative change against a percentage threshold
pub fn classify_change(relative_change: f64, threshold_pct: f64) -> ChangeKind {
    if relative_change > threshold_pct {
        ChangeKind::Regression
    } else if relative_change < -threshold_pct {
        ChangeKind::Improvement
    } else {
        ChangeKind::Unchanged
    }
}
