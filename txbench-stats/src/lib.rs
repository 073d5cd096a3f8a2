#![warn(missing_docs)]
//! TxBench Statistical Engine
//!
//! Summaries for per-iteration wall-clock times:
//! - Outlier detection via Tukey fences
//! - Percentiles over all samples, mean/median/std-dev over cleaned samples
//! - Speedup against the sequential baseline and regression classification

mod outliers;
mod percentiles;
mod speedup;
mod summary;

pub use outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
pub use percentiles::{
    Percentiles, compute_percentile, compute_percentiles, percentile_of_sorted, sorted_copy,
};
pub use speedup::{ChangeKind, classify_change, compute_speedup, relative_change};
pub use summary::{SummaryStatistics, compute_summary};

/// Default regression threshold in percent
pub const DEFAULT_REGRESSION_THRESHOLD: f64 = 5.0;
