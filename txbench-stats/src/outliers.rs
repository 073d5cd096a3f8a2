//! Outlier Detection
//!
//! Tukey fences over the interquartile range. Outliers are flagged, never
//! discarded: min/max and percentiles still see every sample. Only the
//! central-tendency figures use the cleaned set.

use crate::percentiles::compute_percentile;

/// Method for outlier detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Outliers are outside `[Q1 - fence * IQR, Q3 + fence * IQR]`
    Iqr {
        /// Fence multiplier (1.5 is the classic Tukey value)
        fence: f64,
    },
    /// Keep everything
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr { fence: 1.5 }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone)]
pub struct OutlierAnalysis {
    /// Original samples
    pub all_samples: Vec<f64>,
    /// Samples inside the fences
    pub cleaned_samples: Vec<f64>,
    /// Indices of flagged samples
    pub outlier_indices: Vec<usize>,
    /// Flagged samples below the lower fence
    pub low_outlier_count: usize,
    /// Flagged samples above the upper fence
    pub high_outlier_count: usize,
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
}

impl OutlierAnalysis {
    /// Percentage of samples flagged
    pub fn outlier_percentage(&self) -> f64 {
        if self.all_samples.is_empty() {
            return 0.0;
        }
        (self.outlier_indices.len() as f64 / self.all_samples.len() as f64) * 100.0
    }

    /// Whether more than `threshold_pct` percent of samples were flagged
    pub fn is_noisy(&self, threshold_pct: f64) -> bool {
        self.outlier_percentage() > threshold_pct
    }
}

/// Flag outliers in `samples`
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    let (lower_bound, upper_bound) = match method {
        OutlierMethod::Iqr { fence } if !samples.is_empty() => {
            let q1 = compute_percentile(samples, 25.0);
            let q3 = compute_percentile(samples, 75.0);
            let iqr = q3 - q1;
            (q1 - fence * iqr, q3 + fence * iqr)
        }
        _ => (f64::NEG_INFINITY, f64::INFINITY),
    };

    let mut analysis = OutlierAnalysis {
        all_samples: samples.to_vec(),
        cleaned_samples: Vec::with_capacity(samples.len()),
        outlier_indices: Vec::new(),
        low_outlier_count: 0,
        high_outlier_count: 0,
        lower_bound,
        upper_bound,
    };

    for (i, &sample) in samples.iter().enumerate() {
        if sample < lower_bound {
            analysis.outlier_indices.push(i);
            analysis.low_outlier_count += 1;
        } else if sample > upper_bound {
            analysis.outlier_indices.push(i);
            analysis.high_outlier_count += 1;
        } else {
            analysis.cleaned_samples.push(sample);
        }
    }

    analysis
}
