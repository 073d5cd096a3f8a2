#![warn(missing_docs)]
//! TxBench Report - Output Formats
//!
//! Generates:
//! - JSON (machine-readable, also the baseline format)
//! - CSV (spreadsheet-compatible)
//!
//! Human-readable terminal output lives in the CLI crate.

mod csv;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use json::{generate_json_report, parse_json_report};
pub use report::{
    BenchmarkMetrics, BenchmarkReportResult, BenchmarkStatus, Comparison, ComparisonEntry,
    ComparisonResult, FailureInfo, Report, ReportConfig, ReportMeta, ReportSummary,
    SCHEMA_VERSION, SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Format nanoseconds with a unit that keeps 2-4 significant digits
pub fn format_duration(nanos: f64) -> String {
    let abs = nanos.abs();
    if abs >= 1e9 {
        format!("{:.3} s", nanos / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2} ms", nanos / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2} µs", nanos / 1e3)
    } else {
        format!("{:.0} ns", nanos)
    }
}
