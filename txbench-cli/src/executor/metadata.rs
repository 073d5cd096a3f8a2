//! System Metadata Collection
//!
//! Collects system information and the effective run configuration for the
//! report header.
//!
//! ## Collected Data
//!
//! - **Git**: Current commit hash and branch name
//! - **OS**: Operating system name and architecture
//! - **CPU**: Model name and core count
//! - **Config**: Transactions, iteration counts, delay ranges
//! - **Timestamp**: UTC time of report generation
//!
//! The CPU model is read from /proc/cpuinfo and degrades to "Unknown" on
//! other platforms.

use super::execution::ExecutionConfig;
use chrono::Utc;
use txbench_core::duration_to_nanos;
use txbench_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};

/// Build report metadata including system info and git details
pub fn build_report_meta(config: &ExecutionConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
    };

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        git_commit: git(&["rev-parse", "HEAD"]),
        git_branch: git(&["rev-parse", "--abbrev-ref", "HEAD"]),
        system,
        config: report_config(config),
    }
}

/// Effective configuration as recorded in the report
pub fn report_config(config: &ExecutionConfig) -> ReportConfig {
    let delays = &config.delays;
    ReportConfig {
        transactions: config.transactions,
        warmup_iterations: config.loop_config.warmup_iterations,
        measurement_iterations: config.loop_config.measurement_iterations,
        validate_delay: [delays.validate.start, delays.validate.end],
        process_delay: [delays.process.start, delays.process.end],
        time_unit_ns: duration_to_nanos(delays.time_unit),
    }
}

fn git(args: &[&str]) -> Option<String> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
