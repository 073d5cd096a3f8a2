//! Configuration loading from txbench.toml
//!
//! The configuration file is discovered by walking up from the current
//! directory. Every section and field is optional; CLI flags override it.

use anyhow::{Context, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use txbench_core::{
    DEFAULT_MEASUREMENT_ITERATIONS, DEFAULT_TRANSACTION_COUNT, DEFAULT_WARMUP_ITERATIONS,
    DelayProfile, DispatchConfig, LoopConfig,
};

/// Name of the discovered configuration file
pub const CONFIG_FILE_NAME: &str = "txbench.toml";

/// Default location of the saved baseline report
pub const DEFAULT_BASELINE_PATH: &str = "target/txbench/baseline.json";

/// TxBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TxBenchConfig {
    /// Workload shape
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// Iteration counts
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Pool sizing
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// CI configuration
    #[serde(default)]
    pub ci: CiConfig,
}

/// Workload shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Transactions per iteration
    #[serde(default = "default_transactions")]
    pub transactions: u64,
    /// Validation delay range `[low, high)` in time units
    #[serde(default = "default_validate_delay")]
    pub validate_delay: [u64; 2],
    /// Processing delay range `[low, high)` in time units
    #[serde(default = "default_process_delay")]
    pub process_delay: [u64; 2],
    /// Length of one time unit (e.g. "1ms", "100us")
    #[serde(default = "default_time_unit")]
    pub time_unit: String,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            transactions: default_transactions(),
            validate_delay: default_validate_delay(),
            process_delay: default_process_delay(),
            time_unit: default_time_unit(),
        }
    }
}

fn default_transactions() -> u64 {
    DEFAULT_TRANSACTION_COUNT
}
fn default_validate_delay() -> [u64; 2] {
    [5, 20]
}
fn default_process_delay() -> [u64; 2] {
    [10, 50]
}
fn default_time_unit() -> String {
    "1ms".to_string()
}

impl WorkloadConfig {
    /// Build the delay profile, rejecting inverted ranges and bad units
    pub fn delay_profile(&self) -> anyhow::Result<DelayProfile> {
        let time_unit = TxBenchConfig::parse_duration(&self.time_unit)
            .with_context(|| format!("invalid workload.time_unit {:?}", self.time_unit))?;
        Ok(DelayProfile {
            validate: delay_range("validate_delay", self.validate_delay)?,
            process: delay_range("process_delay", self.process_delay)?,
            time_unit,
        })
    }

    /// Reject a workload with nothing to do
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.transactions == 0 {
            bail!("workload.transactions must be at least 1");
        }
        self.delay_profile().map(|_| ())
    }
}

fn delay_range(name: &str, [low, high]: [u64; 2]) -> anyhow::Result<std::ops::Range<u64>> {
    if low > high {
        bail!("workload.{name} is inverted: [{low}, {high}]");
    }
    Ok(low..high)
}

/// Iteration counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Iterations run and discarded before measurement
    #[serde(default = "default_warmup_iterations")]
    pub warmup_iterations: u64,
    /// Iterations recorded per benchmark
    #[serde(default = "default_measurement_iterations")]
    pub measurement_iterations: u64,
    /// Threads for parallel statistics (None = all cores)
    #[serde(default)]
    pub stats_threads: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: default_warmup_iterations(),
            measurement_iterations: default_measurement_iterations(),
            stats_threads: None,
        }
    }
}

impl RunnerConfig {
    /// Iteration counts for the bencher loop
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            warmup_iterations: self.warmup_iterations,
            measurement_iterations: self.measurement_iterations,
        }
    }
}

fn default_warmup_iterations() -> u64 {
    DEFAULT_WARMUP_ITERATIONS
}
fn default_measurement_iterations() -> u64 {
    DEFAULT_MEASUREMENT_ITERATIONS
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Save JSON baseline after each run
    #[serde(default)]
    pub save_baseline: bool,
    /// Baseline file path
    #[serde(default)]
    pub baseline_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            save_baseline: false,
            baseline_path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

/// CI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiConfig {
    /// Regression threshold percentage against the baseline
    #[serde(default = "default_threshold")]
    pub regression_threshold: f64,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            regression_threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    txbench_stats::DEFAULT_REGRESSION_THRESHOLD
}

impl TxBenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Walk up from the current directory looking for `txbench.toml`.
    ///
    /// A file that exists but does not parse is an error, not a silent default.
    pub fn discover() -> anyhow::Result<Option<Self>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Self::load(&config_path).map(Some);
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Write the default configuration to `path`.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub fn write_default(path: impl AsRef<Path>, force: bool) -> anyhow::Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
        std::fs::write(path, Self::default_toml())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(())
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# TxBench Configuration

[workload]
# Transactions per iteration (every 10th fails validation)
transactions = 100
# Random delay ranges [low, high) in time units
validate_delay = [5, 20]
process_delay = [10, 50]
# Length of one time unit
time_unit = "1ms"

[runner]
# Iterations run and discarded before measurement
warmup_iterations = 10
# Iterations recorded per benchmark
measurement_iterations = 10
# Threads for statistics (uncomment to pin)
# stats_threads = 2

[dispatch]
# Worker threads for the default pool (defaults to CPU count)
# default_workers = 8
# Worker threads for the I/O pool (defaults to max(64, CPU count))
# io_workers = 64

[output]
# Default output format: human, json, csv
format = "human"
# Save JSON baseline after each run
save_baseline = false
# Baseline file for comparison (uncomment to enable)
# baseline_path = "target/txbench/baseline.json"

[ci]
# Regression threshold percentage against the baseline
regression_threshold = 5.0
"#
        .to_string()
    }

    /// Parse a duration string (e.g. "3s", "500ms", "1.5ms", "0")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic() || *c == 'µ')
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            bail!("Duration must be a non-negative number: {}", s);
        }

        let nanos_per_unit: f64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" | "min" => 60e9,
            _ => return Err(anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * nanos_per_unit) as u64))
    }
}
