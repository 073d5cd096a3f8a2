//! Bencher - The Iteration Loop
//!
//! Iterations are counted, not timed: each one resets the shared counter, runs
//! the dispatcher over every transaction id once, and records a [`Sample`].
//! A fixed number of warmup iterations run first and are discarded.

use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::measure::duration_to_nanos;
use crate::workload::{TransactionWorkload, expected_processed};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default warmup iterations
pub const DEFAULT_WARMUP_ITERATIONS: u64 = 10;

/// Default measured iterations
pub const DEFAULT_MEASUREMENT_ITERATIONS: u64 = 10;

/// One measured iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock time of the iteration in nanoseconds
    pub duration_nanos: u64,
    /// Counter value at the end of the iteration
    pub processed: u64,
}

/// Result of a full warmup + measurement run
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Measured samples, in execution order
    pub samples: Vec<Sample>,
    /// Total iterations performed, warmup included
    pub iterations: u64,
    /// Total time spent in measurement (excluding warmup)
    pub total_time_ns: u64,
    /// Transactions per iteration
    pub transactions: u64,
    /// Counter value every iteration should end with
    pub expected_processed: u64,
}

impl BenchmarkResult {
    /// Sample durations as `f64` nanoseconds, ready for statistics
    pub fn durations_ns(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.duration_nanos as f64)
            .collect()
    }

    /// First measured sample whose counter disagrees with the expected count
    pub fn first_mismatch(&self) -> Option<(usize, &Sample)> {
        self.samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.processed != self.expected_processed)
    }
}

/// Iteration counts for [`run_benchmark_loop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Iterations run and discarded before measurement
    pub warmup_iterations: u64,
    /// Iterations recorded as samples
    pub measurement_iterations: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: DEFAULT_WARMUP_ITERATIONS,
            measurement_iterations: DEFAULT_MEASUREMENT_ITERATIONS,
        }
    }
}

/// Drives iterations of one workload and collects samples.
pub struct Bencher {
    workload: Arc<TransactionWorkload>,
    transactions: u64,
    samples: Vec<Sample>,
    warmup_times: Vec<u64>,
    is_warmup: bool,
    total_iterations: u64,
}

impl Bencher {
    /// Create a bencher in warmup mode
    pub fn new(workload: Arc<TransactionWorkload>, transactions: u64) -> Self {
        Self {
            workload,
            transactions,
            samples: Vec::new(),
            warmup_times: Vec::new(),
            is_warmup: true,
            total_iterations: 0,
        }
    }

    /// Workload shared with spawned tasks
    pub fn workload(&self) -> &Arc<TransactionWorkload> {
        &self.workload
    }

    /// Run one iteration: reset the counter, dispatch all ids, record the time.
    pub fn iter(&mut self, dispatcher: &Dispatcher) -> Result<(), DispatchError> {
        self.workload.reset();

        let elapsed = dispatcher.run(&self.workload, self.transactions)?;
        let duration_nanos = duration_to_nanos(elapsed);
        let processed = self.workload.processed();

        self.total_iterations += 1;
        if self.is_warmup {
            self.warmup_times.push(duration_nanos);
        } else {
            self.samples.push(Sample {
                duration_nanos,
                processed,
            });
        }
        Ok(())
    }

    /// Mean warmup iteration time in nanoseconds
    pub fn estimated_iter_time_ns(&self) -> Option<u64> {
        if self.warmup_times.is_empty() {
            return None;
        }
        let sum: u64 = self.warmup_times.iter().sum();
        Some(sum / self.warmup_times.len() as u64)
    }

    /// Transition from warmup to measurement; later iterations become samples
    pub fn start_measurement(&mut self, measurement_iterations: u64) {
        if let Some(estimate) = self.estimated_iter_time_ns() {
            tracing::debug!(
                estimate_ms = estimate / 1_000_000,
                measurement_iterations,
                "warmup complete"
            );
        }
        self.is_warmup = false;
        self.warmup_times.clear();
        self.samples.reserve(measurement_iterations as usize);
    }

    /// Whether the bencher is still in warmup
    pub fn is_warmup(&self) -> bool {
        self.is_warmup
    }

    /// Collected samples
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterations run so far, warmup included
    pub fn iteration_count(&self) -> u64 {
        self.total_iterations
    }

    /// Finalize and return results
    pub fn finish(self) -> BenchmarkResult {
        let total_time_ns = self.samples.iter().map(|s| s.duration_nanos).sum();

        BenchmarkResult {
            samples: self.samples,
            iterations: self.total_iterations,
            total_time_ns,
            transactions: self.transactions,
            expected_processed: expected_processed(self.transactions),
        }
    }
}

/// Run the full loop: warmup → measurement → finish.
///
/// Stops at the first dispatch failure.
pub fn run_benchmark_loop(
    mut bencher: Bencher,
    dispatcher: &Dispatcher,
    config: LoopConfig,
) -> Result<BenchmarkResult, DispatchError> {
    for _ in 0..config.warmup_iterations {
        bencher.iter(dispatcher)?;
    }

    bencher.start_measurement(config.measurement_iterations);

    for _ in 0..config.measurement_iterations {
        bencher.iter(dispatcher)?;
    }

    Ok(bencher.finish())
}
