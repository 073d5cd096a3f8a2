//! Dispatch Strategies
//!
//! Each strategy decides where the per-transaction futures run:
//!
//! | strategy     | runtime                           | launch                      |
//! |--------------|-----------------------------------|-----------------------------|
//! | `sequential` | current-thread                    | awaited one after another   |
//! | `default`    | multi-thread, one worker per core | `tokio::spawn` all, join    |
//! | `io`         | multi-thread, at least 64 workers | `tokio::spawn` all, join    |
//! | `unconfined` | current-thread                    | `join_all` in place, no spawn |
//! | `main`       | current-thread event loop         | `tokio::spawn` all, join    |
//!
//! A [`Dispatcher`] owns its runtime, so the runtime is built once per
//! benchmark and reused by every iteration.

use crate::error::DispatchError;
use crate::measure::{Timer, duration_to_millis};
use crate::workload::TransactionWorkload;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Lower bound on the I/O pool size
pub const MIN_IO_WORKERS: usize = 64;

/// Where transaction tasks are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStrategy {
    /// In-order calls, no concurrency
    Sequential,
    /// Worker pool sized to the CPU count
    Default,
    /// Oversized pool intended for blocking-ish work
    Io,
    /// Futures polled in place on whichever thread joins them
    Unconfined,
    /// Single-threaded event loop
    Main,
}

impl DispatchStrategy {
    /// All strategies, sequential first
    pub const ALL: [DispatchStrategy; 5] = [
        DispatchStrategy::Sequential,
        DispatchStrategy::Default,
        DispatchStrategy::Io,
        DispatchStrategy::Unconfined,
        DispatchStrategy::Main,
    ];

    /// Machine name used in config files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchStrategy::Sequential => "sequential",
            DispatchStrategy::Default => "default",
            DispatchStrategy::Io => "io",
            DispatchStrategy::Unconfined => "unconfined",
            DispatchStrategy::Main => "main",
        }
    }

    /// Display label used in per-run console lines
    pub fn label(self) -> &'static str {
        match self {
            DispatchStrategy::Sequential => "Sequential",
            DispatchStrategy::Default => "Default",
            DispatchStrategy::Io => "IO",
            DispatchStrategy::Unconfined => "Unconfined",
            DispatchStrategy::Main => "Main",
        }
    }

    /// Whether transactions may overlap in time
    pub fn is_concurrent(self) -> bool {
        !matches!(self, DispatchStrategy::Sequential)
    }
}

impl std::fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DispatchStrategy {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "seq" => Ok(DispatchStrategy::Sequential),
            "default" | "cpu" => Ok(DispatchStrategy::Default),
            "io" => Ok(DispatchStrategy::Io),
            "unconfined" => Ok(DispatchStrategy::Unconfined),
            "main" => Ok(DispatchStrategy::Main),
            other => Err(DispatchError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Pool sizing overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Worker threads for the default pool (None = available parallelism)
    #[serde(default)]
    pub default_workers: Option<usize>,
    /// Worker threads for the I/O pool (None = max(64, available parallelism))
    #[serde(default)]
    pub io_workers: Option<usize>,
}

impl DispatchConfig {
    /// Resolved worker count for `strategy`
    pub fn worker_threads(&self, strategy: DispatchStrategy) -> usize {
        let cores = available_cores();
        match strategy {
            DispatchStrategy::Default => self.default_workers.unwrap_or(cores).max(1),
            DispatchStrategy::Io => self
                .io_workers
                .unwrap_or_else(|| cores.max(MIN_IO_WORKERS))
                .max(1),
            _ => 1,
        }
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// A strategy bound to its runtime.
///
/// `run` blocks the calling thread, so it must not be invoked from inside
/// another tokio runtime.
pub struct Dispatcher {
    strategy: DispatchStrategy,
    worker_threads: usize,
    runtime: Runtime,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("strategy", &self.strategy)
            .field("worker_threads", &self.worker_threads)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Build the runtime for `strategy`
    pub fn new(strategy: DispatchStrategy, config: &DispatchConfig) -> Result<Self, DispatchError> {
        let worker_threads = config.worker_threads(strategy);

        let runtime = match strategy {
            DispatchStrategy::Default | DispatchStrategy::Io => Builder::new_multi_thread()
                .worker_threads(worker_threads)
                .thread_name(format!("txbench-{}", strategy.as_str()))
                .enable_time()
                .build(),
            DispatchStrategy::Sequential | DispatchStrategy::Unconfined | DispatchStrategy::Main => {
                Builder::new_current_thread().enable_time().build()
            }
        }
        .map_err(|source| DispatchError::RuntimeBuild {
            strategy: strategy.as_str(),
            source,
        })?;

        tracing::debug!(%strategy, worker_threads, "runtime ready");

        Ok(Self {
            strategy,
            worker_threads,
            runtime,
        })
    }

    /// Strategy driven by this dispatcher
    pub fn strategy(&self) -> DispatchStrategy {
        self.strategy
    }

    /// Worker threads backing the strategy (1 for single-threaded ones)
    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Process ids `1..=transactions` and return the wall-clock time taken.
    ///
    /// The counter is not reset here; that is the caller's job.
    pub fn run(
        &self,
        workload: &Arc<TransactionWorkload>,
        transactions: u64,
    ) -> Result<Duration, DispatchError> {
        let timer = Timer::start();
        self.runtime.block_on(self.drive(workload, transactions))?;
        let elapsed = timer.elapsed();

        let elapsed_ms = duration_to_millis(elapsed);
        match self.strategy {
            DispatchStrategy::Sequential => {
                tracing::info!(
                    strategy = %self.strategy,
                    elapsed_ms,
                    "Sequential processing time: {elapsed_ms} ms"
                );
            }
            strategy => {
                tracing::info!(
                    %strategy,
                    elapsed_ms,
                    "Concurrent processing time on {}: {elapsed_ms} ms",
                    strategy.label()
                );
            }
        }

        Ok(elapsed)
    }

    async fn drive(
        &self,
        workload: &Arc<TransactionWorkload>,
        transactions: u64,
    ) -> Result<(), DispatchError> {
        match self.strategy {
            DispatchStrategy::Sequential => {
                for id in 1..=transactions {
                    workload.process(id).await;
                }
            }
            DispatchStrategy::Unconfined => {
                let workload: &TransactionWorkload = workload;
                futures::future::join_all((1..=transactions).map(move |id| workload.process(id)))
                    .await;
            }
            DispatchStrategy::Default | DispatchStrategy::Io | DispatchStrategy::Main => {
                let handles: Vec<_> = (1..=transactions)
                    .map(|id| {
                        let workload = Arc::clone(workload);
                        tokio::spawn(async move { workload.process(id).await })
                    })
                    .collect();
                futures::future::try_join_all(handles).await?;
            }
        }
        Ok(())
    }
}
