//! Transaction Workload
//!
//! A synthetic transaction is just an integer id. Processing one means:
//! 1. validate: sleep for a random delay, reject every id divisible by 10
//! 2. process: sleep for another random delay, then bump the shared counter
//!
//! Rejected transactions are dropped silently. The counter is the only shared
//! mutable state and is touched exclusively through `fetch_add`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default number of transactions per iteration
pub const DEFAULT_TRANSACTION_COUNT: u64 = 100;

/// Every id that is a multiple of this fails validation
pub const FAILURE_MODULUS: u64 = 10;

/// Random delay ranges for the two workload phases.
///
/// Ranges are half-open and expressed in multiples of `time_unit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayProfile {
    /// Validation delay range (in time units)
    pub validate: Range<u64>,
    /// Processing delay range (in time units)
    pub process: Range<u64>,
    /// Length of one time unit
    pub time_unit: Duration,
}

impl Default for DelayProfile {
    fn default() -> Self {
        Self {
            validate: 5..20,
            process: 10..50,
            time_unit: Duration::from_millis(1),
        }
    }
}

impl DelayProfile {
    /// Profile with the default ranges scaled to a different time unit.
    pub fn with_time_unit(time_unit: Duration) -> Self {
        Self {
            time_unit,
            ..Self::default()
        }
    }

    /// Profile that never sleeps. Useful for exercising dispatch overhead alone.
    pub fn instant() -> Self {
        Self::with_time_unit(Duration::ZERO)
    }

    fn draw(&self, range: &Range<u64>) -> Duration {
        if range.is_empty() || self.time_unit.is_zero() {
            return Duration::ZERO;
        }
        let units = rand::thread_rng().gen_range(range.clone());
        self.time_unit.saturating_mul(units.min(u32::MAX as u64) as u32)
    }
}

/// Number of ids in `1..=transactions` that pass validation.
pub fn expected_processed(transactions: u64) -> u64 {
    transactions - transactions / FAILURE_MODULUS
}

/// Simulated transaction pipeline with a shared processed counter.
#[derive(Debug, Default)]
pub struct TransactionWorkload {
    processed: AtomicU64,
    delays: DelayProfile,
}

impl TransactionWorkload {
    /// Create a workload with the given delay profile and a zeroed counter
    pub fn new(delays: DelayProfile) -> Self {
        Self {
            processed: AtomicU64::new(0),
            delays,
        }
    }

    /// Delay profile in use
    pub fn delays(&self) -> &DelayProfile {
        &self.delays
    }

    /// Simulate validation (e.g. a balance check).
    pub async fn validate(&self, id: u64) -> bool {
        suspend(self.delays.draw(&self.delays.validate)).await;
        id % FAILURE_MODULUS != 0
    }

    /// Validate then process one transaction.
    pub async fn process(&self, id: u64) {
        if !self.validate(id).await {
            tracing::trace!(id, "transaction rejected");
            return;
        }
        suspend(self.delays.draw(&self.delays.process)).await;
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of transactions processed since the last reset
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Zero the counter. Called at the start of every iteration.
    pub fn reset(&self) {
        self.processed.store(0, Ordering::Relaxed);
    }
}

async fn suspend(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}
