//! Wall-clock Timing
//!
//! Every workload phase sleeps for milliseconds, so cycle counters add nothing
//! here. `std::time::Instant` is monotonic and precise enough.

use std::time::{Duration, Instant};

/// Timer for a single benchmark iteration
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since start
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return elapsed nanoseconds
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        duration_to_nanos(self.elapsed())
    }
}

/// Saturating conversion of a duration to whole nanoseconds
pub fn duration_to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Whole milliseconds, rounded down, as printed in per-run console lines
pub fn duration_to_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
