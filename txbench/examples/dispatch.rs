//! One pass over every strategy, without warmup or statistics.
//!
//! Run with:
//!   cargo run --example dispatch
//!   cargo run --example dispatch -- 250    # 250 transactions

use std::sync::Arc;
use txbench::prelude::*;
use txbench::{compute_speedup, expected_processed};

fn main() -> Result<(), txbench::DispatchError> {
    let transactions = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(100);
    let workload = Arc::new(TransactionWorkload::new(DelayProfile::default()));

    let mut sequential_ms = None;
    for strategy in DispatchStrategy::ALL {
        let dispatcher = Dispatcher::new(strategy, &DispatchConfig::default())?;
        workload.reset();
        let elapsed = dispatcher.run(&workload, transactions)?;
        let ms = elapsed.as_secs_f64() * 1000.0;

        let speedup = match sequential_ms {
            None => {
                sequential_ms = Some(ms);
                1.0
            }
            Some(base) => compute_speedup(base, ms),
        };
        println!(
            "{:<11} {:>9.1} ms  {:>6.2}x  processed {}/{}",
            strategy.label(),
            ms,
            speedup,
            workload.processed(),
            expected_processed(transactions)
        );
    }

    Ok(())
}
