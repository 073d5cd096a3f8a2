//! Integration tests for TxBench
//!
//! These tests verify the end-to-end behavior of the dispatch benchmarks.
//! Delays use a microsecond time unit so every strategy finishes quickly.

use std::sync::Arc;
use std::time::Duration;
use txbench::{
    BASELINE_ID, Bencher, BenchmarkStatus, DelayProfile, DispatchConfig, DispatchStrategy,
    Dispatcher, ExecutionConfig, Executor, LoopConfig, OutlierMethod, TransactionWorkload,
    build_report, compute_statistics, expected_processed, generate_csv_report,
    generate_json_report, parse_json_report, registered_benchmarks, run_benchmark_loop,
};

fn fast_delays() -> DelayProfile {
    DelayProfile::with_time_unit(Duration::from_micros(10))
}

/// Every strategy ends an iteration with 90 of 100 transactions processed
#[test]
fn test_every_strategy_processes_ninety() {
    for strategy in DispatchStrategy::ALL {
        let dispatcher = Dispatcher::new(strategy, &DispatchConfig::default()).unwrap();
        let workload = Arc::new(TransactionWorkload::new(fast_delays()));

        let elapsed = dispatcher.run(&workload, 100).unwrap();

        assert_eq!(workload.processed(), 90, "strategy {strategy}");
        assert!(elapsed > Duration::ZERO);
    }
}

/// The counter is reset before every iteration, warmup included
#[test]
fn test_counter_reset_between_iterations() {
    let workload = Arc::new(TransactionWorkload::new(fast_delays()));
    let dispatcher = Dispatcher::new(DispatchStrategy::Main, &DispatchConfig::default()).unwrap();
    let config = LoopConfig {
        warmup_iterations: 2,
        measurement_iterations: 4,
    };

    let result = run_benchmark_loop(Bencher::new(workload.clone(), 100), &dispatcher, config)
        .unwrap();

    assert_eq!(result.iterations, 6);
    assert_eq!(result.samples.len(), 4);
    assert!(result.samples.iter().all(|s| s.processed == 90));
    assert!(result.first_mismatch().is_none());
    assert_eq!(workload.processed(), 90);
}

/// Concurrent strategies overlap their transactions instead of awaiting
/// them one after another.
///
/// With a 1 ms unit, 100 sequential transactions need at least
/// 90 × (5 + 10) + 10 × 5 = 1400 ms of sleeping.
#[test]
fn test_concurrent_strategies_overlap() {
    let run = |strategy: DispatchStrategy| {
        let dispatcher = Dispatcher::new(strategy, &DispatchConfig::default()).unwrap();
        let workload = Arc::new(TransactionWorkload::new(DelayProfile::default()));
        let elapsed = dispatcher.run(&workload, 100).unwrap();
        assert_eq!(workload.processed(), 90, "strategy {strategy}");
        elapsed
    };

    let sequential = run(DispatchStrategy::Sequential);
    assert!(sequential >= Duration::from_millis(1400), "{sequential:?}");

    for strategy in DispatchStrategy::ALL
        .into_iter()
        .filter(|s| s.is_concurrent())
    {
        let elapsed = run(strategy);
        assert!(
            elapsed < Duration::from_millis(500),
            "{strategy} took {elapsed:?}"
        );
        assert!(
            elapsed * 5 < sequential,
            "{strategy} took {elapsed:?}, sequential {sequential:?}"
        );
    }
}

/// Small pools still process every transaction
#[test]
fn test_undersized_pools() {
    let config = DispatchConfig {
        default_workers: Some(1),
        io_workers: Some(2),
    };
    for strategy in [DispatchStrategy::Default, DispatchStrategy::Io] {
        let dispatcher = Dispatcher::new(strategy, &config).unwrap();
        let workload = Arc::new(TransactionWorkload::new(fast_delays()));
        dispatcher.run(&workload, 55).unwrap();
        assert_eq!(workload.processed(), expected_processed(55));
    }
}

/// Workload calls are plain futures usable from any tokio context
#[tokio::test]
async fn test_workload_in_async_context() {
    let workload = TransactionWorkload::new(DelayProfile::instant());

    assert!(workload.validate(7).await);
    assert!(!workload.validate(30).await);

    workload.process(10).await;
    assert_eq!(workload.processed(), 0);
    workload.process(11).await;
    assert_eq!(workload.processed(), 1);
}

/// Full harness pipeline: execute, summarize, report, JSON round trip
#[test]
fn test_report_pipeline() {
    let config = ExecutionConfig {
        transactions: 100,
        loop_config: LoopConfig {
            warmup_iterations: 1,
            measurement_iterations: 3,
        },
        delays: fast_delays(),
        dispatch: DispatchConfig::default(),
        show_progress: false,
    };
    let benches: Vec<_> = registered_benchmarks().iter().collect();

    let results = Executor::new(config.clone()).execute(&benches);
    let stats = compute_statistics(&results, OutlierMethod::default());
    let report = build_report(&results, &stats, &config, 1.0);

    assert!(!report.has_failures());
    assert_eq!(report.summary.passed, 5);
    for result in &report.results {
        assert_eq!(result.status, BenchmarkStatus::Passed);
        let metrics = result.metrics.as_ref().unwrap();
        assert_eq!(metrics.samples, 3);
        assert_eq!(metrics.processed, 90);
        assert!(metrics.mean_ns > 0.0);
    }

    let comparison = report.comparison.as_ref().unwrap();
    assert_eq!(comparison.baseline, BASELINE_ID);
    assert_eq!(comparison.entries.len(), 5);
    let baseline = comparison.entries.iter().find(|e| e.is_baseline).unwrap();
    assert!((baseline.speedup - 1.0).abs() < 1e-9);

    let json = generate_json_report(&report).unwrap();
    let parsed = parse_json_report(&json).unwrap();
    assert_eq!(parsed.results.len(), 5);
    assert_eq!(parsed.meta.config, report.meta.config);
    assert_eq!(parsed.meta.config.time_unit_ns, 10_000);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["results"][0]["id"], "sequential");
    assert_eq!(value["results"][0]["status"], "passed");

    let csv = generate_csv_report(&report);
    assert_eq!(csv.lines().count(), 6);
    for line in csv.lines() {
        assert_eq!(line.split(',').count(), 16, "{line}");
    }
    let sequential_row = csv.lines().nth(1).unwrap();
    assert!(sequential_row.starts_with("sequential,sequential,passed,1,3,"));
    assert!(sequential_row.ends_with(",1.000"));
}
