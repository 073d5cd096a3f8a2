//! Benchmark Planner
//!
//! Builds execution plan by filtering and ordering benchmarks.
//!
//! Filtering options:
//! - Regex pattern matching on benchmark ID
//! - Group filtering
//! - Strategy selection
//!
//! Ordering: the sequential baseline runs first, then the concurrent
//! strategies by ID, so speedups can be computed against it.

use txbench_core::{BenchmarkDef, DispatchStrategy};

/// Execution plan for benchmarks
pub struct ExecutionPlan {
    /// Ordered list of benchmarks to run
    pub benchmarks: Vec<&'static BenchmarkDef>,
}

impl ExecutionPlan {
    /// Whether the sequential baseline is part of the plan
    pub fn includes_baseline(&self) -> bool {
        self.benchmarks.iter().any(|b| !b.strategy.is_concurrent())
    }
}

/// Build execution plan from registered benchmarks.
///
/// An empty `strategies` slice selects every strategy.
pub fn build_plan(
    benchmarks: impl IntoIterator<Item = &'static BenchmarkDef>,
    filter: Option<&regex::Regex>,
    group: Option<&str>,
    strategies: &[DispatchStrategy],
) -> ExecutionPlan {
    let mut selected: Vec<_> = benchmarks
        .into_iter()
        .filter(|b| {
            if let Some(re) = filter {
                if !re.is_match(b.id) {
                    return false;
                }
            }

            if let Some(g) = group {
                if b.group != g {
                    return false;
                }
            }

            strategies.is_empty() || strategies.contains(&b.strategy)
        })
        .collect();

    selected.sort_by_key(|b| (b.strategy.is_concurrent(), b.id));

    ExecutionPlan {
        benchmarks: selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txbench_core::{GROUP_CONCURRENT, registered_benchmarks};

    #[test]
    fn test_no_filter() {
        let plan = build_plan(registered_benchmarks(), None, None, &[]);

        assert_eq!(plan.benchmarks.len(), 5);
        assert_eq!(plan.benchmarks[0].id, "sequential");
        assert_eq!(plan.benchmarks[1].id, "dispatch_default");
        assert_eq!(plan.benchmarks[2].id, "dispatch_io");
        assert_eq!(plan.benchmarks[3].id, "dispatch_main");
        assert_eq!(plan.benchmarks[4].id, "dispatch_unconfined");
        assert!(plan.includes_baseline());
    }

    #[test]
    fn test_group_filter() {
        let plan = build_plan(registered_benchmarks(), None, Some(GROUP_CONCURRENT), &[]);

        assert_eq!(plan.benchmarks.len(), 4);
        assert!(plan.benchmarks.iter().all(|b| b.group == GROUP_CONCURRENT));
        assert!(!plan.includes_baseline());
    }

    #[test]
    fn test_regex_filter() {
        let re = regex::Regex::new("^dispatch_(io|main)$").unwrap();
        let plan = build_plan(registered_benchmarks(), Some(&re), None, &[]);

        let ids: Vec<_> = plan.benchmarks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["dispatch_io", "dispatch_main"]);
    }

    #[test]
    fn test_strategy_filter_keeps_baseline_first() {
        let plan = build_plan(
            registered_benchmarks(),
            None,
            None,
            &[DispatchStrategy::Unconfined, DispatchStrategy::Sequential],
        );

        let ids: Vec<_> = plan.benchmarks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["sequential", "dispatch_unconfined"]);
    }

    #[test]
    fn test_nothing_matches() {
        let re = regex::Regex::new("gpu").unwrap();
        let plan = build_plan(registered_benchmarks(), Some(&re), None, &[]);
        assert!(plan.benchmarks.is_empty());
    }
}
