// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run metrics.
//!
//! [`RunMetrics`] puts the benchmarking and search phases of one run side
//! by side, which is what the CLI prints after partitioning.

use benchmarker::BenchReport;
use partition_planner::PartitionPlan;
use std::time::Duration;

/// Aggregate metrics for one profile-then-partition run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RunMetrics {
    /// Time spent measuring devices that were missing from the cache.
    pub bench_duration: Duration,
    /// Devices measured in this run.
    pub devices_profiled: usize,
    /// Devices answered from the cache.
    pub devices_cached: usize,
    /// Time spent in the iterative search.
    pub search_duration: Duration,
    pub iterations: usize,
    pub moves: usize,
    pub base_variations: usize,
    /// Predicted completion time of the slowest device in seconds.
    pub makespan: f64,
}

impl RunMetrics {
    pub fn new(report: &BenchReport, plan: &PartitionPlan) -> Self {
        Self {
            bench_duration: report.elapsed,
            devices_profiled: report.profiled.len(),
            devices_cached: report.skipped.len(),
            search_duration: plan.search_duration,
            iterations: plan.iterations,
            moves: plan.moves,
            base_variations: plan.base_variations,
            makespan: plan.makespan,
        }
    }

    /// Items completed per second if every device runs its share in parallel.
    pub fn predicted_throughput(&self, total_batch: usize) -> f64 {
        if self.makespan <= 0.0 || !self.makespan.is_finite() {
            return 0.0;
        }
        total_batch as f64 / self.makespan
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Run: bench {:.2}s ({} profiled, {} cached), search {:.3}ms \
             ({} iterations, {} moves, {} base changes), makespan {:.2}ms",
            self.bench_duration.as_secs_f64(),
            self.devices_profiled,
            self.devices_cached,
            self.search_duration.as_secs_f64() * 1000.0,
            self.iterations,
            self.moves,
            self.base_variations,
            self.makespan * 1000.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(makespan: f64) -> RunMetrics {
        RunMetrics {
            bench_duration: Duration::from_millis(1500),
            devices_profiled: 1,
            devices_cached: 2,
            search_duration: Duration::from_micros(250),
            iterations: 7,
            moves: 4,
            base_variations: 0,
            makespan,
        }
    }

    #[test]
    fn test_throughput() {
        assert!((metrics(0.5).predicted_throughput(100) - 200.0).abs() < 1e-9);
        assert_eq!(metrics(0.0).predicted_throughput(100), 0.0);
        assert_eq!(metrics(f64::INFINITY).predicted_throughput(100), 0.0);
    }

    #[test]
    fn test_summary_format() {
        let s = metrics(0.012).summary();
        assert!(s.starts_with("Run:"));
        assert!(s.contains("1 profiled, 2 cached"));
        assert!(s.contains("7 iterations, 4 moves"));
        assert!(s.contains("makespan 12.00ms"));
    }
}
