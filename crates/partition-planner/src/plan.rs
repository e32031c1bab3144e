// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition plan: the output of the search.
//!
//! A plan records how many items of the batch each device runs, the
//! estimated completion time of each device, and a trace of the search
//! that produced it. The plan is the contract between the planner and
//! whatever dispatches the batch.

use crate::PlannerError;
use std::time::Duration;

/// One device's share of the batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Assignment {
    pub device: String,
    /// Items assigned to this device.
    pub batch_size: usize,
    /// Estimated completion time in seconds for `batch_size` items.
    pub predicted_time: f64,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Only one device: the whole batch stays on it.
    SingleDevice,
    /// No device could accept a trial without exceeding the target time.
    NoFeasibleMove,
    /// The base device is down to a single item.
    BaseExhausted,
    /// The base device has been replaced `base_var_limit` times.
    BaseVariationLimit,
}

/// Snapshot of one search iteration.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Base device during this iteration.
    pub base_device: String,
    /// Items offered to each candidate.
    pub trial_step: usize,
    /// Time the base would need after giving up one item.
    pub target_time: f64,
    /// Device that received the work, if any.
    pub winner: Option<String>,
    /// Items moved this iteration.
    pub moved: usize,
    /// Batch distribution after the iteration, in device order.
    pub distribution: Vec<usize>,
    pub elapsed: Duration,
}

/// The complete result of a partitioning run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartitionPlan {
    pub total_batch: usize,
    /// Per-device shares, in the order devices were supplied.
    pub assignments: Vec<Assignment>,
    /// Largest predicted completion time across devices.
    pub makespan: f64,
    /// Base device when the search stopped.
    pub base_device: String,
    /// Loop iterations run (0 for a single device).
    pub iterations: usize,
    /// Iterations that moved work.
    pub moves: usize,
    /// How many times the base device was replaced.
    pub base_variations: usize,
    pub termination: Termination,
    pub history: Vec<IterationRecord>,
    pub search_duration: Duration,
}

impl PartitionPlan {
    pub fn num_devices(&self) -> usize {
        self.assignments.len()
    }

    /// Sum of all assigned batch sizes.
    pub fn assigned_total(&self) -> usize {
        self.assignments.iter().map(|a| a.batch_size).sum()
    }

    /// Looks up a device's assignment by name.
    pub fn assignment(&self, device: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.device == device)
    }

    /// Batch size per device, in device order.
    pub fn distribution(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.batch_size).collect()
    }

    /// Devices that received at least one item.
    pub fn active_devices(&self) -> usize {
        self.assignments.iter().filter(|a| a.batch_size > 0).count()
    }

    /// Validates the plan.
    ///
    /// Checks:
    /// - Plan is non-empty.
    /// - Assigned sizes sum to the total batch.
    /// - Predicted times are non-negative and the makespan is their maximum.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.assignments.is_empty() {
            return Err(PlannerError::NoDevices);
        }

        let assigned = self.assigned_total();
        if assigned != self.total_batch {
            return Err(PlannerError::InvalidPlan(format!(
                "assigned {assigned} items but the batch has {}",
                self.total_batch,
            )));
        }

        let mut max_time = 0.0f64;
        for a in &self.assignments {
            if a.predicted_time.is_nan() || a.predicted_time < 0.0 {
                return Err(PlannerError::InvalidPlan(format!(
                    "device '{}' has predicted time {}",
                    a.device, a.predicted_time,
                )));
            }
            max_time = max_time.max(a.predicted_time);
        }
        if (max_time - self.makespan).abs() > 1e-12 {
            return Err(PlannerError::InvalidPlan(format!(
                "makespan {} does not match slowest device time {max_time}",
                self.makespan,
            )));
        }

        Ok(())
    }

    /// Returns a human-readable summary of the plan.
    pub fn summary(&self) -> String {
        let shares: Vec<String> = self
            .assignments
            .iter()
            .map(|a| format!("{}={}", a.device, a.batch_size))
            .collect();
        format!(
            "Plan: {} items over {} devices [{}], makespan {:.2} ms, \
             {} iterations ({} moves, {} base changes, {:?}), search {:.2} ms",
            self.total_batch,
            self.num_devices(),
            shares.join(", "),
            self.makespan * 1000.0,
            self.iterations,
            self.moves,
            self.base_variations,
            self.termination,
            self.search_duration.as_secs_f64() * 1000.0,
        )
    }
}
