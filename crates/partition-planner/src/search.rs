// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Greedy reallocation search.
//!
//! The whole batch starts on the device that would finish it fastest
//! (the *base*). Each iteration then tries to offload a few items from the
//! base to every other device and commits the move that leaves the most
//! slack against the base's own time:
//!
//! ```text
//! ┌─► re-select base? ─► target = est(base, base.batch - 1)
//! │        │
//! │        ▼
//! │   trial per candidate (parallel)  ─►  best score  ─► none? ─► stop
//! │        │                                   │
//! │        ▼                                   ▼
//! └── base exhausted / limit? ◄──────── move trial items base → winner
//! ```
//!
//! A trial for candidate `d` is accepted only if every non-base device,
//! with `d` holding `trial_step` extra items, stays under
//! `target * max_thresh`. Its score is `target − est(d, d.batch + step)`.
//!
//! # Concurrency
//!
//! Trials of one iteration are independent: each reads a snapshot of the
//! current assignments and the immutable profiles, and writes only its own
//! device's `trial`. With more than two devices they run on the rayon pool;
//! the parallel iterator's completion is the barrier before the winner is
//! read. Sequential and parallel evaluation give identical results.

use crate::plan::{Assignment, IterationRecord, PartitionPlan, Termination};
use crate::{Device, DeviceSpec, InfeasiblePolicy, PlannerError, SearchParameters, Selection, TrialOutcome};
use perf_profile::{PerfProfile, ProfileCache};
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;

/// A partitioning search over a fixed device set.
///
/// # Example
/// ```
/// use partition_planner::{Device, DeviceSpec, PartitionSearch, SearchParameters};
/// use perf_profile::{DeviceKind, PerfProfile};
///
/// let devices = vec![
///     Device::new(DeviceSpec::new("fast", DeviceKind::Throughput, "cuda")),
///     Device::new(DeviceSpec::new("slow", DeviceKind::Latency, "llvm")),
/// ];
/// let profiles = vec![
///     PerfProfile::from_rates([(1, 1.0), (2, 0.9), (4, 0.8), (8, 0.75)]).unwrap(),
///     PerfProfile::from_rates([(1, 2.0), (2, 1.8), (4, 1.5), (8, 1.2)]).unwrap(),
/// ];
/// let mut search = PartitionSearch::new(devices, profiles, SearchParameters::default()).unwrap();
/// let plan = search.run(10).unwrap();
/// assert_eq!(plan.distribution(), vec![7, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct PartitionSearch {
    devices: Vec<Device>,
    profiles: Vec<PerfProfile>,
    params: SearchParameters,
}

impl PartitionSearch {
    /// Creates a search. `profiles[i]` is the profile of `devices[i]` for
    /// the workload being partitioned.
    pub fn new(
        devices: Vec<Device>,
        profiles: Vec<PerfProfile>,
        params: SearchParameters,
    ) -> Result<Self, PlannerError> {
        if devices.is_empty() {
            return Err(PlannerError::NoDevices);
        }
        if devices.len() != profiles.len() {
            return Err(PlannerError::ProfileCountMismatch {
                devices: devices.len(),
                profiles: profiles.len(),
            });
        }
        let mut names = HashSet::new();
        for d in &devices {
            if !names.insert(d.name()) {
                return Err(PlannerError::DuplicateDevice(d.name().to_string()));
            }
        }
        params.validate()?;

        Ok(Self {
            devices,
            profiles,
            params,
        })
    }

    /// Creates a search whose profiles come from `cache` for `workload`.
    pub fn from_cache(
        specs: &[DeviceSpec],
        cache: &ProfileCache,
        workload: &str,
        params: SearchParameters,
    ) -> Result<Self, PlannerError> {
        let profiles = specs
            .iter()
            .map(|s| cache.require(&s.name, workload).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        let devices = specs.iter().cloned().map(Device::new).collect();
        Self::new(devices, profiles, params)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn params(&self) -> &SearchParameters {
        &self.params
    }

    /// Consumes the search, returning the device records with their final state.
    pub fn into_devices(self) -> Vec<Device> {
        self.devices
    }

    /// Partitions `total_batch` items across the devices.
    ///
    /// Device records are reset first, so a search can be run repeatedly.
    pub fn run(&mut self, total_batch: usize) -> Result<PartitionPlan, PlannerError> {
        if total_batch == 0 {
            return Err(PlannerError::EmptyBatch);
        }
        let start = Instant::now();

        for d in &mut self.devices {
            d.reset();
        }

        let mut base = Selection::FastestForTotal(total_batch)
            .select(&self.devices, &self.profiles)
            .ok_or(PlannerError::NoDevices)?;
        if !self.profiles[base].estimate(total_batch).is_finite() {
            return Err(PlannerError::NoCapableDevice);
        }
        self.devices[base].assigned_batch = total_batch;
        tracing::debug!(
            "initial base device '{}' ({} items)",
            self.devices[base].name(),
            total_batch,
        );

        let mut iterations = 0usize;
        let mut moves = 0usize;
        let mut no_improvement = 0usize;
        let mut base_variations = 0usize;
        let mut history = Vec::new();

        let termination = if self.devices.len() == 1 {
            Termination::SingleDevice
        } else {
            loop {
                if base_variations >= self.params.base_var_limit {
                    break Termination::BaseVariationLimit;
                }

                if iterations > 0 && no_improvement > self.params.tolerate_limit {
                    if let Some(next) =
                        Selection::SlowestAtCurrent.select(&self.devices, &self.profiles)
                    {
                        base = next;
                    }
                    base_variations += 1;
                    no_improvement = 0;
                    tracing::debug!(
                        "base device changed to '{}' ({} of {})",
                        self.devices[base].name(),
                        base_variations,
                        self.params.base_var_limit,
                    );
                }

                let base_batch = self.devices[base].assigned_batch;
                if base_batch <= 1 {
                    break Termination::BaseExhausted;
                }

                let loop_start = Instant::now();
                let target_time = self.profiles[base].estimate(base_batch - 1);
                let trial_step = no_improvement + 1;

                self.evaluate_trials(base, target_time, trial_step);
                let winner = Selection::BestTrial.select(&self.devices, &self.profiles);
                iterations += 1;

                let mut moved = 0;
                match winner {
                    Some(w) => {
                        let size = self.devices[w].trial.map_or(0, |t| t.size);
                        if size > 0 {
                            self.devices[base].assigned_batch -= size;
                            self.devices[w].assigned_batch += size;
                            moved = size;
                            moves += 1;
                            no_improvement = 0;
                        } else {
                            no_improvement += 1;
                        }
                    }
                    None => no_improvement += 1,
                }

                let record = IterationRecord {
                    iteration: iterations,
                    base_device: self.devices[base].name().to_string(),
                    trial_step,
                    target_time,
                    winner: winner.map(|w| self.devices[w].name().to_string()),
                    moved,
                    distribution: self.devices.iter().map(|d| d.assigned_batch).collect(),
                    elapsed: loop_start.elapsed(),
                };
                tracing::debug!(
                    "[{:2}] {:?} {:.2} ms",
                    record.iteration,
                    record.distribution,
                    record.elapsed.as_secs_f64() * 1000.0,
                );
                history.push(record);

                if winner.is_none() && self.params.on_infeasible == InfeasiblePolicy::Terminate {
                    break Termination::NoFeasibleMove;
                }
            }
        };

        let mut assignments = Vec::with_capacity(self.devices.len());
        let mut makespan = 0.0f64;
        for (device, profile) in self.devices.iter_mut().zip(&self.profiles) {
            let t = profile.estimate(device.assigned_batch);
            device.predicted_time = Some(t);
            device.trial = None;
            makespan = makespan.max(t);
            assignments.push(Assignment {
                device: device.name().to_string(),
                batch_size: device.assigned_batch,
                predicted_time: t,
            });
        }

        let plan = PartitionPlan {
            total_batch,
            assignments,
            makespan,
            base_device: self.devices[base].name().to_string(),
            iterations,
            moves,
            base_variations,
            termination,
            history,
            search_duration: start.elapsed(),
        };
        plan.validate()?;
        tracing::info!(
            "partitioning finished in {:.2} ms",
            plan.search_duration.as_secs_f64() * 1000.0,
        );
        Ok(plan)
    }

    /// Fills each device's `trial` for this iteration.
    fn evaluate_trials(&mut self, base: usize, target_time: f64, trial_step: usize) {
        let loads: Vec<usize> = self.devices.iter().map(|d| d.assigned_batch).collect();
        let limit = target_time * self.params.max_thresh;
        let profiles = &self.profiles;

        let eval = |idx: usize, device: &mut Device| {
            // The base keeps at least one item.
            device.trial = if idx == base || trial_step >= loads[base] {
                None
            } else {
                evaluate_trial(profiles, &loads, base, idx, trial_step, target_time, limit)
            };
        };

        if self.params.parallel_trials && self.devices.len() > 2 {
            self.devices
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, d)| eval(i, d));
        } else {
            self.devices
                .iter_mut()
                .enumerate()
                .for_each(|(i, d)| eval(i, d));
        }
    }
}

/// Evaluates moving `step` items from `base` to `candidate`.
///
/// Returns `None` if any non-base device would exceed `limit`.
fn evaluate_trial(
    profiles: &[PerfProfile],
    loads: &[usize],
    base: usize,
    candidate: usize,
    step: usize,
    target_time: f64,
    limit: f64,
) -> Option<TrialOutcome> {
    let mut candidate_estimate = 0.0;
    for (idx, (profile, &load)) in profiles.iter().zip(loads).enumerate() {
        if idx == base {
            continue;
        }
        let batch = if idx == candidate { load + step } else { load };
        let t = profile.estimate(batch);
        // Negated so NaN is rejected too.
        if !(t <= limit) {
            return None;
        }
        if idx == candidate {
            candidate_estimate = t;
        }
    }

    Some(TrialOutcome {
        size: step,
        estimate: candidate_estimate,
        score: target_time - candidate_estimate,
    })
}
