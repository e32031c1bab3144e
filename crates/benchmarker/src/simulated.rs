// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Deterministic stand-ins for real compilation and execution.
//!
//! Used by the CLI to demonstrate partitioning without hardware, and by
//! tests to script device behaviour (including devices that fail past a
//! given batch size).

use crate::{BenchError, Executor, Workload, WorkloadProvider};
use partition_planner::DeviceSpec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Batch latency model of a simulated device.
///
/// ```text
/// time(b) = overhead_s + per_item_s * b          (b <= max_batch)
///         = 0.0                                  (b >  max_batch)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatencyModel {
    /// Fixed per-launch cost in seconds.
    #[serde(default)]
    pub overhead_s: f64,
    /// Marginal cost of one item in seconds.
    pub per_item_s: f64,
    /// Largest batch the device can run (e.g. memory-bound). `None` = unlimited.
    #[serde(default)]
    pub max_batch: Option<usize>,
}

impl LatencyModel {
    pub fn linear(overhead_s: f64, per_item_s: f64) -> Self {
        Self {
            overhead_s,
            per_item_s,
            max_batch: None,
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = Some(max_batch);
        self
    }

    /// Simulated wall-clock time for one batch; `0.0` if over capacity.
    pub fn batch_time(&self, batch: usize) -> f64 {
        match self.max_batch {
            Some(max) if batch > max => 0.0,
            _ => self.overhead_s + self.per_item_s * batch as f64,
        }
    }
}

/// Executor that answers from per-device [`LatencyModel`]s.
#[derive(Debug, Default)]
pub struct SimulatedExecutor {
    models: HashMap<String, LatencyModel>,
    calls: AtomicUsize,
}

impl SimulatedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, name: impl Into<String>, model: LatencyModel) -> Self {
        self.insert(name, model);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, model: LatencyModel) {
        self.models.insert(name.into(), model);
    }

    pub fn model(&self, name: &str) -> Option<&LatencyModel> {
        self.models.get(name)
    }

    /// Number of measurements requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Executor for SimulatedExecutor {
    fn compile_and_measure(
        &self,
        device: &DeviceSpec,
        _workload: &Workload,
        batch_size: usize,
    ) -> Result<f64, BenchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let model = self
            .models
            .get(&device.name)
            .ok_or_else(|| BenchError::UnknownDevice(device.name.clone()))?;
        Ok(model.batch_time(batch_size))
    }
}

/// Provider that fabricates image-classification workload descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticWorkloads;

impl WorkloadProvider for SyntheticWorkloads {
    fn load(&self, name: &str, batch_size: usize) -> Result<Workload, BenchError> {
        if batch_size == 0 {
            return Err(BenchError::Workload {
                workload: name.to_string(),
                batch_size,
                detail: "batch size must be positive".into(),
            });
        }
        Ok(Workload {
            name: name.to_string(),
            batch_size,
            input_shape: vec![batch_size, 3, 224, 224],
            output_shape: vec![batch_size, 1000],
        })
    }
}
