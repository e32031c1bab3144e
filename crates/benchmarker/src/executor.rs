// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Collaborator interfaces for preparing and timing workloads.
//!
//! Compiling a network for a device and running it on real hardware are
//! outside this workspace. The benchmarker reaches them only through the
//! two traits below.

use crate::BenchError;
use partition_planner::DeviceSpec;

/// A workload prepared for one batch size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    /// Workload (network) name; the profile-cache key.
    pub name: String,
    pub batch_size: usize,
    /// Input tensor shape, batch dimension first.
    pub input_shape: Vec<usize>,
    /// Output tensor shape, batch dimension first.
    pub output_shape: Vec<usize>,
}

/// Builds workload descriptors.
pub trait WorkloadProvider: Send + Sync {
    /// Loads workload `name` at `batch_size`.
    fn load(&self, name: &str, batch_size: usize) -> Result<Workload, BenchError>;
}

/// Compiles and times a workload on a device.
pub trait Executor: Send + Sync {
    /// Prepares `workload` for `device` and returns the wall-clock time in
    /// seconds to run one batch.
    ///
    /// A non-positive time signals that the device cannot run this batch
    /// size, the same as an `Err`.
    fn compile_and_measure(
        &self,
        device: &DeviceSpec,
        workload: &Workload,
        batch_size: usize,
    ) -> Result<f64, BenchError>;
}
