// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # benchmarker
//!
//! Measures devices at their probe batch sizes and stores the results as
//! [`perf_profile::PerfProfile`]s in a [`perf_profile::ProfileCache`].
//!
//! Compilation and execution are reached through the [`Executor`] and
//! [`WorkloadProvider`] traits. [`SimulatedExecutor`] and
//! [`SyntheticWorkloads`] implement them without hardware.
//!
//! # Example
//! ```
//! use benchmarker::{Benchmarker, LatencyModel, SimulatedExecutor, SyntheticWorkloads};
//! use partition_planner::DeviceSpec;
//! use perf_profile::{DeviceKind, ProfileCache};
//!
//! let exec = SimulatedExecutor::new()
//!     .with_device("gpu0", LatencyModel::linear(0.004, 0.001))
//!     .with_device("cpu0", LatencyModel::linear(0.0, 0.01).with_max_batch(8));
//! let devices = vec![
//!     DeviceSpec::new("gpu0", DeviceKind::Throughput, "cuda"),
//!     DeviceSpec::new("cpu0", DeviceKind::Latency, "llvm"),
//! ];
//!
//! let mut cache = ProfileCache::new();
//! let report = Benchmarker::new(&exec, &SyntheticWorkloads)
//!     .ensure_profiled(&devices, "resnet-18", &mut cache);
//! assert_eq!(report.profiled.len(), 2);
//! assert_eq!(report.truncated, vec![("cpu0".to_string(), 9)]);
//! ```

mod bench;
mod error;
mod executor;
mod simulated;

pub use bench::{BenchConfig, BenchReport, Benchmarker, DeviceProbe};
pub use error::BenchError;
pub use executor::{Executor, Workload, WorkloadProvider};
pub use simulated::{LatencyModel, SimulatedExecutor, SyntheticWorkloads};
