// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! Orchestrates a complete partitioning run from a TOML configuration.
//!
//! The runtime takes:
//! - A [`PartitionerConfig`] naming the workload, the devices and the batch.
//! - An `Executor` and `WorkloadProvider` from `benchmarker`.
//! - A `ProfileStore` from `perf-profile` holding earlier measurements.
//!
//! It loads the profile cache once, benchmarks only the devices that are
//! missing, writes the cache back once, and then hands the profiles to the
//! `partition-planner` search.
//!
//! # Type-State Pipeline
//! ```text
//! Partitioner<Idle> → Partitioner<Profiled> → PartitionOutcome
//! ```
//! Transitions are compile-time checked.
//!
//! # Async Execution
//! The search itself is synchronous and CPU-bound; [`Partitioner::partition`]
//! moves it onto tokio's blocking pool so it can be awaited from a service.

mod config;
mod engine;
mod error;
mod metrics;

pub use config::{DeviceConfig, PartitionerConfig};
pub use engine::{Idle, PartitionOutcome, Partitioner, PartitionerState, Profiled};
pub use error::RuntimeError;
pub use metrics::RunMetrics;
