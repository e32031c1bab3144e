// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-planner
//!
//! Splits one batch of identical inference items across a heterogeneous
//! device set so that the slowest device finishes as early as possible.
//!
//! The search works on throughput estimates from [`perf_profile`]: it never
//! runs anything itself. See [`PartitionSearch`] for the algorithm.
//!
//! # Key Components
//!
//! | Type | Role |
//! |---|---|
//! | [`DeviceSpec`] | Caller-supplied device identity |
//! | [`Device`] | Identity plus per-run search state |
//! | [`SearchParameters`] | Tolerance, base-variation limit, slack multiplier |
//! | [`Selection`] | Closed set of device selection strategies |
//! | [`PartitionSearch`] | The greedy reallocation loop |
//! | [`PartitionPlan`] | Final shares, predicted times, and search trace |
//!
//! # Example
//! ```
//! use partition_planner::{DeviceSpec, PartitionSearch, SearchParameters};
//! use perf_profile::{DeviceKind, PerfProfile, ProfileCache};
//!
//! let mut cache = ProfileCache::new();
//! cache.insert("gpu0", "resnet-18", PerfProfile::from_rates([(1, 0.02), (2, 0.012)]).unwrap());
//! cache.insert("cpu0", "resnet-18", PerfProfile::from_rates([(1, 0.05), (2, 0.045)]).unwrap());
//!
//! let specs = vec![
//!     DeviceSpec::new("gpu0", DeviceKind::Throughput, "cuda"),
//!     DeviceSpec::new("cpu0", DeviceKind::Latency, "llvm"),
//! ];
//! let plan = PartitionSearch::from_cache(&specs, &cache, "resnet-18", SearchParameters::default())
//!     .unwrap()
//!     .run(32)
//!     .unwrap();
//! assert_eq!(plan.assigned_total(), 32);
//! println!("{}", plan.summary());
//! ```

mod device;
mod error;
mod params;
mod plan;
mod search;
mod selection;

pub use device::{Device, DeviceSpec, TrialOutcome};
pub use error::PlannerError;
pub use params::{InfeasiblePolicy, SearchParameters};
pub use plan::{Assignment, IterationRecord, PartitionPlan, Termination};
pub use search::PartitionSearch;
pub use selection::Selection;
