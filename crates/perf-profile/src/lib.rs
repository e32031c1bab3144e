// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # perf-profile
//!
//! Per-device, per-workload throughput profiles and the estimator the
//! partitioning search runs on.
//!
//! Measuring a device at every batch size is far too slow, so each device
//! is measured at a sparse [`ProbeSet`] clustered around powers of two.
//! [`PerfProfile::estimate`] turns those points into a completion-time
//! estimate for any batch size.
//!
//! # Key Components
//!
//! - [`DeviceKind`]: coarse device class that selects the probe set.
//! - [`ProbeSet`]: validated probe batch sizes.
//! - [`PerfProfile`]: measured seconds-per-item at each probe, plus the
//!   estimator.
//! - [`ProfileTable`]: every profile, keyed by device and workload.
//! - [`ProfileCache`]: the table for one run, loaded once and saved at
//!   most once through a [`ProfileStore`].
//!
//! # Example
//! ```
//! use perf_profile::PerfProfile;
//!
//! let p = PerfProfile::from_rates([(1, 1.0), (2, 0.9), (4, 0.8), (8, 0.75)]).unwrap();
//! assert_eq!(p.estimate(0), 0.0);
//! assert_eq!(p.estimate(4), 3.2);
//! assert_eq!(p.estimate(10), 7.5); // held at the rate of the largest probe
//! ```

mod cache;
mod error;
mod kind;
pub mod probe;
mod profile;
mod store;
mod table;

pub use cache::ProfileCache;
pub use error::ProfileError;
pub use kind::DeviceKind;
pub use probe::ProbeSet;
pub use profile::PerfProfile;
pub use store::{JsonFileStore, MemoryStore, ProfileStore};
pub use table::ProfileTable;
