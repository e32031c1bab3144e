// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partition planner.

/// Errors that can occur during partition planning.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The search was given no devices.
    #[error("cannot partition across an empty device set")]
    NoDevices,

    /// The total batch to partition is zero.
    #[error("cannot partition an empty batch")]
    EmptyBatch,

    /// Two devices share the same name.
    #[error("duplicate device name '{0}'")]
    DuplicateDevice(String),

    /// The number of profiles does not match the number of devices.
    #[error("expected {devices} profiles (one per device), got {profiles}")]
    ProfileCountMismatch { devices: usize, profiles: usize },

    /// A search parameter is out of range.
    #[error("invalid search parameter '{name}': {detail}")]
    InvalidParameter { name: &'static str, detail: String },

    /// A produced plan violates a partition invariant.
    #[error("invalid partition plan: {0}")]
    InvalidPlan(String),

    /// No device can process even a single item of the workload.
    #[error("no device can run the workload: every profile is empty")]
    NoCapableDevice,

    /// A profile lookup failed.
    #[error("profile error: {0}")]
    Profile(#[from] perf_profile::ProfileError),
}
