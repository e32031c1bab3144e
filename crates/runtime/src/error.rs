// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partitioning runtime.

/// Errors that can occur while profiling devices or partitioning a batch.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Loading or saving the profile cache failed.
    #[error("profile error: {0}")]
    ProfileError(#[from] perf_profile::ProfileError),

    /// The partition planner returned an error.
    #[error("planner error: {0}")]
    PlannerError(#[from] partition_planner::PlannerError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The blocking search task panicked or was cancelled.
    #[error("search task failed: {0}")]
    TaskFailed(String),
}
