// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for benchmarking collaborators.

/// Failures reported by an [`crate::Executor`] or [`crate::WorkloadProvider`].
///
/// The benchmarker never propagates these: a failed probe ends probing for
/// that device and keeps the profile measured so far.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The workload could not be built for the requested batch size.
    #[error("workload '{workload}' unavailable at batch size {batch_size}: {detail}")]
    Workload {
        workload: String,
        batch_size: usize,
        detail: String,
    },

    /// Compiling the workload for the device failed.
    #[error("compilation for device '{device}' failed: {detail}")]
    Compile { device: String, detail: String },

    /// Running the compiled workload failed.
    #[error("execution on device '{device}' at batch size {batch_size} failed: {detail}")]
    Execution {
        device: String,
        batch_size: usize,
        detail: String,
    },

    /// The executor has no backend for the device.
    #[error("no backend for device '{0}'")]
    UnknownDevice(String),
}
