// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for performance profiles and the profile cache.

/// Errors that can occur while building, validating, or persisting profiles.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// A probe set does not contain the interpolation bracket for some
    /// batch size inside its range.
    #[error("probe set misses interpolation bracket [{low}, {high}] needed for batch size {batch}")]
    MissingBracket { batch: usize, low: usize, high: usize },

    /// A probe set is empty or contains a zero batch size.
    #[error("invalid probe set: {0}")]
    InvalidProbeSet(String),

    /// A measured per-item latency is not a finite, strictly positive number.
    #[error("invalid per-item latency {rate} at batch size {batch}")]
    InvalidRate { batch: usize, rate: f64 },

    /// No profile is cached for the requested (device, workload) pair.
    #[error("no profile for device '{device}' and workload '{workload}'")]
    NotProfiled { device: String, workload: String },

    /// The cache file could not be read or written.
    #[error("profile cache I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The cache file contents could not be (de)serialised.
    #[error("profile cache format error: {0}")]
    Format(#[from] serde_json::Error),
}
