// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Device identity and per-device search state.

use perf_profile::DeviceKind;

/// Identity of a compute device as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeviceSpec {
    /// Unique device name (also the profile-cache key).
    pub name: String,
    /// Coarse class; only used to choose probe batch sizes.
    pub kind: DeviceKind,
    /// Opaque capability handle passed to the executor
    /// (e.g. a compiler target string). The search never reads it.
    #[serde(default)]
    pub target: String,
}

impl DeviceSpec {
    pub fn new(name: impl Into<String>, kind: DeviceKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
        }
    }
}

/// A tentative offload evaluated during one iteration.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TrialOutcome {
    /// Items that would move from the base device to this one.
    pub size: usize,
    /// Estimated completion time of this device after the move.
    pub estimate: f64,
    /// Slack gained against the target time; larger is better.
    pub score: f64,
}

/// A device plus its mutable state for one partitioning run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Device {
    pub spec: DeviceSpec,
    /// Current share of the total batch.
    pub assigned_batch: usize,
    /// This iteration's accepted trial, `None` when not a candidate.
    pub trial: Option<TrialOutcome>,
    /// Estimated completion time, set once when the search finishes.
    pub predicted_time: Option<f64>,
}

impl Device {
    pub fn new(spec: DeviceSpec) -> Self {
        Self {
            spec,
            assigned_batch: 0,
            trial: None,
            predicted_time: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Clears all search state so the record can be reused for a fresh run.
    pub fn reset(&mut self) {
        self.assigned_batch = 0;
        self.trial = None;
        self.predicted_time = None;
    }
}

impl From<DeviceSpec> for Device {
    fn from(spec: DeviceSpec) -> Self {
        Self::new(spec)
    }
}
