// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Device selection strategies.
//!
//! Every place the search has to pick one device out of the set goes
//! through a [`Selection`]. Each variant is a pure function of the device
//! records and their profiles.

use crate::Device;
use perf_profile::PerfProfile;

/// The ways the search picks a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Lowest estimated time for the given batch size (initial base device).
    /// Ties keep the first device.
    FastestForTotal(usize),
    /// Highest estimated time at the current assignment (next base device).
    /// Ties keep the first device.
    SlowestAtCurrent,
    /// Highest trial score among candidates. Ties go to the later device.
    BestTrial,
}

impl Selection {
    /// Returns the index of the selected device, or `None` if no device
    /// qualifies.
    ///
    /// `profiles[i]` must belong to `devices[i]`.
    pub fn select(self, devices: &[Device], profiles: &[PerfProfile]) -> Option<usize> {
        match self {
            Self::FastestForTotal(total_batch) => {
                let mut best: Option<(usize, f64)> = None;
                for (i, profile) in profiles.iter().enumerate().take(devices.len()) {
                    let t = profile.estimate(total_batch);
                    if best.map_or(true, |(_, bt)| t < bt) {
                        best = Some((i, t));
                    }
                }
                best.map(|(i, _)| i)
            }
            Self::SlowestAtCurrent => {
                let mut best: Option<(usize, f64)> = None;
                for (i, (device, profile)) in devices.iter().zip(profiles).enumerate() {
                    let t = profile.estimate(device.assigned_batch);
                    if best.map_or(true, |(_, bt)| t > bt) {
                        best = Some((i, t));
                    }
                }
                best.map(|(i, _)| i)
            }
            Self::BestTrial => {
                let mut best: Option<(usize, f64)> = None;
                for (i, device) in devices.iter().enumerate() {
                    let Some(trial) = device.trial else { continue };
                    if best.map_or(true, |(_, bs)| trial.score >= bs) {
                        best = Some((i, trial.score));
                    }
                }
                best.map(|(i, _)| i)
            }
        }
    }
}
