// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The (device, workload) → profile table.

use crate::PerfProfile;
use std::collections::BTreeMap;

/// All measured profiles, keyed by device name and then workload name.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ProfileTable {
    devices: BTreeMap<String, BTreeMap<String, PerfProfile>>,
}

impl ProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, device: &str, workload: &str) -> Option<&PerfProfile> {
        self.devices.get(device)?.get(workload)
    }

    pub fn contains(&self, device: &str, workload: &str) -> bool {
        self.get(device, workload).is_some()
    }

    /// Inserts or replaces a profile, returning the previous one.
    pub fn insert(
        &mut self,
        device: impl Into<String>,
        workload: impl Into<String>,
        profile: PerfProfile,
    ) -> Option<PerfProfile> {
        self.devices
            .entry(device.into())
            .or_default()
            .insert(workload.into(), profile)
    }

    /// Removes one profile. Drops the device entry once it holds nothing.
    pub fn remove(&mut self, device: &str, workload: &str) -> Option<PerfProfile> {
        let workloads = self.devices.get_mut(device)?;
        let removed = workloads.remove(workload);
        if workloads.is_empty() {
            self.devices.remove(device);
        }
        removed
    }

    /// Removes every profile of a device, returning how many were dropped.
    pub fn remove_device(&mut self, device: &str) -> usize {
        self.devices.remove(device).map_or(0, |w| w.len())
    }

    /// Device names with at least one profile.
    pub fn devices(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    /// Iterates `(device, workload, profile)` in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &PerfProfile)> {
        self.devices.iter().flat_map(|(d, ws)| {
            ws.iter()
                .map(move |(w, p)| (d.as_str(), w.as_str(), p))
        })
    }

    /// Total number of (device, workload) profiles.
    pub fn num_profiles(&self) -> usize {
        self.devices.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(rate: f64) -> PerfProfile {
        PerfProfile::from_rates([(1, rate)]).unwrap()
    }

    #[test]
    fn test_insert_get() {
        let mut t = ProfileTable::new();
        assert!(t.insert("gpu0", "vgg-16", p(0.1)).is_none());
        assert!(t.contains("gpu0", "vgg-16"));
        assert!(!t.contains("gpu0", "resnet-50"));
        assert!(!t.contains("cpu0", "vgg-16"));
        assert_eq!(t.insert("gpu0", "vgg-16", p(0.2)), Some(p(0.1)));
        assert_eq!(t.num_profiles(), 1);
    }

    #[test]
    fn test_remove_prunes_device() {
        let mut t = ProfileTable::new();
        t.insert("gpu0", "a", p(0.1));
        t.insert("gpu0", "b", p(0.1));
        t.remove("gpu0", "a");
        assert_eq!(t.devices().count(), 1);
        t.remove("gpu0", "b");
        assert!(t.is_empty());
        assert!(t.remove("gpu0", "b").is_none());
    }

    #[test]
    fn test_remove_device() {
        let mut t = ProfileTable::new();
        t.insert("gpu0", "a", p(0.1));
        t.insert("gpu0", "b", p(0.1));
        t.insert("cpu0", "a", p(0.3));
        assert_eq!(t.remove_device("gpu0"), 2);
        assert_eq!(t.remove_device("gpu0"), 0);
        assert_eq!(t.num_profiles(), 1);
    }

    #[test]
    fn test_iter_sorted() {
        let mut t = ProfileTable::new();
        t.insert("gpu0", "b", p(0.1));
        t.insert("cpu0", "a", p(0.3));
        t.insert("gpu0", "a", p(0.2));
        let keys: Vec<(&str, &str)> = t.iter().map(|(d, w, _)| (d, w)).collect();
        assert_eq!(keys, vec![("cpu0", "a"), ("gpu0", "a"), ("gpu0", "b")]);
    }
}
