// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run-scoped profile cache.
//!
//! The cache is loaded from a [`ProfileStore`] once when a run starts,
//! consulted and extended while devices are benchmarked, and written back
//! at most once when the run ends. Entries never expire; they are only
//! dropped through [`ProfileCache::invalidate`] or
//! [`ProfileCache::invalidate_device`].

use crate::{PerfProfile, ProfileError, ProfileStore, ProfileTable};

/// Profiles known for this run plus a record of unsaved changes.
#[derive(Debug, Clone, Default)]
pub struct ProfileCache {
    table: ProfileTable,
    dirty: bool,
}

impl ProfileCache {
    /// An empty cache not backed by anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing table. The cache starts clean.
    pub fn from_table(table: ProfileTable) -> Self {
        Self {
            table,
            dirty: false,
        }
    }

    /// Reads the whole table from `store`.
    pub fn load(store: &dyn ProfileStore) -> Result<Self, ProfileError> {
        let table = store.load()?;
        tracing::info!("profile cache loaded: {} profiles", table.num_profiles());
        Ok(Self::from_table(table))
    }

    pub fn contains(&self, device: &str, workload: &str) -> bool {
        self.table.contains(device, workload)
    }

    pub fn get(&self, device: &str, workload: &str) -> Option<&PerfProfile> {
        self.table.get(device, workload)
    }

    /// Looks up a profile, failing with [`ProfileError::NotProfiled`].
    pub fn require(&self, device: &str, workload: &str) -> Result<&PerfProfile, ProfileError> {
        self.get(device, workload)
            .ok_or_else(|| ProfileError::NotProfiled {
                device: device.to_string(),
                workload: workload.to_string(),
            })
    }

    pub fn insert(&mut self, device: &str, workload: &str, profile: PerfProfile) {
        self.table.insert(device, workload, profile);
        self.dirty = true;
    }

    /// Forgets one (device, workload) profile so the next run re-measures it.
    pub fn invalidate(&mut self, device: &str, workload: &str) -> bool {
        let removed = self.table.remove(device, workload).is_some();
        self.dirty |= removed;
        removed
    }

    /// Forgets every profile of `device`.
    pub fn invalidate_device(&mut self, device: &str) -> usize {
        let removed = self.table.remove_device(device);
        self.dirty |= removed > 0;
        removed
    }

    /// Whether there are changes not yet written to a store.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }

    /// Writes the table to `store` if anything changed since loading.
    ///
    /// Returns `true` when a write happened.
    pub fn persist(&mut self, store: &dyn ProfileStore) -> Result<bool, ProfileError> {
        if !self.dirty {
            return Ok(false);
        }
        store.save(&self.table)?;
        self.dirty = false;
        tracing::info!("profile cache saved: {} profiles", self.table.num_profiles());
        Ok(true)
    }
}
