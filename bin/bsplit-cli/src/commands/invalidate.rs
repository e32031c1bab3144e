// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `bsplit invalidate` command: forget cached profiles of a device.

use perf_profile::{JsonFileStore, ProfileCache};
use runtime::PartitionerConfig;

pub fn execute(
    config: &PartitionerConfig,
    device: &str,
    workload: Option<&str>,
) -> anyhow::Result<()> {
    let store = JsonFileStore::new(config.profile_cache.clone());
    let mut cache = ProfileCache::load(&store)?;

    let removed = match workload {
        Some(w) => usize::from(cache.invalidate(device, w)),
        None => cache.invalidate_device(device),
    };
    cache.persist(&store)?;

    if removed == 0 {
        println!("No cached profiles for '{device}'.");
    } else {
        println!("Removed {removed} profile(s) of '{device}'.");
    }
    Ok(())
}
