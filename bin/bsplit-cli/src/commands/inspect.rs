// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `bsplit inspect` command: print the per-item latencies held in the cache.

use perf_profile::{JsonFileStore, ProfileCache};
use runtime::PartitionerConfig;

pub fn execute(
    config: &PartitionerConfig,
    workload: Option<String>,
    probe: Option<usize>,
) -> anyhow::Result<()> {
    super::banner("Profile Inspector");

    let store = JsonFileStore::new(config.profile_cache.clone());
    let cache = ProfileCache::load(&store)?;
    let table = cache.table();
    println!("  Cache: {}", config.profile_cache.display());
    println!("  Profiles: {}", table.num_profiles());
    println!();

    for (device, wl, profile) in table.iter() {
        if workload.as_deref().is_some_and(|w| w != wl) {
            continue;
        }
        println!("  {device} / {wl} ({} probes)", profile.len());
        for batch in profile.probes() {
            if let Some(rate) = profile.rate(batch) {
                println!(
                    "    {:>5}  {:>9.3} ms/item  {:>9.2} ms",
                    batch,
                    rate * 1000.0,
                    profile.estimate(batch) * 1000.0,
                );
            }
        }
        if let Some(b) = probe {
            println!("    est({b}) = {:.2} ms", profile.estimate(b) * 1000.0);
        }
        println!();
    }
    Ok(())
}
