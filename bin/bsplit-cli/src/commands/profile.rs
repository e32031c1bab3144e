// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `bsplit profile` command: fill the profile cache without partitioning.

use benchmarker::{Benchmarker, SyntheticWorkloads};
use perf_profile::{JsonFileStore, ProfileCache};
use runtime::PartitionerConfig;

pub fn execute(config: PartitionerConfig) -> anyhow::Result<()> {
    super::banner("Device Profiler");
    config.validate()?;

    let store = JsonFileStore::new(config.profile_cache.clone());
    let mut cache = ProfileCache::load(&store)?;
    let executor = config.simulated_executor();
    let bench = Benchmarker::with_config(&executor, &SyntheticWorkloads, config.bench.clone());

    let report = bench.ensure_profiled(&config.device_specs(), &config.workload, &mut cache);
    let written = cache.persist(&store)?;

    println!("  {:<16} {:<12} {:>8} {:>10}", "Device", "Status", "Probes", "Largest");
    println!("  {}", "-".repeat(50));
    for spec in config.device_specs() {
        let status = if report.skipped.contains(&spec.name) {
            "cached"
        } else if report.truncated.iter().any(|(d, _)| *d == spec.name) {
            "truncated"
        } else {
            "measured"
        };
        let profile = cache.get(&spec.name, &config.workload);
        println!(
            "  {:<16} {:<12} {:>8} {:>10}",
            spec.name,
            status,
            profile.map_or(0, |p| p.len()),
            profile
                .and_then(|p| p.max_probe())
                .map_or_else(|| "-".to_string(), |m| m.to_string()),
        );
    }
    println!();
    println!("  {}", report.summary());
    if written {
        println!("  Cache written to {}", config.profile_cache.display());
    }
    println!();
    Ok(())
}
