// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `bsplit partition` command: profile what is missing, then search.
//!
//! Runs the full type-state pipeline:
//! ```text
//! Partitioner<Idle> → profile → <Profiled> → partition → PartitionOutcome
//! ```

use benchmarker::SyntheticWorkloads;
use perf_profile::JsonFileStore;
use runtime::{PartitionOutcome, Partitioner, PartitionerConfig};

pub async fn execute(
    config: PartitionerConfig,
    batch: Option<usize>,
    history: bool,
    json: bool,
) -> anyhow::Result<()> {
    let total = batch.unwrap_or(config.total_batch);
    let store = JsonFileStore::new(config.profile_cache.clone());
    let executor = config.simulated_executor();

    if !json {
        super::banner("Batch Partitioner");
        println!("  Workload: {}", config.workload);
        println!("  Devices:  {}", config.devices.len());
        println!("  Batch:    {total}");
        println!("  Cache:    {}", config.profile_cache.display());
        println!();
    }

    let profiled = Partitioner::new(config)?.profile(&executor, &SyntheticWorkloads, &store)?;
    let report = profiled.bench_report();
    for (device, batch) in &report.truncated {
        tracing::warn!("'{device}' could not run a batch of {batch}");
    }

    let outcome = profiled.partition_batch(total).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.plan)?);
        return Ok(());
    }

    println!("  {}", report.summary());
    println!();
    print_plan(&outcome);
    if history {
        print_history(&outcome);
    }
    Ok(())
}

fn print_plan(outcome: &PartitionOutcome) {
    let plan = &outcome.plan;
    println!("  {:<16} {:>8} {:>8} {:>14}", "Device", "Items", "Share", "Predicted");
    println!("  {}", "-".repeat(50));
    for a in &plan.assignments {
        let share = a.batch_size as f64 / plan.total_batch as f64 * 100.0;
        println!(
            "  {:<16} {:>8} {:>7.1}% {:>11.2} ms",
            a.device,
            a.batch_size,
            share,
            a.predicted_time * 1000.0,
        );
    }
    println!();
    println!("  Termination: {:?}", plan.termination);
    println!("  {}", outcome.metrics.summary());
    println!(
        "  Predicted throughput: {:.1} items/s",
        outcome.metrics.predicted_throughput(plan.total_batch),
    );
    println!();
}

fn print_history(outcome: &PartitionOutcome) {
    println!(
        "  {:>4} {:<12} {:>5} {:>12} {:<12} {:>5}  Distribution",
        "Iter", "Base", "Step", "Target", "Winner", "Moved",
    );
    println!("  {}", "-".repeat(72));
    for rec in &outcome.plan.history {
        println!(
            "  {:>4} {:<12} {:>5} {:>9.2} ms {:<12} {:>5}  {:?}",
            rec.iteration,
            rec.base_device,
            rec.trial_step,
            rec.target_time * 1000.0,
            rec.winner.as_deref().unwrap_or("-"),
            rec.moved,
            rec.distribution,
        );
    }
    println!();
}
