// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # bsplit
//!
//! Command-line interface for splitting a batch across heterogeneous devices.
//!
//! ## Usage
//! ```bash
//! # Profile missing devices and partition the configured batch
//! bsplit -c configs/demo.toml partition --batch 256
//!
//! # Only (re)measure devices missing from the profile cache
//! bsplit -c configs/demo.toml profile
//!
//! # Show what the cache holds
//! bsplit -c configs/demo.toml inspect --probe 24
//!
//! # Drop a device's profiles so the next run measures it again
//! bsplit -c configs/demo.toml invalidate --device cpu0
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bsplit",
    about = "Profile-driven batch partitioning across heterogeneous devices",
    version,
    author
)]
struct Cli {
    /// Path to the TOML run configuration.
    #[arg(short, long, global = true, default_value = "bsplit.toml")]
    config: std::path::PathBuf,

    /// Override the profile cache path from the configuration.
    #[arg(long, global = true)]
    cache: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile any missing devices, then partition the batch.
    Partition {
        /// Number of items to split (defaults to `total_batch` from the config).
        #[arg(short, long)]
        batch: Option<usize>,

        /// Print every search iteration.
        #[arg(long)]
        history: bool,

        /// Print the plan as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Measure devices that have no cached profile for the workload.
    Profile,

    /// Print the cached profiles.
    Inspect {
        /// Only show this workload.
        #[arg(short, long)]
        workload: Option<String>,

        /// Also print the estimated time for this batch size.
        #[arg(short, long)]
        probe: Option<usize>,
    },

    /// Remove cached profiles of a device.
    Invalidate {
        #[arg(short, long)]
        device: String,

        /// Only remove this workload (all workloads otherwise).
        #[arg(short, long)]
        workload: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let config = commands::load_config(&cli.config, cli.cache)?;
    match cli.command {
        Commands::Partition {
            batch,
            history,
            json,
        } => commands::partition::execute(config, batch, history, json).await,
        Commands::Profile => commands::profile::execute(config),
        Commands::Inspect { workload, probe } => {
            commands::inspect::execute(&config, workload, probe)
        }
        Commands::Invalidate { device, workload } => {
            commands::invalidate::execute(&config, &device, workload.as_deref())
        }
    }
}
