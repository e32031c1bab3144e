// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared helpers.

pub mod inspect;
pub mod invalidate;
pub mod partition;
pub mod profile;

use anyhow::Context;
use runtime::PartitionerConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialises the tracing subscriber from the `-v` count.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the run configuration, applying the `--cache` override.
pub fn load_config(path: &Path, cache: Option<PathBuf>) -> anyhow::Result<PartitionerConfig> {
    let mut config = PartitionerConfig::from_file(path)
        .with_context(|| format!("loading configuration '{}'", path.display()))?;
    if let Some(cache) = cache {
        config.profile_cache = cache;
    }
    tracing::debug!("profile cache at '{}'", config.profile_cache.display());
    Ok(config)
}

pub(crate) fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║  {:<52}║", format!("bsplit · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
