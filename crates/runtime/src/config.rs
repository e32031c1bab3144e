// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! workload = "resnet-18"
//! total_batch = 256
//! profile_cache = "./perf_table.json"
//!
//! [search]
//! tolerate_limit = 5
//! base_var_limit = 5
//! max_thresh = 1.05
//!
//! [[devices]]
//! name = "gpu0"
//! kind = "gpu"
//! target = "cuda"
//! simulated = { overhead_s = 0.004, per_item_s = 0.0008 }
//!
//! [[devices]]
//! name = "cpu0"
//! kind = "cpu"
//! target = "llvm -mcpu=cortex-a72"
//! simulated = { per_item_s = 0.006, max_batch = 48 }
//! ```

use benchmarker::{BenchConfig, LatencyModel, SimulatedExecutor};
use partition_planner::{DeviceSpec, SearchParameters};
use perf_profile::DeviceKind;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One device entry of the configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceConfig {
    /// Unique device name.
    pub name: String,
    /// `"throughput"`/`"gpu"` or `"latency"`/`"cpu"`.
    pub kind: DeviceKind,
    /// Backend target handed to the executor.
    #[serde(default)]
    pub target: String,
    /// Latency model used when running without hardware.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated: Option<LatencyModel>,
}

impl DeviceConfig {
    pub fn spec(&self) -> DeviceSpec {
        DeviceSpec::new(self.name.clone(), self.kind, self.target.clone())
    }
}

/// Configuration for a partitioning run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartitionerConfig {
    /// Workload (network) name; the profile-cache key.
    pub workload: String,
    /// Number of identical items to split across the devices.
    pub total_batch: usize,
    /// Path of the JSON profile cache.
    #[serde(default = "default_cache_path")]
    pub profile_cache: PathBuf,
    #[serde(default)]
    pub search: SearchParameters,
    #[serde(default)]
    pub bench: BenchConfig,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("perf_table.json")
}

impl PartitionerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, super::RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            super::RuntimeError::ConfigError(format!(
                "cannot read config '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, super::RuntimeError> {
        toml::from_str(toml_str).map_err(|e| {
            super::RuntimeError::ConfigError(format!("TOML parse error: {e}"))
        })
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, super::RuntimeError> {
        toml::to_string_pretty(self).map_err(|e| {
            super::RuntimeError::ConfigError(format!("TOML serialise error: {e}"))
        })
    }

    /// Checks the configuration before any device is touched.
    pub fn validate(&self) -> Result<(), super::RuntimeError> {
        if self.workload.trim().is_empty() {
            return Err(super::RuntimeError::ConfigError("workload name is empty".into()));
        }
        if self.total_batch == 0 {
            return Err(super::RuntimeError::ConfigError(
                "total_batch must be at least 1".into(),
            ));
        }
        if self.devices.is_empty() {
            return Err(super::RuntimeError::ConfigError("no devices configured".into()));
        }
        let mut seen = HashSet::new();
        for d in &self.devices {
            if !seen.insert(d.name.as_str()) {
                return Err(super::RuntimeError::ConfigError(format!(
                    "duplicate device name '{}'",
                    d.name
                )));
            }
        }
        self.search.validate()?;
        Ok(())
    }

    /// Device identities in configuration order.
    pub fn device_specs(&self) -> Vec<DeviceSpec> {
        self.devices.iter().map(DeviceConfig::spec).collect()
    }

    /// Builds an executor from the `simulated` models of the devices.
    ///
    /// Devices without a model are unknown to the executor and end up with
    /// an empty profile.
    pub fn simulated_executor(&self) -> SimulatedExecutor {
        let mut exec = SimulatedExecutor::new();
        for d in &self.devices {
            match d.simulated {
                Some(model) => exec.insert(d.name.clone(), model),
                None => tracing::warn!("device '{}' has no simulated latency model", d.name),
            }
        }
        exec
    }
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            workload: "resnet-18".to_string(),
            total_batch: 64,
            profile_cache: default_cache_path(),
            search: SearchParameters::default(),
            bench: BenchConfig::default(),
            devices: Vec::new(),
        }
    }
}
