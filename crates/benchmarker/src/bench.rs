// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Probe-driven device benchmarking.
//!
//! For each device without a cached profile, every probe batch size is
//! measured in ascending order. The first probe that fails ends probing
//! for that device; the profile keeps the sizes measured before it.
//! Devices are always measured one after another: concurrent runs on real
//! hardware would skew each other's timings.

use crate::{Executor, WorkloadProvider};
use partition_planner::DeviceSpec;
use perf_profile::{DeviceKind, PerfProfile, ProbeSet, ProfileCache};
use std::time::{Duration, Instant};

/// Probe-set overrides per device class.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Probes for throughput-class devices. Defaults to
    /// [`perf_profile::probe::THROUGHPUT_PROBES`].
    pub throughput_probes: Option<ProbeSet>,
    /// Probes for latency-class devices. Defaults to
    /// [`perf_profile::probe::LATENCY_PROBES`].
    pub latency_probes: Option<ProbeSet>,
}

impl BenchConfig {
    /// Probe set used for a device of `kind`.
    pub fn probes_for(&self, kind: DeviceKind) -> ProbeSet {
        let custom = match kind {
            DeviceKind::Throughput => self.throughput_probes.as_ref(),
            DeviceKind::Latency => self.latency_probes.as_ref(),
        };
        custom.cloned().unwrap_or_else(|| ProbeSet::for_kind(kind))
    }
}

/// What a call to [`Benchmarker::ensure_profiled`] did.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct BenchReport {
    /// Devices measured in this call.
    pub profiled: Vec<String>,
    /// Devices whose profile was already cached.
    pub skipped: Vec<String>,
    /// Devices whose probing stopped early, with the failing batch size.
    pub truncated: Vec<(String, usize)>,
    /// Time spent measuring.
    pub elapsed: Duration,
}

impl BenchReport {
    /// Whether any new profile was added to the cache.
    pub fn measured_any(&self) -> bool {
        !self.profiled.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Benchmark: {} profiled, {} cached, {} truncated, {:.2} s",
            self.profiled.len(),
            self.skipped.len(),
            self.truncated.len(),
            self.elapsed.as_secs_f64(),
        )
    }
}

/// Result of probing a single device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProbe {
    pub profile: PerfProfile,
    /// First batch size that could not be measured, if probing stopped early.
    pub failed_at: Option<usize>,
}

/// Populates a [`ProfileCache`] by measuring devices through an [`Executor`].
pub struct Benchmarker<'a> {
    executor: &'a dyn Executor,
    workloads: &'a dyn WorkloadProvider,
    config: BenchConfig,
}

impl<'a> Benchmarker<'a> {
    pub fn new(executor: &'a dyn Executor, workloads: &'a dyn WorkloadProvider) -> Self {
        Self::with_config(executor, workloads, BenchConfig::default())
    }

    pub fn with_config(
        executor: &'a dyn Executor,
        workloads: &'a dyn WorkloadProvider,
        config: BenchConfig,
    ) -> Self {
        Self {
            executor,
            workloads,
            config,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Makes sure `cache` holds a profile of `workload` for every device.
    ///
    /// Cached pairs are skipped. The cache is only updated in memory;
    /// persisting it is left to the caller so it happens once per run.
    pub fn ensure_profiled(
        &self,
        devices: &[DeviceSpec],
        workload: &str,
        cache: &mut ProfileCache,
    ) -> BenchReport {
        let start = Instant::now();
        let mut report = BenchReport::default();

        for device in devices {
            if cache.contains(&device.name, workload) {
                tracing::info!("'{}' already profiled for '{workload}'", device.name);
                report.skipped.push(device.name.clone());
                continue;
            }

            tracing::info!("profiling '{}' ({}) for '{workload}'", device.name, device.kind);
            let probe = self.profile_device(device, workload);
            tracing::info!(
                "'{}': {} probes measured, largest batch {:?}",
                device.name,
                probe.profile.len(),
                probe.profile.max_probe(),
            );

            if let Some(batch) = probe.failed_at {
                report.truncated.push((device.name.clone(), batch));
            }
            cache.insert(&device.name, workload, probe.profile);
            report.profiled.push(device.name.clone());
        }

        report.elapsed = start.elapsed();
        report
    }

    /// Measures one device across its probe set.
    pub fn profile_device(&self, device: &DeviceSpec, workload: &str) -> DeviceProbe {
        let probes = self.config.probes_for(device.kind);
        let mut profile = PerfProfile::new();

        for &batch in probes.sizes() {
            let Some(rate) = self.measure(device, workload, batch) else {
                return DeviceProbe {
                    profile,
                    failed_at: Some(batch),
                };
            };
            if let Err(e) = profile.record(batch, rate) {
                tracing::warn!("'{}': discarding probe: {e}", device.name);
                return DeviceProbe {
                    profile,
                    failed_at: Some(batch),
                };
            }
            tracing::debug!("'{}' batch {batch}: {:.6} s/item", device.name, rate);
        }

        DeviceProbe {
            profile,
            failed_at: None,
        }
    }

    /// Per-item latency at `batch`, or `None` if the device cannot run it.
    fn measure(&self, device: &DeviceSpec, workload: &str, batch: usize) -> Option<f64> {
        let prepared = match self.workloads.load(workload, batch) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!("'{}': stopping at batch {batch}: {e}", device.name);
                return None;
            }
        };
        match self.executor.compile_and_measure(device, &prepared, batch) {
            Ok(elapsed) if elapsed.is_finite() && elapsed > 0.0 => Some(elapsed / batch as f64),
            Ok(elapsed) => {
                tracing::warn!(
                    "'{}': cannot run batch {batch} (measured {elapsed}), keeping smaller probes",
                    device.name,
                );
                None
            }
            Err(e) => {
                tracing::warn!("'{}': stopping at batch {batch}: {e}", device.name);
                None
            }
        }
    }
}

impl std::fmt::Debug for Benchmarker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmarker")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatencyModel, SimulatedExecutor, SyntheticWorkloads};

    fn spec(name: &str, kind: DeviceKind) -> DeviceSpec {
        DeviceSpec::new(name, kind, "sim")
    }

    #[test]
    fn test_probes_for_defaults() {
        let c = BenchConfig::default();
        assert_eq!(c.probes_for(DeviceKind::Latency).max(), 65);
        assert_eq!(c.probes_for(DeviceKind::Throughput).max(), 129);
    }

    #[test]
    fn test_probes_for_override() {
        let c = BenchConfig {
            latency_probes: Some(ProbeSet::new(vec![1, 2, 3]).unwrap()),
            ..Default::default()
        };
        assert_eq!(c.probes_for(DeviceKind::Latency).sizes(), &[1, 2, 3]);
        assert_eq!(c.probes_for(DeviceKind::Throughput).max(), 129);
    }

    #[test]
    fn test_profile_device_full() {
        let exec = SimulatedExecutor::new()
            .with_device("cpu0", LatencyModel::linear(0.001, 0.01));
        let bench = Benchmarker::new(&exec, &SyntheticWorkloads);
        let probe = bench.profile_device(&spec("cpu0", DeviceKind::Latency), "resnet-18");

        assert!(probe.failed_at.is_none());
        assert_eq!(probe.profile.len(), 17);
        // (0.001 + 0.01 * 4) / 4
        assert!((probe.profile.rate(4).unwrap() - 0.01025).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_device_yields_empty_profile() {
        let exec = SimulatedExecutor::new();
        let bench = Benchmarker::new(&exec, &SyntheticWorkloads);
        let probe = bench.profile_device(&spec("ghost", DeviceKind::Latency), "w");
        assert!(probe.profile.is_empty());
        assert_eq!(probe.failed_at, Some(1));
    }

    #[test]
    fn test_report_summary() {
        let r = BenchReport {
            profiled: vec!["a".into()],
            skipped: vec!["b".into(), "c".into()],
            truncated: vec![],
            elapsed: Duration::from_millis(1500),
        };
        assert!(r.measured_any());
        assert!(r.summary().contains("1 profiled, 2 cached, 0 truncated"));
    }
}
