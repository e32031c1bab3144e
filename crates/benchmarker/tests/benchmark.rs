// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: benchmarking against scripted devices and the
//! profile cache.

use benchmarker::{
    BenchConfig, BenchError, Benchmarker, Executor, LatencyModel, SimulatedExecutor,
    SyntheticWorkloads, Workload,
};
use partition_planner::DeviceSpec;
use perf_profile::{DeviceKind, JsonFileStore, MemoryStore, ProbeSet, ProfileCache, ProfileStore};

// ── Helpers ────────────────────────────────────────────────────

fn gpu(name: &str) -> DeviceSpec {
    DeviceSpec::new(name, DeviceKind::Throughput, "cuda")
}

fn cpu(name: &str) -> DeviceSpec {
    DeviceSpec::new(name, DeviceKind::Latency, "llvm")
}

/// Executor returning an error from a given batch size onwards.
struct FailingFrom {
    batch: usize,
}

impl Executor for FailingFrom {
    fn compile_and_measure(
        &self,
        device: &DeviceSpec,
        _workload: &Workload,
        batch_size: usize,
    ) -> Result<f64, BenchError> {
        if batch_size >= self.batch {
            return Err(BenchError::Execution {
                device: device.name.clone(),
                batch_size,
                detail: "out of device memory".into(),
            });
        }
        Ok(0.01 * batch_size as f64)
    }
}

/// Executor reporting a non-finite time.
struct NanTimer;

impl Executor for NanTimer {
    fn compile_and_measure(&self, _: &DeviceSpec, _: &Workload, _: usize) -> Result<f64, BenchError> {
        Ok(f64::NAN)
    }
}

// ── Probing ────────────────────────────────────────────────────

#[test]
fn test_zero_time_truncates_profile() {
    // Returns 0 at batch 2: only batch 1 is kept.
    let exec = SimulatedExecutor::new()
        .with_device("edge0", LatencyModel::linear(0.0, 0.02).with_max_batch(1));
    let mut cache = ProfileCache::new();
    let report = Benchmarker::new(&exec, &SyntheticWorkloads).ensure_profiled(
        &[cpu("edge0")],
        "mobilenet",
        &mut cache,
    );

    assert_eq!(report.truncated, vec![("edge0".to_string(), 2)]);
    let profile = cache.get("edge0", "mobilenet").unwrap();
    assert_eq!(profile.probes().collect::<Vec<_>>(), vec![1]);

    // Larger batches extrapolate from the single probe.
    let expected = profile.rate(1).unwrap() * 100.0;
    assert!((profile.estimate(100) - expected).abs() < 1e-12);
    assert_eq!(exec.calls(), 2);
}

#[test]
fn test_executor_error_truncates_profile() {
    let exec = FailingFrom { batch: 16 };
    let bench = Benchmarker::new(&exec, &SyntheticWorkloads);
    let probe = bench.profile_device(&gpu("gpu0"), "resnet-18");

    assert_eq!(probe.failed_at, Some(16));
    assert_eq!(probe.profile.max_probe(), Some(15));
    assert_eq!(probe.profile.len(), 9);
}

#[test]
fn test_non_finite_time_truncates_profile() {
    let bench = Benchmarker::new(&NanTimer, &SyntheticWorkloads);
    let probe = bench.profile_device(&gpu("gpu0"), "resnet-18");
    assert!(probe.profile.is_empty());
    assert_eq!(probe.failed_at, Some(1));
}

#[test]
fn test_throughput_devices_get_denser_probes() {
    let exec = SimulatedExecutor::new()
        .with_device("gpu0", LatencyModel::linear(0.01, 0.001))
        .with_device("cpu0", LatencyModel::linear(0.0, 0.01));
    let mut cache = ProfileCache::new();
    Benchmarker::new(&exec, &SyntheticWorkloads).ensure_profiled(
        &[gpu("gpu0"), cpu("cpu0")],
        "resnet-18",
        &mut cache,
    );

    assert_eq!(cache.get("gpu0", "resnet-18").unwrap().max_probe(), Some(129));
    assert_eq!(cache.get("cpu0", "resnet-18").unwrap().max_probe(), Some(65));
}

#[test]
fn test_custom_probe_set() {
    let exec = SimulatedExecutor::new().with_device("cpu0", LatencyModel::linear(0.0, 0.01));
    let config = BenchConfig {
        latency_probes: Some(ProbeSet::new(vec![1, 2, 3, 4, 5, 7]).unwrap()),
        ..Default::default()
    };
    let bench = Benchmarker::with_config(&exec, &SyntheticWorkloads, config);
    let probe = bench.profile_device(&cpu("cpu0"), "w");
    assert_eq!(probe.profile.len(), 6);
    assert_eq!(exec.calls(), 6);
}

// ── Cache interaction ──────────────────────────────────────────

#[test]
fn test_cached_devices_are_not_measured() {
    let exec = SimulatedExecutor::new()
        .with_device("gpu0", LatencyModel::linear(0.01, 0.001))
        .with_device("cpu0", LatencyModel::linear(0.0, 0.01));
    let bench = Benchmarker::new(&exec, &SyntheticWorkloads);
    let devices = [gpu("gpu0"), cpu("cpu0")];
    let mut cache = ProfileCache::new();

    let first = bench.ensure_profiled(&devices, "resnet-18", &mut cache);
    assert_eq!(first.profiled, vec!["gpu0", "cpu0"]);
    let calls = exec.calls();

    let second = bench.ensure_profiled(&devices, "resnet-18", &mut cache);
    assert!(!second.measured_any());
    assert_eq!(second.skipped, vec!["gpu0", "cpu0"]);
    assert_eq!(exec.calls(), calls);

    // A different workload is a different key.
    let third = bench.ensure_profiled(&devices[..1], "vgg-16", &mut cache);
    assert_eq!(third.profiled, vec!["gpu0"]);
}

#[test]
fn test_single_bulk_write_per_run() {
    let exec = SimulatedExecutor::new()
        .with_device("gpu0", LatencyModel::linear(0.01, 0.001))
        .with_device("gpu1", LatencyModel::linear(0.02, 0.001))
        .with_device("cpu0", LatencyModel::linear(0.0, 0.01));
    let store = MemoryStore::new();
    let mut cache = ProfileCache::load(&store).unwrap();

    Benchmarker::new(&exec, &SyntheticWorkloads).ensure_profiled(
        &[gpu("gpu0"), gpu("gpu1"), cpu("cpu0")],
        "resnet-18",
        &mut cache,
    );
    assert_eq!(store.save_count(), 0);

    cache.persist(&store).unwrap();
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.snapshot().num_profiles(), 3);
}

#[test]
fn test_profiles_survive_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("perf_table.json"));
    let devices = [gpu("gpu0"), cpu("cpu0")];

    // Run 1 measures and saves.
    {
        let exec = SimulatedExecutor::new()
            .with_device("gpu0", LatencyModel::linear(0.01, 0.001))
            .with_device("cpu0", LatencyModel::linear(0.0, 0.01).with_max_batch(20));
        let mut cache = ProfileCache::load(&store).unwrap();
        Benchmarker::new(&exec, &SyntheticWorkloads).ensure_profiled(&devices, "w", &mut cache);
        assert!(cache.persist(&store).unwrap());
    }

    // Run 2 finds everything cached, including the truncated profile.
    let exec = SimulatedExecutor::new();
    let mut cache = ProfileCache::load(&store).unwrap();
    let report = Benchmarker::new(&exec, &SyntheticWorkloads).ensure_profiled(&devices, "w", &mut cache);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(exec.calls(), 0);
    assert_eq!(cache.get("cpu0", "w").unwrap().max_probe(), Some(17));
    assert!(!cache.persist(&store).unwrap());
    assert_eq!(store.load().unwrap().num_profiles(), 2);
}
