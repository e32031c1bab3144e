// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The partitioner with a type-state–enforced pipeline.
//!
//! ```text
//! Partitioner<Idle>
//!     │  .profile(executor, workloads, store)
//!     ▼
//! Partitioner<Profiled>
//!     │  .partition().await
//!     ▼
//!   PartitionOutcome
//! ```
//!
//! Each state transition consumes the old value and returns a new one,
//! so a search can never run against a cache that was not loaded.

use crate::{PartitionerConfig, RunMetrics, RuntimeError};
use benchmarker::{BenchReport, Benchmarker, Executor, WorkloadProvider};
use partition_planner::{PartitionPlan, PartitionSearch};
use perf_profile::{ProfileCache, ProfileStore};

// ── Type-state markers ─────────────────────────────────────────

/// Partitioner is configured but no profile has been loaded.
#[derive(Debug)]
pub struct Idle;

/// Every configured device has a profile for the workload.
#[derive(Debug)]
pub struct Profiled {
    cache: ProfileCache,
    report: BenchReport,
}

/// Sealed trait for partitioner states.
pub trait PartitionerState: std::fmt::Debug {}
impl PartitionerState for Idle {}
impl PartitionerState for Profiled {}

// ── Outcome ────────────────────────────────────────────────────

/// The result of one partitioning run.
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    pub plan: PartitionPlan,
    pub metrics: RunMetrics,
}

// ── Partitioner ────────────────────────────────────────────────

/// Profiles the configured devices and splits a batch across them.
///
/// # Example
/// ```no_run
/// use benchmarker::SyntheticWorkloads;
/// use perf_profile::JsonFileStore;
/// use runtime::{Partitioner, PartitionerConfig};
///
/// # async fn example() -> Result<(), runtime::RuntimeError> {
/// let config = PartitionerConfig::from_file("configs/demo.toml".as_ref())?;
/// let store = JsonFileStore::new(config.profile_cache.clone());
/// let executor = config.simulated_executor();
/// let outcome = Partitioner::new(config)?
///     .profile(&executor, &SyntheticWorkloads, &store)?
///     .partition()
///     .await?;
/// println!("{}", outcome.plan.summary());
/// # Ok(())
/// # }
/// ```
pub struct Partitioner<S: PartitionerState = Idle> {
    config: PartitionerConfig,
    state: S,
}

impl<S: PartitionerState> Partitioner<S> {
    pub fn config(&self) -> &PartitionerConfig {
        &self.config
    }
}

// ── Idle → Profiled ────────────────────────────────────────────

impl Partitioner<Idle> {
    /// Creates a partitioner after validating `config`.
    pub fn new(config: PartitionerConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        tracing::info!(
            "partitioner created for '{}' over {} devices",
            config.workload,
            config.devices.len(),
        );
        Ok(Self { config, state: Idle })
    }

    /// Loads the profile cache, measures the devices it lacks and writes
    /// the cache back once if anything was added.
    pub fn profile(
        self,
        executor: &dyn Executor,
        workloads: &dyn WorkloadProvider,
        store: &dyn ProfileStore,
    ) -> Result<Partitioner<Profiled>, RuntimeError> {
        let mut cache = ProfileCache::load(store)?;
        tracing::info!(
            "profile cache holds {} profiles",
            cache.table().num_profiles()
        );

        let bench = Benchmarker::with_config(executor, workloads, self.config.bench.clone());
        let report = bench.ensure_profiled(
            &self.config.device_specs(),
            &self.config.workload,
            &mut cache,
        );
        tracing::info!("{}", report.summary());

        if cache.persist(store)? {
            tracing::info!("profile cache written");
        }

        Ok(Partitioner {
            config: self.config,
            state: Profiled { cache, report },
        })
    }

    /// Skips benchmarking and uses an already populated cache.
    pub fn with_cache(self, cache: ProfileCache) -> Partitioner<Profiled> {
        Partitioner {
            config: self.config,
            state: Profiled {
                cache,
                report: BenchReport::default(),
            },
        }
    }
}

// ── Profiled: partition ────────────────────────────────────────

impl Partitioner<Profiled> {
    pub fn cache(&self) -> &ProfileCache {
        &self.state.cache
    }

    pub fn bench_report(&self) -> &BenchReport {
        &self.state.report
    }

    /// Partitions the configured `total_batch`.
    pub async fn partition(&self) -> Result<PartitionOutcome, RuntimeError> {
        self.partition_batch(self.config.total_batch).await
    }

    /// Partitions `total_batch` items using the loaded profiles.
    ///
    /// The search is CPU-bound and runs on the blocking thread pool.
    pub async fn partition_batch(
        &self,
        total_batch: usize,
    ) -> Result<PartitionOutcome, RuntimeError> {
        let mut search = PartitionSearch::from_cache(
            &self.config.device_specs(),
            &self.state.cache,
            &self.config.workload,
            self.config.search.clone(),
        )?;

        tracing::debug!(
            "starting search: {total_batch} items, {} devices",
            search.devices().len()
        );
        let plan = tokio::task::spawn_blocking(move || search.run(total_batch))
            .await
            .map_err(|e| RuntimeError::TaskFailed(e.to_string()))??;
        plan.validate()?;

        let metrics = RunMetrics::new(&self.state.report, &plan);
        tracing::info!("{}", metrics.summary());
        Ok(PartitionOutcome { plan, metrics })
    }
}

impl<S: PartitionerState> std::fmt::Debug for Partitioner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partitioner")
            .field("state", &std::any::type_name::<S>())
            .field("workload", &self.config.workload)
            .field("devices", &self.config.devices.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use partition_planner::Termination;
    use perf_profile::{DeviceKind, PerfProfile};

    fn config() -> PartitionerConfig {
        PartitionerConfig {
            workload: "net".into(),
            total_batch: 10,
            devices: vec![
                DeviceConfig {
                    name: "gpu0".into(),
                    kind: DeviceKind::Throughput,
                    target: "cuda".into(),
                    simulated: None,
                },
                DeviceConfig {
                    name: "cpu0".into(),
                    kind: DeviceKind::Latency,
                    target: "llvm".into(),
                    simulated: None,
                },
            ],
            ..PartitionerConfig::default()
        }
    }

    fn cache() -> ProfileCache {
        let mut cache = ProfileCache::new();
        let gpu = PerfProfile::from_rates([(1, 0.010), (2, 0.006), (4, 0.004), (8, 0.003)]).unwrap();
        let cpu = PerfProfile::from_rates([(1, 0.008), (2, 0.008), (4, 0.008), (8, 0.008)]).unwrap();
        cache.insert("gpu0", "net", gpu);
        cache.insert("cpu0", "net", cpu);
        cache
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = PartitionerConfig {
            total_batch: 0,
            ..config()
        };
        assert!(matches!(
            Partitioner::new(bad),
            Err(RuntimeError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_partition_with_cache() {
        let p = Partitioner::new(config()).unwrap().with_cache(cache());
        let outcome = p.partition().await.unwrap();
        assert_eq!(outcome.plan.assigned_total(), 10);
        assert_eq!(outcome.plan.num_devices(), 2);
        assert_eq!(outcome.metrics.iterations, outcome.plan.iterations);
        assert_eq!(outcome.metrics.devices_profiled, 0);
    }

    #[tokio::test]
    async fn test_partition_batch_override() {
        let p = Partitioner::new(config()).unwrap().with_cache(cache());
        let outcome = p.partition_batch(1).await.unwrap();
        assert_eq!(outcome.plan.distribution().iter().sum::<usize>(), 1);
        assert!(matches!(
            p.partition_batch(0).await,
            Err(RuntimeError::PlannerError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_profile_is_an_error() {
        let mut partial = cache();
        partial.invalidate("cpu0", "net");
        let p = Partitioner::new(config()).unwrap().with_cache(partial);
        assert!(matches!(
            p.partition().await,
            Err(RuntimeError::PlannerError(_))
        ));
    }

    #[tokio::test]
    async fn test_single_device() {
        let mut cfg = config();
        cfg.devices.truncate(1);
        let p = Partitioner::new(cfg).unwrap().with_cache(cache());
        let outcome = p.partition().await.unwrap();
        assert_eq!(outcome.plan.termination, Termination::SingleDevice);
        assert_eq!(outcome.plan.distribution(), vec![10]);
    }

    #[test]
    fn test_debug_shows_state() {
        let p = Partitioner::new(config()).unwrap();
        assert!(format!("{p:?}").contains("Idle"));
    }
}
