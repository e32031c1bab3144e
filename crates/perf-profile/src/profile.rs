// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Measured per-item latencies and the batch-time estimator.
//!
//! A [`PerfProfile`] is built once per (device, workload) pair from a
//! handful of probe measurements and is immutable afterwards. The
//! estimator amplifies those few points into a completion-time estimate
//! for any batch size:
//!
//! | Batch size | Estimate |
//! |---|---|
//! | `0` | `0` |
//! | probed `k` | `rate[k] * k` |
//! | above the largest probe `m` | `rate[m] * batch` |
//! | otherwise | linear interpolation of the rate inside the power-of-two bracket, times `batch` |

use crate::probe::bracket;
use crate::ProbeSet;
use crate::ProfileError;
use std::collections::BTreeMap;

/// Per-item latency (seconds per item) at each probed batch size.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "BTreeMap<usize, f64>", into = "BTreeMap<usize, f64>")]
pub struct PerfProfile {
    rates: BTreeMap<usize, f64>,
}

impl PerfProfile {
    /// Creates an empty profile (no probe succeeded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a profile from `(batch_size, seconds_per_item)` pairs.
    ///
    /// # Errors
    /// [`ProfileError::InvalidRate`] for a zero batch size or a rate that is
    /// not finite and strictly positive.
    pub fn from_rates<I>(rates: I) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut profile = Self::new();
        for (batch, rate) in rates {
            profile.record(batch, rate)?;
        }
        if let Err(e) = profile.check_brackets() {
            tracing::warn!("{e}; estimates fall back to the nearest probes");
        }
        Ok(profile)
    }

    /// Checks that every unprobed batch below the largest probe has its
    /// power-of-two bracket, as a measured [`ProbeSet`] guarantees.
    ///
    /// # Errors
    /// [`ProfileError::MissingBracket`] for the first uncovered batch size.
    pub fn check_brackets(&self) -> Result<(), ProfileError> {
        if self.rates.is_empty() {
            return Ok(());
        }
        ProbeSet::new(self.probes().collect()).map(|_| ())
    }

    /// Records the per-item latency measured at `batch`.
    pub fn record(&mut self, batch: usize, rate: f64) -> Result<(), ProfileError> {
        if batch == 0 || !rate.is_finite() || rate <= 0.0 {
            return Err(ProfileError::InvalidRate { batch, rate });
        }
        self.rates.insert(batch, rate);
        Ok(())
    }

    /// Per-item latency at a probed batch size.
    pub fn rate(&self, batch: usize) -> Option<f64> {
        self.rates.get(&batch).copied()
    }

    /// Largest probed batch size, if any probe succeeded.
    pub fn max_probe(&self) -> Option<usize> {
        self.rates.keys().next_back().copied()
    }

    /// Probed batch sizes in ascending order.
    pub fn probes(&self) -> impl Iterator<Item = usize> + '_ {
        self.rates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Estimated completion time in seconds for `batch` items.
    ///
    /// An empty profile means the device could not run even a single item,
    /// so any non-zero batch is estimated as `f64::INFINITY`.
    pub fn estimate(&self, batch: usize) -> f64 {
        if batch == 0 {
            return 0.0;
        }
        if let Some(rate) = self.rate(batch) {
            return rate * batch as f64;
        }
        let Some((&max_key, &max_rate)) = self.rates.iter().next_back() else {
            return f64::INFINITY;
        };
        if batch > max_key {
            return max_rate * batch as f64;
        }

        let ((x0, y0), (x1, y1)) = self.interpolation_points(batch);
        let t = (batch - x0) as f64 / (x1 - x0) as f64;
        (y0 + (y1 - y0) * t) * batch as f64
    }

    /// Picks the two probes that bracket an unprobed `batch` below the
    /// largest probe.
    ///
    /// Profiles measured from a validated [`crate::ProbeSet`] always contain
    /// the power-of-two bracket. Hand-built profiles may not; those fall
    /// back to the nearest probes on either side.
    fn interpolation_points(&self, batch: usize) -> ((usize, f64), (usize, f64)) {
        let (low, high) = bracket(batch);
        if low < batch && batch < high {
            if let (Some(y0), Some(y1)) = (self.rate(low), self.rate(high)) {
                return ((low, y0), (high, y1));
            }
        }

        // `batch` is unprobed and below the maximum, so both sides exist
        // whenever there is a smaller probe. With none below, hold the
        // smallest probe's rate.
        let (&x1, &y1) = self
            .rates
            .range(batch..)
            .next()
            .expect("a probe above batch exists below the maximum");
        match self.rates.range(..batch).next_back() {
            Some((&x0, &y0)) => ((x0, y0), (x1, y1)),
            None => ((batch, y1), (x1, y1)),
        }
    }
}

impl TryFrom<BTreeMap<usize, f64>> for PerfProfile {
    type Error = ProfileError;

    fn try_from(rates: BTreeMap<usize, f64>) -> Result<Self, Self::Error> {
        Self::from_rates(rates)
    }
}

impl From<PerfProfile> for BTreeMap<usize, f64> {
    fn from(p: PerfProfile) -> Self {
        p.rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceKind, ProbeSet};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sparse_x() -> PerfProfile {
        PerfProfile::from_rates([(1, 1.0), (2, 0.9), (4, 0.8), (8, 0.75)]).unwrap()
    }

    /// A full latency-class profile whose rate decays with batch size.
    fn full_profile() -> PerfProfile {
        let probes = ProbeSet::for_kind(DeviceKind::Latency);
        PerfProfile::from_rates(
            probes
                .sizes()
                .iter()
                .map(|&b| (b, 0.01 + 0.1 / b as f64)),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_batch() {
        assert_eq!(sparse_x().estimate(0), 0.0);
        assert_eq!(PerfProfile::new().estimate(0), 0.0);
    }

    #[test]
    fn test_exact_probe() {
        let p = sparse_x();
        assert!(approx(p.estimate(1), 1.0));
        assert!(approx(p.estimate(4), 3.2));
        assert!(approx(p.estimate(8), 6.0));
    }

    #[test]
    fn test_extrapolation_holds_largest_rate() {
        let p = sparse_x();
        assert!(approx(p.estimate(10), 7.5));
        assert!(approx(p.estimate(100), 75.0));
    }

    #[test]
    fn test_power_of_two_bracket() {
        let p = full_profile();
        // 10 lies in [9, 15].
        let r9 = p.rate(9).unwrap();
        let r15 = p.rate(15).unwrap();
        let expected = (r9 + (r15 - r9) * (1.0 / 6.0)) * 10.0;
        assert!(approx(p.estimate(10), expected));
    }

    #[test]
    fn test_nearest_neighbour_fallback() {
        // 3 has no [3, 3] bracket; uses probes 2 and 4.
        let p = sparse_x();
        assert!(approx(p.estimate(3), 0.85 * 3.0));
        // 7 has bracket [5, 7] but neither is probed; uses 4 and 8.
        assert!(approx(p.estimate(7), 0.7625 * 7.0));
    }

    #[test]
    fn test_batch_below_smallest_probe_holds_its_rate() {
        let p = PerfProfile::from_rates([(5, 1.0), (10, 0.5)]).unwrap();
        assert!(approx(p.estimate(2), 2.0));
        assert!(approx(p.estimate(1), 1.0));
        assert!(approx(p.estimate(4), 4.0));
    }

    #[test]
    fn test_check_brackets() {
        assert!(full_profile().check_brackets().is_ok());
        assert!(PerfProfile::new().check_brackets().is_ok());
        assert!(matches!(
            sparse_x().check_brackets(),
            Err(ProfileError::MissingBracket { batch: 3, low: 3, high: 3 })
        ));
    }

    #[test]
    fn test_empty_profile_is_infinite() {
        assert!(PerfProfile::new().estimate(1).is_infinite());
    }

    #[test]
    fn test_truncated_profile_extrapolates() {
        let p = PerfProfile::from_rates([(1, 0.5)]).unwrap();
        assert!(approx(p.estimate(100), 50.0));
    }

    #[test]
    fn test_invalid_rates_rejected() {
        assert!(PerfProfile::from_rates([(1, 0.0)]).is_err());
        assert!(PerfProfile::from_rates([(1, -1.0)]).is_err());
        assert!(PerfProfile::from_rates([(1, f64::NAN)]).is_err());
        assert!(PerfProfile::from_rates([(0, 1.0)]).is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let p = sparse_x();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<PerfProfile>(&json).unwrap(), p);
        assert!(serde_json::from_str::<PerfProfile>(r#"{"1": -2.0}"#).is_err());
    }

    #[test]
    fn test_max_probe() {
        assert_eq!(sparse_x().max_probe(), Some(8));
        assert_eq!(PerfProfile::new().max_probe(), None);
    }
}
