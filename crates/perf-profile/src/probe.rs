// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Probe batch sizes and their configuration-time validation.
//!
//! Throughput usually changes in steps at power-of-two batch sizes, so
//! probes cluster around `2^k − 1, 2^k, 2^k + 1`. A batch size `b` that
//! is not probed is estimated by interpolating between
//!
//! ```text
//! low  = 2^floor(log2 b) + 1
//! high = 2 * (low - 1) - 1        (= 2^(k+1) - 1)
//! ```
//!
//! [`ProbeSet::new`] rejects probe sets where that bracket is missing for
//! any batch size inside the probed range, so a misconfiguration is caught
//! before a single device is measured.

use crate::{DeviceKind, ProfileError};

/// Probes used for latency-class devices.
pub const LATENCY_PROBES: &[usize] = &[1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 32, 33, 63, 64, 65];

/// Probes used for throughput-class devices.
pub const THROUGHPUT_PROBES: &[usize] = &[
    1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 32, 33, 63, 64, 65, 127, 128, 129,
];

/// Returns the `(low, high)` interpolation bracket for `batch`.
///
/// Only meaningful for `batch >= 1`.
pub fn bracket(batch: usize) -> (usize, usize) {
    let k = usize::BITS - 1 - batch.leading_zeros();
    let low = (1usize << k) + 1;
    let high = 2 * (low - 1) - 1;
    (low, high)
}

/// A validated, ascending set of probe batch sizes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(into = "Vec<usize>")]
pub struct ProbeSet {
    sizes: Vec<usize>,
}

impl ProbeSet {
    /// Builds a probe set, sorting and de-duplicating `sizes`.
    ///
    /// # Errors
    /// - [`ProfileError::InvalidProbeSet`] if empty or containing `0`.
    /// - [`ProfileError::MissingBracket`] if some batch size inside the range
    ///   could not be interpolated.
    pub fn new(mut sizes: Vec<usize>) -> Result<Self, ProfileError> {
        sizes.sort_unstable();
        sizes.dedup();

        if sizes.is_empty() {
            return Err(ProfileError::InvalidProbeSet("no probe sizes".into()));
        }
        if sizes[0] == 0 {
            return Err(ProfileError::InvalidProbeSet(
                "probe batch size 0 is not measurable".into(),
            ));
        }

        let max = *sizes.last().expect("non-empty");
        for batch in 1..max {
            if sizes.binary_search(&batch).is_ok() {
                continue;
            }
            let (low, high) = bracket(batch);
            let covered = low < batch
                && batch < high
                && sizes.binary_search(&low).is_ok()
                && sizes.binary_search(&high).is_ok();
            if !covered {
                return Err(ProfileError::MissingBracket { batch, low, high });
            }
        }

        Ok(Self { sizes })
    }

    /// The default probe set for a device class.
    pub fn for_kind(kind: DeviceKind) -> Self {
        let sizes = match kind {
            DeviceKind::Throughput => THROUGHPUT_PROBES,
            DeviceKind::Latency => LATENCY_PROBES,
        };
        Self {
            sizes: sizes.to_vec(),
        }
    }

    /// Probe sizes in ascending order.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Largest probed batch size.
    pub fn max(&self) -> usize {
        self.sizes.last().copied().unwrap_or(0)
    }
}

impl From<ProbeSet> for Vec<usize> {
    fn from(p: ProbeSet) -> Self {
        p.sizes
    }
}

impl TryFrom<Vec<usize>> for ProbeSet {
    type Error = ProfileError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl<'de> serde::Deserialize<'de> for ProbeSet {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let sizes = Vec::<usize>::deserialize(d)?;
        Self::new(sizes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket() {
        assert_eq!(bracket(6), (5, 7));
        assert_eq!(bracket(10), (9, 15));
        assert_eq!(bracket(14), (9, 15));
        assert_eq!(bracket(20), (17, 31));
        assert_eq!(bracket(100), (65, 127));
    }

    #[test]
    fn test_default_sets_validate() {
        ProbeSet::new(LATENCY_PROBES.to_vec()).unwrap();
        ProbeSet::new(THROUGHPUT_PROBES.to_vec()).unwrap();
    }

    #[test]
    fn test_for_kind() {
        assert_eq!(ProbeSet::for_kind(DeviceKind::Latency).max(), 65);
        assert_eq!(ProbeSet::for_kind(DeviceKind::Throughput).max(), 129);
        assert!(ProbeSet::for_kind(DeviceKind::Throughput).len()
            > ProbeSet::for_kind(DeviceKind::Latency).len());
    }

    #[test]
    fn test_sorts_and_dedups() {
        let p = ProbeSet::new(vec![3, 1, 2, 2, 1]).unwrap();
        assert_eq!(p.sizes(), &[1, 2, 3]);
    }

    #[test]
    fn test_missing_bracket() {
        // 1, 2, 4, 8: batch 3 needs [3, 3], which is absent.
        let err = ProbeSet::new(vec![1, 2, 4, 8]).unwrap_err();
        assert!(matches!(err, ProfileError::MissingBracket { batch: 3, .. }));
    }

    #[test]
    fn test_unprobed_power_of_two_rejected() {
        // 4 is inside the range but sits below its own bracket start (5).
        let err = ProbeSet::new(vec![1, 2, 3, 5, 7]).unwrap_err();
        assert!(matches!(err, ProfileError::MissingBracket { batch: 4, low: 5, high: 7 }));
    }

    #[test]
    fn test_empty_and_zero() {
        assert!(matches!(ProbeSet::new(vec![]), Err(ProfileError::InvalidProbeSet(_))));
        assert!(matches!(ProbeSet::new(vec![0, 1]), Err(ProfileError::InvalidProbeSet(_))));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ProbeSet = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(ok.len(), 3);
        assert!(serde_json::from_str::<ProbeSet>("[1, 2, 4, 8]").is_err());
    }
}
