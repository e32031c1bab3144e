// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Coarse device classes.

use std::fmt;

/// Coarse class of a compute device.
///
/// The class only decides which probe batch sizes are measured; the
/// partitioning search itself treats all devices alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Parallel-throughput devices (GPUs, NPUs). Probed up to larger batches.
    #[serde(alias = "gpu")]
    Throughput,
    /// Latency-favouring devices (CPUs).
    #[serde(alias = "cpu")]
    Latency,
}

impl DeviceKind {
    /// Parses a kind name, accepting the `gpu`/`cpu` shorthands.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "throughput" | "gpu" | "npu" => Some(Self::Throughput),
            "latency" | "cpu" => Some(Self::Latency),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Throughput => write!(f, "throughput"),
            Self::Latency => write!(f, "latency"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_loose() {
        assert_eq!(DeviceKind::from_str_loose("GPU"), Some(DeviceKind::Throughput));
        assert_eq!(DeviceKind::from_str_loose("cpu"), Some(DeviceKind::Latency));
        assert_eq!(DeviceKind::from_str_loose("latency"), Some(DeviceKind::Latency));
        assert_eq!(DeviceKind::from_str_loose("fpga"), None);
    }

    #[test]
    fn test_serde_aliases() {
        let k: DeviceKind = serde_json::from_str("\"gpu\"").unwrap();
        assert_eq!(k, DeviceKind::Throughput);
        let k: DeviceKind = serde_json::from_str("\"latency\"").unwrap();
        assert_eq!(k, DeviceKind::Latency);
        assert_eq!(serde_json::to_string(&DeviceKind::Throughput).unwrap(), "\"throughput\"");
    }
}
