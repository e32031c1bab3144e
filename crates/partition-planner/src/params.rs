// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tunables fixed for the duration of one search.

use crate::PlannerError;

/// What the search does when no device can accept a trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfeasiblePolicy {
    /// Stop and keep the partition found so far.
    #[default]
    Terminate,
    /// Count the iteration as non-improving: the trial step grows and,
    /// after `tolerate_limit` such iterations, the base device is swapped.
    Backoff,
}

/// Parameters of the greedy reallocation loop.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// Non-improving iterations tolerated before the base device is replaced.
    pub tolerate_limit: usize,
    /// Number of base replacements after which the search stops.
    pub base_var_limit: usize,
    /// Slack multiplier (> 1.0) applied to the target time when accepting a trial.
    pub max_thresh: f64,
    /// Evaluate trials on the rayon pool when there are more than two devices.
    pub parallel_trials: bool,
    pub on_infeasible: InfeasiblePolicy,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            tolerate_limit: 5,
            base_var_limit: 5,
            max_thresh: 1.05,
            parallel_trials: true,
            on_infeasible: InfeasiblePolicy::Terminate,
        }
    }
}

impl SearchParameters {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if !self.max_thresh.is_finite() || self.max_thresh <= 1.0 {
            return Err(PlannerError::InvalidParameter {
                name: "max_thresh",
                detail: format!("must be a finite value above 1.0, got {}", self.max_thresh),
            });
        }
        Ok(())
    }

    /// Upper bound on the number of loop iterations for `total_batch` items.
    ///
    /// Under [`InfeasiblePolicy::Terminate`] every iteration either moves work
    /// off the base or ends the search. Under [`InfeasiblePolicy::Backoff`]
    /// each base epoch runs at most `(tolerate_limit + 1)` iterations per
    /// item the base can give up, and there are at most `base_var_limit + 1`
    /// epochs.
    pub fn iteration_bound(&self, total_batch: usize) -> usize {
        match self.on_infeasible {
            InfeasiblePolicy::Terminate => {
                self.base_var_limit + self.tolerate_limit * self.base_var_limit + total_batch
            }
            InfeasiblePolicy::Backoff => {
                (self.base_var_limit + 1) * (self.tolerate_limit + 1) * (total_batch + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = SearchParameters::default();
        assert_eq!(p.tolerate_limit, 5);
        assert_eq!(p.base_var_limit, 5);
        assert_eq!(p.max_thresh, 1.05);
        assert_eq!(p.on_infeasible, InfeasiblePolicy::Terminate);
        p.validate().unwrap();
    }

    #[test]
    fn test_max_thresh_must_exceed_one() {
        for bad in [1.0, 0.5, f64::NAN, f64::INFINITY] {
            let p = SearchParameters {
                max_thresh: bad,
                ..Default::default()
            };
            assert!(p.validate().is_err(), "accepted max_thresh = {bad}");
        }
    }

    #[test]
    fn test_iteration_bound() {
        let p = SearchParameters::default();
        assert_eq!(p.iteration_bound(10), 5 + 25 + 10);
        let p = SearchParameters {
            on_infeasible: InfeasiblePolicy::Backoff,
            ..Default::default()
        };
        assert_eq!(p.iteration_bound(10), 6 * 6 * 11);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let p: SearchParameters = serde_json::from_str(r#"{"max_thresh": 1.2, "on_infeasible": "backoff"}"#).unwrap();
        assert_eq!(p.max_thresh, 1.2);
        assert_eq!(p.tolerate_limit, 5);
        assert_eq!(p.on_infeasible, InfeasiblePolicy::Backoff);
    }
}
