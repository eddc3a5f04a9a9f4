//! Step validators: counting predicates evaluated against a snapshot.
//!
//! A validator never errors. It returns zero or more human-readable failure
//! messages, and a step may advance only when all of its validators return
//! none. Validators are re-evaluated on every snapshot; nothing is cached.
//!
//! Bounds:
//! - `min` is inclusive. A count below it fails with
//!   "Requires at least {min} {noun}."
//! - `max` is exclusive and optional. A count at or above it fails with
//!   "Requires fewer than {max} {noun}."
//!
//! The two checks are independent; both messages can appear for one call.

use serde::{Deserialize, Serialize};

use crate::models::{ClusterSnapshot, NodeStatus};

/// Which nodes a validator counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountTarget {
    /// Every node that is not destroyed.
    Nodes,
    Running,
    Paused,
}

impl CountTarget {
    fn noun(self) -> &'static str {
        match self {
            CountTarget::Nodes => "nodes",
            CountTarget::Running => "running nodes",
            CountTarget::Paused => "paused nodes",
        }
    }

    fn count(self, snapshot: &ClusterSnapshot) -> usize {
        match self {
            CountTarget::Nodes => snapshot.live_count(),
            CountTarget::Running => snapshot.count(NodeStatus::Running),
            CountTarget::Paused => snapshot.count(NodeStatus::Paused),
        }
    }
}

/// One gating predicate of a tutorial step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub target: CountTarget,
    #[serde(default)]
    pub min: usize,
    #[serde(default)]
    pub max: Option<usize>,
}

impl Validator {
    pub fn nodes(min: usize, max: Option<usize>) -> Self {
        Self { target: CountTarget::Nodes, min, max }
    }

    pub fn running(min: usize, max: Option<usize>) -> Self {
        Self { target: CountTarget::Running, min, max }
    }

    pub fn paused(min: usize, max: Option<usize>) -> Self {
        Self { target: CountTarget::Paused, min, max }
    }

    /// Failure messages for `snapshot`; empty when the predicate holds.
    pub fn evaluate(&self, snapshot: &ClusterSnapshot) -> Vec<String> {
        let count = self.target.count(snapshot);
        let noun = self.target.noun();

        let mut failures = Vec::new();
        if count < self.min {
            failures.push(format!("Requires at least {} {}.", self.min, noun));
        }
        if let Some(max) = self.max {
            if count >= max {
                failures.push(format!("Requires fewer than {} {}.", max, noun));
            }
        }
        failures
    }

    /// Whether any count at all can pass this validator.
    pub fn is_satisfiable(&self) -> bool {
        self.max.map_or(true, |max| max > self.min)
    }
}

/// Non-destroyed node count within `[min, max)`.
pub fn count_validation(snapshot: &ClusterSnapshot, min: usize, max: Option<usize>) -> Vec<String> {
    Validator::nodes(min, max).evaluate(snapshot)
}

/// Running node count within `[min, max)`.
pub fn running_validation(snapshot: &ClusterSnapshot, min: usize, max: Option<usize>) -> Vec<String> {
    Validator::running(min, max).evaluate(snapshot)
}

/// Paused node count within `[min, max)`.
pub fn paused_validation(snapshot: &ClusterSnapshot, min: usize, max: Option<usize>) -> Vec<String> {
    Validator::paused(min, max).evaluate(snapshot)
}

/// Concatenate every validator's failures, in declaration order.
pub fn collect_failures(validators: &[Validator], snapshot: &ClusterSnapshot) -> Vec<String> {
    validators.iter().flat_map(|v| v.evaluate(snapshot)).collect()
}
