//! Core domain models: node status, normalized nodes, and cluster snapshots.
//!
//! A [`ClusterSnapshot`] is built once from a backend payload and never
//! mutated afterwards. Each poll or command result produces a new snapshot
//! that replaces the previous one wholesale.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use commands::ClusterPayload;
use serde::{Deserialize, Serialize};

use crate::EngineError;
use crate::status::resolve_status;

// ---------------------------------------------------------------------------
// NodeStatus
// ---------------------------------------------------------------------------

/// Derived lifecycle state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    Running,
    Paused,
    /// Terminal. The node stays listed but no longer has a live process.
    Destroyed,
}

impl NodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeStatus::Running => "Running",
            NodeStatus::Paused => "Paused",
            NodeStatus::Destroyed => "Destroyed",
        }
    }

    /// Running or paused.
    pub fn is_live(self) -> bool {
        self != NodeStatus::Destroyed
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A node with its status attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Numeric string, unique within a snapshot.
    pub name: String,
    pub status: NodeStatus,
    /// Admin UI address.
    pub url: String,
    /// Current run, used for log links.
    pub run_id: Option<u64>,
}

// ---------------------------------------------------------------------------
// ClusterSnapshot
// ---------------------------------------------------------------------------

/// Immutable, ordered view of every node plus cluster-level flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSnapshot {
    nodes: Vec<Node>,
    load_active: bool,
    taken_at: DateTime<Utc>,
}

impl ClusterSnapshot {
    /// Normalize a backend payload: resolve every node's status, then order
    /// the nodes by the numeric value of their names.
    pub fn from_payload(payload: ClusterPayload) -> Self {
        let load_active = payload.load_active();
        let mut nodes: Vec<Node> = payload
            .nodes
            .into_iter()
            .map(|(key, raw)| {
                let status = resolve_status(&raw);
                let run_id = raw.run_id();
                Node {
                    name: if raw.name.is_empty() { key } else { raw.name },
                    status,
                    url: raw.url,
                    run_id,
                }
            })
            .collect();
        nodes.sort_by(|a, b| compare_names(&a.name, &b.name));

        Self {
            nodes,
            load_active,
            taken_at: Utc::now(),
        }
    }

    /// A snapshot with no nodes, used before the first poll completes.
    pub fn empty() -> Self {
        Self::from_payload(ClusterPayload::default())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn load_active(&self) -> bool {
        self.load_active
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Nodes with the given status, in snapshot order.
    pub fn with_status(&self, status: NodeStatus) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.status == status)
    }

    pub fn count(&self, status: NodeStatus) -> usize {
        self.with_status(status).count()
    }

    /// Number of nodes that are not destroyed.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.status.is_live()).count()
    }

    /// The `rank`-th node (1-based) among nodes with `status`, by ascending
    /// name.
    ///
    /// # Errors
    /// [`EngineError::RankedNodeNotFound`] when fewer than `rank` nodes have
    /// that status, or when `rank` is zero.
    pub fn nth_with_status(&self, status: NodeStatus, rank: usize) -> Result<&Node, EngineError> {
        rank.checked_sub(1)
            .and_then(|index| self.with_status(status).nth(index))
            .ok_or_else(|| EngineError::RankedNodeNotFound {
                status,
                rank,
                available: self.count(status),
            })
    }
}

/// Ascending by numeric value; names that are not numbers sort after every
/// numeric name, lexicographically.
fn compare_names(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
