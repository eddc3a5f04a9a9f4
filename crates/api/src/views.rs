//! JSON shapes returned to the panel.

use chrono::{DateTime, Utc};
use commands::Command;
use engine::{ClusterSnapshot, Node, NodeStatus, StepView, Tutorial};
use serde::Serialize;

/// Backend paths of a node's current run output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLinks {
    pub stdout: String,
    pub stderr: String,
}

/// Which per-node controls are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeControls {
    pub pause: bool,
    pub resume: bool,
    pub destroy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub name: String,
    pub status: NodeStatus,
    pub url: String,
    pub logs: Option<LogLinks>,
    pub controls: NodeControls,
}

/// One row of the node table plus the cluster-wide controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterView {
    pub nodes: Vec<NodeView>,
    pub load_active: bool,
    pub taken_at: DateTime<Utc>,
    pub available: Vec<Command>,
}

impl NodeView {
    fn build(node: &Node, snapshot: &ClusterSnapshot) -> Self {
        let logs = node.run_id.map(|id| LogLinks {
            stdout: format!("/node/{}/run/{}/stdout", node.name, id),
            stderr: format!("/node/{}/run/{}/stderr", node.name, id),
        });
        let name = node.name.as_str();
        Self {
            name: node.name.clone(),
            status: node.status,
            url: node.url.clone(),
            logs,
            controls: NodeControls {
                pause: snapshot.allows(&Command::pause(name)),
                resume: snapshot.allows(&Command::resume(name)),
                destroy: snapshot.allows(&Command::destroy(name)),
            },
        }
    }
}

impl From<&ClusterSnapshot> for ClusterView {
    fn from(snapshot: &ClusterSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes().iter().map(|n| NodeView::build(n, snapshot)).collect(),
            load_active: snapshot.load_active(),
            taken_at: snapshot.taken_at(),
            available: snapshot.available_commands(),
        }
    }
}

/// Outline entry for `GET /api/v1/tutorial/steps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub step: usize,
    pub headline: String,
    pub action_label: String,
    pub active: bool,
}

pub fn outline(tutorial: &Tutorial, active: usize) -> Vec<StepSummary> {
    tutorial
        .steps()
        .iter()
        .enumerate()
        .map(|(i, s)| StepSummary {
            step: i + 1,
            headline: s.headline.clone(),
            action_label: s.label().to_string(),
            active: i + 1 == active,
        })
        .collect()
}

/// Result of `POST /api/v1/tutorial/advance`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvanceView {
    pub issued: Vec<Command>,
    pub step: StepView,
    pub cluster: ClusterView,
}
