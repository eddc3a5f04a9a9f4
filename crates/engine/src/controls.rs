//! Which commands the panel offers for a given snapshot.
//!
//! These mirror the node table's enable rules: a command is available only
//! when it would change something. Tutorial actions bypass this check; it
//! gates interactive commands only.

use commands::Command;

use crate::models::{ClusterSnapshot, NodeStatus};

impl ClusterSnapshot {
    /// Whether `command` is enabled in this snapshot.
    pub fn allows(&self, command: &Command) -> bool {
        let node_is = |name: &str, wanted: fn(NodeStatus) -> bool| {
            self.node(name).is_some_and(|n| wanted(n.status))
        };

        match command {
            Command::AddNode => true,
            Command::PauseNode { node } => node_is(node.as_str(), |s| s == NodeStatus::Running),
            Command::ResumeNode { node } => node_is(node.as_str(), |s| s == NodeStatus::Paused),
            Command::DestroyNode { node } => node_is(node.as_str(), NodeStatus::is_live),
            Command::PauseAll => self.count(NodeStatus::Running) > 0,
            Command::ResumeAll => self.count(NodeStatus::Paused) > 0,
            Command::DestroyAll => !self.nodes().iter().all(|n| n.status == NodeStatus::Destroyed),
            Command::StartLoad => !self.load_active(),
            Command::StopLoad => self.load_active(),
        }
    }

    /// Every cluster-wide command plus every per-node command, filtered to
    /// the ones currently enabled.
    pub fn available_commands(&self) -> Vec<Command> {
        let cluster_wide = [
            Command::AddNode,
            Command::PauseAll,
            Command::ResumeAll,
            Command::DestroyAll,
            Command::StartLoad,
            Command::StopLoad,
        ];
        let per_node = self.nodes().iter().flat_map(|n| {
            [
                Command::pause(n.name.as_str()),
                Command::resume(n.name.as_str()),
                Command::destroy(n.name.as_str()),
            ]
        });

        cluster_wide
            .into_iter()
            .chain(per_node)
            .filter(|c| self.allows(c))
            .collect()
    }
}
