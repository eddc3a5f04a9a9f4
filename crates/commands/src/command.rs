//! The closed set of commands the panel may send to the demo backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One named backend operation, carrying the node it targets when it has one.
///
/// Serialised with an internal `type` tag so the HTTP surface can accept
/// `{"type": "pause_node", "node": "2"}` directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Start a brand-new node.
    AddNode,
    /// Pause (SIGSTOP) a single running node.
    PauseNode { node: String },
    /// Pause every running node.
    PauseAll,
    /// Resume a single paused node.
    ResumeNode { node: String },
    /// Resume every paused node.
    ResumeAll,
    /// Stop a node for good. It stays in the cluster listing as destroyed.
    DestroyNode { node: String },
    /// Stop every node.
    DestroyAll,
    /// Start the load generator.
    StartLoad,
    /// Stop the load generator.
    StopLoad,
}

impl Command {
    pub fn pause(node: impl Into<String>) -> Self {
        Self::PauseNode { node: node.into() }
    }

    pub fn resume(node: impl Into<String>) -> Self {
        Self::ResumeNode { node: node.into() }
    }

    pub fn destroy(node: impl Into<String>) -> Self {
        Self::DestroyNode { node: node.into() }
    }

    /// Stable name of the command, as used in logs and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddNode => "addNode",
            Command::PauseNode { .. } => "pauseNode",
            Command::PauseAll => "pauseAll",
            Command::ResumeNode { .. } => "resumeNode",
            Command::ResumeAll => "resumeAll",
            Command::DestroyNode { .. } => "destroyNode",
            Command::DestroyAll => "destroyAll",
            Command::StartLoad => "startLoad",
            Command::StopLoad => "stopLoad",
        }
    }

    /// The node a per-node command targets; `None` for cluster-wide commands.
    pub fn target(&self) -> Option<&str> {
        match self {
            Command::PauseNode { node }
            | Command::ResumeNode { node }
            | Command::DestroyNode { node } => Some(node),
            _ => None,
        }
    }

    /// Build a command from its stable name plus an optional node argument.
    ///
    /// Returns `None` for unknown names, for per-node commands without a
    /// node, and for cluster-wide commands given one.
    pub fn parse(name: &str, node: Option<&str>) -> Option<Self> {
        let command = match (name, node) {
            ("addNode", None) => Command::AddNode,
            ("pauseNode", Some(n)) => Command::pause(n),
            ("pauseAll", None) => Command::PauseAll,
            ("resumeNode", Some(n)) => Command::resume(n),
            ("resumeAll", None) => Command::ResumeAll,
            ("destroyNode", Some(n)) => Command::destroy(n),
            ("destroyAll", None) => Command::DestroyAll,
            ("startLoad", None) => Command::StartLoad,
            ("stopLoad", None) => Command::StopLoad,
            _ => return None,
        };
        Some(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(node) => write!(f, "{}({})", self.name(), node),
            None => f.write_str(self.name()),
        }
    }
}
