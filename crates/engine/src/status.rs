//! Lifecycle status derivation for raw node records.

use commands::RawNode;

use crate::models::NodeStatus;

/// Classify a raw node record.
///
/// A node is live only when its run carries a process id greater than zero;
/// anything else (no run, no command, no process, pid ≤ 0) is `Destroyed`.
/// A live node is `Paused` when its run is flagged paused, else `Running`.
pub fn resolve_status(node: &RawNode) -> NodeStatus {
    match node.pid() {
        Some(pid) if pid > 0 && node.paused() => NodeStatus::Paused,
        Some(pid) if pid > 0 => NodeStatus::Running,
        _ => NodeStatus::Destroyed,
    }
}
