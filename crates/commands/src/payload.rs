//! Raw cluster payload as returned by the demo backend.
//!
//! Every backend route answers with the whole cluster: a map of node name to
//! node record plus a few cluster-level fields. Field names follow the
//! backend's JSON (`Cmd`, `Process`, `Pid` are capitalised there). All fields
//! are optional on the way in; a missing field simply means "not live".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The backend's answer to any command or refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterPayload {
    /// Node name → node record.
    #[serde(default)]
    pub nodes: BTreeMap<String, RawNode>,
    /// Load generator marker. Empty when no load generator is running.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kv: String,
}

impl ClusterPayload {
    /// Whether a load generator is currently active.
    pub fn load_active(&self) -> bool {
        !self.kv.is_empty()
    }
}

/// One node as the backend reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Admin UI address of the node.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// The node's current run; absent once the node has never been started.
    #[serde(default)]
    pub run: Option<RawRun>,
}

impl RawNode {
    /// Process id of the live process, if the record carries one.
    pub fn pid(&self) -> Option<i64> {
        self.run
            .as_ref()
            .and_then(|run| run.cmd.as_ref())
            .and_then(|cmd| cmd.process.as_ref())
            .and_then(|process| process.pid)
    }

    /// Whether the run is flagged as paused.
    pub fn paused(&self) -> bool {
        self.run.as_ref().and_then(|run| run.paused).unwrap_or(false)
    }

    /// Identifier of the current run, used to build log links.
    pub fn run_id(&self) -> Option<u64> {
        self.run.as_ref().and_then(|run| run.id)
    }
}

/// A single process run of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRun {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "Cmd", default)]
    pub cmd: Option<RawCmd>,
    #[serde(default)]
    pub paused: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCmd {
    #[serde(rename = "Process", default)]
    pub process: Option<RawProcess>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProcess {
    #[serde(rename = "Pid", default)]
    pub pid: Option<i64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
