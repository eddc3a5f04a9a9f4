//! `MockDispatcher`: an in-memory stand-in for the demo backend.
//!
//! Useful in unit and integration tests where a real backend is either
//! unavailable or irrelevant. It applies every command to a simulated
//! cluster the way the backend does, and records each command it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::{ClusterPayload, Command, CommandDispatcher, DispatchError, RawCmd, RawNode, RawProcess, RawRun};

/// Build a raw record for a live node with the given pid.
pub fn running_node(name: &str, pid: i64) -> RawNode {
    RawNode {
        name: name.to_string(),
        url: format!("http://localhost:{}", 26000 + pid),
        run: Some(RawRun {
            id: Some(1),
            cmd: Some(RawCmd { process: Some(RawProcess { pid: Some(pid) }) }),
            paused: Some(false),
        }),
    }
}

/// Build a raw record for a live node that is flagged paused.
pub fn paused_node(name: &str, pid: i64) -> RawNode {
    let mut node = running_node(name, pid);
    if let Some(run) = node.run.as_mut() {
        run.paused = Some(true);
    }
    node
}

/// Build a raw record for a node whose process has exited.
pub fn destroyed_node(name: &str) -> RawNode {
    RawNode {
        name: name.to_string(),
        url: String::new(),
        run: Some(RawRun { id: Some(1), cmd: None, paused: Some(false) }),
    }
}

/// Build a payload from a list of raw nodes, keyed by their names.
pub fn payload_of(nodes: impl IntoIterator<Item = RawNode>) -> ClusterPayload {
    ClusterPayload {
        nodes: nodes.into_iter().map(|n| (n.name.clone(), n)).collect(),
        kv: String::new(),
    }
}

/// Behaviour injected into `MockDispatcher`.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Apply every command to the simulated cluster.
    Simulate,
    /// Apply the first `successes` commands, then fail every later one.
    FailAfter { successes: usize, error: DispatchError },
    /// Fail refreshes as well as commands.
    Unreachable(DispatchError),
}

#[derive(Default)]
struct MockCluster {
    payload: ClusterPayload,
    next_pid: i64,
}

/// A mock dispatcher that records every command it receives and answers
/// with the simulated cluster.
pub struct MockDispatcher {
    behaviour: Mutex<MockBehaviour>,
    cluster: Mutex<MockCluster>,
    /// All commands seen by this dispatcher (in call order), including
    /// ones it failed.
    pub calls: Arc<Mutex<Vec<Command>>>,
}

impl MockDispatcher {
    /// An empty simulated cluster.
    pub fn new() -> Self {
        Self::with_payload(ClusterPayload::default())
    }

    /// A simulated cluster seeded with `payload`.
    pub fn with_payload(payload: ClusterPayload) -> Self {
        let next_pid = payload.nodes.values().filter_map(RawNode::pid).max().unwrap_or(1000) + 1;
        Self {
            behaviour: Mutex::new(MockBehaviour::Simulate),
            cluster: Mutex::new(MockCluster { payload, next_pid }),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the behaviour (builder style).
    pub fn behaving(self, behaviour: MockBehaviour) -> Self {
        self.set_behaviour(behaviour);
        self
    }

    /// Switch the behaviour of a dispatcher that is already in use.
    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    fn behaviour(&self) -> MockBehaviour {
        self.behaviour.lock().unwrap().clone()
    }

    /// Number of commands dispatched so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Commands dispatched so far, in order.
    pub fn recorded(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }

    /// Current simulated cluster.
    pub fn payload(&self) -> ClusterPayload {
        self.cluster.lock().unwrap().payload.clone()
    }

    fn apply(cluster: &mut MockCluster, command: &Command) -> Result<(), DispatchError> {
        let payload = &mut cluster.payload;
        match command {
            Command::AddNode => {
                let highest = payload.nodes.keys().filter_map(|k| k.parse::<u64>().ok()).max();
                let name = highest.map_or(1, |n| n + 1).to_string();
                let node = running_node(&name, cluster.next_pid);
                cluster.next_pid += 1;
                payload.nodes.insert(name, node);
            }
            Command::PauseNode { node } => set_paused(lookup(payload, node)?, true),
            Command::ResumeNode { node } => set_paused(lookup(payload, node)?, false),
            Command::DestroyNode { node } => destroy(lookup(payload, node)?),
            Command::PauseAll => payload.nodes.values_mut().for_each(|n| set_paused(n, true)),
            Command::ResumeAll => payload.nodes.values_mut().for_each(|n| set_paused(n, false)),
            Command::DestroyAll => payload.nodes.values_mut().for_each(destroy),
            Command::StartLoad => payload.kv = "kv".to_string(),
            Command::StopLoad => payload.kv.clear(),
        }
        Ok(())
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'a>(payload: &'a mut ClusterPayload, name: &str) -> Result<&'a mut RawNode, DispatchError> {
    payload
        .nodes
        .get_mut(name)
        .ok_or_else(|| DispatchError::UnknownNode(name.to_string()))
}

fn set_paused(node: &mut RawNode, paused: bool) {
    if node.pid().is_some_and(|pid| pid > 0) {
        if let Some(run) = node.run.as_mut() {
            run.paused = Some(paused);
        }
    }
}

fn destroy(node: &mut RawNode) {
    if let Some(run) = node.run.as_mut() {
        run.cmd = None;
        run.paused = Some(false);
    }
}

#[async_trait]
impl CommandDispatcher for MockDispatcher {
    async fn dispatch(&self, command: &Command) -> Result<ClusterPayload, DispatchError> {
        let seen = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(command.clone());
            calls.len()
        };
        debug!(%command, "mock dispatch");

        match self.behaviour() {
            MockBehaviour::Simulate => {}
            MockBehaviour::FailAfter { successes, error } if seen > successes => {
                return Err(error);
            }
            MockBehaviour::FailAfter { .. } => {}
            MockBehaviour::Unreachable(error) => return Err(error),
        }

        let mut cluster = self.cluster.lock().unwrap();
        Self::apply(&mut cluster, command)?;
        Ok(cluster.payload.clone())
    }

    async fn refresh(&self) -> Result<ClusterPayload, DispatchError> {
        if let MockBehaviour::Unreachable(error) = self.behaviour() {
            return Err(error);
        }
        Ok(self.payload())
    }
}
