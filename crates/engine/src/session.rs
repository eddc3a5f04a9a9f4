//! Tutorial session: ties the pure engine to a backend dispatcher.
//!
//! `TutorialSession` is the single writer of the active-step position:
//! 1. `refresh` replaces the snapshot with the backend's current cluster.
//! 2. `execute` issues one interactive command, if the snapshot enables it.
//! 3. `advance` asks the engine for the active step's commands, issues them
//!    one at a time (never two in flight), replacing the snapshot after each,
//!    then moves to the next step.
//!
//! A dispatch failure aborts the operation, keeps the last good snapshot,
//! and leaves the step position where it was.

use std::sync::Arc;

use commands::{ClusterPayload, Command, CommandDispatcher};
use tracing::{debug, error, info, instrument, warn};

use crate::EngineError;
use crate::models::ClusterSnapshot;
use crate::tutorial::{Advance, StepView, Tutorial, TutorialState};

/// Owns the engine state, the latest snapshot, and the dispatcher.
pub struct TutorialSession {
    tutorial: Tutorial,
    state: TutorialState,
    snapshot: ClusterSnapshot,
    dispatcher: Arc<dyn CommandDispatcher>,
}

impl TutorialSession {
    /// Start at the first step with an empty snapshot. Call
    /// [`TutorialSession::refresh`] to load the real cluster.
    pub fn new(tutorial: Tutorial, dispatcher: Arc<dyn CommandDispatcher>) -> Self {
        let state = tutorial.start();
        Self {
            tutorial,
            state,
            snapshot: ClusterSnapshot::empty(),
            dispatcher,
        }
    }

    pub fn tutorial(&self) -> &Tutorial {
        &self.tutorial
    }

    pub fn state(&self) -> TutorialState {
        self.state
    }

    pub fn snapshot(&self) -> &ClusterSnapshot {
        &self.snapshot
    }

    /// The active step, evaluated against the latest snapshot.
    pub fn view(&self) -> StepView {
        self.tutorial.view(self.state, &self.snapshot)
    }

    pub fn can_advance(&self) -> bool {
        self.tutorial.can_advance(self.state, &self.snapshot)
    }

    /// Replace the snapshot with the backend's current cluster.
    ///
    /// # Errors
    /// [`EngineError::Dispatch`] if the backend cannot be reached; the
    /// previous snapshot is kept.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&ClusterSnapshot, EngineError> {
        let payload = self.dispatcher.refresh().await.map_err(|e| {
            warn!("refresh failed, keeping previous snapshot: {}", e);
            e
        })?;
        self.replace_snapshot(payload);
        Ok(&self.snapshot)
    }

    /// Issue a single interactive command.
    ///
    /// # Errors
    /// - [`EngineError::CommandUnavailable`] if the snapshot disables it.
    /// - [`EngineError::Dispatch`] if the backend fails.
    #[instrument(skip(self, command), fields(command = %command))]
    pub async fn execute(&mut self, command: Command) -> Result<&ClusterSnapshot, EngineError> {
        if !self.snapshot.allows(&command) {
            warn!("command '{}' rejected: not available", command);
            return Err(EngineError::CommandUnavailable { command });
        }
        self.dispatch(&command).await?;
        Ok(&self.snapshot)
    }

    /// Advance past the active step, issuing its action's commands.
    ///
    /// Returns the commands that were issued.
    ///
    /// # Errors
    /// Engine precondition errors from [`Tutorial::advance`], or
    /// [`EngineError::Dispatch`] if a command fails. Commands after a failed
    /// one are not issued and the step does not change.
    #[instrument(skip(self))]
    pub async fn advance(&mut self) -> Result<Vec<Command>, EngineError> {
        let step = self.state.step();
        let Advance { commands, next } = self
            .tutorial
            .advance(self.state, &self.snapshot)
            .map_err(|e| {
                warn!("step {} cannot advance: {}", step, e);
                e
            })?;

        info!(
            "advancing from step {}: issuing {} command(s) {:?}",
            step,
            commands.len(),
            commands.iter().map(Command::to_string).collect::<Vec<_>>()
        );

        for command in &commands {
            self.dispatch(command).await?;
        }

        self.state = next;
        info!("now at step {} of {}", self.state.step(), self.tutorial.len());
        Ok(commands)
    }

    async fn dispatch(&mut self, command: &Command) -> Result<(), EngineError> {
        match self.dispatcher.dispatch(command).await {
            Ok(payload) => {
                info!("command '{}' accepted", command);
                self.replace_snapshot(payload);
                Ok(())
            }
            Err(e) => {
                error!("command '{}' failed: {}", command, e);
                Err(e.into())
            }
        }
    }

    fn replace_snapshot(&mut self, payload: ClusterPayload) {
        self.snapshot = ClusterSnapshot::from_payload(payload);
        debug!(
            "snapshot replaced: {} node(s), {} live, load {}",
            self.snapshot.nodes().len(),
            self.snapshot.live_count(),
            if self.snapshot.load_active() { "on" } else { "off" }
        );
    }
}
