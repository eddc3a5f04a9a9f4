//! Engine-level error types.

use commands::{Command, DispatchError};
use thiserror::Error;

use crate::models::NodeStatus;

/// Errors produced by the tutorial engine and its session driver.
///
/// Validation failures are not errors; they are plain messages returned by
/// the validators. These variants cover precondition violations, malformed
/// scripts, and backend failures.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Precondition violations ------

    /// `advance` was called while the active step's validators fail.
    #[error("advance called while blocked at step {step}: {}", failures.join(" "))]
    AdvanceBlocked { step: usize, failures: Vec<String> },

    /// `advance` was called on the last step.
    #[error("step {step} is the last step; there is nothing to advance to")]
    NoNextStep { step: usize },

    /// An action selected a node by rank, but too few nodes match.
    #[error("ranked node selection out of range: wanted {status} node #{rank}, only {available} exist")]
    RankedNodeNotFound {
        status: NodeStatus,
        rank: usize,
        available: usize,
    },

    /// The control for this command is disabled for the current snapshot.
    #[error("command {command} is not available in the current cluster state")]
    CommandUnavailable { command: Command },

    // ------ Script errors ------

    /// A tutorial needs at least one step.
    #[error("tutorial has no steps")]
    EmptyTutorial,

    /// A validator whose bounds no count can satisfy would block forever.
    #[error("step {step} has a validator that can never pass (min {min}, max {max})")]
    UnsatisfiableValidator { step: usize, min: usize, max: usize },

    /// The step script could not be parsed.
    #[error("invalid step script: {0}")]
    Script(String),

    // ------ Collaborator errors ------

    /// The backend dispatcher failed.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}
