//! `engine` crate: derived node status, cluster snapshots, step validators,
//! and the guided-tutorial engine.

pub mod models;
pub mod error;
pub mod status;
pub mod validation;
pub mod controls;
pub mod tutorial;
pub mod script;
pub mod session;

pub use models::{ClusterSnapshot, Node, NodeStatus};
pub use error::EngineError;
pub use status::resolve_status;
pub use validation::{count_validation, paused_validation, running_validation, CountTarget, Validator};
pub use tutorial::{Advance, StepAction, StepView, Tutorial, TutorialState, TutorialStep};
pub use session::TutorialSession;

#[cfg(test)]
mod tutorial_tests;
