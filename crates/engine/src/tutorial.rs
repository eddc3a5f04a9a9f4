//! The guided tutorial: step definitions and the pure advancement engine.
//!
//! The engine's state is a single step position, held in [`TutorialState`]
//! and owned by the caller. Transitions are pure: [`Tutorial::advance`]
//! takes the current state and snapshot and returns the next state together
//! with the commands the step's action wants issued. Issuing them is the
//! session's job (see [`crate::session`]).
//!
//! Positions are 1-based in everything user-facing. The only transition is
//! from step `i` to step `i + 1`, never backwards and never skipping.

use commands::Command;
use serde::{Deserialize, Serialize};

use crate::EngineError;
use crate::models::{ClusterSnapshot, NodeStatus};
use crate::validation::{collect_failures, Validator};

const DEFAULT_ACTION_LABEL: &str = "Run";

// ---------------------------------------------------------------------------
// StepAction
// ---------------------------------------------------------------------------

/// What a step does to the cluster when the user advances past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Add nodes until `target` non-destroyed nodes exist, then resume all.
    ///
    /// The number of adds is computed once from the snapshot at advance
    /// time.
    EnsureNodes { target: usize },
    /// Pause the `rank`-th running node (1-based, by ascending name).
    PauseRanked { rank: usize },
    /// Destroy the `rank`-th running node (1-based, by ascending name).
    DestroyRanked { rank: usize },
    /// Issue a fixed list of commands.
    Issue { commands: Vec<Command> },
}

impl StepAction {
    /// The commands this action issues against `snapshot`, in order.
    ///
    /// # Errors
    /// [`EngineError::RankedNodeNotFound`] when a ranked action has no node
    /// at its rank.
    pub fn plan(&self, snapshot: &ClusterSnapshot) -> Result<Vec<Command>, EngineError> {
        let commands = match self {
            StepAction::EnsureNodes { target } => {
                let missing = target.saturating_sub(snapshot.live_count());
                let mut commands = vec![Command::AddNode; missing];
                commands.push(Command::ResumeAll);
                commands
            }
            StepAction::PauseRanked { rank } => {
                let node = snapshot.nth_with_status(NodeStatus::Running, *rank)?;
                vec![Command::pause(node.name.as_str())]
            }
            StepAction::DestroyRanked { rank } => {
                let node = snapshot.nth_with_status(NodeStatus::Running, *rank)?;
                vec![Command::destroy(node.name.as_str())]
            }
            StepAction::Issue { commands } => commands.clone(),
        };
        Ok(commands)
    }
}

// ---------------------------------------------------------------------------
// TutorialStep
// ---------------------------------------------------------------------------

/// One stage of the tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialStep {
    pub headline: String,
    /// Body paragraphs, shown as-is.
    #[serde(default)]
    pub body: Vec<String>,
    /// Caption of the advance control; "Run" when unset.
    #[serde(default)]
    pub action_label: Option<String>,
    #[serde(default)]
    pub action: Option<StepAction>,
    /// Gating predicates; a step without any can always advance.
    #[serde(default)]
    pub validators: Vec<Validator>,
}

impl TutorialStep {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            body: Vec::new(),
            action_label: None,
            action: None,
            validators: Vec::new(),
        }
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.body.push(text.into());
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self
    }

    pub fn with_action(mut self, action: StepAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn gated_by(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn label(&self) -> &str {
        self.action_label.as_deref().unwrap_or(DEFAULT_ACTION_LABEL)
    }

    /// Every validator's failures against `snapshot`, in declaration order.
    pub fn failures(&self, snapshot: &ClusterSnapshot) -> Vec<String> {
        collect_failures(&self.validators, snapshot)
    }
}

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

/// Position of the active step. Created by [`Tutorial::start`] and only ever
/// moved forward by [`Tutorial::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TutorialState {
    index: usize,
}

impl TutorialState {
    /// 1-based number of the active step.
    pub fn step(&self) -> usize {
        self.index + 1
    }
}

/// Result of a successful advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Commands to issue, in order, before the new state takes effect.
    pub commands: Vec<Command>,
    pub next: TutorialState,
}

/// Presentation of the active step against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: usize,
    pub total: usize,
    pub headline: String,
    pub body: Vec<String>,
    pub action_label: String,
    pub failures: Vec<String>,
    pub can_advance: bool,
    pub is_final: bool,
}

// ---------------------------------------------------------------------------
// Tutorial
// ---------------------------------------------------------------------------

/// A fixed, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tutorial {
    steps: Vec<TutorialStep>,
}

#[derive(Deserialize)]
struct ScriptFile {
    steps: Vec<TutorialStep>,
}

impl Tutorial {
    /// Build a tutorial after checking the script.
    ///
    /// # Errors
    /// - [`EngineError::EmptyTutorial`] if `steps` is empty.
    /// - [`EngineError::UnsatisfiableValidator`] if some validator's `max`
    ///   is not above its `min`.
    pub fn new(steps: Vec<TutorialStep>) -> Result<Self, EngineError> {
        if steps.is_empty() {
            return Err(EngineError::EmptyTutorial);
        }
        for (index, step) in steps.iter().enumerate() {
            if let Some(v) = step.validators.iter().find(|v| !v.is_satisfiable()) {
                return Err(EngineError::UnsatisfiableValidator {
                    step: index + 1,
                    min: v.min,
                    max: v.max.unwrap_or_default(),
                });
            }
        }
        Ok(Self { steps })
    }

    /// Parse a `{"steps": [...]}` script and check it.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let script: ScriptFile =
            serde_json::from_str(json).map_err(|e| EngineError::Script(e.to_string()))?;
        Self::new(script.steps)
    }

    pub fn steps(&self) -> &[TutorialStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// State positioned at the first step.
    pub fn start(&self) -> TutorialState {
        TutorialState { index: 0 }
    }

    /// The active step.
    pub fn step(&self, state: TutorialState) -> &TutorialStep {
        let last = self.steps.len() - 1;
        &self.steps[state.index.min(last)]
    }

    pub fn is_final(&self, state: TutorialState) -> bool {
        state.index + 1 >= self.steps.len()
    }

    /// Failure messages of the active step against `snapshot`.
    pub fn failures(&self, state: TutorialState, snapshot: &ClusterSnapshot) -> Vec<String> {
        self.step(state).failures(snapshot)
    }

    /// True iff the active step's validators all pass on `snapshot`.
    pub fn can_advance(&self, state: TutorialState, snapshot: &ClusterSnapshot) -> bool {
        self.failures(state, snapshot).is_empty()
    }

    /// Move from the active step to the next one.
    ///
    /// Returns the next state plus the commands the active step's action
    /// issues, computed once from `snapshot`.
    ///
    /// # Errors
    /// - [`EngineError::NoNextStep`] on the last step.
    /// - [`EngineError::AdvanceBlocked`] when validators fail.
    /// - [`EngineError::RankedNodeNotFound`] from a ranked action.
    pub fn advance(
        &self,
        state: TutorialState,
        snapshot: &ClusterSnapshot,
    ) -> Result<Advance, EngineError> {
        if self.is_final(state) {
            return Err(EngineError::NoNextStep { step: state.step() });
        }

        let failures = self.failures(state, snapshot);
        if !failures.is_empty() {
            return Err(EngineError::AdvanceBlocked { step: state.step(), failures });
        }

        let commands = match &self.step(state).action {
            Some(action) => action.plan(snapshot)?,
            None => Vec::new(),
        };

        Ok(Advance {
            commands,
            next: TutorialState { index: state.index + 1 },
        })
    }

    /// Everything a front end needs to render the active step.
    pub fn view(&self, state: TutorialState, snapshot: &ClusterSnapshot) -> StepView {
        let step = self.step(state);
        let failures = step.failures(snapshot);
        let is_final = self.is_final(state);
        StepView {
            step: state.step(),
            total: self.len(),
            headline: step.headline.clone(),
            body: step.body.clone(),
            action_label: step.label().to_string(),
            can_advance: failures.is_empty() && !is_final,
            failures,
            is_final,
        }
    }
}
