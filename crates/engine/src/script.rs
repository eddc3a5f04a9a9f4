//! The built-in step script of the replication demo.

use commands::Command;

use crate::tutorial::{StepAction, Tutorial, TutorialStep};
use crate::validation::Validator;

fn intro() -> TutorialStep {
    TutorialStep::new("Demo")
        .paragraph(
            "The database behind this demo is a distributed SQL store that keeps serving \
             through node failures.",
        )
        .paragraph("This walkthrough shows how it replicates and rebalances data across a small local cluster.")
        .labelled("Next")
}

fn start_three() -> TutorialStep {
    TutorialStep::new("Start up 3 nodes")
        .paragraph("Running this step starts nodes until three are up and resumes any that are paused.")
        .with_action(StepAction::EnsureNodes { target: 3 })
        .gated_by(Validator::nodes(0, None))
}

fn start_load() -> TutorialStep {
    TutorialStep::new("Start a load generator")
        .paragraph(
            "Open the Admin UI of one of your nodes and view the node list. All three nodes are \
             listed, and their replica counts converge as data is replicated three times.",
        )
        .with_action(StepAction::Issue { commands: vec![Command::StartLoad] })
}

fn add_two() -> TutorialStep {
    TutorialStep::new("Add two more nodes")
        .paragraph(
            "Back in the Admin UI there are now five nodes. The replica counts of nodes 4 and 5 \
             start lower and catch up as data is rebalanced onto them.",
        )
        .with_action(StepAction::EnsureNodes { target: 5 })
        .gated_by(Validator::nodes(3, Some(5)))
}

fn pause_one() -> TutorialStep {
    TutorialStep::new("Pause a node")
        .paragraph("The second running node is paused. The rest of the cluster keeps serving.")
        .with_action(StepAction::PauseRanked { rank: 2 })
        .gated_by(Validator::running(3, None))
}

fn bring_back() -> TutorialStep {
    TutorialStep::new("Bring it back")
        .paragraph("Resuming the paused node lets it catch up on what it missed.")
        .with_action(StepAction::Issue { commands: vec![Command::ResumeAll] })
        .gated_by(Validator::running(2, None))
        .gated_by(Validator::paused(1, None))
}

fn kill_one() -> TutorialStep {
    TutorialStep::new("Kill a node")
        .paragraph("The third running node is destroyed for good. Its replicas are re-created elsewhere.")
        .with_action(StepAction::DestroyRanked { rank: 3 })
        .gated_by(Validator::running(3, None))
}

fn replace() -> TutorialStep {
    TutorialStep::new("Replace it with a new node")
        .paragraph("A fresh node joins and picks up a share of the data.")
        .with_action(StepAction::Issue { commands: vec![Command::AddNode] })
}

fn stop_load() -> TutorialStep {
    TutorialStep::new("Stop the load generator")
        .with_action(StepAction::Issue { commands: vec![Command::StopLoad] })
}

fn done() -> TutorialStep {
    TutorialStep::new("All done")
        .paragraph("Feel free to shut down this program and remove the data it generated.")
}

fn build(steps: Vec<TutorialStep>) -> Tutorial {
    // The built-in steps are non-empty and every bound leaves room to pass.
    Tutorial::new(steps).unwrap_or_else(|e| unreachable!("built-in script is invalid: {e}"))
}

impl Tutorial {
    /// The eight-step replication walkthrough.
    pub fn standard() -> Self {
        build(vec![
            intro(),
            start_three(),
            add_two(),
            pause_one(),
            bring_back(),
            kill_one(),
            replace(),
            done(),
        ])
    }

    /// The standard walkthrough with a load generator running from the
    /// second step until just before the end.
    pub fn standard_with_load() -> Self {
        build(vec![
            intro(),
            start_three(),
            start_load(),
            add_two(),
            pause_one(),
            bring_back(),
            kill_one(),
            replace(),
            stop_load(),
            done(),
        ])
    }
}
