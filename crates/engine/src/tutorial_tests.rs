//! Scenario tests for the tutorial engine and its session driver.
//!
//! The pure engine is exercised directly against hand-built snapshots. The
//! session tests run against `MockDispatcher`, so no backend is required.

use std::sync::Arc;

use commands::mock::{destroyed_node, paused_node, payload_of, running_node, MockBehaviour, MockDispatcher};
use commands::{Command, DispatchError, RawNode};

use crate::{
    ClusterSnapshot, EngineError, NodeStatus, StepAction, Tutorial, TutorialSession, TutorialStep,
    Validator,
};

fn snapshot(nodes: impl IntoIterator<Item = RawNode>) -> ClusterSnapshot {
    ClusterSnapshot::from_payload(payload_of(nodes))
}

fn running(n: usize) -> Vec<RawNode> {
    (1..=n).map(|i| running_node(&i.to_string(), 100 + i as i64)).collect()
}

/// `n` plain steps with no validators and no actions.
fn plain(n: usize) -> Tutorial {
    let steps = (1..=n).map(|i| TutorialStep::new(format!("step {i}"))).collect();
    Tutorial::new(steps).expect("valid tutorial")
}

// ============================================================
// Pure engine
// ============================================================

#[test]
fn step_without_validators_can_always_advance() {
    let tutorial = plain(2);
    let state = tutorial.start();
    assert!(tutorial.can_advance(state, &ClusterSnapshot::empty()));
    assert!(tutorial.can_advance(state, &snapshot([destroyed_node("1")])));
    assert!(tutorial.can_advance(state, &snapshot(running(7))));
}

#[test]
fn advance_moves_exactly_one_step_until_the_last() {
    let tutorial = plain(4);
    let snap = ClusterSnapshot::empty();
    let mut state = tutorial.start();
    assert_eq!(state.step(), 1);

    for expected in 2..=4 {
        let advance = tutorial.advance(state, &snap).expect("advance");
        assert_eq!(advance.next.step(), expected);
        assert!(advance.next.step() > state.step());
        assert!(advance.commands.is_empty());
        state = advance.next;
    }

    assert!(tutorial.is_final(state));
    assert!(matches!(
        tutorial.advance(state, &snap),
        Err(EngineError::NoNextStep { step: 4 })
    ));
}

#[test]
fn blocked_advance_is_an_explicit_error() {
    let tutorial = Tutorial::new(vec![
        TutorialStep::new("gate").gated_by(Validator::running(3, None)),
        TutorialStep::new("end"),
    ])
    .unwrap();

    let err = tutorial.advance(tutorial.start(), &snapshot(running(1))).unwrap_err();
    match err {
        EngineError::AdvanceBlocked { step, failures } => {
            assert_eq!(step, 1);
            assert_eq!(failures, vec!["Requires at least 3 running nodes."]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ensure_three_from_one_adds_two_then_resumes_all() {
    let action = StepAction::EnsureNodes { target: 3 };
    let snap = snapshot([running_node("1", 1), destroyed_node("2")]);
    assert_eq!(
        action.plan(&snap).unwrap(),
        vec![Command::AddNode, Command::AddNode, Command::ResumeAll]
    );
}

#[test]
fn ensure_when_already_satisfied_only_resumes() {
    let action = StepAction::EnsureNodes { target: 3 };
    let snap = snapshot(running(4));
    assert_eq!(action.plan(&snap).unwrap(), vec![Command::ResumeAll]);
}

#[test]
fn ranked_actions_pick_by_name_order_within_running_nodes() {
    let snap = snapshot([
        running_node("1", 1),
        paused_node("2", 2),
        running_node("10", 3),
        running_node("3", 4),
    ]);

    let pause = StepAction::PauseRanked { rank: 2 };
    assert_eq!(pause.plan(&snap).unwrap(), vec![Command::pause("3")]);

    let destroy = StepAction::DestroyRanked { rank: 3 };
    assert_eq!(destroy.plan(&snap).unwrap(), vec![Command::destroy("10")]);
}

#[test]
fn ranked_action_without_enough_nodes_fails() {
    let snap = snapshot(running(2));
    let err = StepAction::DestroyRanked { rank: 3 }.plan(&snap).unwrap_err();
    assert!(matches!(
        err,
        EngineError::RankedNodeNotFound { status: NodeStatus::Running, rank: 3, available: 2 }
    ));
}

#[test]
fn running_and_paused_gate_passes_and_fails_in_order() {
    let step = TutorialStep::new("Bring it back")
        .gated_by(Validator::running(2, None))
        .gated_by(Validator::paused(1, None));

    let ok = snapshot([
        running_node("1", 1),
        running_node("2", 2),
        paused_node("3", 3),
        destroyed_node("4"),
    ]);
    assert!(step.failures(&ok).is_empty());

    let short = snapshot([running_node("1", 1)]);
    assert_eq!(
        step.failures(&short),
        vec!["Requires at least 2 running nodes.", "Requires at least 1 paused nodes."]
    );
}

#[test]
fn script_validation_rejects_empty_and_unsatisfiable() {
    assert!(matches!(Tutorial::new(vec![]), Err(EngineError::EmptyTutorial)));

    let stuck = Tutorial::new(vec![
        TutorialStep::new("fine"),
        TutorialStep::new("stuck").gated_by(Validator::nodes(4, Some(4))),
    ]);
    assert!(matches!(
        stuck,
        Err(EngineError::UnsatisfiableValidator { step: 2, min: 4, max: 4 })
    ));
}

#[test]
fn script_loads_from_json() {
    let tutorial = Tutorial::from_json(
        r#"{
            "steps": [
                { "headline": "Grow", "action": { "type": "ensure_nodes", "target": 2 },
                  "validators": [ { "target": "nodes", "max": 2 } ] },
                { "headline": "Load", "action_label": "Go",
                  "action": { "type": "issue", "commands": [ { "type": "start_load" } ] } },
                { "headline": "Done" }
            ]
        }"#,
    )
    .expect("script parses");

    assert_eq!(tutorial.len(), 3);
    assert_eq!(tutorial.steps()[0].validators, vec![Validator::nodes(0, Some(2))]);
    assert_eq!(tutorial.steps()[1].label(), "Go");
    assert_eq!(tutorial.steps()[2].label(), "Run");

    assert!(matches!(Tutorial::from_json("{ \"steps\": 3 }"), Err(EngineError::Script(_))));
}

#[test]
fn standard_script_shape() {
    let tutorial = Tutorial::standard();
    let headlines: Vec<_> = tutorial.steps().iter().map(|s| s.headline.as_str()).collect();
    assert_eq!(
        headlines,
        vec![
            "Demo",
            "Start up 3 nodes",
            "Add two more nodes",
            "Pause a node",
            "Bring it back",
            "Kill a node",
            "Replace it with a new node",
            "All done",
        ]
    );
    assert_eq!(tutorial.steps()[0].label(), "Next");
    assert!(tutorial.steps()[7].action.is_none());

    let with_load = Tutorial::standard_with_load();
    assert_eq!(with_load.len(), 10);
    assert_eq!(with_load.steps()[2].headline, "Start a load generator");
    assert_eq!(with_load.steps()[8].headline, "Stop the load generator");
}

#[test]
fn view_reports_failures_and_final_flag() {
    let tutorial = Tutorial::standard();
    let mut state = tutorial.start();
    state = tutorial.advance(state, &ClusterSnapshot::empty()).unwrap().next;
    state = tutorial.advance(state, &ClusterSnapshot::empty()).unwrap().next;

    let view = tutorial.view(state, &snapshot(running(2)));
    assert_eq!(view.step, 3);
    assert_eq!(view.total, 8);
    assert_eq!(view.headline, "Add two more nodes");
    assert_eq!(view.action_label, "Run");
    assert_eq!(view.failures, vec!["Requires at least 3 nodes."]);
    assert!(!view.can_advance);
    assert!(!view.is_final);
}

// ============================================================
// Session driver (MockDispatcher)
// ============================================================

fn session_with(mock: Arc<MockDispatcher>, tutorial: Tutorial) -> TutorialSession {
    TutorialSession::new(tutorial, mock)
}

#[tokio::test]
async fn session_advance_issues_commands_then_moves() {
    let mock = Arc::new(MockDispatcher::with_payload(payload_of([running_node("1", 1)])));
    let tutorial = Tutorial::new(vec![
        TutorialStep::new("grow").with_action(StepAction::EnsureNodes { target: 3 }),
        TutorialStep::new("end"),
    ])
    .unwrap();
    let mut session = session_with(mock.clone(), tutorial);
    session.refresh().await.unwrap();

    let issued = session.advance().await.unwrap();

    assert_eq!(issued, vec![Command::AddNode, Command::AddNode, Command::ResumeAll]);
    assert_eq!(mock.recorded(), issued);
    assert_eq!(session.state().step(), 2);
    assert_eq!(session.snapshot().live_count(), 3);
}

#[tokio::test]
async fn session_walks_the_standard_script_end_to_end() {
    let mock = Arc::new(MockDispatcher::new());
    let mut session = session_with(mock.clone(), Tutorial::standard());
    session.refresh().await.unwrap();

    while !session.tutorial().is_final(session.state()) {
        assert!(session.can_advance(), "blocked at {:?}", session.view());
        session.advance().await.unwrap();
    }

    assert_eq!(session.state().step(), 8);
    let snap = session.snapshot();
    // Five started, one destroyed, one replacement.
    assert_eq!(snap.nodes().len(), 6);
    assert_eq!(snap.count(NodeStatus::Running), 5);
    assert_eq!(snap.count(NodeStatus::Destroyed), 1);
    assert_eq!(snap.node("3").unwrap().status, NodeStatus::Destroyed);

    assert!(matches!(session.advance().await, Err(EngineError::NoNextStep { step: 8 })));
}

#[tokio::test]
async fn blocked_session_issues_nothing() {
    let mock = Arc::new(MockDispatcher::with_payload(payload_of(running(1))));
    let tutorial = Tutorial::new(vec![
        TutorialStep::new("kill")
            .with_action(StepAction::DestroyRanked { rank: 1 })
            .gated_by(Validator::running(3, None)),
        TutorialStep::new("end"),
    ])
    .unwrap();
    let mut session = session_with(mock.clone(), tutorial);
    session.refresh().await.unwrap();

    assert!(matches!(session.advance().await, Err(EngineError::AdvanceBlocked { .. })));
    assert_eq!(mock.call_count(), 0);
    assert_eq!(session.state().step(), 1);
}

#[tokio::test]
async fn failed_dispatch_keeps_position_and_retry_issues_only_the_remainder() {
    let mock = Arc::new(MockDispatcher::new().behaving(MockBehaviour::FailAfter {
        successes: 1,
        error: DispatchError::Transport("connection refused".into()),
    }));
    let tutorial = Tutorial::new(vec![
        TutorialStep::new("grow").with_action(StepAction::EnsureNodes { target: 3 }),
        TutorialStep::new("end"),
    ])
    .unwrap();
    let mut session = session_with(mock.clone(), tutorial);

    let err = session.advance().await.unwrap_err();
    assert!(matches!(err, EngineError::Dispatch(DispatchError::Transport(_))));
    assert_eq!(session.state().step(), 1);
    // The first add went through before the failure.
    assert_eq!(session.snapshot().live_count(), 1);
    assert_eq!(mock.recorded(), vec![Command::AddNode, Command::AddNode]);

    let retry = Tutorial::new(vec![
        TutorialStep::new("grow").with_action(StepAction::EnsureNodes { target: 3 }),
        TutorialStep::new("end"),
    ])
    .unwrap();
    let healthy = Arc::new(MockDispatcher::with_payload(mock.payload()));
    let mut session = session_with(healthy.clone(), retry);
    session.refresh().await.unwrap();
    session.advance().await.unwrap();
    assert_eq!(healthy.recorded(), vec![Command::AddNode, Command::AddNode, Command::ResumeAll]);
    assert_eq!(session.snapshot().live_count(), 3);
}

#[tokio::test]
async fn execute_rejects_disabled_commands() {
    let mock = Arc::new(MockDispatcher::with_payload(payload_of([paused_node("1", 1)])));
    let mut session = session_with(mock.clone(), plain(1));
    session.refresh().await.unwrap();

    let err = session.execute(Command::pause("1")).await.unwrap_err();
    assert!(matches!(err, EngineError::CommandUnavailable { .. }));
    assert_eq!(mock.call_count(), 0);

    let snap = session.execute(Command::resume("1")).await.unwrap();
    assert_eq!(snap.node("1").unwrap().status, NodeStatus::Running);
}

#[tokio::test]
async fn refresh_failure_keeps_previous_snapshot() {
    let mock = Arc::new(MockDispatcher::with_payload(payload_of(running(2))));
    let mut session = session_with(mock.clone(), plain(1));
    session.refresh().await.unwrap();
    let before = session.snapshot().clone();
    assert_eq!(before.nodes().len(), 2);

    mock.set_behaviour(MockBehaviour::Unreachable(DispatchError::Transport("down".into())));
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, EngineError::Dispatch(DispatchError::Transport(_))));
    assert_eq!(session.snapshot(), &before);
}

#[test]
fn final_step_view_disables_the_control() {
    let tutorial = plain(2);
    let last = tutorial.advance(tutorial.start(), &ClusterSnapshot::empty()).unwrap().next;
    let view = tutorial.view(last, &ClusterSnapshot::empty());
    assert!(view.is_final);
    assert!(!view.can_advance);
    assert!(view.failures.is_empty());
    assert!(tutorial.can_advance(last, &ClusterSnapshot::empty()));
}
