mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{controls_released, init_tracing, standing, ScriptedConnection};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use voxel_catalog::Condition;
use voxel_core::{Command, ItemId, Inventory, KnowledgeBase, Observation, StaticKnowledgeBase};
use voxel_mission::{
    AgentOutcome, AgentReport, AgentRunner, Frame, RunningState, WorldConnection,
    WorldConnectionFault,
};
use voxel_ppa::{back_chain, CompilerConfig, Goal};

struct Harness {
    runner: AgentRunner,
    reports: mpsc::UnboundedReceiver<AgentReport>,
    cancel: CancellationToken,
}

fn harness(goals: &[Goal], connection: Box<dyn WorldConnection>) -> Harness {
    init_tracing();
    let knowledge: Arc<dyn KnowledgeBase> = Arc::new(StaticKnowledgeBase::minecraft());
    let tree = back_chain(knowledge.as_ref(), goals, CompilerConfig::for_agent("alice"))
        .expect("goals compile");
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let runner = AgentRunner::new(
        "alice",
        tree,
        knowledge,
        Default::default(),
        connection,
        tx,
        cancel.clone(),
    )
    .with_role("gatherer")
    .with_idle_timeout(Duration::from_secs(5));
    Harness {
        runner,
        reports: rx,
        cancel,
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<AgentReport>) -> Vec<AgentReport> {
    let mut out = Vec::new();
    while let Ok(report) = rx.try_recv() {
        out.push(report);
    }
    out
}

fn needs_log() -> Vec<Goal> {
    vec![Goal::from(Condition::has_item(ItemId::LOG, 1))]
}

fn assert_released_controls(commands: &[Command]) {
    assert_eq!(commands.last(), Some(&Command::Attack(false)), "{commands:?}");
    assert!(commands.contains(&Command::Move(0.0)));
}

#[tokio::test(start_paused = true)]
async fn idle_connection_times_out_with_a_single_fault() {
    let (connection, tap) = ScriptedConnection::new().observe(standing()).boxed();
    let Harness {
        runner,
        mut reports,
        ..
    } = harness(&needs_log(), connection);

    let started = Instant::now();
    let outcome = runner.run().await;

    assert_eq!(outcome.state, RunningState::Timeout);
    assert_eq!(
        outcome.fault,
        Some(WorldConnectionFault::IdleTimeout(Duration::from_secs(5)))
    );
    assert_eq!(outcome.ticks, 1);
    assert_eq!(outcome.restarts, 1);
    assert_eq!(tap.restarts(), 1);
    assert!(started.elapsed() >= Duration::from_secs(5));

    let reports = drain(&mut reports);
    let states: Vec<_> = reports.iter().map(|r| r.running_state).collect();
    assert_eq!(states, vec![RunningState::Running, RunningState::Timeout]);
    assert_eq!(reports[1].completion_time, None);
    assert_eq!(reports[1].role, "gatherer");

    // exploring for logs was running when the connection went quiet
    assert_released_controls(&tap.commands());
}

#[tokio::test(start_paused = true)]
async fn satisfied_goal_succeeds_on_first_tick() {
    let observation = Observation {
        inventory: Inventory::from_items([(ItemId::LOG, 2)]),
        ..standing()
    };
    let (connection, tap) = ScriptedConnection::new().forever(observation).boxed();
    let Harness {
        runner,
        mut reports,
        ..
    } = harness(&needs_log(), connection);

    let outcome = runner.run().await;

    assert_eq!(
        outcome,
        AgentOutcome {
            agent: "alice".to_string(),
            state: RunningState::Success,
            fault: None,
            ticks: 1,
            restarts: 0,
        }
    );
    assert_eq!(tap.restarts(), 0);

    let reports = drain(&mut reports);
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.running_state, RunningState::Success);
    assert!(report.completion_time.is_some());
    assert_eq!(report.position, standing().position);
}

#[tokio::test(start_paused = true)]
async fn zero_life_is_deceased() {
    let dead = Observation {
        life: Some(0.0),
        ..standing()
    };
    let (connection, tap) = ScriptedConnection::new().observe(dead).boxed();
    let outcome = harness(&needs_log(), connection).runner.run().await;

    assert_eq!(outcome.state, RunningState::Deceased);
    assert_eq!(outcome.fault, Some(WorldConnectionFault::Died));
    assert_eq!(outcome.ticks, 0);
    assert_eq!(tap.restarts(), 1);
}

#[tokio::test(start_paused = true)]
async fn world_error_is_a_timeout() {
    let (connection, tap) = ScriptedConnection::new()
        .observe(standing())
        .then(Frame::Error("socket closed".into()))
        .boxed();
    let outcome = harness(&needs_log(), connection).runner.run().await;

    assert_eq!(outcome.state, RunningState::Timeout);
    assert_eq!(
        outcome.fault,
        Some(WorldConnectionFault::World("socket closed".into()))
    );
    assert_eq!(tap.restarts(), 1);
}

#[tokio::test(start_paused = true)]
async fn mission_end_terminates_without_fault() {
    let (connection, tap) = ScriptedConnection::new()
        .observe(standing())
        .then(Frame::MissionEnded)
        .boxed();
    let Harness {
        runner,
        mut reports,
        ..
    } = harness(&needs_log(), connection);

    let outcome = runner.run().await;

    assert_eq!(outcome.state, RunningState::Terminated);
    assert_eq!(outcome.fault, None);
    assert_eq!(tap.restarts(), 0);
    assert_released_controls(&tap.commands());

    let last = drain(&mut reports).pop().expect("final report");
    assert_eq!(last.running_state, RunningState::Terminated);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_between_ticks() {
    let (connection, tap) = ScriptedConnection::new().forever(standing()).boxed();
    let Harness {
        runner,
        mut reports,
        cancel,
    } = harness(&needs_log(), connection);

    let task = tokio::spawn(runner.run());
    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();
    let outcome = task.await.expect("runner task");

    assert_eq!(outcome.state, RunningState::Cancelled);
    assert_eq!(outcome.fault, None);
    assert!(outcome.ticks > 1);
    assert_eq!(tap.restarts(), 0);
    assert_released_controls(&tap.commands());

    let reports = drain(&mut reports);
    assert_eq!(reports.len() as u64, outcome.ticks + 1);
    assert!(reports
        .iter()
        .rev()
        .skip(1)
        .all(|r| r.running_state == RunningState::Running));
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_never_ticks() {
    let (connection, tap) = ScriptedConnection::new().forever(standing()).boxed();
    let Harness { runner, cancel, .. } = harness(&needs_log(), connection);
    cancel.cancel();

    let outcome = runner.run().await;

    assert_eq!(outcome.state, RunningState::Cancelled);
    assert_eq!(outcome.ticks, 0);
    assert!(tap.commands().is_empty());
}

#[tokio::test(start_paused = true)]
async fn aborted_runner_releases_controls() {
    let (connection, tap) = ScriptedConnection::new().forever(standing()).boxed();
    let Harness { runner, .. } = harness(&needs_log(), connection);

    let task = tokio::spawn(runner.run());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!controls_released(&tap.commands()));
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert!(controls_released(&tap.commands()), "{:?}", tap.commands());
    assert_eq!(tap.restarts(), 0);
}
