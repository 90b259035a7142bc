//! Per-agent tick loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use voxel_core::{Blackboard, KnowledgeBase, Observation, Status};
use voxel_catalog::AgentContext;
use voxel_ppa::{AgentTree, Blueprint};
use voxel_trace::TraceSink;

use crate::connection::{Frame, WorldConnection};
use crate::error::WorldConnectionFault;
use crate::report::{AgentOutcome, AgentReport, RunningState};

/// Drives one agent: one frame in, one tree tick, one report out.
///
/// Dropping a runner that ticked but never halted its tree (its task was aborted mid-frame)
/// halts the tree and neutralises the actuators.
pub struct AgentRunner {
    name: String,
    role: String,
    tree: AgentTree,
    knowledge: Arc<dyn KnowledgeBase>,
    blackboard: Blackboard,
    connection: Box<dyn WorldConnection>,
    blueprints: Vec<Blueprint>,
    idle_timeout: Duration,
    reports: mpsc::UnboundedSender<AgentReport>,
    cancel: CancellationToken,
    trace: Option<Box<dyn TraceSink + Send>>,
    restarts: u32,
    last: Option<Observation>,
    halted: bool,
}

impl AgentRunner {
    pub fn new(
        name: impl Into<String>,
        tree: AgentTree,
        knowledge: Arc<dyn KnowledgeBase>,
        blackboard: Blackboard,
        connection: Box<dyn WorldConnection>,
        reports: mpsc::UnboundedSender<AgentReport>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            name: name.into(),
            role: String::new(),
            tree,
            knowledge,
            blackboard,
            connection,
            blueprints: Vec::new(),
            idle_timeout: Duration::from_secs(10),
            reports,
            cancel,
            trace: None,
            restarts: 0,
            last: None,
            halted: false,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_blueprints(mut self, blueprints: Vec<Blueprint>) -> Self {
        self.blueprints = blueprints;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink + Send>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run until the tree succeeds, the connection faults, the world ends the mission or the
    /// token is cancelled. Cancellation is checked between ticks; a started tick completes.
    pub async fn run(mut self) -> AgentOutcome {
        let started = Instant::now();
        let cancel = self.cancel.clone();
        let mut ticks = 0u64;

        info!(agent = %self.name, role = %self.role, "agent started");

        let (state, fault) = loop {
            if cancel.is_cancelled() {
                break (RunningState::Cancelled, None);
            }

            let frame = tokio::select! {
                biased;
                _ = cancel.cancelled() => break (RunningState::Cancelled, None),
                frame = timeout(self.idle_timeout, self.connection.next_frame()) => frame,
            };

            let observation = match frame {
                Err(_) => {
                    break (
                        RunningState::Timeout,
                        Some(WorldConnectionFault::IdleTimeout(self.idle_timeout)),
                    )
                }
                Ok(Frame::Error(message)) => {
                    break (
                        RunningState::Timeout,
                        Some(WorldConnectionFault::World(message)),
                    )
                }
                Ok(Frame::MissionEnded) => break (RunningState::Terminated, None),
                Ok(Frame::Observation(observation)) => observation,
            };

            if observation.is_dead() {
                self.last = Some(observation);
                break (RunningState::Deceased, Some(WorldConnectionFault::Died));
            }

            let status = self.tick(&observation, ticks);
            ticks += 1;
            self.last = Some(observation);

            if status == Status::Success {
                break (RunningState::Success, None);
            }
            self.report(RunningState::Running, ticks, None);
        };

        self.halt();
        debug!(agent = %self.name, ticks, "tree halted");

        if let Some(fault) = &fault {
            warn!(agent = %self.name, %fault, "world connection fault");
            self.restart().await;
        }

        let completion = (state == RunningState::Success).then(|| started.elapsed());
        match state {
            RunningState::Success => {
                info!(agent = %self.name, ticks, elapsed = ?completion, "agent succeeded")
            }
            _ => info!(agent = %self.name, ticks, %state, "agent stopped"),
        }
        self.report(state, ticks, completion);

        AgentOutcome {
            agent: std::mem::take(&mut self.name),
            state,
            fault,
            ticks,
            restarts: self.restarts,
        }
    }

    fn tick(&mut self, observation: &Observation, tick: u64) -> Status {
        let mut ctx = AgentContext::new(
            &self.name,
            observation,
            self.knowledge.as_ref(),
            &self.blackboard,
            self.connection.actuator(),
        );
        match self.trace.as_deref_mut() {
            Some(sink) => self.tree.tick_traced(&mut ctx, tick, sink),
            None => self.tree.tick(&mut ctx),
        }
    }

    /// Exit hooks of running leaves leave the actuators neutral. Runs at most once.
    fn halt(&mut self) {
        if self.halted {
            return;
        }
        self.halted = true;
        let blank = Observation::default();
        let observation = self.last.as_ref().unwrap_or(&blank);
        let mut ctx = AgentContext::new(
            &self.name,
            observation,
            self.knowledge.as_ref(),
            &self.blackboard,
            self.connection.actuator(),
        );
        self.tree.halt(&mut ctx);
    }

    async fn restart(&mut self) {
        self.restarts += 1;
        if let Err(err) = self.connection.restart().await {
            error!(agent = %self.name, error = %err, "connection restart failed");
        }
    }

    fn report(
        &self,
        running_state: RunningState,
        tick: u64,
        completion_time: Option<Duration>,
    ) {
        let observation = self.last.as_ref();
        let blueprint_results = self
            .blueprints
            .iter()
            .map(|blueprint| {
                blueprint
                    .positions
                    .iter()
                    .map(|pos| {
                        observation.is_some_and(|o| o.block_at(*pos) == Some(&blueprint.block))
                    })
                    .collect()
            })
            .collect();

        let report = AgentReport {
            agent: self.name.clone(),
            role: self.role.clone(),
            tick,
            running_state,
            completion_time,
            position: observation.and_then(|o| o.position),
            blueprint_results,
        };
        if self.reports.send(report).is_err() {
            debug!(agent = %self.name, "report channel closed");
        }
    }
}

impl Drop for AgentRunner {
    fn drop(&mut self) {
        if self.halted || self.last.is_none() {
            return;
        }
        self.halt();
        self.connection.actuator().stop();
        warn!(agent = %self.name, "runner dropped mid-run, controls released");
    }
}
