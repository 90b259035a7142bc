//! Multi-agent mission: compile, spawn one runner per agent, collect reports, stop.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;
use voxel_core::{Blackboard, KnowledgeBase};
use voxel_ppa::{AgentTree, BackChainer};
use voxel_trace::TracingSink;

use crate::config::{AgentConfig, MissionConfig};
use crate::connection::WorldConnection;
use crate::error::MissionError;
use crate::report::{merge_blueprints, AgentReport, MissionSummary, RunningState};
use crate::runner::AgentRunner;

pub struct Mission {
    id: Uuid,
    config: MissionConfig,
    knowledge: Arc<dyn KnowledgeBase>,
    blackboard: Blackboard,
    cancel: CancellationToken,
}

impl Mission {
    pub fn new(config: MissionConfig, knowledge: Arc<dyn KnowledgeBase>) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            knowledge,
            blackboard: Blackboard::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Cancelling this token stops every runner between ticks. Agents halt their trees and
    /// report CANCELLED, which ends the mission.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    /// Shared by every agent of this mission.
    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    /// Compile every agent's goals. Nothing runs if any agent fails to compile.
    pub fn compile(&self) -> Result<Vec<AgentTree>, MissionError> {
        if self.config.agents.is_empty() {
            return Err(MissionError::NoAgents);
        }
        let mut seen = HashSet::new();
        for agent in &self.config.agents {
            if !seen.insert(agent.name.as_str()) {
                return Err(MissionError::DuplicateAgent(agent.name.clone()));
            }
        }

        self.config
            .agents
            .iter()
            .map(|agent| {
                let chainer =
                    BackChainer::new(self.knowledge.as_ref(), self.config.compiler_config(agent));
                let tree = chainer
                    .back_chain(&agent.goals)
                    .map_err(|source| MissionError::Compilation {
                        agent: agent.name.clone(),
                        source,
                    })?;
                info!(mission = %self.id, agent = %agent.name, nodes = tree.len(), "compiled");
                Ok(tree)
            })
            .collect()
    }

    /// Run the mission. `connections` pairs with the configured agents by position.
    pub async fn run(
        self,
        connections: Vec<Box<dyn WorldConnection>>,
    ) -> Result<MissionSummary, MissionError> {
        let trees = self.compile()?;
        if connections.len() != self.config.agents.len() {
            return Err(MissionError::ConnectionCount {
                expected: self.config.agents.len(),
                got: connections.len(),
            });
        }

        let started = Instant::now();
        let stop = self.cancel.child_token();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runners = JoinSet::new();

        info!(
            mission = %self.id,
            name = %self.config.name,
            agents = self.config.agents.len(),
            collaborative = self.config.collaborative,
            "mission starting"
        );

        for ((agent, tree), connection) in self.config.agents.iter().zip(trees).zip(connections) {
            let runner = self.runner(agent, tree, connection, tx.clone(), stop.child_token());
            runners.spawn(runner.run());
        }
        drop(tx);

        let mut latest: BTreeMap<String, AgentReport> = BTreeMap::new();
        let deadline = self
            .config
            .time_limit()
            .and_then(|limit| started.checked_add(limit));
        let mut timed_out = false;

        loop {
            let report = tokio::select! {
                report = rx.recv() => report,
                _ = expire(deadline) => {
                    warn!(mission = %self.id, "mission time limit reached");
                    timed_out = true;
                    break;
                }
            };
            let Some(report) = report else { break };
            latest.insert(report.agent.clone(), report);
            if self.finished(&latest) {
                break;
            }
        }

        if self.cancel.is_cancelled() {
            info!(mission = %self.id, "mission cancelled by host");
        }
        stop.cancel();

        let mut states = BTreeMap::new();
        let mut faults = BTreeMap::new();
        while let Some(joined) = runners.join_next().await {
            match joined {
                Ok(outcome) => {
                    let state = match outcome.state {
                        RunningState::Cancelled | RunningState::Running if timed_out => {
                            RunningState::Timeout
                        }
                        state => state,
                    };
                    if let Some(fault) = outcome.fault {
                        faults.insert(outcome.agent.clone(), fault);
                    }
                    states.insert(outcome.agent, state);
                }
                Err(err) => error!(mission = %self.id, error = %err, "agent task failed"),
            }
        }
        while let Ok(report) = rx.try_recv() {
            latest.insert(report.agent.clone(), report);
        }

        let mut blueprint_results = Vec::new();
        for report in latest.values() {
            merge_blueprints(&mut blueprint_results, &report.blueprint_results);
        }

        let summary = MissionSummary {
            id: self.id,
            name: self.config.name.clone(),
            states,
            faults,
            reports: latest,
            blueprint_results,
            elapsed: started.elapsed(),
        };
        info!(
            mission = %self.id,
            succeeded = summary.succeeded(),
            elapsed = ?summary.elapsed,
            "mission finished"
        );
        Ok(summary)
    }

    fn runner(
        &self,
        agent: &AgentConfig,
        tree: AgentTree,
        connection: Box<dyn WorldConnection>,
        reports: mpsc::UnboundedSender<AgentReport>,
        cancel: CancellationToken,
    ) -> AgentRunner {
        let runner = AgentRunner::new(
            agent.name.as_str(),
            tree,
            Arc::clone(&self.knowledge),
            self.blackboard.clone(),
            connection,
            reports,
            cancel,
        )
        .with_role(agent.role.as_str())
        .with_blueprints(agent.blueprints())
        .with_idle_timeout(self.config.idle_timeout());

        if self.config.trace {
            runner.with_trace_sink(Box::new(TracingSink::new(agent.name.as_str())))
        } else {
            runner
        }
    }

    /// Every agent is all-done, or any agent is any-done.
    fn finished(&self, latest: &BTreeMap<String, AgentReport>) -> bool {
        let states = || latest.values().map(|r| r.running_state);
        if states().any(RunningState::is_any_done) {
            return true;
        }
        latest.len() == self.config.agents.len() && states().all(RunningState::is_all_done)
    }
}

async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
