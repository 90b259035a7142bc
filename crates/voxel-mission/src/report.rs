use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;
use voxel_core::Position;

use crate::error::WorldConnectionFault;

/// Lifecycle state an agent reports to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunningState {
    Running,
    Success,
    Deceased,
    Timeout,
    Cancelled,
    Terminated,
}

impl RunningState {
    /// Finished on its own; the mission ends once every agent is in one of these.
    pub fn is_all_done(self) -> bool {
        matches!(
            self,
            RunningState::Success | RunningState::Deceased | RunningState::Timeout
        )
    }

    /// Ends the mission for everyone as soon as a single agent reaches it.
    pub fn is_any_done(self) -> bool {
        matches!(self, RunningState::Cancelled | RunningState::Terminated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunningState::Running => "RUNNING",
            RunningState::Success => "SUCCESS",
            RunningState::Deceased => "DECEASED",
            RunningState::Timeout => "TIMEOUT",
            RunningState::Cancelled => "CANCELLED",
            RunningState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for RunningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sent by a runner after every tick and once more when it stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReport {
    pub agent: String,
    pub role: String,
    pub tick: u64,
    pub running_state: RunningState,
    /// Time from runner start to root success
    pub completion_time: Option<Duration>,
    pub position: Option<Position>,
    /// One row per blueprint goal, one flag per position: is the block in place
    pub blueprint_results: Vec<Vec<bool>>,
}

/// What a runner task returns when it exits.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    pub agent: String,
    pub state: RunningState,
    pub fault: Option<WorldConnectionFault>,
    pub ticks: u64,
    pub restarts: u32,
}

#[derive(Debug, Clone)]
pub struct MissionSummary {
    pub id: Uuid,
    pub name: String,
    pub states: BTreeMap<String, RunningState>,
    pub faults: BTreeMap<String, WorldConnectionFault>,
    /// Last report received from each agent
    pub reports: BTreeMap<String, AgentReport>,
    /// Blueprint flags OR-ed across agents, row by row
    pub blueprint_results: Vec<Vec<bool>>,
    pub elapsed: Duration,
}

impl MissionSummary {
    pub fn succeeded(&self) -> bool {
        !self.states.is_empty() && self.states.values().all(|s| *s == RunningState::Success)
    }

    pub fn state(&self, agent: &str) -> Option<RunningState> {
        self.states.get(agent).copied()
    }

    pub fn blueprints_complete(&self) -> bool {
        self.blueprint_results.iter().flatten().all(|placed| *placed)
    }
}

/// OR `row` flags into `into`, growing it to fit.
pub(crate) fn merge_blueprints(into: &mut Vec<Vec<bool>>, from: &[Vec<bool>]) {
    if into.len() < from.len() {
        into.resize(from.len(), Vec::new());
    }
    for (acc, row) in into.iter_mut().zip(from) {
        if acc.len() < row.len() {
            acc.resize(row.len(), false);
        }
        for (a, b) in acc.iter_mut().zip(row) {
            *a |= *b;
        }
    }
}
