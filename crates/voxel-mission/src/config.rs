//! Mission configuration, loaded from `.voxel/mission.yaml`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use voxel_ppa::{Blueprint, CompilerConfig, Goal};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub name: String,

    /// Longest wait for an observation frame before the connection counts as dead
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: f64,

    /// Whole-mission limit; agents still running when it expires time out
    pub time_limit_secs: Option<f64>,

    /// Guard team-scoped goals with blackboard claims
    pub collaborative: bool,

    /// Compiler expansion depth limit
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Forward per-node tree traces to `tracing` (target `voxel::bt`)
    pub trace: bool,

    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

fn default_name() -> String {
    "mission".to_string()
}
fn default_idle_timeout_secs() -> f64 {
    10.0
}
fn default_max_depth() -> usize {
    64
}

/// Negative and NaN read as zero; values past the `Duration` range read as `Duration::MAX`.
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            idle_timeout_secs: default_idle_timeout_secs(),
            time_limit_secs: None,
            collaborative: false,
            max_depth: default_max_depth(),
            trace: false,
            agents: Vec::new(),
        }
    }
}

impl MissionConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mission from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse mission from {}", path.display()))?;
        Ok(config)
    }

    /// Load from a project root (looks for .voxel/mission.yaml)
    pub fn load_from_dir(root: &Path) -> Result<Self> {
        let path = root.join(".voxel/mission.yaml");
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        seconds(self.idle_timeout_secs)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(seconds)
    }

    pub fn compiler_config(&self, agent: &AgentConfig) -> CompilerConfig {
        CompilerConfig::for_agent(agent.name.as_str())
            .collaborative(self.collaborative)
            .with_max_depth(self.max_depth)
    }
}

impl AgentConfig {
    pub fn new(name: impl Into<String>, goals: Vec<Goal>) -> Self {
        Self {
            name: name.into(),
            role: String::new(),
            goals,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Blueprint goals in declaration order; report rows follow this order.
    pub fn blueprints(&self) -> Vec<Blueprint> {
        self.goals
            .iter()
            .filter_map(Goal::as_blueprint)
            .cloned()
            .collect()
    }
}
