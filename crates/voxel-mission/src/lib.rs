//! Mission runtime for voxel agents.
//!
//! A [`Mission`] compiles every agent's goals up front, then runs one [`AgentRunner`] task
//! per agent. Each runner pulls observation frames from its own [`WorldConnection`], ticks
//! its tree once per frame and streams [`AgentReport`]s back. The mission stops when every
//! agent is done or any agent ends the mission, and returns a [`MissionSummary`].

#![forbid(unsafe_code)]

pub mod config;
pub mod connection;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod runner;

pub use config::{AgentConfig, MissionConfig};
pub use connection::{Frame, WorldConnection};
pub use error::{MissionError, WorldConnectionFault};
pub use orchestrator::Mission;
pub use report::{AgentOutcome, AgentReport, MissionSummary, RunningState};
pub use runner::AgentRunner;
