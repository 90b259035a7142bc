use std::time::Duration;

use voxel_ppa::CompilationError;

/// Fatal for one agent; the rest of the mission keeps running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldConnectionFault {
    #[error("no observation received for {0:?}")]
    IdleTimeout(Duration),
    #[error("world reported an error: {0}")]
    World(String),
    #[error("agent died")]
    Died,
}

#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("mission has no agents")]
    NoAgents,
    #[error("agent name {0:?} is used more than once")]
    DuplicateAgent(String),
    #[error("expected {expected} world connections, got {got}")]
    ConnectionCount { expected: usize, got: usize },
    #[error("failed to compile goals for {agent}")]
    Compilation {
        agent: String,
        #[source]
        source: CompilationError,
    },
}
