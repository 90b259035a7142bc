use async_trait::async_trait;
use voxel_core::{Actuator, Observation};

/// What the world delivered for one frame.
#[derive(Debug, Clone)]
pub enum Frame {
    Observation(Observation),
    /// The world closed the mission for everyone.
    MissionEnded,
    Error(String),
}

/// One agent's link to the world: observations in, commands out.
#[async_trait]
pub trait WorldConnection: Send {
    /// Wait for the next frame. May never resolve; the runner applies the idle timeout.
    async fn next_frame(&mut self) -> Frame;

    /// Command sink for the current frame. Commands are fire-and-forget.
    fn actuator(&mut self) -> &mut dyn Actuator;

    /// Tear the connection down and reconnect.
    async fn restart(&mut self) -> anyhow::Result<()>;
}
