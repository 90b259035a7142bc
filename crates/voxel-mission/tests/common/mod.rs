#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use voxel_core::{Actuator, BlockGrid, BlockPos, Command, ItemId, Observation, Position};
use voxel_mission::{Frame, WorldConnection};

/// Gap between scripted frames; keeps runner loops yielding under paused time.
pub const FRAME_GAP: Duration = Duration::from_millis(50);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("voxel_mission=debug")
        .with_test_writer()
        .try_init();
}

/// An agent on flat dirt at block (0, 64, 0) with nothing in its inventory.
pub fn standing() -> Observation {
    let mut grid = BlockGrid::centered(BlockPos::new(0, 64, 0), 8, ItemId::AIR);
    for x in -8..=8 {
        for z in -8..=8 {
            grid.set(BlockPos::new(x, 63, z), ItemId::DIRT);
        }
    }
    Observation {
        position: Some(Position::new(0.5, 64.0, 0.5)),
        grid: Some(grid),
        life: Some(20.0),
        ..Observation::default()
    }
}

pub fn with_blocks(mut observation: Observation, block: ItemId, at: &[BlockPos]) -> Observation {
    if let Some(grid) = observation.grid.as_mut() {
        for pos in at {
            grid.set(*pos, block.clone());
        }
    }
    observation
}

enum Step {
    Once(Frame),
    Forever(Observation),
}

/// Handles kept by the test after the connection moves into a runner.
#[derive(Debug, Clone, Default)]
pub struct Wiretap {
    pub commands: Arc<Mutex<Vec<Command>>>,
    pub restarts: Arc<AtomicU32>,
}

impl Wiretap {
    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn restarts(&self) -> u32 {
        self.restarts.load(Ordering::SeqCst)
    }
}

struct SharedActuator(Arc<Mutex<Vec<Command>>>);

impl Actuator for SharedActuator {
    fn issue(&mut self, command: Command) {
        self.0.lock().unwrap().push(command);
    }
}

/// Plays back frames in order, one every `FRAME_GAP`. Once the script runs out the
/// connection goes silent.
pub struct ScriptedConnection {
    steps: VecDeque<Step>,
    actuator: SharedActuator,
    tap: Wiretap,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        let tap = Wiretap::default();
        Self {
            steps: VecDeque::new(),
            actuator: SharedActuator(Arc::clone(&tap.commands)),
            tap,
        }
    }

    pub fn then(mut self, frame: Frame) -> Self {
        self.steps.push_back(Step::Once(frame));
        self
    }

    pub fn observe(self, observation: Observation) -> Self {
        self.then(Frame::Observation(observation))
    }

    /// Deliver `observation` on every frame from here on.
    pub fn forever(mut self, observation: Observation) -> Self {
        self.steps.push_back(Step::Forever(observation));
        self
    }

    pub fn tap(&self) -> Wiretap {
        self.tap.clone()
    }

    pub fn boxed(self) -> (Box<dyn WorldConnection>, Wiretap) {
        let tap = self.tap();
        (Box::new(self), tap)
    }
}

#[async_trait]
impl WorldConnection for ScriptedConnection {
    async fn next_frame(&mut self) -> Frame {
        tokio::time::sleep(FRAME_GAP).await;
        match self.steps.front() {
            None => std::future::pending().await,
            Some(Step::Forever(observation)) => Frame::Observation(observation.clone()),
            Some(Step::Once(_)) => match self.steps.pop_front() {
                Some(Step::Once(frame)) => frame,
                _ => unreachable!(),
            },
        }
    }

    fn actuator(&mut self) -> &mut dyn Actuator {
        &mut self.actuator
    }

    async fn restart(&mut self) -> anyhow::Result<()> {
        self.tap.restarts.fetch_add(1, Ordering::SeqCst);
        self.steps.clear();
        Ok(())
    }
}

/// The last Move, Turn, Pitch, Jump and Attack commands all released their control.
pub fn controls_released(commands: &[Command]) -> bool {
    let last = |pick: fn(&Command) -> bool| commands.iter().rev().find(|c| pick(c)).cloned();
    last(|c| matches!(c, Command::Move(_))) == Some(Command::Move(0.0))
        && last(|c| matches!(c, Command::Turn(_))) == Some(Command::Turn(0.0))
        && last(|c| matches!(c, Command::Pitch(_))) == Some(Command::Pitch(0.0))
        && last(|c| matches!(c, Command::Jump(_))) == Some(Command::Jump(false))
        && last(|c| matches!(c, Command::Attack(_))) == Some(Command::Attack(false))
}
