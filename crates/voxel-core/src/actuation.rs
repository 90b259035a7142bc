use crate::ItemId;

/// Discrete low-level command understood by the world connection.
///
/// Continuous commands take an intensity in `[-1, 1]`; issuing a command never waits for the
/// world to apply it.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(f32),
    Turn(f32),
    Pitch(f32),
    Jump(bool),
    Attack(bool),
    Craft { item: ItemId, variant: Option<String> },
    SwapItems(usize, usize),
    SelectHotbar(usize),
    PlaceBlock,
}

pub trait Actuator: Send {
    fn issue(&mut self, command: Command);

    fn move_forward(&mut self, intensity: f32) {
        self.issue(Command::Move(intensity.clamp(-1.0, 1.0)));
    }

    fn turn(&mut self, intensity: f32) {
        self.issue(Command::Turn(intensity.clamp(-1.0, 1.0)));
    }

    fn pitch(&mut self, intensity: f32) {
        self.issue(Command::Pitch(intensity.clamp(-1.0, 1.0)));
    }

    fn jump(&mut self, on: bool) {
        self.issue(Command::Jump(on));
    }

    fn attack(&mut self, on: bool) {
        self.issue(Command::Attack(on));
    }

    fn craft(&mut self, item: &ItemId, variant: Option<&str>) {
        self.issue(Command::Craft {
            item: item.clone(),
            variant: variant.map(str::to_owned),
        });
    }

    fn swap_items(&mut self, a: usize, b: usize) {
        self.issue(Command::SwapItems(a, b));
    }

    fn select_hotbar(&mut self, slot: usize) {
        self.issue(Command::SelectHotbar(slot));
    }

    fn place_block(&mut self) {
        self.issue(Command::PlaceBlock);
    }

    /// Return every continuous control to neutral.
    fn stop(&mut self) {
        self.issue(Command::Move(0.0));
        self.issue(Command::Turn(0.0));
        self.issue(Command::Pitch(0.0));
        self.issue(Command::Jump(false));
        self.issue(Command::Attack(false));
    }
}

/// Actuator that records commands instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct CommandLog {
    pub commands: Vec<Command>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn contains(&self, command: &Command) -> bool {
        self.commands.contains(command)
    }
}

impl Actuator for CommandLog {
    fn issue(&mut self, command: Command) {
        self.commands.push(command);
    }
}
