use voxel_core::Status;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-node state as seen by the runtime. `Invalid` means never ticked or halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeState {
    #[default]
    Invalid,
    Running,
    Success,
    Failure,
}

impl From<Status> for NodeState {
    fn from(value: Status) -> Self {
        match value {
            Status::Running => NodeState::Running,
            Status::Success => NodeState::Success,
            Status::Failure => NodeState::Failure,
        }
    }
}

impl NodeState {
    pub fn status(self) -> Option<Status> {
        match self {
            NodeState::Invalid => None,
            NodeState::Running => Some(Status::Running),
            NodeState::Success => Some(Status::Success),
            NodeState::Failure => Some(Status::Failure),
        }
    }

    fn mark(self) -> &'static str {
        match self {
            NodeState::Invalid => "[ ]",
            NodeState::Running => "[R]",
            NodeState::Success => "[S]",
            NodeState::Failure => "[F]",
        }
    }
}

impl core::fmt::Display for NodeState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.mark())
    }
}

/// Leaf behaviour ticked against a caller-defined context `C`.
pub trait Leaf<C: ?Sized> {
    fn tick(&mut self, ctx: &mut C) -> Status;

    /// Called when a node that returned `Running` stops being visited: it finished with
    /// `Success`/`Failure`, or the tree was halted (`Invalid`).
    fn on_exit(&mut self, _ctx: &mut C, _new_state: NodeState) {}
}
