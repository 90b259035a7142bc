use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use voxel_catalog::{Action, Condition};
use voxel_core::{BlockPos, ItemId};

/// Structure to build: `block` at every one of `positions`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blueprint {
    pub block: ItemId,
    pub positions: Vec<BlockPos>,
}

impl Blueprint {
    pub fn new(block: impl Into<ItemId>, positions: Vec<BlockPos>) -> Self {
        Self {
            block: block.into(),
            positions,
        }
    }

    /// One `IsBlockAtPosition` per position, in blueprint order.
    pub fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        self.positions
            .iter()
            .map(|pos| Condition::is_block_at(self.block.clone(), *pos))
    }
}

/// Declarative objective handed to the compiler at mission start.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Goal {
    Condition(Condition),
    /// Executed as-is, without a guarding post-condition.
    Action(Action),
    Blueprint(Blueprint),
}

impl Goal {
    pub fn as_blueprint(&self) -> Option<&Blueprint> {
        match self {
            Goal::Blueprint(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Condition> for Goal {
    fn from(value: Condition) -> Self {
        Goal::Condition(value)
    }
}

impl From<Action> for Goal {
    fn from(value: Action) -> Self {
        Goal::Action(value)
    }
}

impl From<Blueprint> for Goal {
    fn from(value: Blueprint) -> Self {
        Goal::Blueprint(value)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Condition(c) => c.fmt(f),
            Goal::Action(a) => a.fmt(f),
            Goal::Blueprint(b) => write!(f, "Blueprint({} x{})", b.block, b.positions.len()),
        }
    }
}
