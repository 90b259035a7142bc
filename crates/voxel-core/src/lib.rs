//! Observation, actuation, knowledge and blackboard primitives for voxel-world agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actuation;
pub mod blackboard;
pub mod geometry;
pub mod item;
pub mod knowledge;
pub mod observation;
pub mod status;

pub use actuation::{Actuator, Command, CommandLog};
pub use blackboard::{BbValue, Blackboard};
pub use geometry::{angle_delta, forward_step, BlockPos, Direction, Position, EYE_HEIGHT};
pub use item::{ItemId, PickaxeTier};
pub use knowledge::{KnowledgeBase, Recipe, StaticKnowledgeBase};
pub use observation::{
    BlockGrid, Entities, Entity, Inventory, InventorySlot, LineOfSight, Observation,
    HOTBAR_SLOTS,
};
pub use status::Status;
