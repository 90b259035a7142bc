//! Leaf vocabulary for voxel agents.
//!
//! [`Condition`]s are pure predicates over one [`voxel_core::Observation`]; [`Action`]s issue
//! actuation commands and infer their own progress from the next frame; [`Coordination`]
//! leaves read and write the shared [`voxel_core::Blackboard`]. All three are wrapped in
//! [`Behaviour`], the leaf type of every compiled agent tree.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod behaviour;
pub mod condition;
pub mod context;
pub mod coordination;
pub mod sense;
pub mod steering;

pub use action::Action;
pub use behaviour::Behaviour;
pub use condition::{Condition, ANIMAL_REACH, ENEMY_RANGE, PICKUP_RANGE, REACH};
pub use context::AgentContext;
pub use coordination::Coordination;
