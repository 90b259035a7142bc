//! Behaviour tree runtime for voxel agents.
//!
//! Trees live in an arena ([`BehaviourTree`]). Sequence and Selector are memory composites:
//! a child that returned `Running` is resumed directly on the next tick, without re-checking
//! the siblings before it. Leaves implement [`Leaf`] for whatever context the caller ticks
//! with.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod tree;

pub use bt::{Leaf, NodeState};
pub use tree::{BehaviourTree, Composite, Node, NodeId, NodeKind, NodeSnapshot, TreeSnapshot};
pub use voxel_core::Status;
