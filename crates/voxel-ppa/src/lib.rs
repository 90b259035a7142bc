//! Goal back-chaining.
//!
//! The [`Resolver`] maps one [`Condition`](voxel_catalog::Condition) to the
//! precondition-process-action triple ([`Ppa`]) that achieves it. The [`BackChainer`]
//! expands goals through the resolver recursively and assembles the result into a reactive
//! [`voxel_bt::BehaviourTree`] of [`voxel_catalog::Behaviour`] leaves, once per agent at
//! mission start.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod compiler;
pub mod error;
pub mod goal;
pub mod resolver;

pub use compiler::{back_chain, claim_channel, AgentTree, BackChainer, CompilerConfig};
pub use error::CompilationError;
pub use goal::{Blueprint, Goal};
pub use resolver::{Ppa, Resolver, Step};
