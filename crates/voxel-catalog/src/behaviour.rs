use std::fmt;

use voxel_bt::{Leaf, NodeState};
use voxel_core::Status;

use crate::{Action, AgentContext, Condition, Coordination};

/// Leaf type of every compiled agent tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Behaviour {
    Condition(Condition),
    Action(Action),
    Coordination(Coordination),
}

impl Behaviour {
    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Behaviour::Condition(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Behaviour::Action(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_coordination(&self) -> Option<&Coordination> {
        match self {
            Behaviour::Coordination(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Condition> for Behaviour {
    fn from(value: Condition) -> Self {
        Behaviour::Condition(value)
    }
}

impl From<Action> for Behaviour {
    fn from(value: Action) -> Self {
        Behaviour::Action(value)
    }
}

impl From<Coordination> for Behaviour {
    fn from(value: Coordination) -> Self {
        Behaviour::Coordination(value)
    }
}

impl<'a> Leaf<AgentContext<'a>> for Behaviour {
    fn tick(&mut self, ctx: &mut AgentContext<'a>) -> Status {
        match self {
            Behaviour::Condition(c) => c.evaluate(ctx.observation, ctx.knowledge).into(),
            Behaviour::Action(a) => a.tick(ctx),
            Behaviour::Coordination(c) => c.tick(ctx.agent, ctx.blackboard),
        }
    }

    fn on_exit(&mut self, ctx: &mut AgentContext<'a>, new_state: NodeState) {
        if let Behaviour::Action(a) = self {
            a.on_exit(ctx, new_state);
        }
    }
}

impl fmt::Display for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Behaviour::Condition(c) => c.fmt(f),
            Behaviour::Action(a) => a.fmt(f),
            Behaviour::Coordination(c) => c.fmt(f),
        }
    }
}
