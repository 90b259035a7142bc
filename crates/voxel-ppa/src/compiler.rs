//! Recursive PPA expansion into a behaviour tree.
//!
//! Every resolved condition becomes
//!
//! ```text
//! Selector(post_condition, Sequence(pre_conditions..., actions...))
//! ```
//!
//! so a condition that already holds short-circuits its whole subtree. In collaborative mode
//! team-scoped conditions are additionally guarded by a claim channel:
//!
//! ```text
//! Selector(
//!     Sequence(post_condition, StopSender(channel)),
//!     InverseReceiver(channel, excluded = [false, me]),
//!     Sequence(Sender(channel, me), pre_conditions..., actions...),
//! )
//! ```
//!
//! The agent that wins the claim performs every sub-step itself; the others skip the work
//! while the claim stands.

use voxel_bt::{BehaviourTree, NodeId};
use voxel_catalog::{Action, Behaviour, Condition, Coordination};
use voxel_core::{BbValue, KnowledgeBase};

use crate::{Blueprint, CompilationError, Goal, Ppa, Resolver, Step};

pub type AgentTree = BehaviourTree<Behaviour>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub collaborative: bool,
    /// Value written to claim channels.
    pub agent: String,
    /// Max nesting of condition expansions (loop protection).
    pub max_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            collaborative: false,
            agent: String::from("agent"),
            max_depth: 64,
        }
    }
}

impl CompilerConfig {
    pub fn for_agent(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            ..Self::default()
        }
    }

    pub fn collaborative(mut self, collaborative: bool) -> Self {
        self.collaborative = collaborative;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Blackboard channel that arbitrates a team-scoped condition.
pub fn claim_channel(condition: &Condition) -> Option<String> {
    match condition {
        Condition::HasItemShared { item, .. } => Some(item.to_string()),
        Condition::IsBlockAtPosition { position, .. } => {
            Some(format!("place/{},{},{}", position.x, position.y, position.z))
        }
        _ => None,
    }
}

pub struct BackChainer<'k> {
    resolver: Resolver<'k>,
    config: CompilerConfig,
}

impl<'k> BackChainer<'k> {
    pub fn new(knowledge: &'k dyn KnowledgeBase, config: CompilerConfig) -> Self {
        Self {
            resolver: Resolver::new(knowledge),
            config,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `goals` into `Sequence(JumpIfStuck, goal_1, goal_2, ...)`.
    pub fn back_chain(&self, goals: &[Goal]) -> Result<AgentTree, CompilationError> {
        let mut tree = AgentTree::new();
        let mut children = Vec::with_capacity(goals.len() + 1);
        children.push(tree.leaf(Action::JumpIfStuck.into()));
        for goal in goals {
            children.push(self.goal(&mut tree, goal)?);
        }
        let root = tree.sequence(children);
        tree.set_root(root);

        tracing::debug!(
            agent = %self.config.agent,
            goals = goals.len(),
            nodes = tree.len(),
            "compiled behaviour tree"
        );
        Ok(tree)
    }

    fn goal(&self, tree: &mut AgentTree, goal: &Goal) -> Result<NodeId, CompilationError> {
        match goal {
            Goal::Action(action) => {
                if action.times() == Some(0) {
                    return Err(CompilationError::MalformedGoal(format!(
                        "{action} runs zero times"
                    )));
                }
                Ok(tree.leaf(action.clone().into()))
            }
            Goal::Condition(condition) => self.expand(tree, condition, &mut Vec::new()),
            Goal::Blueprint(blueprint) => self.blueprint(tree, blueprint),
        }
    }

    fn blueprint(
        &self,
        tree: &mut AgentTree,
        blueprint: &Blueprint,
    ) -> Result<NodeId, CompilationError> {
        if blueprint.positions.is_empty() {
            return Err(CompilationError::MalformedGoal(format!(
                "blueprint for {} has no positions",
                blueprint.block
            )));
        }
        let mut children = Vec::with_capacity(blueprint.positions.len());
        for condition in blueprint.conditions() {
            children.push(self.expand(tree, &condition, &mut Vec::new())?);
        }
        Ok(tree.sequence(children))
    }

    /// `expanding` holds the conditions currently being expanded on this path; revisits are
    /// detected without regard to amounts.
    fn expand(
        &self,
        tree: &mut AgentTree,
        condition: &Condition,
        expanding: &mut Vec<Condition>,
    ) -> Result<NodeId, CompilationError> {
        let key = condition.without_amount();
        if expanding.iter().any(|c| c.without_amount() == key) {
            return Err(CompilationError::Cycle {
                condition: condition.clone(),
                path: expanding.clone(),
            });
        }
        if expanding.len() >= self.config.max_depth {
            return Err(CompilationError::DepthExceeded {
                condition: condition.clone(),
                limit: self.config.max_depth,
            });
        }

        let Some(ppa) = self.resolver.resolve(condition) else {
            return Ok(tree.leaf(condition.clone().into()));
        };
        tracing::trace!(ppa = %ppa.name, depth = expanding.len(), "expanding");

        expanding.push(condition.clone());
        let mut body = Vec::with_capacity(ppa.pre_conditions.len() + ppa.actions.len());
        for step in &ppa.pre_conditions {
            let child = match step {
                Step::Condition(pre) => self.expand(tree, pre, expanding)?,
                Step::Action(action) => tree.leaf(action.clone().into()),
            };
            body.push(child);
        }
        expanding.pop();

        Ok(self.assemble(tree, ppa, body))
    }

    fn assemble(&self, tree: &mut AgentTree, ppa: Ppa, mut body: Vec<NodeId>) -> NodeId {
        for action in ppa.actions {
            body.push(tree.leaf(action.into()));
        }

        let channel = self
            .config
            .collaborative
            .then(|| claim_channel(&ppa.post_condition))
            .flatten();
        let post = tree.leaf(ppa.post_condition.into());

        let Some(channel) = channel else {
            let work = tree.sequence(body);
            return tree.selector(vec![post, work]);
        };

        let me = BbValue::text(self.config.agent.as_str());
        let release = tree.leaf(
            Coordination::StopSender {
                channel: channel.clone(),
            }
            .into(),
        );
        let done = tree.sequence(vec![post, release]);
        let claimed_elsewhere = tree.leaf(
            Coordination::InverseReceiver {
                channel: channel.clone(),
                excluded: vec![BbValue::FALSE, me.clone()],
            }
            .into(),
        );
        let claim = tree.leaf(Coordination::Sender { channel, value: me }.into());
        body.insert(0, claim);
        let work = tree.sequence(body);
        tree.selector(vec![done, claimed_elsewhere, work])
    }
}

/// Compile one agent's goals with `config`.
pub fn back_chain(
    knowledge: &dyn KnowledgeBase,
    goals: &[Goal],
    config: CompilerConfig,
) -> Result<AgentTree, CompilationError> {
    BackChainer::new(knowledge, config).back_chain(goals)
}
