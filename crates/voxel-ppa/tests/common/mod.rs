#![allow(dead_code)]

use voxel_bt::{BehaviourTree, NodeId, NodeKind};
use voxel_catalog::{AgentContext, Behaviour};
use voxel_core::{
    BlockGrid, BlockPos, Blackboard, CommandLog, ItemId, Observation, Position,
    StaticKnowledgeBase, Status,
};
use voxel_trace::TraceSink;

/// An agent on flat dirt at block (0, 64, 0) with nothing in its inventory.
pub struct World {
    pub observation: Observation,
    pub knowledge: StaticKnowledgeBase,
    pub blackboard: Blackboard,
    pub commands: CommandLog,
}

impl World {
    pub fn new() -> Self {
        let mut grid = BlockGrid::centered(BlockPos::new(0, 64, 0), 8, ItemId::AIR);
        for x in -8..=8 {
            for z in -8..=8 {
                grid.set(BlockPos::new(x, 63, z), ItemId::DIRT);
            }
        }
        Self {
            observation: Observation {
                position: Some(Position::new(0.5, 64.0, 0.5)),
                grid: Some(grid),
                life: Some(20.0),
                ..Observation::default()
            },
            knowledge: StaticKnowledgeBase::minecraft(),
            blackboard: Blackboard::new(),
            commands: CommandLog::new(),
        }
    }

    pub fn with_blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = blackboard;
        self
    }

    pub fn tick(&mut self, agent: &str, tree: &mut BehaviourTree<Behaviour>) -> Status {
        let mut ctx = AgentContext::new(
            agent,
            &self.observation,
            &self.knowledge,
            &self.blackboard,
            &mut self.commands,
        );
        tree.tick(&mut ctx)
    }

    pub fn tick_traced(
        &mut self,
        agent: &str,
        tree: &mut BehaviourTree<Behaviour>,
        sink: &mut dyn TraceSink,
    ) -> Status {
        let mut ctx = AgentContext::new(
            agent,
            &self.observation,
            &self.knowledge,
            &self.blackboard,
            &mut self.commands,
        );
        tree.tick_traced(&mut ctx, 0, sink)
    }
}

pub fn label(tree: &BehaviourTree<Behaviour>, id: NodeId) -> String {
    match tree.node(id).kind() {
        NodeKind::Sequence(_) => String::from("Sequence"),
        NodeKind::Selector(_) => String::from("Selector"),
        NodeKind::Leaf(leaf) => leaf.to_string(),
    }
}

pub fn child_labels(tree: &BehaviourTree<Behaviour>, id: NodeId) -> Vec<String> {
    tree.children(id).iter().map(|c| label(tree, *c)).collect()
}
