#![allow(dead_code)]

use voxel_bt::{Leaf, NodeState};
use voxel_catalog::{AgentContext, Behaviour};
use voxel_core::{
    BlockGrid, BlockPos, Blackboard, CommandLog, Entity, Inventory, InventorySlot, ItemId,
    Observation, Position, StaticKnowledgeBase, Status,
};

pub const AGENT: &str = "alice";

/// One agent standing at block (0, 64, 0) on open ground, grid radius 10, facing south.
pub struct Frame {
    pub observation: Observation,
    pub knowledge: StaticKnowledgeBase,
    pub blackboard: Blackboard,
    pub commands: CommandLog,
}

impl Frame {
    pub fn new() -> Self {
        let here = BlockPos::new(0, 64, 0);
        let mut grid = BlockGrid::centered(here, 10, ItemId::AIR);
        for x in -10..=10 {
            for z in -10..=10 {
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

    pub fn blind() -> Self {
        Self {
            observation: Observation::default(),
            ..Self::new()
        }
    }

    pub fn holding(mut self, items: &[(ItemId, u32)]) -> Self {
        self.observation.inventory = Inventory::from_items(items.iter().cloned());
        self
    }

    pub fn slots(mut self, slots: Vec<Option<InventorySlot>>) -> Self {
        self.observation.inventory = Inventory::new(slots);
        self
    }

    pub fn block(&mut self, pos: BlockPos, block: ItemId) -> &mut Self {
        if let Some(grid) = self.observation.grid.as_mut() {
            grid.set(pos, block);
        }
        self
    }

    pub fn pickup(&mut self, item: ItemId, at: Position) -> &mut Self {
        self.observation.entities.pickups.push(Entity::new(item, at));
        self
    }

    pub fn animal(&mut self, specie: ItemId, at: Position) -> &mut Self {
        self.observation.entities.animals.push(Entity::new(specie, at));
        self
    }

    pub fn tick(&mut self, leaf: &mut Behaviour) -> Status {
        let mut ctx = AgentContext::new(
            AGENT,
            &self.observation,
            &self.knowledge,
            &self.blackboard,
            &mut self.commands,
        );
        leaf.tick(&mut ctx)
    }

    pub fn exit(&mut self, leaf: &mut Behaviour, state: NodeState) {
        let mut ctx = AgentContext::new(
            AGENT,
            &self.observation,
            &self.knowledge,
            &self.blackboard,
            &mut self.commands,
        );
        leaf.on_exit(&mut ctx, state);
    }
}
