//! Immutable per-frame sensor snapshot.
//!
//! Every optional field is `None` when the observation service did not deliver it for this
//! frame. Consumers must treat that as "cannot evaluate" and never panic on it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BlockPos, ItemId, Position};

/// Number of inventory slots reachable through the hotbar.
pub const HOTBAR_SLOTS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InventorySlot {
    pub item: ItemId,
    pub amount: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variant: Option<String>,
}

impl InventorySlot {
    pub fn new(item: impl Into<ItemId>, amount: u32) -> Self {
        Self {
            item: item.into(),
            amount,
            variant: None,
        }
    }
}

/// Ordered inventory slots; slot `0..HOTBAR_SLOTS` is the hotbar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inventory {
    slots: Vec<Option<InventorySlot>>,
}

impl Inventory {
    pub fn new(slots: Vec<Option<InventorySlot>>) -> Self {
        Self { slots }
    }

    /// Inventory with the given stacks packed into consecutive slots from 0.
    pub fn from_items(items: impl IntoIterator<Item = (ItemId, u32)>) -> Self {
        Self {
            slots: items
                .into_iter()
                .map(|(item, amount)| Some(InventorySlot::new(item, amount)))
                .collect(),
        }
    }

    pub fn slots(&self) -> &[Option<InventorySlot>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn count(&self, item: &ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| &s.item == item)
            .map(|s| s.amount)
            .sum()
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.find(item).is_some()
    }

    /// First slot holding `item`.
    pub fn find(&self, item: &ItemId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| &s.item == item && s.amount > 0))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &InventorySlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }
}

/// Axis-aligned box of block types around the agent.
///
/// `origin` is the world position of the minimum corner. Storage order is x fastest, then z,
/// then y, the order the game streams grid observations in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockGrid {
    origin: BlockPos,
    size: [usize; 3],
    blocks: Vec<ItemId>,
}

impl BlockGrid {
    /// Returns `None` when `blocks` does not match `size`.
    pub fn new(origin: BlockPos, size: [usize; 3], blocks: Vec<ItemId>) -> Option<Self> {
        (blocks.len() == size[0] * size[1] * size[2]).then_some(Self {
            origin,
            size,
            blocks,
        })
    }

    /// A grid extending `radius` blocks on every axis around `center`, filled with `fill`.
    pub fn centered(center: BlockPos, radius: usize, fill: ItemId) -> Self {
        let r = radius as i32;
        let side = radius * 2 + 1;
        Self {
            origin: center.offset(-r, -r, -r),
            size: [side, side, side],
            blocks: vec![fill; side * side * side],
        }
    }

    pub fn origin(&self) -> BlockPos {
        self.origin
    }

    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        let dx = usize::try_from(pos.x.checked_sub(self.origin.x)?).ok()?;
        let dy = usize::try_from(pos.y.checked_sub(self.origin.y)?).ok()?;
        let dz = usize::try_from(pos.z.checked_sub(self.origin.z)?).ok()?;
        let [sx, sy, sz] = self.size;
        if dx >= sx || dy >= sy || dz >= sz {
            return None;
        }
        Some((dy * sz + dz) * sx + dx)
    }

    pub fn get(&self, pos: BlockPos) -> Option<&ItemId> {
        self.index(pos).map(|i| &self.blocks[i])
    }

    /// Returns `false` when `pos` lies outside the grid.
    pub fn set(&mut self, pos: BlockPos, block: ItemId) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &ItemId)> {
        let [sx, _, sz] = self.size;
        self.blocks.iter().enumerate().map(move |(i, block)| {
            let dx = i % sx;
            let dz = (i / sx) % sz;
            let dy = i / (sx * sz);
            (
                self.origin.offset(dx as i32, dy as i32, dz as i32),
                block,
            )
        })
    }

    pub fn contains_block(&self, block: &ItemId) -> bool {
        self.blocks.iter().any(|b| b == block)
    }

    /// Closest block of type `block` to `from` (measured to block centres).
    pub fn nearest(&self, from: Position, block: &ItemId) -> Option<(BlockPos, f64)> {
        self.iter()
            .filter(|(_, b)| *b == block)
            .map(|(pos, _)| (pos, from.distance(pos.center())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    pub kind: ItemId,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: u32,
}

#[cfg(feature = "serde")]
fn default_quantity() -> u32 {
    1
}

impl Entity {
    pub fn new(kind: impl Into<ItemId>, position: Position) -> Self {
        Self {
            kind: kind.into(),
            position,
            quantity: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entities {
    pub pickups: Vec<Entity>,
    pub animals: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub agents: Vec<Entity>,
}

/// What the agent's crosshair currently points at.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineOfSight {
    /// Block type or entity kind that was hit.
    pub kind: ItemId,
    pub position: Position,
    pub in_range: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    pub position: Option<Position>,
    pub yaw: f64,
    pub pitch: f64,
    pub inventory: Inventory,
    /// Hotbar slot currently held in hand.
    pub selected_slot: usize,
    pub grid: Option<BlockGrid>,
    pub entities: Entities,
    pub line_of_sight: Option<LineOfSight>,
    pub life: Option<f32>,
    /// Stock pooled by the whole team, when the mission shares inventories.
    pub team_inventory: Option<Inventory>,
}

impl Observation {
    pub fn equipped(&self) -> Option<&InventorySlot> {
        self.inventory.slot(self.selected_slot)
    }

    pub fn is_dead(&self) -> bool {
        self.life.is_some_and(|life| life <= 0.0)
    }

    /// Block at `pos`, if both the grid and that cell are known.
    pub fn block_at(&self, pos: BlockPos) -> Option<&ItemId> {
        self.grid.as_ref()?.get(pos)
    }
}
