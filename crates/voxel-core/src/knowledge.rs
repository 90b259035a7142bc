//! Static game knowledge consulted while compiling and ticking trees.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ItemId, PickaxeTier};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recipe {
    /// Block or item that must be available to run the recipe (crafting table, furnace).
    #[cfg_attr(feature = "serde", serde(default))]
    pub station: Option<ItemId>,
    pub ingredients: Vec<(ItemId, u32)>,
    pub output_amount: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_melting: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variant: Option<String>,
}

impl Recipe {
    pub fn crafted(ingredients: Vec<(ItemId, u32)>, output_amount: u32) -> Self {
        Self {
            station: None,
            ingredients,
            output_amount,
            is_melting: false,
            variant: None,
        }
    }

    pub fn melted(ingredients: Vec<(ItemId, u32)>, output_amount: u32) -> Self {
        Self {
            station: Some(ItemId::FURNACE),
            ingredients,
            output_amount,
            is_melting: true,
            variant: None,
        }
    }

    pub fn at(mut self, station: ItemId) -> Self {
        self.station = Some(station);
        self
    }

    /// Number of recipe runs needed to end up with at least `amount` outputs.
    pub fn runs_for(&self, amount: u32) -> u32 {
        amount.div_ceil(self.output_amount.max(1))
    }
}

/// Read-only lookup tables.
pub trait KnowledgeBase: Send + Sync {
    fn recipe(&self, item: &ItemId) -> Option<&Recipe>;

    /// Tool required to harvest `material` (a block type).
    fn gathering_tool(&self, material: &ItemId) -> Option<ItemId>;

    /// Tool to hold while hunting `species`.
    fn hunting_tool(&self, species: &ItemId) -> Option<ItemId>;

    /// Animal species that drops `item`.
    fn loot_source(&self, item: &ItemId) -> Option<ItemId>;

    fn pickaxe_for_tier(&self, tier: PickaxeTier) -> ItemId;

    fn pickaxe_tier(&self, item: &ItemId) -> Option<PickaxeTier>;

    /// Block type that drops `item` when mined.
    fn block_source(&self, item: &ItemId) -> Option<ItemId>;

    /// Blocks that only generate below the surface.
    fn is_underground(&self, block: &ItemId) -> bool;
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaticKnowledgeBase {
    recipes: BTreeMap<ItemId, Recipe>,
    gathering_tools: BTreeMap<ItemId, ItemId>,
    hunting_tools: BTreeMap<ItemId, ItemId>,
    loot_sources: BTreeMap<ItemId, ItemId>,
    block_sources: BTreeMap<ItemId, ItemId>,
    pickaxes: BTreeMap<PickaxeTier, ItemId>,
    underground: Vec<ItemId>,
}

impl StaticKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The survival progression from logs to a diamond pickaxe, plus common building and food
    /// items.
    pub fn minecraft() -> Self {
        let table = ItemId::CRAFTING_TABLE;
        Self::new()
            .with_recipe(ItemId::PLANKS, Recipe::crafted(vec![(ItemId::LOG, 1)], 4))
            .with_recipe(ItemId::STICK, Recipe::crafted(vec![(ItemId::PLANKS, 2)], 4))
            .with_recipe(ItemId::CRAFTING_TABLE, Recipe::crafted(vec![(ItemId::PLANKS, 4)], 1))
            .with_recipe(
                ItemId::WOODEN_PICKAXE,
                Recipe::crafted(vec![(ItemId::PLANKS, 3), (ItemId::STICK, 2)], 1).at(table.clone()),
            )
            .with_recipe(
                ItemId::STONE_PICKAXE,
                Recipe::crafted(vec![(ItemId::COBBLESTONE, 3), (ItemId::STICK, 2)], 1)
                    .at(table.clone()),
            )
            .with_recipe(
                ItemId::IRON_PICKAXE,
                Recipe::crafted(vec![(ItemId::IRON_INGOT, 3), (ItemId::STICK, 2)], 1)
                    .at(table.clone()),
            )
            .with_recipe(
                ItemId::DIAMOND_PICKAXE,
                Recipe::crafted(vec![(ItemId::DIAMOND, 3), (ItemId::STICK, 2)], 1)
                    .at(table.clone()),
            )
            .with_recipe(
                ItemId::WOODEN_SWORD,
                Recipe::crafted(vec![(ItemId::PLANKS, 2), (ItemId::STICK, 1)], 1).at(table.clone()),
            )
            .with_recipe(
                ItemId::FURNACE,
                Recipe::crafted(vec![(ItemId::COBBLESTONE, 8)], 1).at(table.clone()),
            )
            .with_recipe(
                ItemId::FENCE,
                Recipe::crafted(vec![(ItemId::PLANKS, 4), (ItemId::STICK, 2)], 3).at(table),
            )
            .with_recipe(
                ItemId::TORCH,
                Recipe::crafted(vec![(ItemId::COAL, 1), (ItemId::STICK, 1)], 4),
            )
            .with_recipe(
                ItemId::IRON_INGOT,
                Recipe::melted(vec![(ItemId::IRON_ORE, 1), (ItemId::COAL, 1)], 1),
            )
            .with_recipe(
                ItemId::COOKED_BEEF,
                Recipe::melted(vec![(ItemId::BEEF, 1), (ItemId::COAL, 1)], 1),
            )
            .with_block_source(ItemId::LOG, ItemId::LOG)
            .with_block_source(ItemId::COBBLESTONE, ItemId::STONE)
            .with_block_source(ItemId::COAL, ItemId::COAL_ORE)
            .with_block_source(ItemId::IRON_ORE, ItemId::IRON_ORE)
            .with_block_source(ItemId::DIAMOND, ItemId::DIAMOND_ORE)
            .with_block_source(ItemId::DIRT, ItemId::DIRT)
            .with_gathering_tool(ItemId::STONE, ItemId::WOODEN_PICKAXE)
            .with_gathering_tool(ItemId::COAL_ORE, ItemId::WOODEN_PICKAXE)
            .with_gathering_tool(ItemId::IRON_ORE, ItemId::STONE_PICKAXE)
            .with_gathering_tool(ItemId::DIAMOND_ORE, ItemId::IRON_PICKAXE)
            .with_loot_source(ItemId::BEEF, ItemId::COW)
            .with_loot_source(ItemId::LEATHER, ItemId::COW)
            .with_loot_source(ItemId::PORKCHOP, ItemId::PIG)
            .with_loot_source(ItemId::WOOL, ItemId::SHEEP)
            .with_hunting_tool(ItemId::COW, ItemId::WOODEN_SWORD)
            .with_pickaxe(PickaxeTier::Wooden, ItemId::WOODEN_PICKAXE)
            .with_pickaxe(PickaxeTier::Stone, ItemId::STONE_PICKAXE)
            .with_pickaxe(PickaxeTier::Iron, ItemId::IRON_PICKAXE)
            .with_pickaxe(PickaxeTier::Diamond, ItemId::DIAMOND_PICKAXE)
            .with_underground(ItemId::IRON_ORE)
            .with_underground(ItemId::DIAMOND_ORE)
    }

    pub fn with_recipe(mut self, item: ItemId, recipe: Recipe) -> Self {
        self.recipes.insert(item, recipe);
        self
    }

    pub fn with_gathering_tool(mut self, material: ItemId, tool: ItemId) -> Self {
        self.gathering_tools.insert(material, tool);
        self
    }

    pub fn with_hunting_tool(mut self, species: ItemId, tool: ItemId) -> Self {
        self.hunting_tools.insert(species, tool);
        self
    }

    pub fn with_loot_source(mut self, item: ItemId, species: ItemId) -> Self {
        self.loot_sources.insert(item, species);
        self
    }

    pub fn with_block_source(mut self, item: ItemId, block: ItemId) -> Self {
        self.block_sources.insert(item, block);
        self
    }

    pub fn with_pickaxe(mut self, tier: PickaxeTier, item: ItemId) -> Self {
        self.pickaxes.insert(tier, item);
        self
    }

    pub fn with_underground(mut self, block: ItemId) -> Self {
        if !self.underground.contains(&block) {
            self.underground.push(block);
        }
        self
    }
}

impl KnowledgeBase for StaticKnowledgeBase {
    fn recipe(&self, item: &ItemId) -> Option<&Recipe> {
        self.recipes.get(item)
    }

    fn gathering_tool(&self, material: &ItemId) -> Option<ItemId> {
        self.gathering_tools.get(material).cloned()
    }

    fn hunting_tool(&self, species: &ItemId) -> Option<ItemId> {
        self.hunting_tools.get(species).cloned()
    }

    fn loot_source(&self, item: &ItemId) -> Option<ItemId> {
        self.loot_sources.get(item).cloned()
    }

    fn pickaxe_for_tier(&self, tier: PickaxeTier) -> ItemId {
        self.pickaxes
            .get(&tier)
            .cloned()
            .unwrap_or_else(|| ItemId::new(format!("{tier}_pickaxe")))
    }

    fn pickaxe_tier(&self, item: &ItemId) -> Option<PickaxeTier> {
        self.pickaxes
            .iter()
            .find(|(_, pickaxe)| *pickaxe == item)
            .map(|(tier, _)| *tier)
    }

    fn block_source(&self, item: &ItemId) -> Option<ItemId> {
        self.block_sources.get(item).cloned()
    }

    fn is_underground(&self, block: &ItemId) -> bool {
        self.underground.contains(block)
    }
}
