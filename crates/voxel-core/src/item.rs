use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of an item, block type, or entity species (`"iron_pickaxe"`, `"stone"`, `"cow"`).
///
/// Block types and the items they drop share one namespace, the same way the game does.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ItemId(Cow<'static, str>);

macro_rules! item_consts {
    ($($name:ident = $id:literal),* $(,)?) => {
        impl ItemId {
            $(pub const $name: ItemId = ItemId(Cow::Borrowed($id));)*
        }
    };
}

item_consts! {
    AIR = "air",
    WATER = "water",
    LOG = "log",
    PLANKS = "planks",
    STICK = "stick",
    CRAFTING_TABLE = "crafting_table",
    FURNACE = "furnace",
    STONE = "stone",
    COBBLESTONE = "cobblestone",
    DIRT = "dirt",
    GRASS = "grass",
    TALLGRASS = "tallgrass",
    COAL = "coal",
    COAL_ORE = "coal_ore",
    IRON_ORE = "iron_ore",
    IRON_INGOT = "iron_ingot",
    DIAMOND = "diamond",
    DIAMOND_ORE = "diamond_ore",
    WOODEN_PICKAXE = "wooden_pickaxe",
    STONE_PICKAXE = "stone_pickaxe",
    IRON_PICKAXE = "iron_pickaxe",
    DIAMOND_PICKAXE = "diamond_pickaxe",
    WOODEN_SWORD = "wooden_sword",
    FENCE = "fence",
    TORCH = "torch",
    BEEF = "beef",
    COOKED_BEEF = "cooked_beef",
    LEATHER = "leather",
    PORKCHOP = "porkchop",
    WOOL = "wool",
    COW = "cow",
    PIG = "pig",
    SHEEP = "sheep",
}

impl ItemId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blocks an agent can walk through.
    pub fn is_passable(&self) -> bool {
        matches!(
            self.as_str(),
            "air" | "water" | "tallgrass" | "double_plant" | "red_flower" | "yellow_flower" | "snow_layer" | "torch"
        )
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ItemId {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Pickaxe material tier; each tier can mine everything the previous one can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum PickaxeTier {
    Wooden,
    Stone,
    Iron,
    Diamond,
}

impl PickaxeTier {
    pub const ALL: [PickaxeTier; 4] = [
        PickaxeTier::Wooden,
        PickaxeTier::Stone,
        PickaxeTier::Iron,
        PickaxeTier::Diamond,
    ];
}

impl fmt::Display for PickaxeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PickaxeTier::Wooden => "wooden",
            PickaxeTier::Stone => "stone",
            PickaxeTier::Iron => "iron",
            PickaxeTier::Diamond => "diamond",
        };
        f.write_str(s)
    }
}
