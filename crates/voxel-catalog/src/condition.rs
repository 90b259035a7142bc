//! World predicates evaluated against one observation frame.
//!
//! Evaluation is pure: no actuation, no blackboard access, and a condition whose inputs are
//! missing from the frame evaluates to `false`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use voxel_core::{BlockPos, ItemId, KnowledgeBase, Observation, PickaxeTier};

use crate::sense;

/// How far from the eye a block can be mined or placed.
pub const REACH: f64 = 4.5;
/// How far away a dropped item still counts as nearby.
pub const PICKUP_RANGE: f64 = 10.0;
/// Melee distance to an animal or enemy.
pub const ANIMAL_REACH: f64 = 3.0;
/// Enemies closer than this are a threat.
pub const ENEMY_RANGE: f64 = 8.0;

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Condition {
    HasItem {
        item: ItemId,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        amount: u32,
    },
    HasItemEquipped {
        item: ItemId,
    },
    HasPickupNearby {
        item: ItemId,
    },
    IsBlockWithinReach {
        block: ItemId,
    },
    IsBlockObservable {
        block: ItemId,
    },
    IsAnimalWithinReach {
        specie: ItemId,
    },
    IsAnimalObservable {
        specie: ItemId,
    },
    IsPositionWithinReach {
        position: BlockPos,
    },
    IsBlockAtPosition {
        block: ItemId,
        position: BlockPos,
    },
    HasPickaxeByMinimumTier {
        tier: PickaxeTier,
    },
    HasBestPickaxeByMinimumTierEquipped {
        tier: PickaxeTier,
    },
    HasNoEnemyNearby,
    /// Counted against the team inventory when the mission shares one.
    HasItemShared {
        item: ItemId,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        amount: u32,
    },
}

impl Condition {
    pub fn has_item(item: impl Into<ItemId>, amount: u32) -> Self {
        Condition::HasItem {
            item: item.into(),
            amount,
        }
    }

    pub fn has_item_equipped(item: impl Into<ItemId>) -> Self {
        Condition::HasItemEquipped { item: item.into() }
    }

    pub fn is_block_at(block: impl Into<ItemId>, position: BlockPos) -> Self {
        Condition::IsBlockAtPosition {
            block: block.into(),
            position,
        }
    }

    pub fn has_item_shared(item: impl Into<ItemId>, amount: u32) -> Self {
        Condition::HasItemShared {
            item: item.into(),
            amount,
        }
    }

    pub fn evaluate(&self, obs: &Observation, kb: &dyn KnowledgeBase) -> bool {
        match self {
            Condition::HasItem { item, amount } => {
                *amount == 0 || obs.inventory.count(item) >= *amount
            }
            Condition::HasItemEquipped { item } => sense::is_equipped(obs, item),
            Condition::HasPickupNearby { item } => {
                sense::nearest_entity(&obs.entities.pickups, obs, item)
                    .is_some_and(|(_, d)| d <= PICKUP_RANGE)
            }
            Condition::IsBlockWithinReach { block } => {
                sense::nearest_block(obs, block).is_some_and(|(_, d)| d <= REACH)
            }
            Condition::IsBlockObservable { block } => sense::sees_block(obs, block),
            Condition::IsAnimalWithinReach { specie } => {
                sense::nearest_entity(&obs.entities.animals, obs, specie)
                    .is_some_and(|(_, d)| d <= ANIMAL_REACH)
            }
            Condition::IsAnimalObservable { specie } => {
                obs.entities.animals.iter().any(|a| &a.kind == specie)
            }
            Condition::IsPositionWithinReach { position } => obs
                .position
                .is_some_and(|p| p.eye().distance(position.center()) <= REACH),
            Condition::IsBlockAtPosition { block, position } => {
                obs.block_at(*position) == Some(block)
            }
            Condition::HasPickaxeByMinimumTier { tier } => {
                sense::best_pickaxe(&obs.inventory, kb).is_some_and(|(_, best)| best >= *tier)
            }
            Condition::HasBestPickaxeByMinimumTierEquipped { tier } => {
                match sense::best_pickaxe(&obs.inventory, kb) {
                    Some((_, best)) => {
                        best >= *tier && sense::equipped_pickaxe(obs, kb) == Some(best)
                    }
                    None => false,
                }
            }
            Condition::HasNoEnemyNearby => {
                obs.position.is_some()
                    && sense::nearest_any(&obs.entities.enemies, obs)
                        .is_none_or(|(_, d)| d > ENEMY_RANGE)
            }
            Condition::HasItemShared { item, amount } => {
                let stock = obs.team_inventory.as_ref().unwrap_or(&obs.inventory);
                *amount == 0 || stock.count(item) >= *amount
            }
        }
    }

    /// The same condition with any requested amount dropped, so `HasItem(planks, 4)` and
    /// `HasItem(planks, 12)` compare equal.
    pub fn without_amount(&self) -> Condition {
        match self {
            Condition::HasItem { item, .. } => Condition::HasItem {
                item: item.clone(),
                amount: 0,
            },
            Condition::HasItemShared { item, .. } => Condition::HasItemShared {
                item: item.clone(),
                amount: 0,
            },
            other => other.clone(),
        }
    }

    /// Conditions about stock or structures the whole team works towards.
    pub fn is_team_scoped(&self) -> bool {
        matches!(
            self,
            Condition::HasItemShared { .. } | Condition::IsBlockAtPosition { .. }
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::HasItem { item, amount } => write!(f, "HasItem({item} x{amount})"),
            Condition::HasItemEquipped { item } => write!(f, "HasItemEquipped({item})"),
            Condition::HasPickupNearby { item } => write!(f, "HasPickupNearby({item})"),
            Condition::IsBlockWithinReach { block } => write!(f, "IsBlockWithinReach({block})"),
            Condition::IsBlockObservable { block } => write!(f, "IsBlockObservable({block})"),
            Condition::IsAnimalWithinReach { specie } => {
                write!(f, "IsAnimalWithinReach({specie})")
            }
            Condition::IsAnimalObservable { specie } => write!(f, "IsAnimalObservable({specie})"),
            Condition::IsPositionWithinReach { position } => {
                write!(f, "IsPositionWithinReach{position}")
            }
            Condition::IsBlockAtPosition { block, position } => {
                write!(f, "IsBlockAtPosition({block} at {position})")
            }
            Condition::HasPickaxeByMinimumTier { tier } => {
                write!(f, "HasPickaxeByMinimumTier({tier})")
            }
            Condition::HasBestPickaxeByMinimumTierEquipped { tier } => {
                write!(f, "HasBestPickaxeByMinimumTierEquipped({tier})")
            }
            Condition::HasNoEnemyNearby => f.write_str("HasNoEnemyNearby"),
            Condition::HasItemShared { item, amount } => {
                write!(f, "HasItemShared({item} x{amount})")
            }
        }
    }
}
