//! World-mutating operations.
//!
//! Actions hold only their static parameters. Each tick they read the frame, issue zero or
//! more commands and decide from the frame alone whether they are done: `Success` once the
//! frame shows the goal reached, `Failure` once it can no longer be reached from here,
//! `Running` otherwise (including while the frame lacks data they need).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use voxel_bt::NodeState;
use voxel_core::{
    Actuator, BlockPos, Direction, ItemId, KnowledgeBase, Observation, PickaxeTier, Position,
    Status, HOTBAR_SLOTS,
};

use crate::condition::{ANIMAL_REACH, ENEMY_RANGE, PICKUP_RANGE, REACH};
use crate::context::AgentContext;
use crate::{sense, steering};

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

/// Straight down.
const PITCH_DOWN: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Action {
    /// Run the recipe for `item` until at least `amount` are held; `times` is the planned
    /// number of runs.
    Craft {
        item: ItemId,
        #[cfg_attr(feature = "serde", serde(default))]
        variant: Option<String>,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        times: u32,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        amount: u32,
    },
    Melt {
        item: ItemId,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        times: u32,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        amount: u32,
    },
    Equip {
        item: ItemId,
    },
    EquipBestPickaxe {
        tier: PickaxeTier,
    },
    PickupItem {
        item: ItemId,
    },
    GoToAnimal {
        specie: ItemId,
    },
    GoToEnemy,
    GoToBlock {
        block: ItemId,
    },
    GoToPosition {
        position: BlockPos,
    },
    /// Mine the nearest `block` within reach until its `item` drop lies on the ground.
    MineMaterial {
        block: ItemId,
        item: ItemId,
    },
    /// Hunt `specie` until its `item` loot lies on the ground.
    AttackAnimal {
        specie: ItemId,
        item: ItemId,
    },
    DefeatEnemy,
    PlaceBlockAtPosition {
        block: ItemId,
        position: BlockPos,
    },
    DigDownwardsToMaterial {
        block: ItemId,
    },
    /// Walk `direction` until `target` (a block type or animal species) comes into view.
    ExploreInDirection {
        direction: Direction,
        target: ItemId,
    },
    JumpIfStuck,
}

impl Action {
    pub fn craft(item: impl Into<ItemId>, times: u32, amount: u32) -> Self {
        Action::Craft {
            item: item.into(),
            variant: None,
            times,
            amount,
        }
    }

    /// Planned recipe runs, for actions that have them.
    pub fn times(&self) -> Option<u32> {
        match self {
            Action::Craft { times, .. } | Action::Melt { times, .. } => Some(*times),
            _ => None,
        }
    }

    /// Actions that hold continuous controls (movement, view, attack) while running.
    pub fn steers(&self) -> bool {
        !matches!(
            self,
            Action::Craft { .. }
                | Action::Melt { .. }
                | Action::Equip { .. }
                | Action::EquipBestPickaxe { .. }
                | Action::JumpIfStuck
        )
    }

    pub fn tick(&self, ctx: &mut AgentContext<'_>) -> Status {
        let obs = ctx.observation;
        let kb = ctx.knowledge;
        let act: &mut dyn Actuator = &mut *ctx.actuator;

        match self {
            Action::Craft {
                item,
                variant,
                amount,
                ..
            } => craft(obs, kb, act, item, variant.as_deref(), *amount),
            Action::Melt { item, amount, .. } => craft(obs, kb, act, item, None, *amount),
            Action::Equip { item } => {
                if sense::is_equipped(obs, item) {
                    return Status::Success;
                }
                match obs.inventory.find(item) {
                    Some(slot) => equip(obs, act, slot),
                    None => Status::Failure,
                }
            }
            Action::EquipBestPickaxe { tier } => match sense::best_pickaxe(&obs.inventory, kb) {
                Some((_, best)) if best >= *tier && sense::equipped_pickaxe(obs, kb) == Some(best) => {
                    Status::Success
                }
                Some((slot, best)) if best >= *tier => equip(obs, act, slot),
                _ => Status::Failure,
            },
            Action::PickupItem { item } => {
                if obs.position.is_none() {
                    return Status::Running;
                }
                match sense::nearest_entity(&obs.entities.pickups, obs, item) {
                    Some((pickup, _)) => {
                        steering::walk_towards(obs, act, pickup.position);
                        Status::Running
                    }
                    None => obs.inventory.contains(item).into(),
                }
            }
            Action::GoToAnimal { specie } => {
                if obs.position.is_none() {
                    return Status::Running;
                }
                match sense::nearest_entity(&obs.entities.animals, obs, specie) {
                    None => Status::Failure,
                    Some((_, d)) if d <= ANIMAL_REACH => Status::Success,
                    Some((animal, _)) => {
                        steering::walk_towards(obs, act, animal.position);
                        Status::Running
                    }
                }
            }
            Action::GoToEnemy => {
                if obs.position.is_none() {
                    return Status::Running;
                }
                match sense::nearest_any(&obs.entities.enemies, obs) {
                    None => Status::Success,
                    Some((_, d)) if d <= ANIMAL_REACH => Status::Success,
                    Some((enemy, _)) => {
                        steering::walk_towards(obs, act, enemy.position);
                        Status::Running
                    }
                }
            }
            Action::GoToBlock { block } => {
                if obs.position.is_none() || obs.grid.is_none() {
                    return Status::Running;
                }
                match sense::nearest_block(obs, block) {
                    None => Status::Failure,
                    Some((_, d)) if d <= REACH => Status::Success,
                    Some((pos, _)) => {
                        steering::walk_towards(obs, act, pos.center());
                        Status::Running
                    }
                }
            }
            Action::GoToPosition { position } => match obs.position {
                None => Status::Running,
                Some(p) if p.eye().distance(position.center()) <= REACH => Status::Success,
                Some(_) => {
                    steering::walk_towards(obs, act, position.center());
                    Status::Running
                }
            },
            Action::MineMaterial { block, item } => mine(obs, act, block, item),
            Action::AttackAnimal { specie, item } => hunt(obs, act, specie, item),
            Action::DefeatEnemy => {
                if obs.position.is_none() {
                    return Status::Running;
                }
                match sense::nearest_any(&obs.entities.enemies, obs) {
                    Some((enemy, d)) if d <= ENEMY_RANGE => {
                        strike(obs, act, &enemy.kind, enemy.position, d);
                        Status::Running
                    }
                    _ => Status::Success,
                }
            }
            Action::PlaceBlockAtPosition { block, position } => place(obs, act, block, *position),
            Action::DigDownwardsToMaterial { block } => {
                if sense::sees_block(obs, block) {
                    return Status::Success;
                }
                if obs.position.is_none() || obs.grid.is_none() {
                    return Status::Running;
                }
                let facing_down = steering::look_pitch(obs, act, PITCH_DOWN);
                act.move_forward(0.0);
                act.attack(facing_down);
                Status::Running
            }
            Action::ExploreInDirection { direction, target } => {
                if sense::sees_block(obs, target)
                    || obs.entities.animals.iter().any(|a| &a.kind == target)
                {
                    return Status::Success;
                }
                if obs.position.is_some() {
                    steering::walk_heading(obs, act, direction.yaw());
                }
                Status::Running
            }
            Action::JumpIfStuck => {
                act.jump(steering::blocked_ahead(obs));
                Status::Success
            }
        }
    }

    /// Release every continuous control when a steering action stops running.
    pub fn on_exit(&self, ctx: &mut AgentContext<'_>, _new_state: NodeState) {
        if self.steers() {
            ctx.actuator.stop();
        }
    }
}

fn craft(
    obs: &Observation,
    kb: &dyn KnowledgeBase,
    act: &mut dyn Actuator,
    item: &ItemId,
    variant: Option<&str>,
    amount: u32,
) -> Status {
    if obs.inventory.count(item) >= amount {
        return Status::Success;
    }
    let Some(recipe) = kb.recipe(item) else {
        return Status::Failure;
    };
    let at_station = recipe
        .station
        .as_ref()
        .is_none_or(|station| obs.inventory.contains(station));
    let stocked = recipe
        .ingredients
        .iter()
        .all(|(ingredient, n)| obs.inventory.count(ingredient) >= *n);
    if !(at_station && stocked) {
        return Status::Failure;
    }
    act.craft(item, variant.or(recipe.variant.as_deref()));
    Status::Running
}

fn equip(obs: &Observation, act: &mut dyn Actuator, slot: usize) -> Status {
    if slot == obs.selected_slot {
        return Status::Success;
    }
    if slot < HOTBAR_SLOTS {
        act.select_hotbar(slot);
    } else {
        act.swap_items(slot, obs.selected_slot);
    }
    Status::Running
}

fn drop_nearby(obs: &Observation, item: &ItemId) -> bool {
    sense::nearest_entity(&obs.entities.pickups, obs, item).is_some_and(|(_, d)| d <= PICKUP_RANGE)
}

fn mine(obs: &Observation, act: &mut dyn Actuator, block: &ItemId, item: &ItemId) -> Status {
    if drop_nearby(obs, item) {
        return Status::Success;
    }
    if obs.position.is_none() || obs.grid.is_none() {
        return Status::Running;
    }
    match sense::nearest_block(obs, block) {
        Some((pos, d)) if d <= REACH => {
            steering::aim(obs, act, pos.center());
            act.move_forward(0.0);
            act.attack(sense::looking_at(obs, block));
            Status::Running
        }
        _ => Status::Failure,
    }
}

fn hunt(obs: &Observation, act: &mut dyn Actuator, specie: &ItemId, item: &ItemId) -> Status {
    if drop_nearby(obs, item) {
        return Status::Success;
    }
    if obs.position.is_none() {
        return Status::Running;
    }
    match sense::nearest_entity(&obs.entities.animals, obs, specie) {
        Some((animal, d)) => {
            strike(obs, act, specie, animal.position, d);
            Status::Running
        }
        None => Status::Failure,
    }
}

/// Close in on a creature and hit it once the crosshair is on it.
fn strike(obs: &Observation, act: &mut dyn Actuator, kind: &ItemId, at: Position, distance: f64) {
    if distance > ANIMAL_REACH {
        steering::walk_towards(obs, act, at);
        act.attack(false);
        return;
    }
    steering::aim(obs, act, Position::new(at.x, at.y + 0.5, at.z));
    act.move_forward(0.0);
    act.attack(sense::looking_at(obs, kind));
}

fn place(obs: &Observation, act: &mut dyn Actuator, block: &ItemId, position: BlockPos) -> Status {
    let Some(pos) = obs.position else {
        return Status::Running;
    };
    let Some(current) = obs.block_at(position) else {
        return Status::Running;
    };
    if current == block {
        return Status::Success;
    }
    if !current.is_passable() || !sense::is_equipped(obs, block) {
        return Status::Failure;
    }

    let feet = pos.block();
    if feet == position || feet.offset(0, 1, 0) == position {
        act.move_forward(-1.0);
        return Status::Running;
    }
    act.move_forward(0.0);
    // Aim at the top face of the supporting block.
    let face = Position::new(
        position.x as f64 + 0.5,
        position.y as f64,
        position.z as f64 + 0.5,
    );
    if steering::aim(obs, act, face) {
        act.place_block();
    }
    Status::Running
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Craft { item, times, .. } => write!(f, "Craft({item} x{times})"),
            Action::Melt { item, times, .. } => write!(f, "Melt({item} x{times})"),
            Action::Equip { item } => write!(f, "Equip({item})"),
            Action::EquipBestPickaxe { tier } => write!(f, "EquipBestPickaxe({tier})"),
            Action::PickupItem { item } => write!(f, "PickupItem({item})"),
            Action::GoToAnimal { specie } => write!(f, "GoToAnimal({specie})"),
            Action::GoToEnemy => f.write_str("GoToEnemy"),
            Action::GoToBlock { block } => write!(f, "GoToBlock({block})"),
            Action::GoToPosition { position } => write!(f, "GoToPosition{position}"),
            Action::MineMaterial { block, item } => write!(f, "MineMaterial({block} -> {item})"),
            Action::AttackAnimal { specie, item } => write!(f, "AttackAnimal({specie} -> {item})"),
            Action::DefeatEnemy => f.write_str("DefeatEnemy"),
            Action::PlaceBlockAtPosition { block, position } => {
                write!(f, "PlaceBlockAtPosition({block} at {position})")
            }
            Action::DigDownwardsToMaterial { block } => write!(f, "DigDownwardsToMaterial({block})"),
            Action::ExploreInDirection { direction, target } => {
                write!(f, "ExploreInDirection({direction}, {target})")
            }
            Action::JumpIfStuck => f.write_str("JumpIfStuck"),
        }
    }
}
