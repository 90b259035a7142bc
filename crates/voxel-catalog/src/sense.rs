//! Lookups over an observation shared by conditions and actions.

use voxel_core::{BlockPos, Entity, Inventory, ItemId, KnowledgeBase, Observation, PickaxeTier};

/// Closest entity of `kind` to the agent's feet.
pub fn nearest_entity<'o>(
    entities: &'o [Entity],
    obs: &Observation,
    kind: &ItemId,
) -> Option<(&'o Entity, f64)> {
    nearest_where(entities, obs, |e| &e.kind == kind)
}

/// Closest entity of any kind to the agent's feet.
pub fn nearest_any<'o>(entities: &'o [Entity], obs: &Observation) -> Option<(&'o Entity, f64)> {
    nearest_where(entities, obs, |_| true)
}

fn nearest_where<'o>(
    entities: &'o [Entity],
    obs: &Observation,
    mut pred: impl FnMut(&Entity) -> bool,
) -> Option<(&'o Entity, f64)> {
    let pos = obs.position?;
    entities
        .iter()
        .filter(|e| pred(e))
        .map(|e| (e, pos.distance(e.position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Closest block of type `block`, measured from the eye to the block centre.
pub fn nearest_block(obs: &Observation, block: &ItemId) -> Option<(BlockPos, f64)> {
    let eye = obs.position?.eye();
    obs.grid.as_ref()?.nearest(eye, block)
}

pub fn sees_block(obs: &Observation, block: &ItemId) -> bool {
    obs.grid.as_ref().is_some_and(|g| g.contains_block(block))
}

/// Slot and tier of the highest-tier pickaxe held.
pub fn best_pickaxe(inventory: &Inventory, kb: &dyn KnowledgeBase) -> Option<(usize, PickaxeTier)> {
    inventory
        .iter()
        .filter(|(_, slot)| slot.amount > 0)
        .filter_map(|(i, slot)| kb.pickaxe_tier(&slot.item).map(|tier| (i, tier)))
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
}

/// Tier of the pickaxe currently in hand.
pub fn equipped_pickaxe(obs: &Observation, kb: &dyn KnowledgeBase) -> Option<PickaxeTier> {
    obs.equipped().and_then(|slot| kb.pickaxe_tier(&slot.item))
}

pub fn is_equipped(obs: &Observation, item: &ItemId) -> bool {
    obs.equipped()
        .is_some_and(|slot| &slot.item == item && slot.amount > 0)
}

/// The crosshair rests on `kind` and it can be hit from here.
pub fn looking_at(obs: &Observation, kind: &ItemId) -> bool {
    obs.line_of_sight
        .as_ref()
        .is_some_and(|los| &los.kind == kind && los.in_range)
}
