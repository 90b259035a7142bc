//! Condition → precondition-process-action lookup.

use voxel_catalog::{Action, Condition};
use voxel_core::{Direction, ItemId, KnowledgeBase};

/// Direction agents explore in when they cannot see what they need.
pub const EXPLORE_DIRECTION: Direction = Direction::North;

/// One precondition of a [`Ppa`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Condition(Condition),
    Action(Action),
}

impl From<Condition> for Step {
    fn from(value: Condition) -> Self {
        Step::Condition(value)
    }
}

/// How to make `post_condition` true: satisfy `pre_conditions` in order, then run `actions`.
///
/// Only lives during compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ppa {
    pub name: String,
    pub post_condition: Condition,
    pub pre_conditions: Vec<Step>,
    pub actions: Vec<Action>,
}

impl Ppa {
    fn new(name: impl Into<String>, post_condition: &Condition) -> Self {
        Self {
            name: name.into(),
            post_condition: post_condition.clone(),
            pre_conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    fn pre(mut self, condition: Condition) -> Self {
        self.pre_conditions.push(Step::Condition(condition));
        self
    }

    fn pre_opt(self, condition: Option<Condition>) -> Self {
        match condition {
            Some(c) => self.pre(c),
            None => self,
        }
    }

    fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// Pure lookup from a condition to the PPA that achieves it, backed by a knowledge base.
#[derive(Clone, Copy)]
pub struct Resolver<'k> {
    knowledge: &'k dyn KnowledgeBase,
}

impl<'k> Resolver<'k> {
    pub fn new(knowledge: &'k dyn KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// `None` when nothing in the knowledge base can bring the condition about; the caller
    /// keeps it as a plain check.
    pub fn resolve(&self, condition: &Condition) -> Option<Ppa> {
        let kb = self.knowledge;
        let ppa = match condition {
            Condition::HasItem { item, amount } => self.obtain(condition, item, *amount),
            Condition::HasItemEquipped { item } => Ppa::new(format!("equip {item}"), condition)
                .pre(Condition::has_item(item.clone(), 1))
                .then(Action::Equip { item: item.clone() }),
            Condition::HasPickupNearby { item } => return self.drop_source(condition, item),
            Condition::IsBlockWithinReach { block } => {
                Ppa::new(format!("approach {block}"), condition)
                    .pre(Condition::IsBlockObservable {
                        block: block.clone(),
                    })
                    .then(Action::GoToBlock {
                        block: block.clone(),
                    })
            }
            Condition::IsBlockObservable { block } => {
                let search = Ppa::new(format!("search {block}"), condition);
                if kb.is_underground(block) {
                    search.then(Action::DigDownwardsToMaterial {
                        block: block.clone(),
                    })
                } else {
                    search.then(explore(block))
                }
            }
            Condition::IsAnimalWithinReach { specie } => {
                Ppa::new(format!("approach {specie}"), condition)
                    .pre(Condition::IsAnimalObservable {
                        specie: specie.clone(),
                    })
                    .then(Action::GoToAnimal {
                        specie: specie.clone(),
                    })
            }
            Condition::IsAnimalObservable { specie } => {
                Ppa::new(format!("search {specie}"), condition).then(explore(specie))
            }
            Condition::IsPositionWithinReach { position } => {
                Ppa::new(format!("walk to {position}"), condition).then(Action::GoToPosition {
                    position: *position,
                })
            }
            Condition::IsBlockAtPosition { block, position } => {
                Ppa::new(format!("place {block} at {position}"), condition)
                    .pre(Condition::has_item_equipped(block.clone()))
                    .pre(Condition::IsPositionWithinReach {
                        position: *position,
                    })
                    .then(Action::PlaceBlockAtPosition {
                        block: block.clone(),
                        position: *position,
                    })
            }
            Condition::HasPickaxeByMinimumTier { tier } => {
                Ppa::new(format!("get {tier} pickaxe"), condition)
                    .pre(Condition::has_item(kb.pickaxe_for_tier(*tier), 1))
            }
            Condition::HasBestPickaxeByMinimumTierEquipped { tier } => {
                Ppa::new(format!("equip best pickaxe ({tier}+)"), condition)
                    .pre(Condition::HasPickaxeByMinimumTier { tier: *tier })
                    .then(Action::EquipBestPickaxe { tier: *tier })
            }
            Condition::HasNoEnemyNearby => Ppa::new("clear enemies", condition)
                .then(Action::GoToEnemy)
                .then(Action::DefeatEnemy),
            Condition::HasItemShared { item, amount } => {
                Ppa::new(format!("stock {item}"), condition)
                    .pre(Condition::has_item(item.clone(), *amount))
            }
        };
        Some(ppa)
    }

    /// Craft or melt from a recipe, else pick the item up from the ground.
    fn obtain(&self, condition: &Condition, item: &ItemId, amount: u32) -> Ppa {
        let Some(recipe) = self.knowledge.recipe(item) else {
            return Ppa::new(format!("collect {item}"), condition)
                .pre(Condition::HasPickupNearby { item: item.clone() })
                .then(Action::PickupItem { item: item.clone() });
        };

        let times = recipe.runs_for(amount.max(1));
        let verb = if recipe.is_melting { "melt" } else { "craft" };
        let mut ppa = Ppa::new(format!("{verb} {item} x{times}"), condition);
        for (ingredient, per_run) in &recipe.ingredients {
            ppa = ppa.pre(Condition::has_item(ingredient.clone(), per_run * times));
        }
        ppa = ppa.pre_opt(
            recipe
                .station
                .as_ref()
                .map(|station| Condition::has_item(station.clone(), 1)),
        );

        let action = if recipe.is_melting {
            Action::Melt {
                item: item.clone(),
                times,
                amount,
            }
        } else {
            Action::Craft {
                item: item.clone(),
                variant: recipe.variant.clone(),
                times,
                amount,
            }
        };
        ppa.then(action)
    }

    /// Put `item` on the ground by mining its block or hunting the animal that drops it.
    fn drop_source(&self, condition: &Condition, item: &ItemId) -> Option<Ppa> {
        let kb = self.knowledge;
        if let Some(block) = kb.block_source(item) {
            let tool = kb.gathering_tool(&block).map(|tool| match kb.pickaxe_tier(&tool) {
                Some(tier) => Condition::HasBestPickaxeByMinimumTierEquipped { tier },
                None => Condition::has_item_equipped(tool),
            });
            return Some(
                Ppa::new(format!("mine {block}"), condition)
                    .pre_opt(tool)
                    .pre(Condition::IsBlockWithinReach {
                        block: block.clone(),
                    })
                    .then(Action::MineMaterial {
                        block,
                        item: item.clone(),
                    }),
            );
        }

        if let Some(specie) = kb.loot_source(item) {
            return Some(
                Ppa::new(format!("hunt {specie}"), condition)
                    .pre_opt(kb.hunting_tool(&specie).map(Condition::has_item_equipped))
                    .pre(Condition::IsAnimalWithinReach {
                        specie: specie.clone(),
                    })
                    .then(Action::AttackAnimal {
                        specie,
                        item: item.clone(),
                    }),
            );
        }

        tracing::warn!(condition = %condition, "no block or animal drops this item");
        None
    }
}

fn explore(target: &ItemId) -> Action {
    Action::ExploreInDirection {
        direction: EXPLORE_DIRECTION,
        target: target.clone(),
    }
}
