use voxel_catalog::{Action, Condition};
use voxel_core::{BlockPos, ItemId, PickaxeTier, StaticKnowledgeBase};
use voxel_ppa::{Resolver, Step};

fn conditions(steps: &[Step]) -> Vec<Condition> {
    steps
        .iter()
        .filter_map(|s| match s {
            Step::Condition(c) => Some(c.clone()),
            Step::Action(_) => None,
        })
        .collect()
}

#[test]
fn post_condition_is_the_resolved_condition() {
    let kb = StaticKnowledgeBase::minecraft();
    let resolver = Resolver::new(&kb);
    let all = [
        Condition::has_item(ItemId::FENCE, 7),
        Condition::has_item(ItemId::LOG, 2),
        Condition::has_item_equipped(ItemId::IRON_PICKAXE),
        Condition::HasPickupNearby { item: ItemId::COBBLESTONE },
        Condition::HasPickupNearby { item: ItemId::BEEF },
        Condition::IsBlockWithinReach { block: ItemId::LOG },
        Condition::IsBlockObservable { block: ItemId::DIAMOND_ORE },
        Condition::IsAnimalWithinReach { specie: ItemId::COW },
        Condition::IsAnimalObservable { specie: ItemId::SHEEP },
        Condition::IsPositionWithinReach { position: BlockPos::new(3, 64, 3) },
        Condition::is_block_at(ItemId::FENCE, BlockPos::new(3, 64, 3)),
        Condition::HasPickaxeByMinimumTier { tier: PickaxeTier::Stone },
        Condition::HasBestPickaxeByMinimumTierEquipped { tier: PickaxeTier::Iron },
        Condition::HasNoEnemyNearby,
        Condition::has_item_shared(ItemId::FENCE, 10),
    ];
    for condition in all {
        let ppa = resolver
            .resolve(&condition)
            .unwrap_or_else(|| panic!("{condition} did not resolve"));
        assert_eq!(ppa.post_condition, condition);
    }
}

#[test]
fn craft_runs_round_up() {
    let kb = StaticKnowledgeBase::minecraft();
    let ppa = Resolver::new(&kb)
        .resolve(&Condition::has_item(ItemId::FENCE, 7))
        .unwrap();

    assert_eq!(
        conditions(&ppa.pre_conditions),
        vec![
            Condition::has_item(ItemId::PLANKS, 12),
            Condition::has_item(ItemId::STICK, 6),
            Condition::has_item(ItemId::CRAFTING_TABLE, 1),
        ]
    );
    assert_eq!(ppa.actions, vec![Action::craft(ItemId::FENCE, 3, 7)]);
}

#[test]
fn melting_recipes_melt() {
    let kb = StaticKnowledgeBase::minecraft();
    let ppa = Resolver::new(&kb)
        .resolve(&Condition::has_item(ItemId::IRON_INGOT, 3))
        .unwrap();
    assert_eq!(
        ppa.actions,
        vec![Action::Melt {
            item: ItemId::IRON_INGOT,
            times: 3,
            amount: 3,
        }]
    );
    assert_eq!(
        conditions(&ppa.pre_conditions).last(),
        Some(&Condition::has_item(ItemId::FURNACE, 1))
    );
}

#[test]
fn raw_materials_are_collected_from_the_ground() {
    let kb = StaticKnowledgeBase::minecraft();
    let resolver = Resolver::new(&kb);

    let collect = resolver.resolve(&Condition::has_item(ItemId::LOG, 3)).unwrap();
    assert_eq!(
        conditions(&collect.pre_conditions),
        vec![Condition::HasPickupNearby { item: ItemId::LOG }]
    );
    assert_eq!(collect.actions, vec![Action::PickupItem { item: ItemId::LOG }]);

    let mine = resolver
        .resolve(&Condition::HasPickupNearby { item: ItemId::COBBLESTONE })
        .unwrap();
    assert_eq!(
        conditions(&mine.pre_conditions),
        vec![
            Condition::HasBestPickaxeByMinimumTierEquipped { tier: PickaxeTier::Wooden },
            Condition::IsBlockWithinReach { block: ItemId::STONE },
        ]
    );
    assert_eq!(
        mine.actions,
        vec![Action::MineMaterial {
            block: ItemId::STONE,
            item: ItemId::COBBLESTONE,
        }]
    );

    // Logs need no tool.
    let chop = resolver
        .resolve(&Condition::HasPickupNearby { item: ItemId::LOG })
        .unwrap();
    assert_eq!(
        conditions(&chop.pre_conditions),
        vec![Condition::IsBlockWithinReach { block: ItemId::LOG }]
    );
}

#[test]
fn loot_is_hunted_with_an_optional_tool() {
    let kb = StaticKnowledgeBase::minecraft();
    let resolver = Resolver::new(&kb);

    let beef = resolver
        .resolve(&Condition::HasPickupNearby { item: ItemId::BEEF })
        .unwrap();
    assert_eq!(
        conditions(&beef.pre_conditions),
        vec![
            Condition::has_item_equipped(ItemId::WOODEN_SWORD),
            Condition::IsAnimalWithinReach { specie: ItemId::COW },
        ]
    );
    assert_eq!(
        beef.actions,
        vec![Action::AttackAnimal {
            specie: ItemId::COW,
            item: ItemId::BEEF,
        }]
    );

    let wool = resolver
        .resolve(&Condition::HasPickupNearby { item: ItemId::WOOL })
        .unwrap();
    assert_eq!(
        conditions(&wool.pre_conditions),
        vec![Condition::IsAnimalWithinReach { specie: ItemId::SHEEP }]
    );
}

#[test]
fn items_nothing_drops_stay_unresolved() {
    let kb = StaticKnowledgeBase::minecraft();
    let obsidian = Condition::HasPickupNearby {
        item: ItemId::from_static("obsidian"),
    };
    assert_eq!(Resolver::new(&kb).resolve(&obsidian), None);
}

#[test]
fn underground_blocks_are_dug_for() {
    let kb = StaticKnowledgeBase::minecraft();
    let resolver = Resolver::new(&kb);
    let ore = resolver
        .resolve(&Condition::IsBlockObservable { block: ItemId::IRON_ORE })
        .unwrap();
    assert_eq!(
        ore.actions,
        vec![Action::DigDownwardsToMaterial { block: ItemId::IRON_ORE }]
    );
    let log = resolver
        .resolve(&Condition::IsBlockObservable { block: ItemId::LOG })
        .unwrap();
    assert!(matches!(
        log.actions.as_slice(),
        [Action::ExploreInDirection { target, .. }] if *target == ItemId::LOG
    ));
}

#[test]
fn placing_needs_the_block_in_hand_and_in_reach() {
    let kb = StaticKnowledgeBase::minecraft();
    let spot = BlockPos::new(2, 64, 5);
    let ppa = Resolver::new(&kb)
        .resolve(&Condition::is_block_at(ItemId::FENCE, spot))
        .unwrap();
    assert_eq!(
        conditions(&ppa.pre_conditions),
        vec![
            Condition::has_item_equipped(ItemId::FENCE),
            Condition::IsPositionWithinReach { position: spot },
        ]
    );
}
