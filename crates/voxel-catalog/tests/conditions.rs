mod common;

use common::Frame;
use voxel_catalog::{Behaviour, Condition};
use voxel_core::{
    BlockPos, Entity, Inventory, InventorySlot, ItemId, PickaxeTier, Position, Status,
};

fn holds(frame: &Frame, condition: &Condition) -> bool {
    condition.evaluate(&frame.observation, &frame.knowledge)
}

#[test]
fn zero_amount_is_always_satisfied() {
    let frame = Frame::blind();
    assert!(holds(&frame, &Condition::has_item(ItemId::DIAMOND, 0)));
    assert!(holds(&frame, &Condition::has_item_shared(ItemId::DIAMOND, 0)));
    assert!(!holds(&frame, &Condition::has_item(ItemId::DIAMOND, 1)));
}

#[test]
fn missing_frame_data_fails() {
    let frame = Frame::blind();
    let all = [
        Condition::has_item_equipped(ItemId::STONE_PICKAXE),
        Condition::HasPickupNearby { item: ItemId::LOG },
        Condition::IsBlockWithinReach { block: ItemId::AIR },
        Condition::IsBlockObservable { block: ItemId::AIR },
        Condition::IsAnimalWithinReach { specie: ItemId::COW },
        Condition::IsAnimalObservable { specie: ItemId::COW },
        Condition::IsPositionWithinReach { position: BlockPos::new(0, 0, 0) },
        Condition::is_block_at(ItemId::AIR, BlockPos::new(0, 0, 0)),
        Condition::HasPickaxeByMinimumTier { tier: PickaxeTier::Wooden },
        Condition::HasBestPickaxeByMinimumTierEquipped { tier: PickaxeTier::Wooden },
        Condition::HasNoEnemyNearby,
    ];
    for condition in all {
        assert!(!holds(&frame, &condition), "{condition} held on an empty frame");
    }
}

#[test]
fn evaluation_is_idempotent_and_side_effect_free() {
    let mut frame = Frame::new().holding(&[(ItemId::LOG, 2), (ItemId::WOODEN_PICKAXE, 1)]);
    frame.block(BlockPos::new(2, 64, 0), ItemId::LOG);

    let mut leaves = [
        Condition::has_item(ItemId::LOG, 2),
        Condition::has_item(ItemId::LOG, 3),
        Condition::has_item_equipped(ItemId::LOG),
        Condition::IsBlockWithinReach { block: ItemId::LOG },
        Condition::IsBlockObservable { block: ItemId::STONE },
        Condition::HasBestPickaxeByMinimumTierEquipped { tier: PickaxeTier::Wooden },
        Condition::HasNoEnemyNearby,
    ]
    .map(Behaviour::from);

    for leaf in leaves.iter_mut() {
        let first = frame.tick(leaf);
        let second = frame.tick(leaf);
        assert_eq!(first, second, "{leaf}");
        assert_ne!(first, Status::Running);
    }
    assert!(frame.commands.commands.is_empty());
    assert!(frame.blackboard.is_empty());
}

#[test]
fn reach_is_measured_from_the_eye() {
    let mut frame = Frame::new();
    frame.block(BlockPos::new(9, 64, 0), ItemId::LOG);
    let reachable = Condition::IsBlockWithinReach { block: ItemId::LOG };
    let visible = Condition::IsBlockObservable { block: ItemId::LOG };
    assert!(!holds(&frame, &reachable));
    assert!(holds(&frame, &visible));

    frame.block(BlockPos::new(2, 64, 0), ItemId::LOG);
    assert!(holds(&frame, &reachable));

    let near = Condition::IsPositionWithinReach { position: BlockPos::new(0, 64, 3) };
    let far = Condition::IsPositionWithinReach { position: BlockPos::new(0, 64, 8) };
    assert!(holds(&frame, &near));
    assert!(!holds(&frame, &far));
}

#[test]
fn pickups_and_animals_by_distance() {
    let mut frame = Frame::new();
    frame.pickup(ItemId::LOG, Position::new(30.0, 64.0, 0.5));
    let pickup = Condition::HasPickupNearby { item: ItemId::LOG };
    assert!(!holds(&frame, &pickup));
    frame.pickup(ItemId::LOG, Position::new(3.0, 64.0, 0.5));
    assert!(holds(&frame, &pickup));

    frame.animal(ItemId::COW, Position::new(6.5, 64.0, 0.5));
    let observable = Condition::IsAnimalObservable { specie: ItemId::COW };
    let reachable = Condition::IsAnimalWithinReach { specie: ItemId::COW };
    assert!(holds(&frame, &observable));
    assert!(!holds(&frame, &reachable));
    frame.animal(ItemId::COW, Position::new(2.0, 64.0, 0.5));
    assert!(holds(&frame, &reachable));
    assert!(!holds(&frame, &Condition::IsAnimalObservable { specie: ItemId::PIG }));
}

#[test]
fn block_at_position_reads_the_grid() {
    let mut frame = Frame::new();
    let spot = BlockPos::new(0, 64, 3);
    let fence = Condition::is_block_at(ItemId::FENCE, spot);
    assert!(!holds(&frame, &fence));
    frame.block(spot, ItemId::FENCE);
    assert!(holds(&frame, &fence));
    // Outside the observed grid.
    assert!(!holds(&frame, &Condition::is_block_at(ItemId::AIR, BlockPos::new(40, 64, 0))));
}

#[test]
fn best_pickaxe_must_be_in_hand() {
    let mut frame = Frame::new().slots(vec![
        Some(InventorySlot::new(ItemId::WOODEN_PICKAXE, 1)),
        Some(InventorySlot::new(ItemId::IRON_PICKAXE, 1)),
    ]);
    let tier = |tier| Condition::HasPickaxeByMinimumTier { tier };
    let best = |tier| Condition::HasBestPickaxeByMinimumTierEquipped { tier };

    assert!(holds(&frame, &tier(PickaxeTier::Stone)));
    assert!(holds(&frame, &tier(PickaxeTier::Iron)));
    assert!(!holds(&frame, &tier(PickaxeTier::Diamond)));

    // Holding the wooden pickaxe while an iron one is available.
    assert!(!holds(&frame, &best(PickaxeTier::Wooden)));
    frame.observation.selected_slot = 1;
    assert!(holds(&frame, &best(PickaxeTier::Wooden)));
    assert!(holds(&frame, &best(PickaxeTier::Iron)));
    assert!(!holds(&frame, &best(PickaxeTier::Diamond)));
}

#[test]
fn enemies_only_matter_when_close() {
    let mut frame = Frame::new();
    assert!(holds(&frame, &Condition::HasNoEnemyNearby));
    frame
        .observation
        .entities
        .enemies
        .push(Entity::new("zombie", Position::new(20.5, 64.0, 0.5)));
    assert!(holds(&frame, &Condition::HasNoEnemyNearby));
    frame
        .observation
        .entities
        .enemies
        .push(Entity::new("zombie", Position::new(5.5, 64.0, 0.5)));
    assert!(!holds(&frame, &Condition::HasNoEnemyNearby));
}

#[test]
fn shared_stock_prefers_the_team_inventory() {
    let mut frame = Frame::new().holding(&[(ItemId::FENCE, 1)]);
    let shared = Condition::has_item_shared(ItemId::FENCE, 5);
    assert!(!holds(&frame, &shared));

    frame.observation.team_inventory = Some(Inventory::from_items([(ItemId::FENCE, 5)]));
    assert!(holds(&frame, &shared));
    assert!(!holds(&frame, &Condition::has_item(ItemId::FENCE, 5)));
}

#[test]
fn amount_is_ignored_for_identity() {
    assert_eq!(
        Condition::has_item(ItemId::PLANKS, 4).without_amount(),
        Condition::has_item(ItemId::PLANKS, 12).without_amount(),
    );
    assert_ne!(
        Condition::has_item(ItemId::PLANKS, 4).without_amount(),
        Condition::has_item(ItemId::STICK, 4).without_amount(),
    );
    assert_eq!(
        Condition::HasNoEnemyNearby.without_amount(),
        Condition::HasNoEnemyNearby
    );
}
