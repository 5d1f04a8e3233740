//! Integration tests for the colony economy
//!
//! Covers the player-facing economy surface through the world:
//! - building costs that grow with every building of a plan
//! - upgrade gating on colony level and all-or-nothing payment
//! - buildings applied to the colony exactly once
//! - deliveries clamped to storage caps

use formicary::city::building::{Building, BuildingEffect};
use formicary::city::economy::process_resource_delivery;
use formicary::core::config::{ResourceAmount, SimulationConfig};
use formicary::core::error::{ColonyError, ContractViolation, Precondition};
use formicary::core::types::{ResourceKind, UpgradeId};
use formicary::entity::tasks::TaskPriority;
use formicary::simulation::{ColonyWorld, CommandReceipt, Intent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const MANDIBLE_TRAINING: UpgradeId = UpgradeId(3);

fn world() -> ColonyWorld {
    ColonyWorld::new(SimulationConfig::default()).unwrap()
}

// ============================================================================
// Building costs
// ============================================================================

#[test]
fn test_build_cost_grows_per_building() {
    let mut world = world();
    world.colony.set_resource_amount(ResourceKind::Leaves, 100.0);

    let (_, first) = world.build("leaf_depot", TaskPriority::Medium).unwrap();
    assert_eq!(first, vec![(ResourceKind::Leaves, 25.0)]);

    // The first depot is still queued, so it already counts
    let (_, second) = world.build("leaf_depot", TaskPriority::Medium).unwrap();
    assert_eq!(second, vec![(ResourceKind::Leaves, 33.0)]);

    assert_eq!(world.resource_amount(ResourceKind::Leaves), 42.0);
    assert_eq!(world.tasks.len(), 2);
}

#[test]
fn test_unknown_plan_is_precondition() {
    let mut world = world();
    let err = world.build("throne_room", TaskPriority::High).unwrap_err();
    assert!(matches!(
        err,
        ColonyError::Precondition(Precondition::UnknownPlan(_))
    ));
    assert!(world.tasks.is_empty());
}

// ============================================================================
// Upgrades
// ============================================================================

#[test]
fn test_upgrade_rejected_below_required_level() {
    let mut world = world();
    world.colony.set_resource_amount(ResourceKind::Leaves, 100.0);
    world.colony.set_resource_amount(ResourceKind::Sand, 100.0);

    let err = world.apply_upgrade(MANDIBLE_TRAINING).unwrap_err();
    assert_eq!(
        err.to_string(),
        "precondition not met: colony level 1 is below required level 2"
    );
    assert_eq!(world.resource_amount(ResourceKind::Leaves), 100.0);
    assert_eq!(world.resource_amount(ResourceKind::Sand), 100.0);
    assert!(world.colony.applied_upgrades().is_empty());
}

#[test]
fn test_upgrade_after_promotion() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut world = world();
    world.colony.set_resource_amount(ResourceKind::Leaves, 100.0);
    world.colony.set_resource_amount(ResourceKind::Sand, 100.0);

    world.submit(Intent::PromoteColony);
    world.submit(Intent::ApplyUpgrade(MANDIBLE_TRAINING));
    let report = world.step(1.0, &mut rng);

    assert!(matches!(report.commands[0], Ok(CommandReceipt::ColonyPromoted(2))));
    match &report.commands[1] {
        Ok(CommandReceipt::UpgradeApplied(receipt)) => {
            assert_eq!(receipt.new_level, 1);
            assert_eq!(
                receipt.paid,
                vec![(ResourceKind::Leaves, 30.0), (ResourceKind::Sand, 15.0)]
            );
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(world.resource_amount(ResourceKind::Leaves), 70.0);
    assert_eq!(world.resource_amount(ResourceKind::Sand), 85.0);
    assert_eq!(world.colony.applied_upgrades(), &[MANDIBLE_TRAINING]);
}

#[test]
fn test_upgrade_cost_rises_with_level() {
    let mut world = world();
    world.colony.set_resource_amount(ResourceKind::Sand, 200.0);

    // Outer Galleries: 40 sand, growth 2.0, +4 influence per level
    world.apply_upgrade(UpgradeId(4)).unwrap();
    let receipt = world.apply_upgrade(UpgradeId(4)).unwrap();

    assert_eq!(receipt.new_level, 2);
    assert_eq!(receipt.paid, vec![(ResourceKind::Sand, 80.0)]);
    assert_eq!(world.resource_amount(ResourceKind::Sand), 80.0);
    assert_eq!(world.colony.influence_radius(), 18.0);
    assert_eq!(world.colony.applied_upgrades().len(), 1);
}

#[test]
fn test_unaffordable_upgrade_leaves_colony_untouched() {
    let mut world = world();
    world.colony.set_resource_amount(ResourceKind::Nectar, 10.0);
    let interval = world.production_interval();

    let err = world.apply_upgrade(UpgradeId(2)).unwrap_err();
    assert!(err.is_precondition());
    assert_eq!(world.resource_amount(ResourceKind::Nectar), 10.0);
    assert_eq!(world.production_interval(), interval);
}

// ============================================================================
// Buildings
// ============================================================================

#[test]
fn test_building_applied_once_through_intents() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut world = world();
    let limit = world.storage_limit(ResourceKind::Sand);
    let pit = Building::new(
        "Sand Pit",
        "sand_pit",
        1,
        BuildingEffect {
            storage: Some(ResourceAmount::new(ResourceKind::Sand, 40.0)),
            ..Default::default()
        },
    );

    world.submit(Intent::RegisterBuilding(pit.clone()));
    world.submit(Intent::RegisterBuilding(pit));
    let report = world.step(1.0, &mut rng);

    assert!(matches!(report.commands[0], Ok(CommandReceipt::BuildingRegistered(_))));
    assert!(matches!(
        report.commands[1],
        Err(ColonyError::ContractViolation(ContractViolation::BuildingAlreadyApplied(_)))
    ));
    assert_eq!(world.storage_limit(ResourceKind::Sand), limit + 40.0);
    assert_eq!(world.colony.buildings().len(), 1);
}

#[test]
fn test_brood_chamber_speeds_up_queen() {
    let mut world = world();
    let brood = world.plans.get("brood_chamber").unwrap().construct(0);
    world.register_building(brood).unwrap();

    assert!((world.production_interval() - 24.0).abs() < 1e-9);
}

// ============================================================================
// Storage
// ============================================================================

#[test]
fn test_delivery_overflow_is_lost() {
    let mut world = world();
    world.colony.set_resource_amount(ResourceKind::Nectar, 118.0);

    let delivery = process_resource_delivery(&mut world.colony, ResourceKind::Nectar, 5.0);
    assert_eq!(delivery.stored, 2.0);
    assert_eq!(delivery.overflow, 3.0);
    assert_eq!(world.resource_amount(ResourceKind::Nectar), 120.0);
}

#[test]
fn test_uncapped_kind_stores_everything() {
    let mut world = world();
    assert_eq!(world.storage_limit(ResourceKind::Food), 0.0);

    let delivery = process_resource_delivery(&mut world.colony, ResourceKind::Food, 1_000.0);
    assert_eq!(delivery.stored, 1_000.0);
    assert_eq!(delivery.overflow, 0.0);
}
