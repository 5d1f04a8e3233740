//! Colony upgrades - levelled, cumulative bonuses bought with resources
//!
//! Cost at a level is `round(base × growth^level)` per resource kind.
//! Applying is fail-fast: requirements and cost are checked before anything
//! is touched, so a rejected upgrade leaves the colony exactly as it was.

use serde::{Deserialize, Serialize};

use crate::city::colony::Colony;
use crate::city::economy::calculate_upgrade_cost;
use crate::core::config::ResourceAmount;
use crate::core::error::{Precondition, Result};
use crate::core::types::{ResourceKind, UpgradeId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRequirements {
    pub colony_level: u32,
}

/// Multiplicative bonuses broadcast on every application
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeEffect {
    pub worker_speed: Option<f64>,
    pub worker_capacity: Option<f64>,
    /// Divides the queen's base interval (2.0 halves it)
    pub queen_production: Option<f64>,
    /// Flat addition to the influence radius
    pub influence_radius_bonus: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyUpgrade {
    pub id: UpgradeId,
    pub name: String,
    pub level: u32,
    pub growth_coefficient: f64,
    pub base_cost: Vec<ResourceAmount>,
    pub requirements: UpgradeRequirements,
    pub effect: UpgradeEffect,
}

/// Outcome of a successful application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeReceipt {
    pub id: UpgradeId,
    pub new_level: u32,
    pub paid: Vec<(ResourceKind, f64)>,
}

impl ColonyUpgrade {
    /// Cost per resource kind at the given level
    pub fn calculate_cost(&self, level: u32) -> Vec<(ResourceKind, f64)> {
        self.base_cost
            .iter()
            .map(|entry| {
                (
                    entry.resource,
                    calculate_upgrade_cost(entry.amount, self.growth_coefficient, level),
                )
            })
            .collect()
    }

    pub fn current_cost(&self) -> Vec<(ResourceKind, f64)> {
        self.calculate_cost(self.level)
    }

    /// First unmet requirement, if any
    fn check(&self, colony: &Colony) -> std::result::Result<Vec<(ResourceKind, f64)>, Precondition> {
        if colony.level < self.requirements.colony_level {
            return Err(Precondition::LevelTooLow {
                required: self.requirements.colony_level,
                current: colony.level,
            });
        }
        let cost = self.current_cost();
        for (kind, amount) in &cost {
            let available = colony.resource_amount(*kind);
            if available < *amount {
                return Err(Precondition::InsufficientResources {
                    kind: *kind,
                    needed: *amount,
                    available,
                });
            }
        }
        Ok(cost)
    }

    pub fn can_apply(&self, colony: &Colony) -> bool {
        self.check(colony).is_ok()
    }

    /// Pay, level up and broadcast the effect into the colony.
    ///
    /// Each call is one paid level. Callers go through
    /// `Colony::apply_upgrade`, which also records the upgrade id.
    pub(crate) fn apply(&mut self, colony: &mut Colony) -> Result<UpgradeReceipt> {
        let cost = self.check(colony)?;
        colony.pay(&cost)?;
        self.level += 1;

        if let Some(multiplier) = self.effect.worker_speed {
            for building in colony.buildings_mut() {
                building.boosts.worker_speed *= multiplier;
            }
        }
        if let Some(multiplier) = self.effect.worker_capacity {
            for building in colony.buildings_mut() {
                building.boosts.carrying_capacity *= multiplier;
            }
        }
        if let Some(multiplier) = self.effect.queen_production {
            if multiplier > 0.0 {
                colony.queen.base_production_interval *= 1.0 / multiplier;
            }
        }
        if let Some(bonus) = self.effect.influence_radius_bonus {
            colony.adjust_influence_radius(bonus);
        }

        tracing::info!("Applied {} (now level {})", self.name, self.level);
        Ok(UpgradeReceipt {
            id: self.id,
            new_level: self.level,
            paid: cost,
        })
    }
}

/// Upgrades offered when no scenario provides its own
pub fn default_upgrades() -> Vec<ColonyUpgrade> {
    vec![
        ColonyUpgrade {
            id: UpgradeId(1),
            name: "Pheromone Trails".into(),
            level: 0,
            growth_coefficient: 1.6,
            base_cost: vec![
                ResourceAmount::new(ResourceKind::Leaves, 20.0),
                ResourceAmount::new(ResourceKind::Nectar, 10.0),
            ],
            requirements: UpgradeRequirements { colony_level: 1 },
            effect: UpgradeEffect {
                worker_speed: Some(1.1),
                ..Default::default()
            },
        },
        ColonyUpgrade {
            id: UpgradeId(2),
            name: "Royal Jelly".into(),
            level: 0,
            growth_coefficient: 1.8,
            base_cost: vec![ResourceAmount::new(ResourceKind::Nectar, 35.0)],
            requirements: UpgradeRequirements { colony_level: 1 },
            effect: UpgradeEffect {
                queen_production: Some(1.25),
                ..Default::default()
            },
        },
        ColonyUpgrade {
            id: UpgradeId(3),
            name: "Mandible Training".into(),
            level: 0,
            growth_coefficient: 1.5,
            base_cost: vec![
                ResourceAmount::new(ResourceKind::Leaves, 30.0),
                ResourceAmount::new(ResourceKind::Sand, 15.0),
            ],
            requirements: UpgradeRequirements { colony_level: 2 },
            effect: UpgradeEffect {
                worker_capacity: Some(1.2),
                ..Default::default()
            },
        },
        ColonyUpgrade {
            id: UpgradeId(4),
            name: "Outer Galleries".into(),
            level: 0,
            growth_coefficient: 2.0,
            base_cost: vec![ResourceAmount::new(ResourceKind::Sand, 40.0)],
            requirements: UpgradeRequirements { colony_level: 1 },
            effect: UpgradeEffect {
                influence_radius_bonus: Some(4.0),
                ..Default::default()
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::{Building, BuildingEffect};
    use crate::core::config::QueenConfig;
    use crate::core::error::ColonyError;
    use crate::entity::queen::Queen;

    fn colony() -> Colony {
        let mut colony = Colony::new(Queen::new(QueenConfig {
            base_production_interval: 30.0,
            worker_maintenance_cost: 1.0,
        }));
        colony.set_resource_amount(ResourceKind::Leaves, 100.0);
        colony.set_resource_amount(ResourceKind::Nectar, 100.0);
        colony
    }

    fn pheromone_trails(required_level: u32) -> ColonyUpgrade {
        ColonyUpgrade {
            id: UpgradeId(1),
            name: "Pheromone Trails".into(),
            level: 0,
            growth_coefficient: 2.0,
            base_cost: vec![ResourceAmount::new(ResourceKind::Leaves, 10.0)],
            requirements: UpgradeRequirements {
                colony_level: required_level,
            },
            effect: UpgradeEffect {
                worker_speed: Some(1.5),
                queen_production: Some(2.0),
                influence_radius_bonus: Some(3.0),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_cost_follows_growth() {
        let upgrade = pheromone_trails(1);
        assert_eq!(upgrade.calculate_cost(0), vec![(ResourceKind::Leaves, 10.0)]);
        assert_eq!(upgrade.calculate_cost(3), vec![(ResourceKind::Leaves, 80.0)]);
    }

    #[test]
    fn test_apply_rejected_when_level_too_low() {
        let mut colony = colony();
        let mut upgrade = pheromone_trails(2);
        assert!(!upgrade.can_apply(&colony));

        let err = upgrade.apply(&mut colony).unwrap_err();
        assert!(matches!(
            err,
            ColonyError::Precondition(Precondition::LevelTooLow { required: 2, current: 1 })
        ));
        assert_eq!(colony.level, 1);
        assert_eq!(colony.resource_amount(ResourceKind::Leaves), 100.0);
        assert_eq!(upgrade.level, 0);
        assert_eq!(colony.influence_radius(), 10.0);
    }

    #[test]
    fn test_apply_rejected_when_short_on_resources() {
        let mut colony = colony();
        colony.set_resource_amount(ResourceKind::Leaves, 5.0);
        let mut upgrade = pheromone_trails(1);

        assert!(upgrade.apply(&mut colony).unwrap_err().is_precondition());
        assert_eq!(colony.resource_amount(ResourceKind::Leaves), 5.0);
        assert_eq!(colony.queen.base_production_interval, 30.0);
    }

    #[test]
    fn test_apply_broadcasts_effects() {
        let mut colony = colony();
        colony
            .register_building(Building::new("Shed", "shed", 1, BuildingEffect::default()))
            .unwrap();
        let mut upgrade = pheromone_trails(1);

        let receipt = colony.apply_upgrade(&mut upgrade).unwrap();
        assert_eq!(receipt.new_level, 1);
        assert_eq!(receipt.paid, vec![(ResourceKind::Leaves, 10.0)]);
        assert_eq!(colony.resource_amount(ResourceKind::Leaves), 90.0);
        assert!((colony.buildings()[0].worker_speed_modifier() - 1.5).abs() < 1e-9);
        assert!((colony.queen.base_production_interval - 15.0).abs() < 1e-9);
        assert_eq!(colony.influence_radius(), 13.0);

        // Second application costs more and compounds
        colony.apply_upgrade(&mut upgrade).unwrap();
        assert_eq!(colony.resource_amount(ResourceKind::Leaves), 70.0);
        assert!((colony.buildings()[0].worker_speed_modifier() - 2.25).abs() < 1e-9);
        assert_eq!(colony.applied_upgrades(), &[UpgradeId(1)]);
    }

    #[test]
    fn test_repeat_without_payment_changes_nothing() {
        let mut colony = colony();
        colony.set_resource_amount(ResourceKind::Leaves, 25.0);
        let mut upgrade = pheromone_trails(1);

        // Level 0 costs 10, level 1 costs 20
        colony.apply_upgrade(&mut upgrade).unwrap();
        let err = colony.apply_upgrade(&mut upgrade).unwrap_err();
        assert!(err.is_precondition());

        assert_eq!(upgrade.level, 1);
        assert_eq!(colony.resource_amount(ResourceKind::Leaves), 15.0);
        assert!((colony.queen.base_production_interval - 15.0).abs() < 1e-9);
        assert_eq!(colony.influence_radius(), 13.0);
        assert_eq!(colony.applied_upgrades(), &[UpgradeId(1)]);
    }
}
