//! Buildings - permanent colony structures and the plans they are built from
//!
//! A building carries a bundle of optional multiplicative modifiers. They are
//! read by the economy (worker speed, carrying capacity, maintenance) and by
//! the queen (production interval). Upgrades never rewrite the base effect;
//! they multiply into the separate [`UpgradeBoosts`] record instead.

use serde::{Deserialize, Serialize};

use crate::city::colony::Colony;
use crate::city::economy::calculate_upgrade_cost;
use crate::core::config::ResourceAmount;
use crate::core::error::{ColonyError, Result};
use crate::core::types::{BuildingId, ResourceKind};

/// Modifiers a building contributes to the colony
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingEffect {
    /// Multiplies the queen's production interval (< 1 hatches faster)
    pub queen_production: Option<f64>,
    pub worker_speed: Option<f64>,
    /// Only affects leaf extraction
    pub carrying_capacity: Option<f64>,
    pub maintenance: Option<f64>,
    /// Flat storage increase for one resource kind
    pub storage: Option<ResourceAmount>,
}

/// Cumulative multipliers broadcast into a building by colony upgrades
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeBoosts {
    pub worker_speed: f64,
    pub carrying_capacity: f64,
}

impl Default for UpgradeBoosts {
    fn default() -> Self {
        Self {
            worker_speed: 1.0,
            carrying_capacity: 1.0,
        }
    }
}

/// A constructed building owned by the colony
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    /// Plan this building was constructed from
    pub plan: String,
    pub level: u32,
    pub cost: Vec<(ResourceKind, f64)>,
    pub effect: BuildingEffect,
    pub boosts: UpgradeBoosts,
}

impl Building {
    pub fn new(name: impl Into<String>, plan: impl Into<String>, level: u32, effect: BuildingEffect) -> Self {
        Self {
            id: BuildingId::new(),
            name: name.into(),
            plan: plan.into(),
            level,
            cost: Vec::new(),
            effect,
            boosts: UpgradeBoosts::default(),
        }
    }

    pub fn with_cost(mut self, cost: Vec<(ResourceKind, f64)>) -> Self {
        self.cost = cost;
        self
    }

    pub fn queen_production_modifier(&self) -> f64 {
        self.effect.queen_production.unwrap_or(1.0)
    }

    pub fn worker_speed_modifier(&self) -> f64 {
        self.effect.worker_speed.unwrap_or(1.0) * self.boosts.worker_speed
    }

    pub fn carrying_capacity_modifier(&self) -> f64 {
        self.effect.carrying_capacity.unwrap_or(1.0) * self.boosts.carrying_capacity
    }

    pub fn maintenance_modifier(&self) -> f64 {
        self.effect.maintenance.unwrap_or(1.0)
    }

    /// Raise storage and register with the queen.
    ///
    /// Only `Colony::register_building` calls this, once per building id.
    pub(crate) fn apply_to_colony(&self, colony: &mut Colony) {
        if let Some(storage) = self.effect.storage {
            if storage.amount > 0.0 {
                colony.add_storage_capacity(storage.resource, storage.amount);
            }
        }
        colony.queen.register_building_modifier(self);
    }
}

/// Blueprint for constructing buildings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingPlan {
    /// Unique identifier, referenced by build tasks
    pub id: String,
    pub name: String,
    /// Cost of the first building of this plan
    pub base_cost: Vec<ResourceAmount>,
    /// Cost growth per building of this plan already owned
    pub growth_coefficient: f64,
    /// Seconds of worker effort to finish construction
    pub build_time: f64,
    #[serde(default)]
    pub effect: BuildingEffect,
}

impl BuildingPlan {
    /// Cost when `level` buildings of this plan already stand
    pub fn cost_at(&self, level: u32) -> Vec<(ResourceKind, f64)> {
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

    /// Construct a building at the given level
    pub fn construct(&self, level: u32) -> Building {
        Building::new(self.name.clone(), self.id.clone(), level + 1, self.effect.clone())
            .with_cost(self.cost_at(level))
    }
}

/// Catalog of all available building plans
#[derive(Debug, Clone, Default)]
pub struct BuildingCatalog {
    plans: Vec<BuildingPlan>,
}

#[derive(Debug, Deserialize)]
struct TomlPlans {
    plans: Vec<BuildingPlan>,
}

impl BuildingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load default plans (hardcoded)
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        catalog.add(BuildingPlan {
            id: "brood_chamber".into(),
            name: "Brood Chamber".into(),
            base_cost: vec![
                ResourceAmount::new(ResourceKind::Leaves, 30.0),
                ResourceAmount::new(ResourceKind::Nectar, 10.0),
            ],
            growth_coefficient: 1.5,
            build_time: 20.0,
            effect: BuildingEffect {
                queen_production: Some(0.8),
                ..Default::default()
            },
        });

        catalog.add(BuildingPlan {
            id: "leaf_depot".into(),
            name: "Leaf Depot".into(),
            base_cost: vec![ResourceAmount::new(ResourceKind::Leaves, 25.0)],
            growth_coefficient: 1.3,
            build_time: 15.0,
            effect: BuildingEffect {
                carrying_capacity: Some(1.2),
                storage: Some(ResourceAmount::new(ResourceKind::Leaves, 60.0)),
                ..Default::default()
            },
        });

        catalog.add(BuildingPlan {
            id: "nectar_cellar".into(),
            name: "Nectar Cellar".into(),
            base_cost: vec![
                ResourceAmount::new(ResourceKind::Leaves, 15.0),
                ResourceAmount::new(ResourceKind::Sand, 10.0),
            ],
            growth_coefficient: 1.3,
            build_time: 15.0,
            effect: BuildingEffect {
                maintenance: Some(0.9),
                storage: Some(ResourceAmount::new(ResourceKind::Nectar, 60.0)),
                ..Default::default()
            },
        });

        catalog.add(BuildingPlan {
            id: "tunnel_network".into(),
            name: "Tunnel Network".into(),
            base_cost: vec![ResourceAmount::new(ResourceKind::Sand, 20.0)],
            growth_coefficient: 1.6,
            build_time: 25.0,
            effect: BuildingEffect {
                worker_speed: Some(1.15),
                ..Default::default()
            },
        });

        catalog
    }

    pub fn add(&mut self, plan: BuildingPlan) {
        self.plans.push(plan);
    }

    /// Get a plan by ID
    pub fn get(&self, id: &str) -> Option<&BuildingPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn all(&self) -> &[BuildingPlan] {
        &self.plans
    }

    /// Load plans from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse plans from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: TomlPlans = toml::from_str(content)?;
        let mut catalog = Self::new();
        for plan in data.plans {
            if plan.build_time < 0.0 || plan.growth_coefficient <= 0.0 {
                return Err(ColonyError::InvalidConfig(format!(
                    "plan {} needs a non-negative build_time and a positive growth_coefficient",
                    plan.id
                )));
            }
            catalog.add(plan);
        }
        Ok(catalog)
    }
}
