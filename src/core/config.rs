//! Simulation configuration with documented constants
//!
//! All tuning numbers are collected here with a note on what they drive.
//! The whole struct can be loaded from TOML; missing keys fall back to
//! the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};
use crate::core::types::ResourceKind;

/// A (resource, amount) pair as written in TOML files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceAmount {
    pub resource: ResourceKind,
    pub amount: f64,
}

impl ResourceAmount {
    pub fn new(resource: ResourceKind, amount: f64) -> Self {
        Self { resource, amount }
    }
}

/// Base stats handed to newly created ants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AntTemplate {
    /// Distance units covered per second
    pub speed: f64,
    /// Cargo units carried per trip before efficiency
    pub capacity: f64,
    pub energy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoutTemplate {
    pub stats: AntTemplate,
    /// Radius added to the map visibility per exploration
    pub detection_radius: f64,
    /// Probability that an exploration reports a rich node
    pub rich_node_chance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueenConfig {
    /// Seconds between two hatched workers before building modifiers
    pub base_production_interval: f64,
    /// Nectar per worker per minute
    pub worker_maintenance_cost: f64,
}

/// Configuration for the colony simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === RANDOMNESS ===
    /// Seed for the ChaCha generator used by the runner
    pub seed: u64,

    // === COLONY ===
    /// Starting colony level; upgrades gate on it
    pub colony_level: u32,

    /// Maximum colony-to-node distance reachable by workers
    ///
    /// Upgrades may add to it; it never drops below 1.
    pub influence_radius: f64,

    /// Initial map visibility radius (only ever grows)
    pub visibility_radius: f64,

    /// Resources in the pool at session start
    pub starting_resources: Vec<ResourceAmount>,

    /// Per-kind storage caps. Kinds not listed are unlimited.
    pub storage_limits: Vec<ResourceAmount>,

    pub queen: QueenConfig,

    // === ANTS ===
    /// Stats for workers hatched by the queen
    pub worker_template: AntTemplate,

    pub scout_template: ScoutTemplate,

    /// Fatigue at which an idle worker rests instead of taking a task
    ///
    /// Fatigue grows by `dt * energy_consumption` while a worker is busy,
    /// so at the default an average worker rests after two minutes of work.
    pub max_fatigue: f64,

    // === EXPLORATION ===
    /// Richness above which a known node counts as "rich"
    pub rich_node_threshold: f64,

    // === TRAILS ===
    /// Speed multiplier a fully established trail converges to
    pub trail_max_bonus: f64,

    /// Transfers needed for a trail to reach its maximum bonus
    pub trail_transfers_to_max: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,

            colony_level: 1,
            influence_radius: 10.0,
            visibility_radius: 6.0,
            starting_resources: vec![
                ResourceAmount::new(ResourceKind::Nectar, 40.0),
                ResourceAmount::new(ResourceKind::Leaves, 20.0),
            ],
            storage_limits: vec![
                ResourceAmount::new(ResourceKind::Nectar, 120.0),
                ResourceAmount::new(ResourceKind::Leaves, 120.0),
                ResourceAmount::new(ResourceKind::Sand, 120.0),
            ],
            queen: QueenConfig {
                base_production_interval: 30.0,
                worker_maintenance_cost: 0.5,
            },

            worker_template: AntTemplate {
                speed: 1.5,
                capacity: 5.0,
                energy: 100.0,
            },
            scout_template: ScoutTemplate {
                stats: AntTemplate {
                    speed: 3.0,
                    capacity: 0.0,
                    energy: 80.0,
                },
                detection_radius: 3.0,
                rich_node_chance: 0.3,
            },
            max_fatigue: 120.0,

            rich_node_threshold: 100.0,

            trail_max_bonus: 1.5,
            trail_transfers_to_max: 10,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, then validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.colony_level == 0 {
            return Err(ColonyError::InvalidConfig("colony_level must be at least 1".into()));
        }

        if self.influence_radius < 1.0 {
            return Err(ColonyError::InvalidConfig(format!(
                "influence_radius ({}) must be >= 1",
                self.influence_radius
            )));
        }

        // Production must advance, or the queen would hatch forever in one step
        if self.queen.base_production_interval <= 0.0 {
            return Err(ColonyError::InvalidConfig(
                "queen.base_production_interval must be positive".into(),
            ));
        }

        if self.queen.worker_maintenance_cost < 0.0 {
            return Err(ColonyError::InvalidConfig(
                "queen.worker_maintenance_cost must not be negative".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.scout_template.rich_node_chance) {
            return Err(ColonyError::InvalidConfig(format!(
                "scout_template.rich_node_chance ({}) must be within 0..=1",
                self.scout_template.rich_node_chance
            )));
        }

        if self.trail_max_bonus < 1.0 || self.trail_transfers_to_max == 0 {
            return Err(ColonyError::InvalidConfig(
                "trail_max_bonus must be >= 1 and trail_transfers_to_max positive".into(),
            ));
        }

        let negative = self
            .starting_resources
            .iter()
            .chain(self.storage_limits.iter())
            .find(|entry| entry.amount < 0.0);
        if let Some(entry) = negative {
            return Err(ColonyError::InvalidConfig(format!(
                "{} amount ({}) must not be negative",
                entry.resource, entry.amount
            )));
        }

        Ok(())
    }
}
