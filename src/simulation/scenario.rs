//! Scenarios - a complete starting world described in TOML
//!
//! A scenario bundles the tuning config with the map, the starting
//! population, queued tasks and hazards. Plans and upgrades fall back to
//! the built-in catalogs when omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::campaign::map::MapEdge;
use crate::city::building::{BuildingCatalog, BuildingPlan};
use crate::city::upgrade::ColonyUpgrade;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{NodeId, ResourceKind};
use crate::entity::tasks::{TaskKind, TaskPayload, TaskPriority};
use crate::simulation::command::HazardSpec;
use crate::simulation::resource_node::ResourceNode;
use crate::simulation::world::ColonyWorld;

fn default_regeneration_delay() -> f64 {
    30.0
}

fn default_regeneration_chance() -> (f64, f64) {
    (0.3, 0.6)
}

fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: u32,
    pub kind: ResourceKind,
    pub richness: f64,
    pub base_rate: f64,
    pub distance: f64,
    #[serde(default)]
    pub depletion_risk: f64,
    #[serde(default = "default_regeneration_delay")]
    pub regeneration_delay: f64,
    #[serde(default = "default_regeneration_chance")]
    pub regeneration_chance: (f64, f64),
}

impl From<&NodeSpec> for ResourceNode {
    fn from(spec: &NodeSpec) -> Self {
        ResourceNode::new(NodeId(spec.id), spec.kind, spec.richness, spec.base_rate)
            .with_distance(spec.distance)
            .with_depletion_risk(spec.depletion_risk)
            .with_regeneration(spec.regeneration_delay, spec.regeneration_chance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub kind: TaskKind,
    pub priority: TaskPriority,
    #[serde(default)]
    pub payload: TaskPayload,
    /// Number of identical tasks to queue
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl TaskSpec {
    fn gather(kind: ResourceKind, priority: TaskPriority, repeat: u32) -> Self {
        Self {
            kind: TaskKind::GatherResource,
            priority,
            payload: TaskPayload {
                resource_kind: Some(kind),
                ..Default::default()
            },
            repeat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: SimulationConfig,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<MapEdge>,
    #[serde(default)]
    pub workers: u32,
    #[serde(default)]
    pub scouts: u32,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    #[serde(default)]
    pub hazards: Vec<HazardSpec>,
    /// Replaces the built-in building plans when present
    pub plans: Option<Vec<BuildingPlan>>,
    /// Replaces the built-in upgrade catalog when present
    pub upgrades: Option<Vec<ColonyUpgrade>>,
}

impl Default for Scenario {
    /// A small meadow: leaves and nectar near the nest, sand and a rich
    /// leaf patch beyond the initial visibility
    fn default() -> Self {
        let node = |id, kind, richness, base_rate, distance| NodeSpec {
            id,
            kind,
            richness,
            base_rate,
            distance,
            depletion_risk: 0.0,
            regeneration_delay: default_regeneration_delay(),
            regeneration_chance: default_regeneration_chance(),
        };

        Self {
            config: SimulationConfig::default(),
            nodes: vec![
                node(1, ResourceKind::Leaves, 80.0, 1.0, 3.0),
                node(2, ResourceKind::Nectar, 60.0, 0.8, 4.0),
                node(3, ResourceKind::Sand, 120.0, 1.2, 7.5),
                node(4, ResourceKind::Leaves, 150.0, 1.5, 9.0),
            ],
            edges: vec![
                MapEdge {
                    from: NodeId(1),
                    to: NodeId(2),
                    distance: 2.0,
                },
                MapEdge {
                    from: NodeId(1),
                    to: NodeId(4),
                    distance: 6.0,
                },
            ],
            workers: 4,
            scouts: 1,
            tasks: vec![
                TaskSpec::gather(ResourceKind::Leaves, TaskPriority::High, 6),
                TaskSpec::gather(ResourceKind::Nectar, TaskPriority::Medium, 6),
                TaskSpec::gather(ResourceKind::Sand, TaskPriority::Low, 3),
                TaskSpec {
                    kind: TaskKind::Scout,
                    priority: TaskPriority::Medium,
                    payload: TaskPayload::default(),
                    repeat: 2,
                },
            ],
            hazards: Vec::new(),
            plans: None,
            upgrades: None,
        }
    }
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Assemble a fresh world at time zero
    pub fn build_world(&self) -> Result<ColonyWorld> {
        let mut world = ColonyWorld::new(self.config.clone())?;

        if let Some(plans) = &self.plans {
            let mut catalog = BuildingCatalog::new();
            for plan in plans {
                catalog.add(plan.clone());
            }
            world = world.with_plans(catalog);
        }
        if let Some(upgrades) = &self.upgrades {
            world = world.with_upgrades(upgrades.clone());
        }

        for spec in &self.nodes {
            world.add_node(ResourceNode::from(spec))?;
        }
        for edge in &self.edges {
            world.map.add_edge(edge.from, edge.to, edge.distance)?;
        }

        for _ in 0..self.workers {
            world.spawn_worker();
        }
        for _ in 0..self.scouts {
            world.spawn_scout();
        }

        for spec in &self.tasks {
            for _ in 0..spec.repeat {
                world.enqueue_task(spec.kind, spec.priority, spec.payload.clone())?;
            }
        }
        for hazard in &self.hazards {
            world.register_hazard(hazard.clone());
        }

        tracing::info!(
            "Scenario ready: {} nodes, {} ants, {} tasks",
            world.map.len(),
            world.ants.len(),
            world.tasks.len()
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ColonyError;

    #[test]
    fn test_default_scenario_builds() {
        let world = Scenario::default().build_world().unwrap();
        assert_eq!(world.map.len(), 4);
        assert_eq!(world.ants.len(), 5);
        assert_eq!(world.worker_count(), 4);
        assert_eq!(world.tasks.len(), 17);
        // Sand and the rich patch start out of sight
        assert_eq!(world.visible_nodes().len(), 2);
    }

    #[test]
    fn test_scenario_from_toml() {
        let scenario = Scenario::from_toml_str(
            r#"
            workers = 2

            [config]
            seed = 99
            influence_radius = 12.0

            [[nodes]]
            id = 1
            kind = "nectar"
            richness = 50.0
            base_rate = 1.0
            distance = 2.0

            [[tasks]]
            kind = "GatherResource"
            priority = "High"
            repeat = 3
            payload = { resource_kind = "nectar" }

            [[hazards]]
            type = "puddle"
            area_radius = 3.0
            speed_modifier = 0.5
            duration = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(scenario.config.seed, 99);
        assert_eq!(scenario.nodes[0].regeneration_delay, 30.0);

        let world = scenario.build_world().unwrap();
        assert_eq!(world.worker_count(), 2);
        assert_eq!(world.tasks.len(), 3);
        assert_eq!(world.hazards.len(), 1);
        assert!(world.node(NodeId(1)).is_some());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut scenario = Scenario::default();
        let copy = scenario.nodes[0].clone();
        scenario.nodes.push(copy);

        let err = scenario.build_world().unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Scenario::from_toml_str("[config]\ncolony_level = 0");
        assert!(matches!(result, Err(ColonyError::InvalidConfig(_))));
    }
}
