//! Snapshots - serializable read model handed to the presentation layer

use serde::{Deserialize, Serialize};

use crate::campaign::hazard::Hazard;
use crate::campaign::route::TrailBuff;
use crate::city::building::Building;
use crate::core::types::{NodeId, ResourceKind, SimTime, Tick, UpgradeId};
use crate::entity::ant::Ant;
use crate::entity::tasks::{Task, TaskPriority};
use crate::simulation::resource_node::ResourceNode;
use crate::simulation::world::ColonyWorld;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceView {
    pub kind: ResourceKind,
    pub amount: f64,
    /// 0 = unlimited
    pub limit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    #[serde(flatten)]
    pub node: ResourceNode,
    pub visible: bool,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    /// Priority after per-kind overrides
    pub effective_priority: TaskPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailView {
    pub node: NodeId,
    pub transfers: u32,
    pub speed_bonus: f64,
}

impl From<(NodeId, TrailBuff)> for TrailView {
    fn from((node, trail): (NodeId, TrailBuff)) -> Self {
        Self {
            node,
            transfers: trail.transfers,
            speed_bonus: trail.speed_bonus(),
        }
    }
}

/// Everything the presentation layer may read between steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub tick: Tick,
    pub time: SimTime,
    pub colony_level: u32,
    pub influence_radius: f64,
    pub visibility_radius: f64,
    pub production_interval: f64,
    pub production_progress: f64,
    pub resources: Vec<ResourceView>,
    pub buildings: Vec<Building>,
    pub applied_upgrades: Vec<UpgradeId>,
    pub ants: Vec<Ant>,
    pub tasks: Vec<TaskView>,
    pub nodes: Vec<NodeView>,
    /// Only hazards active at `time`
    pub hazards: Vec<Hazard>,
    pub trails: Vec<TrailView>,
}

impl ColonySnapshot {
    pub fn capture(world: &ColonyWorld) -> Self {
        let colony = &world.colony;
        Self {
            tick: world.current_tick(),
            time: world.time(),
            colony_level: colony.level,
            influence_radius: colony.influence_radius(),
            visibility_radius: world.map.visibility_radius(),
            production_interval: colony.queen.production_interval(),
            production_progress: colony.queen.progress,
            resources: ResourceKind::ALL
                .iter()
                .map(|&kind| ResourceView {
                    kind,
                    amount: colony.resource_amount(kind),
                    limit: colony.storage_limit(kind),
                })
                .collect(),
            buildings: colony.buildings().to_vec(),
            applied_upgrades: colony.applied_upgrades().to_vec(),
            ants: world.ants.clone(),
            tasks: world
                .tasks
                .iter()
                .map(|task| TaskView {
                    task: task.clone(),
                    effective_priority: world.tasks.effective_priority(task),
                })
                .collect(),
            nodes: world
                .map
                .nodes()
                .iter()
                .map(|node| NodeView {
                    node: node.clone(),
                    visible: world.map.is_visible(node),
                    available: node.is_available(),
                })
                .collect(),
            hazards: world.active_hazards().into_iter().cloned().collect(),
            trails: world.trails.entries().into_iter().map(TrailView::from).collect(),
        }
    }

    pub fn to_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
