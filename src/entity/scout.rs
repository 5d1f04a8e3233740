//! Scout traits - detection radius and rich-node discovery

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::tasks::{Task, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoutTraits {
    /// Radius added to map visibility by one exploration
    pub detection_radius: f64,
    /// Chance that an exploration reports a rich node
    pub rich_node_chance: f64,
}

/// Outcome of a single exploration. Nothing is remembered by the scout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    pub discovered_rich_node: bool,
    pub radius_revealed: f64,
}

impl ScoutTraits {
    pub fn new(detection_radius: f64, rich_node_chance: f64) -> Self {
        Self {
            detection_radius,
            rich_node_chance,
        }
    }

    pub fn explore<R: Rng + ?Sized>(&self, rng: &mut R) -> Discovery {
        let roll: f64 = rng.gen();
        Discovery {
            discovered_rich_node: roll < self.rich_node_chance,
            radius_revealed: self.detection_radius,
        }
    }

    pub fn can_perform_task(&self, task: &Task) -> bool {
        task.kind == TaskKind::Scout
    }
}
