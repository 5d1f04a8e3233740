//! Intents - commands submitted by the presentation layer
//!
//! Submitted intents queue up on the world and are applied, in order, at
//! the start of the next step. Each produces a receipt or an error.

use serde::{Deserialize, Serialize};

use crate::campaign::hazard::{Hazard, HazardEffect, HazardKind};
use crate::campaign::weather::WeatherKind;
use crate::city::building::Building;
use crate::city::upgrade::UpgradeReceipt;
use crate::core::types::{AntId, BuildingId, HazardId, ResourceKind, SimTime, TaskId, UpgradeId};
use crate::entity::tasks::{TaskKind, TaskPayload, TaskPriority};

/// Description of a hazard to register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HazardSpec {
    Predator {
        area_radius: f64,
        duration: f64,
    },
    Puddle {
        area_radius: f64,
        speed_modifier: f64,
        duration: f64,
    },
    Weather {
        weather: WeatherKind,
        duration: f64,
    },
    Custom {
        kind: HazardKind,
        area_radius: Option<f64>,
        effect: HazardEffect,
    },
}

impl HazardSpec {
    pub fn into_hazard(self, id: HazardId, now: SimTime) -> Hazard {
        match self {
            Self::Predator { area_radius, duration } => Hazard::predator(id, area_radius, duration, now),
            Self::Puddle {
                area_radius,
                speed_modifier,
                duration,
            } => Hazard::puddle(id, area_radius, speed_modifier, duration, now),
            Self::Weather { weather, duration } => Hazard::weather(id, weather, duration, now),
            Self::Custom {
                kind,
                area_radius,
                effect,
            } => Hazard::new(id, kind, area_radius, effect, now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    EnqueueTask {
        kind: TaskKind,
        priority: TaskPriority,
        payload: TaskPayload,
    },
    SetPriority {
        kind: TaskKind,
        priority: TaskPriority,
    },
    /// Pay for a plan and queue the construction task
    Build {
        plan: String,
        priority: TaskPriority,
    },
    RegisterBuilding(Building),
    ApplyUpgrade(UpgradeId),
    RegisterHazard(HazardSpec),
    /// Hand a task to an ant; `None` takes the next one it can perform
    AssignTask {
        ant: AntId,
        task: Option<TaskId>,
    },
    ClearTask(AntId),
    CancelTask(TaskId),
    /// Raise the colony level by one
    PromoteColony,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandReceipt {
    TaskQueued(TaskId),
    PriorityChanged {
        kind: TaskKind,
        priority: TaskPriority,
    },
    BuildQueued {
        task: TaskId,
        paid: Vec<(ResourceKind, f64)>,
    },
    BuildingRegistered(BuildingId),
    UpgradeApplied(UpgradeReceipt),
    HazardRegistered(HazardId),
    TaskAssigned {
        ant: AntId,
        task: TaskId,
    },
    /// The ant's task, if it held one, was completed and removed
    TaskCleared {
        ant: AntId,
        task: Option<TaskId>,
    },
    TaskCancelled(TaskId),
    ColonyPromoted(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_spec_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            hazards: Vec<HazardSpec>,
        }

        let wrapper: Wrapper = toml::from_str(
            r#"
            [[hazards]]
            type = "predator"
            area_radius = 4.0
            duration = 30.0

            [[hazards]]
            type = "weather"
            weather = "rain"
            duration = 60.0
            "#,
        )
        .unwrap();

        let predator = wrapper.hazards[0].clone().into_hazard(HazardId(1), 10.0);
        assert!(predator.effect.block_node);
        assert_eq!(predator.active_until, 40.0);

        let rain = wrapper.hazards[1].clone().into_hazard(HazardId(2), 0.0);
        assert_eq!(rain.kind, HazardKind::Weather(WeatherKind::Rain));
        assert_eq!(rain.area_radius, None);
    }
}
